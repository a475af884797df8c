//! Loader of the Hipparcos main catalog (`hip_main.dat`, CDS I/239).
//!
//! The file holds one `|`-separated row per star. Only seven fields are kept:
//!
//! | field | content               | unit  |
//! |-------|-----------------------|-------|
//! | 1     | HIP number            |       |
//! | 5     | V magnitude           | mag   |
//! | 8     | right ascension       | deg   |
//! | 9     | declination           | deg   |
//! | 11    | trigonometric parallax| mas   |
//! | 12    | proper motion μα·cosδ | mas/yr|
//! | 13    | proper motion μδ      | mas/yr|
//!
//! Positions refer to the catalog epoch J1991.25. A few hundred entries have no
//! astrometric solution or no magnitude: they are dropped with a single warning.
//! Blank parallax and proper motions are read as zero.
use std::{
    fmt,
    fs::File,
    io::{BufReader, Read},
};

use camino::Utf8PathBuf;
use tracing::{debug, info, warn};

use crate::{
    constants::HIPPARCOS_URL, env_state::StarMapEnv, starmap_errors::StarMapError,
};

use super::{CatalogLoader, StarCatalog, StarRecord};

const FIELD_HIP: usize = 1;
const FIELD_VMAG: usize = 5;
const FIELD_RA: usize = 8;
const FIELD_DEC: usize = 9;
const FIELD_PLX: usize = 11;
const FIELD_PM_RA: usize = 12;
const FIELD_PM_DEC: usize = 13;

/// Cache sub-directory of the downloaded catalog.
const CATALOG_CACHE_DIR: &str = "catalog";

/// Where the catalog file comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogSource {
    /// Downloaded once from `url` and kept in the cache directory
    Remote { url: String },
    /// File already on disk
    LocalFile(Utf8PathBuf),
}

impl Default for CatalogSource {
    fn default() -> Self {
        CatalogSource::Remote {
            url: HIPPARCOS_URL.to_string(),
        }
    }
}

impl fmt::Display for CatalogSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CatalogSource::Remote { url } => write!(f, "{url}"),
            CatalogSource::LocalFile(path) => write!(f, "{path}"),
        }
    }
}

impl From<&str> for CatalogSource {
    /// `http://` and `https://` strings are remote, anything else is a local path.
    fn from(value: &str) -> Self {
        let value = value.trim();
        if value.starts_with("http://") || value.starts_with("https://") {
            CatalogSource::Remote {
                url: value.to_string(),
            }
        } else {
            CatalogSource::LocalFile(Utf8PathBuf::from(value))
        }
    }
}

/// Outcome of a parse: the kept stars and the number of rows dropped.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedCatalog {
    pub stars: Vec<StarRecord>,
    pub skipped: usize,
}

/// Numeric field, `None` when blank.
fn optional_field<T: std::str::FromStr>(
    record: &csv::StringRecord,
    index: usize,
    name: &str,
    line: u64,
) -> Result<Option<T>, StarMapError> {
    match record.get(index).map(str::trim) {
        None | Some("") => Ok(None),
        Some(text) => text.parse::<T>().map(Some).map_err(|_| {
            StarMapError::CatalogUnavailable(format!(
                "line {line}: invalid {name} value '{text}'"
            ))
        }),
    }
}

/// Decode `hip_main.dat` rows.
///
/// Arguments
/// ---------
/// * `reader`: the raw catalog text
///
/// Return
/// ------
/// * The stars in file order and the count of rows without position or magnitude.
/// * [`StarMapError::CatalogUnavailable`] when a row is truncated, a field is not a
///   number, or no star at all could be read.
pub fn parse_hipparcos<R: Read>(reader: R) -> Result<ParsedCatalog, StarMapError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .delimiter(b'|')
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut stars = Vec::new();
    let mut skipped = 0;

    for result in csv_reader.records() {
        let record = result.map_err(|e| StarMapError::CatalogUnavailable(e.to_string()))?;
        let line = record.position().map_or(0, |p| p.line());

        if record.len() <= FIELD_PM_DEC {
            return Err(StarMapError::CatalogUnavailable(format!(
                "line {line}: expected at least {} fields, found {}",
                FIELD_PM_DEC + 1,
                record.len()
            )));
        }

        let hip = optional_field::<u32>(&record, FIELD_HIP, "HIP", line)?;
        let magnitude = optional_field::<f64>(&record, FIELD_VMAG, "Vmag", line)?;
        let ra = optional_field::<f64>(&record, FIELD_RA, "RAdeg", line)?;
        let dec = optional_field::<f64>(&record, FIELD_DEC, "DEdeg", line)?;

        let (Some(hip), Some(magnitude), Some(ra_deg), Some(dec_deg)) = (hip, magnitude, ra, dec)
        else {
            skipped += 1;
            continue;
        };

        stars.push(StarRecord {
            hip,
            ra_deg,
            dec_deg,
            parallax_mas: optional_field(&record, FIELD_PLX, "Plx", line)?.unwrap_or(0.0),
            pm_ra_mas_per_year: optional_field(&record, FIELD_PM_RA, "pmRA", line)?
                .unwrap_or(0.0),
            pm_dec_mas_per_year: optional_field(&record, FIELD_PM_DEC, "pmDE", line)?
                .unwrap_or(0.0),
            magnitude,
        });
    }

    if stars.is_empty() {
        return Err(StarMapError::CatalogUnavailable(
            "no star could be read from the catalog".into(),
        ));
    }
    if skipped > 0 {
        warn!(
            skipped,
            kept = stars.len(),
            "catalog rows without position or magnitude were dropped"
        );
    }
    Ok(ParsedCatalog { stars, skipped })
}

/// [`CatalogLoader`] of the Hipparcos main catalog.
#[derive(Debug, Clone)]
pub struct HipparcosLoader {
    source: CatalogSource,
    env: StarMapEnv,
}

impl HipparcosLoader {
    pub fn new(source: CatalogSource, env: StarMapEnv) -> Self {
        HipparcosLoader { source, env }
    }

    pub fn source(&self) -> &CatalogSource {
        &self.source
    }

    /// Local path of the catalog, downloading it into the cache on first use.
    fn resolve(&self) -> Result<Utf8PathBuf, StarMapError> {
        match &self.source {
            CatalogSource::LocalFile(path) => {
                if path.is_file() {
                    Ok(path.clone())
                } else {
                    Err(StarMapError::CatalogUnavailable(format!(
                        "catalog file not found: {path}"
                    )))
                }
            }
            CatalogSource::Remote { url } => {
                let file_name = url
                    .rsplit('/')
                    .next()
                    .filter(|name| !name.is_empty())
                    .unwrap_or("hip_main.dat");
                let local_file = self
                    .env
                    .cache_file(CATALOG_CACHE_DIR, file_name)
                    .map_err(|e| {
                        StarMapError::CatalogUnavailable(format!("cannot prepare the cache: {e}"))
                    })?;

                if local_file.is_file() {
                    debug!(path = %local_file, "using cached star catalog");
                    return Ok(local_file);
                }

                self.env
                    .download_to_file(url, &local_file)
                    .map_err(|e| {
                        StarMapError::CatalogUnavailable(format!("failed to download {url}: {e}"))
                    })?;
                Ok(local_file)
            }
        }
    }
}

impl CatalogLoader for HipparcosLoader {
    fn load_catalog(&self) -> Result<StarCatalog, StarMapError> {
        let path = self.resolve()?;
        let file = File::open(&path)
            .map_err(|e| StarMapError::CatalogUnavailable(format!("{path}: {e}")))?;

        let parsed = parse_hipparcos(BufReader::new(file))?;
        info!(
            source = %self.source,
            stars = parsed.stars.len(),
            "star catalog loaded"
        );
        Ok(StarCatalog::new(parsed.stars))
    }
}
