//! Location of the JPL kernel used by the pipeline.
//!
//! A source is written either as `"naif:<VERSION>"` (e.g. `"naif:DE421"`), in which case
//! the kernel is downloaded once from the NAIF server into the cache directory, or as
//! the path of a local `.bsp` file.
use std::{fmt, str::FromStr};

use camino::Utf8PathBuf;
use tracing::{debug, info};

use crate::{env_state::StarMapEnv, starmap_errors::StarMapError};

use super::naif::{naif_data::NaifData, naif_version::NaifVersion};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EphemFileSource {
    /// Kernel from the NAIF generic kernels area, cached locally
    Naif(NaifVersion),
    /// Kernel already on disk
    LocalFile(Utf8PathBuf),
}

impl TryFrom<&str> for EphemFileSource {
    type Error = StarMapError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let value = value.trim();
        if value.is_empty() {
            return Err(StarMapError::InvalidConfiguration(
                "empty ephemeris source".into(),
            ));
        }

        match value.split_once(':') {
            Some((prefix, version)) if prefix.eq_ignore_ascii_case("naif") => {
                Ok(EphemFileSource::Naif(NaifVersion::from_str(version)?))
            }
            _ => Ok(EphemFileSource::LocalFile(Utf8PathBuf::from(value))),
        }
    }
}

impl FromStr for EphemFileSource {
    type Err = StarMapError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        EphemFileSource::try_from(s)
    }
}

impl fmt::Display for EphemFileSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EphemFileSource::Naif(version) => write!(f, "naif:{version}"),
            EphemFileSource::LocalFile(path) => write!(f, "{path}"),
        }
    }
}

impl EphemFileSource {
    /// Local path of the kernel, downloading it into the cache if needed.
    ///
    /// Arguments
    /// ---------
    /// * `env`: HTTP client and cache directory
    ///
    /// Return
    /// ------
    /// * The path of an existing file, or [`StarMapError::EphemerisError`] when the local
    ///   file is missing or the download fails.
    pub fn resolve(&self, env: &StarMapEnv) -> Result<Utf8PathBuf, StarMapError> {
        match self {
            EphemFileSource::LocalFile(path) => {
                if path.is_file() {
                    Ok(path.clone())
                } else {
                    Err(StarMapError::EphemerisError(format!(
                        "ephemeris file not found: {path}"
                    )))
                }
            }
            EphemFileSource::Naif(version) => {
                let local_file = env
                    .cache_file("jpl_ephem", version.get_filename())
                    .map_err(|e| {
                        StarMapError::EphemerisError(format!("cannot prepare the cache: {e}"))
                    })?;

                if local_file.is_file() {
                    debug!(path = %local_file, "using cached ephemeris kernel");
                    return Ok(local_file);
                }

                info!(%version, "ephemeris kernel not cached, downloading");
                env.download_to_file(&version.url(), &local_file)
                    .map_err(|e| {
                        StarMapError::EphemerisError(format!(
                            "failed to download {}: {e}",
                            version.url()
                        ))
                    })?;
                Ok(local_file)
            }
        }
    }

    /// Resolve the source and decode the kernel.
    pub fn load(&self, env: &StarMapEnv) -> Result<NaifData, StarMapError> {
        NaifData::read_naif_file(&self.resolve(env)?)
    }
}
