//! # starmap environment state
//!
//! This module defines [`crate::env_state::StarMapEnv`], the **shared environment object** used by
//! the chart pipeline. It provides access to:
//!
//! - A persistent **HTTP client** (for downloading the star catalog and the JPL kernel).
//! - An optional **UT1 provider** from [hifitime](https://docs.rs/hifitime) holding Earth
//!   orientation parameters from JPL.
//! - The **cache directory** where downloaded data files are kept between runs.
//!
//! ## Structure
//!
//! ```text
//! StarMapEnv
//! ├── http_client  (ureq::Agent)
//! ├── ut1_provider (Option<hifitime::Ut1Provider>)
//! └── cache_dir    (camino::Utf8PathBuf)
//! ```
//!
//! ## Notes
//!
//! - Without a UT1 provider, UT1 is approximated by UTC. The difference stays below 0.9 s,
//!   i.e. less than 14 arcseconds of Earth rotation, which is invisible on a whole-sky chart.
//! - Downloads are blocking and stream straight to disk; there is no retry.
use std::{
    fs::{self, File},
    io::{self, BufWriter, Write},
    time::Duration,
};

use camino::{Utf8Path, Utf8PathBuf};
use directories::BaseDirs;
use hifitime::ut1::Ut1Provider;
use tracing::info;
use ureq::Agent;

use crate::starmap_errors::StarMapError;

/// Name of the directory created under the platform cache directory.
const CACHE_DIR_NAME: &str = "starmap_cache";

/// This object is passed to the loaders of the crate
/// to provide access to the network and to the local cache.
///
/// # Fields
///
/// * `http_client` - A ureq agent used to make HTTP requests
/// * `ut1_provider` - Optional provider of UT1 - UTC offsets
/// * `cache_dir` - Root directory of the downloaded data files
#[derive(Debug, Clone)]
pub struct StarMapEnv {
    pub http_client: Agent,
    pub ut1_provider: Option<Ut1Provider>,
    cache_dir: Utf8PathBuf,
}

impl StarMapEnv {
    /// Create a new environment using the platform cache directory.
    ///
    /// Return
    /// ------
    /// * A new environment without UT1 data, or an error if no cache directory can be resolved.
    pub fn new() -> Result<Self, StarMapError> {
        let base_dir = BaseDirs::new().ok_or_else(|| {
            StarMapError::InvalidConfiguration("cannot find the user cache directory".into())
        })?;
        let cache_path = Utf8Path::from_path(base_dir.cache_dir()).ok_or_else(|| {
            StarMapError::InvalidConfiguration("cache directory is not valid UTF-8".into())
        })?;

        Ok(Self::with_cache_dir(cache_path.join(CACHE_DIR_NAME)))
    }

    /// Create a new environment rooted at an explicit cache directory.
    pub fn with_cache_dir(cache_dir: impl Into<Utf8PathBuf>) -> Self {
        let config = Agent::config_builder()
            .timeout_global(Some(Duration::from_secs(60)))
            .build();
        let agent: Agent = config.into();

        StarMapEnv {
            http_client: agent,
            ut1_provider: None,
            cache_dir: cache_dir.into(),
        }
    }

    /// Download the JPL Earth orientation parameters and keep them for UT1 conversions.
    pub fn with_ut1_from_jpl(mut self) -> Result<Self, StarMapError> {
        let provider = Ut1Provider::download_from_jpl("latest_eop2.long").map_err(|e| {
            StarMapError::InvalidConfiguration(format!("UT1 data download failed: {e:?}"))
        })?;
        self.ut1_provider = Some(provider);
        Ok(self)
    }

    pub fn cache_dir(&self) -> &Utf8Path {
        &self.cache_dir
    }

    /// Path of a cached file, creating the parent sub-directory if needed.
    ///
    /// Arguments
    /// ---------
    /// * `sub_dir`: cache sub-directory (e.g. `"catalog"`)
    /// * `file_name`: name of the file inside `sub_dir`
    pub(crate) fn cache_file(&self, sub_dir: &str, file_name: &str) -> io::Result<Utf8PathBuf> {
        let dir = self.cache_dir.join(sub_dir);
        fs::create_dir_all(&dir)?;
        Ok(dir.join(file_name))
    }

    /// Stream the body of a GET request into `path`.
    ///
    /// The body is first written to a `.part` sibling and renamed once complete, so an
    /// interrupted download never leaves a truncated file in the cache.
    ///
    /// Return
    /// ------
    /// * The number of bytes written.
    pub(crate) fn download_to_file(&self, url: &str, path: &Utf8Path) -> io::Result<u64> {
        info!(url, path = %path, "downloading");

        let response = self.http_client.get(url).call().map_err(io::Error::other)?;
        let mut reader = response.into_body().into_reader();

        let partial = path.with_extension("part");
        let mut writer = BufWriter::new(File::create(&partial)?);
        let written = io::copy(&mut reader, &mut writer)?;
        writer.flush()?;
        drop(writer);

        fs::rename(&partial, path)?;
        info!(url, bytes = written, "download complete");
        Ok(written)
    }
}
