//! JPL planetary ephemeris versions distributed by NAIF.
//!
//! ```rust
//! use starmap::jpl_ephem::naif::naif_version::NaifVersion;
//!
//! let v: NaifVersion = "DE421".parse().unwrap();
//! assert_eq!(v.get_filename(), "de421.bsp");
//! ```
use std::{fmt, str::FromStr};

use crate::starmap_errors::StarMapError;

/// Base URL of the NAIF generic planetary kernels.
pub const NAIF_PLANETS_URL: &str = "https://naif.jpl.nasa.gov/pub/naif/generic_kernels/spk/planets";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NaifVersion {
    DE421,
    DE430,
    DE432s,
    DE435,
    DE438,
    DE440,
    DE440s,
    DE442,
}

impl NaifVersion {
    /// Canonical BSP file name of the kernel.
    pub fn get_filename(&self) -> &'static str {
        match self {
            NaifVersion::DE421 => "de421.bsp",
            NaifVersion::DE430 => "de430.bsp",
            NaifVersion::DE432s => "de432s.bsp",
            NaifVersion::DE435 => "de435.bsp",
            NaifVersion::DE438 => "de438.bsp",
            NaifVersion::DE440 => "de440.bsp",
            NaifVersion::DE440s => "de440s.bsp",
            NaifVersion::DE442 => "de442.bsp",
        }
    }

    /// Download location of the kernel.
    pub fn url(&self) -> String {
        format!("{NAIF_PLANETS_URL}/{}", self.get_filename())
    }
}

impl FromStr for NaifVersion {
    type Err = StarMapError;

    /// Parse a version such as `"DE421"` (case-insensitive).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "DE421" => Ok(NaifVersion::DE421),
            "DE430" => Ok(NaifVersion::DE430),
            "DE432S" => Ok(NaifVersion::DE432s),
            "DE435" => Ok(NaifVersion::DE435),
            "DE438" => Ok(NaifVersion::DE438),
            "DE440" => Ok(NaifVersion::DE440),
            "DE440S" => Ok(NaifVersion::DE440s),
            "DE442" => Ok(NaifVersion::DE442),
            _ => Err(StarMapError::InvalidConfiguration(format!(
                "unknown NAIF ephemeris version: {s}"
            ))),
        }
    }
}

impl fmt::Display for NaifVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{self:?}")
    }
}
