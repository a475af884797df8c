//! # Star catalog
//!
//! A [`StarCatalog`] is the fixed-order, read-only list of stars drawn on the chart.
//! It is loaded once through a [`CatalogLoader`] and then shared: cloning a catalog
//! only bumps a reference count, and the rows can never be mutated after loading,
//! so one instance can serve overlapping renders from several threads.
//!
//! * [`hipparcos`] – loader of the Hipparcos main catalog (ESA 1997).
pub mod hipparcos;

use std::sync::Arc;

use crate::{
    constants::{Degree, Magnitude, HIPPARCOS_EPOCH_JD},
    starmap_errors::StarMapError,
};

/// One catalog star.
///
/// Coordinates are ICRS, at the catalog reference epoch.
#[derive(Debug, Clone, PartialEq)]
pub struct StarRecord {
    /// Catalog identifier (HIP number)
    pub hip: u32,
    pub ra_deg: Degree,
    pub dec_deg: Degree,
    /// Trigonometric parallax in milliarcseconds (0 when unknown)
    pub parallax_mas: f64,
    /// Proper motion in right ascension, μα·cosδ, in mas/yr
    pub pm_ra_mas_per_year: f64,
    /// Proper motion in declination in mas/yr
    pub pm_dec_mas_per_year: f64,
    /// Visual magnitude
    pub magnitude: Magnitude,
}

impl StarRecord {
    /// A star with no parallax nor proper motion.
    pub fn fixed(hip: u32, ra_deg: Degree, dec_deg: Degree, magnitude: Magnitude) -> Self {
        StarRecord {
            hip,
            ra_deg,
            dec_deg,
            parallax_mas: 0.0,
            pm_ra_mas_per_year: 0.0,
            pm_dec_mas_per_year: 0.0,
            magnitude,
        }
    }
}

/// Immutable, cheaply clonable star table with its reference epoch.
#[derive(Debug, Clone, PartialEq)]
pub struct StarCatalog {
    stars: Arc<[StarRecord]>,
    epoch_jd: f64,
}

impl StarCatalog {
    /// Catalog at the Hipparcos epoch J1991.25.
    pub fn new(stars: Vec<StarRecord>) -> Self {
        Self::with_epoch(stars, HIPPARCOS_EPOCH_JD)
    }

    /// Catalog whose positions refer to the Julian date `epoch_jd` (TT).
    pub fn with_epoch(stars: Vec<StarRecord>, epoch_jd: f64) -> Self {
        StarCatalog {
            stars: stars.into(),
            epoch_jd,
        }
    }

    pub fn empty() -> Self {
        Self::new(Vec::new())
    }

    pub fn stars(&self) -> &[StarRecord] {
        &self.stars
    }

    pub fn iter(&self) -> std::slice::Iter<'_, StarRecord> {
        self.stars.iter()
    }

    pub fn len(&self) -> usize {
        self.stars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stars.is_empty()
    }

    /// Julian date (TT) of the catalog positions.
    pub fn epoch_jd(&self) -> f64 {
        self.epoch_jd
    }

    /// Magnitudes in catalog order.
    pub fn magnitudes(&self) -> Vec<Magnitude> {
        self.stars.iter().map(|s| s.magnitude).collect()
    }

    /// Keep the stars matching `predicate`, in order.
    pub fn filter(&self, predicate: impl Fn(&StarRecord) -> bool) -> StarCatalog {
        Self::with_epoch(
            self.stars.iter().filter(|s| predicate(s)).cloned().collect(),
            self.epoch_jd,
        )
    }
}

impl<'a> IntoIterator for &'a StarCatalog {
    type Item = &'a StarRecord;
    type IntoIter = std::slice::Iter<'a, StarRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.stars.iter()
    }
}

/// Source of the star table.
///
/// Loading must be idempotent: the caller keeps the first successful result for the
/// whole process and may call again after a failure.
pub trait CatalogLoader: Send + Sync {
    /// Return
    /// ------
    /// * The catalog, or [`StarMapError::CatalogUnavailable`] when the data cannot be
    ///   fetched or parsed.
    fn load_catalog(&self) -> Result<StarCatalog, StarMapError>;
}

/// An already loaded catalog is its own loader.
impl CatalogLoader for StarCatalog {
    fn load_catalog(&self) -> Result<StarCatalog, StarMapError> {
        Ok(self.clone())
    }
}
