//! # Apparent star positions
//!
//! Turns catalog entries into the altitude and azimuth seen by an observer at one
//! instant. The computation, per star, in the equatorial mean J2000 frame:
//!
//! 1. Space position from (RA, Dec, parallax). A non-positive parallax is replaced by
//!    [`MIN_PARALLAX_MAS`], which puts the star at a practically infinite distance.
//! 2. Linear space motion from the proper motions (radial velocity taken as zero),
//!    applied from the catalog epoch to the instant (TDB).
//! 3. Topocentric vector: star minus observer barycentric position (annual and diurnal
//!    parallax).
//! 4. First-order aberration from the observer barycentric velocity.
//! 5. Altitude and azimuth from the local east/north/up triad.
//!
//! Refraction and gravitational light deflection are not modeled.
//!
//! To keep the arithmetic well scaled, all vectors are expressed in units of the star
//! distance: the unit catalog direction is perturbed by the proper motion (in radians)
//! and by the observer offset multiplied by the parallax.
use nalgebra::Vector3;
use tracing::debug;

use crate::{
    catalog::{StarCatalog, StarRecord},
    constants::{Degree, Radian, DAYS_PER_JULIAN_YEAR, MIN_PARALLAX_MAS, RADEG, RADMAS},
    observers::observer_frame::ObserverFrame,
    ref_system::{apply_aberration, principal_angle, radec_to_unit},
};

/// Direction of a star in the horizontal system.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ApparentDirection {
    /// Altitude above the horizon plane, in [-90, 90] degrees
    pub altitude_deg: Degree,
    /// Azimuth from north through east, in [0, 360) degrees
    pub azimuth_deg: Degree,
}

impl ApparentDirection {
    pub fn from_radians(altitude: Radian, azimuth: Radian) -> Self {
        ApparentDirection {
            altitude_deg: altitude / RADEG,
            azimuth_deg: principal_angle(azimuth / RADEG, 360.0),
        }
    }

    pub fn altitude(&self) -> Radian {
        self.altitude_deg * RADEG
    }

    pub fn azimuth(&self) -> Radian {
        self.azimuth_deg * RADEG
    }

    pub fn is_above_horizon(&self) -> bool {
        self.altitude_deg >= 0.0
    }
}

/// Direction of `star` seen from the observer, before aberration.
///
/// The returned vector is scaled by the star parallax (unit norm at the catalog epoch
/// for a star at rest).
fn topocentric_direction(
    star: &StarRecord,
    frame: &ObserverFrame,
    elapsed_days: f64,
) -> Vector3<f64> {
    let ra = star.ra_deg * RADEG;
    let dec = star.dec_deg * RADEG;
    let (sin_ra, cos_ra) = ra.sin_cos();
    let (sin_dec, cos_dec) = dec.sin_cos();

    let direction = radec_to_unit(ra, dec);
    let east = Vector3::new(-sin_ra, cos_ra, 0.0);
    let north = Vector3::new(-sin_dec * cos_ra, -sin_dec * sin_ra, cos_dec);

    // angular rate in radians per day, i.e. space velocity over distance
    let angular_rate = (east * star.pm_ra_mas_per_year + north * star.pm_dec_mas_per_year)
        * (RADMAS / DAYS_PER_JULIAN_YEAR);

    let parallax = if star.parallax_mas > 0.0 {
        star.parallax_mas
    } else {
        MIN_PARALLAX_MAS
    };
    let inverse_distance = (parallax * RADMAS).sin();

    direction + angular_rate * elapsed_days - frame.position * inverse_distance
}

/// Apparent horizontal direction of a single star.
pub fn apparent_direction(
    star: &StarRecord,
    frame: &ObserverFrame,
    catalog_epoch_jd: f64,
) -> ApparentDirection {
    let elapsed_days = frame.epoch.to_jde_tdb_days() - catalog_epoch_jd;
    let geometric = topocentric_direction(star, frame, elapsed_days);
    let apparent = apply_aberration(geometric, frame.velocity);
    let (altitude, azimuth) = frame.horizontal(&apparent);
    ApparentDirection::from_radians(altitude, azimuth)
}

/// Apparent directions of every catalog star, in catalog order.
///
/// The instant is the epoch of `frame`. Stars below the horizon are kept.
///
/// Arguments
/// ---------
/// * `catalog`: the stars and their reference epoch
/// * `frame`: observer position, velocity and local triad at the instant
///
/// Return
/// ------
/// * One [`ApparentDirection`] per catalog entry.
pub fn apparent_positions(catalog: &StarCatalog, frame: &ObserverFrame) -> Vec<ApparentDirection> {
    let directions: Vec<ApparentDirection> = catalog
        .iter()
        .map(|star| apparent_direction(star, frame, catalog.epoch_jd()))
        .collect();

    debug!(
        stars = directions.len(),
        above_horizon = directions.iter().filter(|d| d.is_above_horizon()).count(),
        "apparent positions computed"
    );
    directions
}
