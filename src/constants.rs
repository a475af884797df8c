//! # Constants and type definitions for starmap
//!
//! This module centralizes the **physical constants**, **conversion factors**, and **common type
//! aliases** used throughout the crate, together with the fixed defaults of the chart
//! (observer site, data sources).
//!
//! ## Overview
//!
//! - Astronomical and geophysical constants
//! - Unit conversions (degrees ↔ radians, arcseconds, milliarcseconds, AU ↔ km)
//! - Core type aliases used across the crate
//! - Default observer location and data source identifiers

// -------------------------------------------------------------------------------------------------
// Physical constants and unit conversions
// -------------------------------------------------------------------------------------------------

/// 2π, useful for trigonometric conversions
pub const DPI: f64 = 2. * std::f64::consts::PI;

/// Number of seconds in a Julian day
pub const SECONDS_PER_DAY: f64 = 86_400.0;

/// Number of days in a Julian year
pub const DAYS_PER_JULIAN_YEAR: f64 = 365.25;

/// Astronomical Unit in kilometers (IAU 2012)
pub const AU: f64 = 149_597_870.7;

/// MJD epoch of J2000.0 (2000-01-01 12:00:00 TT)
pub const T2000: f64 = 51544.5;

/// Degrees → radians
pub const RADEG: f64 = std::f64::consts::PI / 180.0;

/// Arcseconds → radians
pub const RADSEC: f64 = std::f64::consts::PI / 648000.0;

/// Milliarcseconds → radians
pub const RADMAS: f64 = RADSEC / 1000.0;

/// Earth equatorial radius in meters (GRS1980/WGS84)
pub const EARTH_MAJOR_AXIS: f64 = 6_378_137.0;

/// Earth polar radius in meters (GRS1980/WGS84)
pub const EARTH_MINOR_AXIS: f64 = 6_356_752.3;

/// Earth radius expressed in astronomical units
pub const ERAU: f64 = (EARTH_MAJOR_AXIS / 1000.) / AU;

/// Ratio of the sidereal to the solar day
pub const SIDEREAL_RATE: f64 = 1.00273790934;

/// Speed of light in km/s
pub const VLIGHT: f64 = 2.99792458e5;

/// Speed of light in astronomical units per day
pub const VLIGHT_AU: f64 = VLIGHT / AU * SECONDS_PER_DAY;

/// Julian date (TT) of the Hipparcos catalog epoch J1991.25
pub const HIPPARCOS_EPOCH_JD: f64 = 2_448_349.062_5;

/// Parallax substituted for stars with a null or negative parallax (milliarcseconds).
///
/// Places the star about one gigaparsec away, i.e. at infinity for any practical purpose.
pub const MIN_PARALLAX_MAS: f64 = 1.0e-6;

// -------------------------------------------------------------------------------------------------
// Chart defaults
// -------------------------------------------------------------------------------------------------

/// Default observer latitude in degrees (Seoul)
pub const DEFAULT_OBSERVER_LATITUDE: Degree = 37.5665;

/// Default observer longitude in degrees, east positive (Seoul)
pub const DEFAULT_OBSERVER_LONGITUDE: Degree = 126.9780;

/// Hipparcos main catalog (ESA 1997, CDS I/239)
pub const HIPPARCOS_URL: &str = "https://cdsarc.cds.unistra.fr/ftp/cats/I/239/hip_main.dat";

/// Default planetary ephemeris used to place the Earth
pub const DEFAULT_EPHEMERIS: &str = "naif:DE421";

// -------------------------------------------------------------------------------------------------
// Type aliases
// -------------------------------------------------------------------------------------------------

/// Angle in degrees
pub type Degree = f64;
/// Angle in arcseconds
pub type ArcSec = f64;
/// Angle in radians
pub type Radian = f64;
/// Distance in meters
pub type Meter = f64;
/// Modified Julian Date (days)
pub type MJD = f64;
/// Visual magnitude
pub type Magnitude = f64;
