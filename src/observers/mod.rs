//! # Observer & site geometry
//!
//! This module holds the observing site and the geometry derived from it:
//!
//! - [`Observer`]: a geodetic location (latitude, longitude, elevation) with its
//!   **geocentric parallax coordinates** (ρ·cosφ', ρ·sinφ') and **precomputed body-fixed**
//!   position and velocity.
//! - [`Observer::pvobs`]: geocentric position and velocity of the site in the
//!   **equatorial mean J2000** frame.
//! - [`Observer::enu_basis`]: local east / north / up unit vectors in the same frame.
//! - [`observer_frame::ObserverFrame`]: the site placed in the solar system at one
//!   instant, used to turn star directions into altitude and azimuth.
//!
//! ## Frames & conventions
//!
//! ```text
//! Body-fixed  --(Earth rotation, GAST)-->  true equator of date  --(nutation, precession)-->  equatorial J2000
//! ```
//!
//! ## Units
//!
//! - Latitude / longitude: **degrees**, longitude east positive.
//! - Elevation: **meters** above the ellipsoid.
//! - Geocentric parallax coordinates: **Earth equatorial radii**.
//! - Positions: **AU**; velocities: **AU/day** (from `ω × r`, `ω = 2π·1.00273790934` rad/day).
//!
//! ## See also
//! ------------
//! * [`geodetic_to_parallax`] – Geodetic latitude/elevation → (ρ·cosφ', ρ·sinφ').
//! * [`crate::earth_orientation::body_fixed_to_j2000`] – Earth orientation matrix.
pub mod observer_frame;

use std::fmt;

use hifitime::{ut1::Ut1Provider, Epoch};
use nalgebra::Vector3;

use crate::{
    constants::{
        Degree, Meter, DEFAULT_OBSERVER_LATITUDE, DEFAULT_OBSERVER_LONGITUDE, DPI,
        EARTH_MAJOR_AXIS, EARTH_MINOR_AXIS, ERAU, SIDEREAL_RATE,
    },
    earth_orientation::body_fixed_to_j2000,
    starmap_errors::StarMapError,
};

/// Observing site and its precomputed body-fixed state.
///
/// Units
/// -----
/// * `latitude`, `longitude`: degrees (geodetic, east positive).
/// * `elevation`: meters above the GRS80 ellipsoid.
/// * `rho_cos_phi`, `rho_sin_phi`: Earth equatorial radii.
/// * body-fixed position: AU; body-fixed velocity: AU/day.
///
/// See also
/// ------------
/// * [`Observer::new`] – Validated constructor.
/// * [`Observer::pvobs`] – Geocentric state in equatorial J2000.
#[derive(Debug, Clone, PartialEq)]
pub struct Observer {
    /// Geodetic latitude in **degrees**.
    pub latitude: Degree,

    /// Geodetic longitude in **degrees** east of Greenwich.
    pub longitude: Degree,

    /// Height above the ellipsoid in **meters**.
    pub elevation: Meter,

    /// ρ·cosφ' (geocentric latitude φ'), in **Earth radii**.
    pub rho_cos_phi: f64,

    /// ρ·sinφ' (geocentric latitude φ'), in **Earth radii**.
    pub rho_sin_phi: f64,

    /// Optional human-readable site name.
    pub name: Option<String>,

    observer_fixed_coord: Vector3<f64>,
    observer_velocity: Vector3<f64>,
}

impl Observer {
    /// Create a new observer from geodetic coordinates.
    ///
    /// Arguments
    /// -----------------
    /// * `latitude`: Geodetic latitude in **degrees**, in [-90, 90].
    /// * `longitude`: Geodetic longitude in **degrees**, in [-180, 180] (east positive).
    /// * `elevation`: Height above the reference ellipsoid in **meters**.
    /// * `name`: Optional site name.
    ///
    /// Return
    /// ----------
    /// * A constructed [`Observer`] with precomputed body-fixed state, or
    ///   [`StarMapError::InvalidObserverLocation`] for out-of-range or non-finite inputs.
    pub fn new(
        latitude: Degree,
        longitude: Degree,
        elevation: Meter,
        name: Option<String>,
    ) -> Result<Observer, StarMapError> {
        if !latitude.is_finite() || !(-90.0..=90.0).contains(&latitude) {
            return Err(StarMapError::InvalidObserverLocation(format!(
                "latitude {latitude} is outside [-90, 90]"
            )));
        }
        if !longitude.is_finite() || !(-180.0..=180.0).contains(&longitude) {
            return Err(StarMapError::InvalidObserverLocation(format!(
                "longitude {longitude} is outside [-180, 180]"
            )));
        }
        if !elevation.is_finite() {
            return Err(StarMapError::InvalidObserverLocation(format!(
                "elevation {elevation} is not finite"
            )));
        }

        Ok(Self::from_geodetic(latitude, longitude, elevation, name))
    }

    /// Observer at sea level at the default chart location (Seoul).
    pub fn default_site() -> Observer {
        Self::from_geodetic(
            DEFAULT_OBSERVER_LATITUDE,
            DEFAULT_OBSERVER_LONGITUDE,
            0.0,
            Some("Seoul".to_string()),
        )
    }

    fn from_geodetic(
        latitude: Degree,
        longitude: Degree,
        elevation: Meter,
        name: Option<String>,
    ) -> Observer {
        let (rho_cos_phi, rho_sin_phi) = geodetic_to_parallax(latitude, elevation);

        // Body-fixed position in AU from (ρ·cosφ', ρ·sinφ') scaled by Earth radius (AU).
        let lon_radians = longitude.to_radians();
        let body_fixed_coord = Vector3::new(
            ERAU * rho_cos_phi * lon_radians.cos(),
            ERAU * rho_cos_phi * lon_radians.sin(),
            ERAU * rho_sin_phi,
        );

        // Angular velocity of Earth rotation (rad/day) on the z-axis.
        let omega = Vector3::new(0.0, 0.0, DPI * SIDEREAL_RATE);

        Observer {
            latitude,
            longitude,
            elevation,
            rho_cos_phi,
            rho_sin_phi,
            name,
            observer_fixed_coord: body_fixed_coord,
            observer_velocity: omega.cross(&body_fixed_coord),
        }
    }

    /// Fixed position of the site on the rotating Earth, in **AU**.
    pub fn body_fixed_coord(&self) -> Vector3<f64> {
        self.observer_fixed_coord
    }

    /// Compute the observer’s geocentric position and velocity in the equatorial mean J2000 frame.
    ///
    /// Arguments
    /// ---------
    /// * `epoch`: instant of evaluation.
    /// * `ut1_provider`: optional UT1 table for the Earth rotation angle (UTC otherwise).
    ///
    /// Returns
    /// --------
    /// * `(dx, dv)`: geocentric position \[AU\] and velocity due to Earth rotation \[AU/day\].
    ///
    /// Remarks
    /// -------
    /// * The body-fixed state is rotated with [`body_fixed_to_j2000`], i.e. Greenwich
    ///   apparent sidereal time, IAU 1980 nutation and IAU 1976 precession. The
    ///   slow drift of the rotation matrix itself is neglected in the velocity.
    ///
    /// # See also
    /// * [`Observer::body_fixed_coord`] – observer's base vector in Earth-fixed frame
    pub fn pvobs(
        &self,
        epoch: &Epoch,
        ut1_provider: Option<&Ut1Provider>,
    ) -> (Vector3<f64>, Vector3<f64>) {
        let rot = body_fixed_to_j2000(epoch, ut1_provider);
        (rot * self.observer_fixed_coord, rot * self.observer_velocity)
    }

    /// Local east, north and up unit vectors in the equatorial mean J2000 frame.
    ///
    /// `up` is the ellipsoid normal (geodetic vertical), `north` points toward the
    /// celestial pole along the local meridian and `east` completes the right-handed
    /// (east, north, up) triad.
    pub fn enu_basis(
        &self,
        epoch: &Epoch,
        ut1_provider: Option<&Ut1Provider>,
    ) -> (Vector3<f64>, Vector3<f64>, Vector3<f64>) {
        let (sin_lat, cos_lat) = self.latitude.to_radians().sin_cos();
        let (sin_lon, cos_lon) = self.longitude.to_radians().sin_cos();

        let east = Vector3::new(-sin_lon, cos_lon, 0.0);
        let north = Vector3::new(-sin_lat * cos_lon, -sin_lat * sin_lon, cos_lat);
        let up = Vector3::new(cos_lat * cos_lon, cos_lat * sin_lon, sin_lat);

        let rot = body_fixed_to_j2000(epoch, ut1_provider);
        (rot * east, rot * north, rot * up)
    }
}

impl fmt::Display for Observer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(name) = &self.name {
            write!(f, "{name} ")?;
        }
        write!(
            f,
            "(lat {:.2}°, lon {:.2}°, {:.0} m)",
            self.latitude, self.longitude, self.elevation
        )
    }
}

/// Convert geodetic latitude and height into normalized parallax coordinates
/// on the Earth.
///
/// Arguments
/// ---------
/// * `lat` - Geodetic latitude of the observer in **radians**.
/// * `height` - Observer's altitude above the reference ellipsoid in **meters**.
///
/// Returns
/// -------
/// A tuple `(rho_cos_phi, rho_sin_phi)` in units of the Earth equatorial radius.
///
/// Details
/// -------
/// ```text
/// u = atan( (sin φ * (b/a)) / cos φ )
/// ρ_sinφ = (b/a) * sin u + (h/a) * sin φ
/// ρ_cosφ = cos u + (h/a) * cos φ
/// ```
/// where `a` and `b` are the Earth's semi-major and semi-minor axes.
pub fn lat_alt_to_parallax(lat: f64, height: Meter) -> (f64, f64) {
    let axis_ratio = EARTH_MINOR_AXIS / EARTH_MAJOR_AXIS;

    // parametric latitude
    let u = (lat.sin() * axis_ratio).atan2(lat.cos());

    let rho_sin_phi = axis_ratio * u.sin() + (height / EARTH_MAJOR_AXIS) * lat.sin();
    let rho_cos_phi = u.cos() + (height / EARTH_MAJOR_AXIS) * lat.cos();

    (rho_cos_phi, rho_sin_phi)
}

/// Same as [`lat_alt_to_parallax`] with the latitude in **degrees**.
pub fn geodetic_to_parallax(lat: Degree, height: Meter) -> (f64, f64) {
    lat_alt_to_parallax(lat.to_radians(), height)
}

#[cfg(test)]
mod observer_test {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_observer_constructor() {
        let observer = Observer::new(0.0, 0.0, 0.0, None).unwrap();
        assert_eq!(observer.longitude, 0.0);
        assert_eq!(observer.rho_cos_phi, 1.0);
        assert_eq!(observer.rho_sin_phi, 0.0);

        let observer =
            Observer::new(-30.2446, -70.74942, 2647., Some("Rubin".to_string())).unwrap();
        assert_abs_diff_eq!(observer.rho_cos_phi, 0.8649760504617418, epsilon = 1e-12);
        assert_abs_diff_eq!(observer.rho_sin_phi, -0.5009551027512434, epsilon = 1e-12);
        assert_eq!(observer.to_string(), "Rubin (lat -30.24°, lon -70.75°, 2647 m)");
    }

    #[test]
    fn test_invalid_location() {
        for (lat, lon) in [(91.0, 0.0), (-90.5, 0.0), (0.0, 181.0), (f64::NAN, 0.0)] {
            let err = Observer::new(lat, lon, 0.0, None).unwrap_err();
            assert_eq!(err.kind(), "InvalidObserverLocation");
        }
        assert!(Observer::new(10.0, 10.0, f64::INFINITY, None).is_err());
    }

    #[test]
    fn test_default_site() {
        let seoul = Observer::default_site();
        assert_eq!(
            seoul,
            Observer::new(37.5665, 126.9780, 0.0, Some("Seoul".to_string())).unwrap()
        );
    }

    #[test]
    fn geodetic_to_parallax_test() {
        // latitude and height of Pan-STARRS 1, Haleakala
        let (pxy1, pz1) = geodetic_to_parallax(20.707233557, 3067.694);
        assert_abs_diff_eq!(pxy1, 0.9362410003211518, epsilon = 1e-14);
        assert_abs_diff_eq!(pz1, 0.35154299856304305, epsilon = 1e-14);
    }

    #[test]
    fn body_fixed_coord_test() {
        let (lon, lat, h) = (-156.25591, 20.707233557, 3067.694);
        let pan_starrs = Observer::new(lat, lon, h, None).unwrap();
        assert_abs_diff_eq!(
            pan_starrs.body_fixed_coord(),
            Vector3::new(
                -0.00003653799439776371,
                -0.00001607260397528885,
                0.000014988110430544328
            ),
            epsilon = 1e-15
        );
    }

    #[test]
    fn test_pvobs_geometry() {
        let epoch = Epoch::from_gregorian_utc_at_midnight(2024, 3, 20);
        let site = Observer::default_site();
        let (dx, dv) = site.pvobs(&epoch, None);

        // rotation keeps the geocentric distance, velocity is orthogonal to the pole
        assert_abs_diff_eq!(dx.norm(), site.body_fixed_coord().norm(), epsilon = 1e-15);
        assert_abs_diff_eq!(dx.dot(&dv), 0.0, epsilon = 1e-12);
        // |v| = ω ρcosφ' R, about 0.369 km/s at Seoul
        let speed_km_s = dv.norm() * crate::constants::AU / crate::constants::SECONDS_PER_DAY;
        assert_abs_diff_eq!(speed_km_s, 0.3691, epsilon = 0.001);
    }

    #[test]
    fn test_enu_basis_orthonormal() {
        let epoch = Epoch::from_gregorian_utc_at_midnight(2024, 3, 20);
        let site = Observer::default_site();
        let (east, north, up) = site.enu_basis(&epoch, None);

        assert_abs_diff_eq!(east.norm(), 1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(north.norm(), 1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(east.dot(&north), 0.0, epsilon = 1e-12);
        assert_abs_diff_eq!(north.dot(&up), 0.0, epsilon = 1e-12);
        assert_abs_diff_eq!(east.cross(&north), up, epsilon = 1e-12);

        // the zenith declination is the geodetic latitude
        let zenith_dec = up.z.asin().to_degrees();
        assert_abs_diff_eq!(zenith_dec, 37.5665, epsilon = 0.3);
        assert!(north.z > 0.0);
        // east is horizontal and perpendicular to the pole
        assert_abs_diff_eq!(east.z, 0.0, epsilon = 0.01);
    }
}
