//! Topocentric frame of an observer at one instant.
//!
//! An [`ObserverFrame`] places the site in the solar system: barycentric position and
//! velocity (Earth from the ephemeris + geocentric site vector) and the local
//! east/north/up triad, all in the equatorial mean J2000 frame. It is the only
//! astronomical state needed to turn catalog directions into altitude and azimuth.
use hifitime::{ut1::Ut1Provider, Epoch};
use nalgebra::Vector3;
use tracing::debug;

use crate::{
    constants::{Radian, DPI},
    jpl_ephem::EphemerisProvider,
    ref_system::principal_angle,
    starmap_errors::StarMapError,
};

use super::Observer;

#[derive(Debug, Clone, PartialEq)]
pub struct ObserverFrame {
    /// Instant of evaluation
    pub epoch: Epoch,
    /// Barycentric position of the observer \[AU\]
    pub position: Vector3<f64>,
    /// Barycentric velocity of the observer \[AU/day\]
    pub velocity: Vector3<f64>,
    pub east: Vector3<f64>,
    pub north: Vector3<f64>,
    pub up: Vector3<f64>,
}

impl ObserverFrame {
    /// Build the frame of `observer` at `epoch`.
    ///
    /// Arguments
    /// ---------
    /// * `observer`: the site
    /// * `epoch`: instant of evaluation
    /// * `ephemeris`: source of the Earth barycentric state
    /// * `ut1_provider`: optional UT1 table (UTC is used otherwise)
    ///
    /// Return
    /// ------
    /// * The frame, or the [`StarMapError::EphemerisError`] raised by the provider.
    pub fn new<E: EphemerisProvider + ?Sized>(
        observer: &Observer,
        epoch: &Epoch,
        ephemeris: &E,
        ut1_provider: Option<&Ut1Provider>,
    ) -> Result<Self, StarMapError> {
        let earth = ephemeris.earth_barycentric(epoch)?;
        let (geo_pos, geo_vel) = observer.pvobs(epoch, ut1_provider);
        let (east, north, up) = observer.enu_basis(epoch, ut1_provider);

        let frame = ObserverFrame {
            epoch: *epoch,
            position: earth.position + geo_pos,
            velocity: earth.velocity + geo_vel,
            east,
            north,
            up,
        };
        debug!(
            epoch = %epoch,
            distance_au = frame.position.norm(),
            speed_au_day = frame.velocity.norm(),
            "observer frame"
        );
        Ok(frame)
    }

    /// Unit vector of the local zenith (equatorial J2000).
    pub fn zenith(&self) -> Vector3<f64> {
        self.up
    }

    /// Altitude and azimuth of a direction given in the equatorial J2000 frame.
    ///
    /// Return
    /// ------
    /// * `(altitude, azimuth)` in radians: altitude in [-π/2, π/2], azimuth measured
    ///   from north through east in [0, 2π).
    pub fn horizontal(&self, direction: &Vector3<f64>) -> (Radian, Radian) {
        let d = direction.normalize();
        let altitude = d.dot(&self.up).clamp(-1.0, 1.0).asin();
        let azimuth = principal_angle(d.dot(&self.east).atan2(d.dot(&self.north)), DPI);
        (altitude, azimuth)
    }
}
