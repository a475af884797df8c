//! # Solar system ephemerides
//!
//! The chart pipeline only needs the barycentric state of the Earth, obtained from a
//! JPL planetary kernel through the [`EphemerisProvider`] trait.
//!
//! * [`naif`] – reader of NAIF SPK kernels (`de421.bsp`, `de440.bsp`, ...).
//! * [`download_jpl_file`] – resolution of an [`EphemFileSource`](download_jpl_file::EphemFileSource)
//!   into a local file, downloading it into the cache when needed.
//!
//! Any type able to return body positions can stand in for the kernel, e.g. a fixed
//! state in tests.
use std::ops::Add;

use hifitime::{ut1::Ut1Provider, Epoch};
use nalgebra::Vector3;

use crate::{
    constants::{AU, SECONDS_PER_DAY},
    observers::{observer_frame::ObserverFrame, Observer},
    starmap_errors::StarMapError,
};
use naif::naif_ids::NaifIds;

pub mod download_jpl_file;
pub mod naif;

/// Position and velocity of a body relative to a center.
///
/// Units depend on the producer: kernels return km and km/s,
/// [`StateVector::to_au`] converts to AU and AU/day.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StateVector {
    pub position: Vector3<f64>,
    pub velocity: Vector3<f64>,
}

impl StateVector {
    /// Convert a km, km/s state into AU, AU/day.
    pub fn to_au(&self) -> StateVector {
        StateVector {
            position: self.position / AU,
            velocity: self.velocity / AU * SECONDS_PER_DAY,
        }
    }
}

impl Add for StateVector {
    type Output = StateVector;

    fn add(self, rhs: StateVector) -> StateVector {
        StateVector {
            position: self.position + rhs.position,
            velocity: self.velocity + rhs.velocity,
        }
    }
}

/// Source of solar system body states, in the ICRF/J2000 equatorial frame.
///
/// Implementors are queried with instants in any time scale; they are responsible
/// for converting to the time argument of their data (TDB for JPL kernels).
pub trait EphemerisProvider: Send + Sync {
    /// State of `target` relative to `center` at `epoch`, in km and km/s.
    ///
    /// Return
    /// ------
    /// * [`StarMapError::EphemerisError`] when the body or epoch is not covered.
    fn position_of(
        &self,
        target: NaifIds,
        center: NaifIds,
        epoch: &Epoch,
    ) -> Result<StateVector, StarMapError>;

    /// Barycentric state of the Earth, in **AU** and **AU/day**.
    ///
    /// Composed from the Earth-Moon barycenter relative to the solar system barycenter
    /// and the Earth relative to the Earth-Moon barycenter.
    fn earth_barycentric(&self, epoch: &Epoch) -> Result<StateVector, StarMapError> {
        let emb = self.position_of(
            NaifIds::EarthMoonBarycenter,
            NaifIds::SolarSystemBarycenter,
            epoch,
        )?;
        let earth = self.position_of(NaifIds::Earth, NaifIds::EarthMoonBarycenter, epoch)?;
        Ok((emb + earth).to_au())
    }

    /// Topocentric frame of `observer` at `epoch`.
    ///
    /// See also
    /// --------
    /// * [`ObserverFrame::new`]
    fn observer_at(
        &self,
        observer: &Observer,
        epoch: &Epoch,
        ut1_provider: Option<&Ut1Provider>,
    ) -> Result<ObserverFrame, StarMapError> {
        ObserverFrame::new(observer, epoch, self, ut1_provider)
    }
}

#[cfg(test)]
mod jpl_ephem_test {
    use super::*;
    use approx::assert_abs_diff_eq;

    struct Linear;

    impl EphemerisProvider for Linear {
        fn position_of(
            &self,
            target: NaifIds,
            _center: NaifIds,
            _epoch: &Epoch,
        ) -> Result<StateVector, StarMapError> {
            match target {
                NaifIds::EarthMoonBarycenter => Ok(StateVector {
                    position: Vector3::new(AU, 0.0, 0.0),
                    velocity: Vector3::new(0.0, 29.78, 0.0),
                }),
                NaifIds::Earth => Ok(StateVector {
                    position: Vector3::new(-4670.0, 0.0, 0.0),
                    velocity: Vector3::new(0.0, -0.0125, 0.0),
                }),
                other => Err(StarMapError::EphemerisError(format!("no data for {other}"))),
            }
        }
    }

    #[test]
    fn test_earth_barycentric_composition() {
        let epoch = Epoch::from_gregorian_utc_at_noon(2024, 3, 20);
        let earth = Linear.earth_barycentric(&epoch).unwrap();
        assert_abs_diff_eq!(earth.position.x, 1.0 - 4670.0 / AU, epsilon = 1e-15);
        assert_abs_diff_eq!(
            earth.velocity.y,
            (29.78 - 0.0125) * SECONDS_PER_DAY / AU,
            epsilon = 1e-15
        );
    }

    #[test]
    fn test_missing_body() {
        let epoch = Epoch::from_gregorian_utc_at_noon(2024, 3, 20);
        assert!(Linear
            .position_of(NaifIds::Moon, NaifIds::Earth, &epoch)
            .is_err());
    }
}
