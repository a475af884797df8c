//! # Stereographic projection of the sky dome
//!
//! Maps a horizontal direction (altitude, azimuth) onto the plane tangent to the sphere
//! at a centre direction, from the point antipodal to that centre. With the centre at
//! the zenith:
//!
//! ```text
//! r = tan(z / 2),   z = π/2 − altitude   (co-altitude)
//! x = r · sin(azimuth)
//! y = r · cos(azimuth)
//! ```
//!
//! so the zenith lands on the origin, the horizon on the unit circle, north on +y and
//! east on +x (azimuth increases clockwise on the plot).
//!
//! For a general centre `(alt₀, az₀)`, with `c` the angular distance from the centre:
//!
//! ```text
//! cos c = sin alt₀ sin alt + cos alt₀ cos alt cos(az − az₀)
//! k     = 1 / (1 + cos c)
//! x     = k · cos alt · sin(az − az₀)
//! y     = k · (sin alt₀ · cos alt · cos(az − az₀) − cos alt₀ · sin alt)
//! ```
//!
//! which reduces to the zenith form for `alt₀ = π/2, az₀ = 0`. The azimuth `az₀` is
//! drawn along +y. The antipode of the centre (`1 + cos c = 0`) has no image.
//!
//! All angles are in **radians**; converting catalog degrees is the caller's job
//! (see [`StereographicProjection::project_direction`]).
use std::f64::consts::FRAC_PI_2;

use crate::{apparent::ApparentDirection, constants::Radian, starmap_errors::StarMapError};

/// Smallest `1 + cos c` accepted before the antipode is reached.
const ANTIPODE_GUARD: f64 = 1e-12;

/// Tolerance on altitudes slightly beyond ±π/2 due to rounding.
const ALTITUDE_SLACK: f64 = 1e-9;

/// A point of the chart plane, in units of the horizon radius.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ProjectedPoint {
    pub x: f64,
    pub y: f64,
}

impl ProjectedPoint {
    pub fn new(x: f64, y: f64) -> Self {
        ProjectedPoint { x, y }
    }

    /// Image of the antipode of the projection centre.
    pub const AT_INFINITY: ProjectedPoint = ProjectedPoint {
        x: f64::INFINITY,
        y: f64::INFINITY,
    };

    /// Distance from the chart centre.
    pub fn radius(&self) -> f64 {
        self.x.hypot(self.y)
    }

    pub fn is_at_infinity(&self) -> bool {
        self.x.is_infinite() || self.y.is_infinite()
    }
}

/// Angular distance from the zenith.
pub fn co_altitude(altitude: Radian) -> Radian {
    FRAC_PI_2 - altitude
}

fn check_angle(name: &str, value: f64) -> Result<(), StarMapError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(StarMapError::ProjectionDomainError(format!(
            "{name} is not finite: {value}"
        )))
    }
}

fn check_altitude(altitude: Radian) -> Result<(), StarMapError> {
    check_angle("altitude", altitude)?;
    if altitude.abs() > FRAC_PI_2 + ALTITUDE_SLACK {
        return Err(StarMapError::ProjectionDomainError(format!(
            "altitude out of [-π/2, π/2]: {altitude}"
        )));
    }
    Ok(())
}

/// Stereographic projection with a fixed centre.
///
/// The projection holds no state besides its centre: `project` is a pure function of
/// its arguments.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StereographicProjection {
    center_alt: Radian,
    center_az: Radian,
    sin_alt0: f64,
    cos_alt0: f64,
}

impl Default for StereographicProjection {
    fn default() -> Self {
        Self::zenith()
    }
}

impl StereographicProjection {
    /// Projection centred on the zenith with north up.
    pub fn zenith() -> Self {
        StereographicProjection {
            center_alt: FRAC_PI_2,
            center_az: 0.0,
            sin_alt0: 1.0,
            cos_alt0: 0.0,
        }
    }

    /// Projection centred on `(center_alt, center_az)`, in radians.
    ///
    /// Return
    /// ------
    /// * [`StarMapError::ProjectionDomainError`] for a non-finite angle or an altitude
    ///   outside [-π/2, π/2].
    pub fn new(center_alt: Radian, center_az: Radian) -> Result<Self, StarMapError> {
        check_altitude(center_alt)?;
        check_angle("centre azimuth", center_az)?;
        let center_alt = center_alt.clamp(-FRAC_PI_2, FRAC_PI_2);
        let (sin_alt0, cos_alt0) = center_alt.sin_cos();
        Ok(StereographicProjection {
            center_alt,
            center_az,
            sin_alt0,
            cos_alt0,
        })
    }

    /// Centre of the projection, `(altitude, azimuth)` in radians.
    pub fn center(&self) -> (Radian, Radian) {
        (self.center_alt, self.center_az)
    }

    /// Project one direction.
    ///
    /// Arguments
    /// ---------
    /// * `altitude`: radians in [-π/2, π/2]
    /// * `azimuth`: radians from north through east, any finite value
    ///
    /// Return
    /// ------
    /// * The plane point, or [`StarMapError::ProjectionDomainError`] when an input is not
    ///   finite or the direction is (numerically) the antipode of the centre.
    pub fn project(
        &self,
        altitude: Radian,
        azimuth: Radian,
    ) -> Result<ProjectedPoint, StarMapError> {
        self.image(altitude, azimuth)?.ok_or_else(|| {
            StarMapError::ProjectionDomainError(format!(
                "direction (alt {altitude}, az {azimuth}) is antipodal to the projection centre"
            ))
        })
    }

    /// `None` when the direction is within [`ANTIPODE_GUARD`] of the antipode.
    fn image(
        &self,
        altitude: Radian,
        azimuth: Radian,
    ) -> Result<Option<ProjectedPoint>, StarMapError> {
        check_altitude(altitude)?;
        check_angle("azimuth", azimuth)?;

        let (sin_alt, cos_alt) = altitude.sin_cos();
        let (sin_daz, cos_daz) = (azimuth - self.center_az).sin_cos();

        let cos_c = self.sin_alt0 * sin_alt + self.cos_alt0 * cos_alt * cos_daz;
        let denom = 1.0 + cos_c;
        if denom <= ANTIPODE_GUARD {
            return Ok(None);
        }

        let k = 1.0 / denom;
        Ok(Some(ProjectedPoint {
            x: k * cos_alt * sin_daz,
            y: k * (self.sin_alt0 * cos_alt * cos_daz - self.cos_alt0 * sin_alt),
        }))
    }

    /// Project a direction given in degrees.
    pub fn project_direction(
        &self,
        direction: &ApparentDirection,
    ) -> Result<ProjectedPoint, StarMapError> {
        self.project(direction.altitude(), direction.azimuth())
    }

    /// Project every direction, keeping the order.
    ///
    /// A direction at the antipode of the centre becomes [`ProjectedPoint::AT_INFINITY`]
    /// so that one star under the observer's feet does not void the chart. Invalid
    /// angles still abort with the first error.
    pub fn project_all(
        &self,
        directions: &[ApparentDirection],
    ) -> Result<Vec<ProjectedPoint>, StarMapError> {
        directions
            .iter()
            .map(|d| {
                self.image(d.altitude(), d.azimuth())
                    .map(|p| p.unwrap_or(ProjectedPoint::AT_INFINITY))
            })
            .collect()
    }
}
