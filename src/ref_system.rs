//! Elementary rotations and spherical ↔ Cartesian conversions shared by the
//! Earth orientation, observer and apparent-position modules.
use nalgebra::{Matrix3, Rotation3, Unit, Vector3};

use crate::constants::{Radian, DPI, VLIGHT_AU};

/// Axis of an elementary rotation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    fn unit(self) -> Unit<Vector3<f64>> {
        match self {
            Axis::X => Vector3::x_axis(),
            Axis::Y => Vector3::y_axis(),
            Axis::Z => Vector3::z_axis(),
        }
    }
}

/// Construct a rotation matrix around one of the principal axes (X, Y, or Z).
///
/// The rotation follows the **direct (positive/trigonometric)** sense and is applied to
/// the vector in a fixed frame: it does **not** represent a change of basis. The change
/// of basis to a frame rotated by `φ` is therefore `rotmt(-φ, k)`.
///
/// # Arguments
///
/// * `alpha` - Rotation angle in **radians**.
/// * `k` - Index of the axis of rotation: `0` → X, `1` → Y, `2` → Z.
///   Any other index is read modulo 3.
///
/// # Returns
///
/// A 3×3 orthonormal matrix `R` such that the rotated vector is `x' = R · x`.
///
/// # See also
/// * [`crate::earth_orientation::prec`] – precession built from three `rotmt` factors
/// * [`crate::earth_orientation::rnut80`] – nutation built from three `rotmt` factors
pub fn rotmt(alpha: Radian, k: usize) -> Matrix3<f64> {
    let axis = match k % 3 {
        0 => Axis::X,
        1 => Axis::Y,
        _ => Axis::Z,
    };
    rotation(alpha, axis)
}

/// Same as [`rotmt`] with a typed axis.
pub fn rotation(alpha: Radian, axis: Axis) -> Matrix3<f64> {
    Rotation3::from_axis_angle(&axis.unit(), alpha).into()
}

/// Unit vector pointing toward equatorial coordinates `(α, δ)`, both in radians.
pub fn radec_to_unit(ra: Radian, dec: Radian) -> Vector3<f64> {
    let (sin_ra, cos_ra) = ra.sin_cos();
    let (sin_dec, cos_dec) = dec.sin_cos();
    Vector3::new(cos_dec * cos_ra, cos_dec * sin_ra, sin_dec)
}

/// Convert a 3D Cartesian position vector to right ascension and declination.
///
/// Arguments
/// ---------
/// * `cartesian_position`: 3D position vector in an equatorial frame (any length unit).
///
/// Returns
/// --------
/// * Tuple `(α, δ, ρ)`:
///     - `α`: right ascension in radians, in the range [0, 2π).
///     - `δ`: declination in radians, in the range [−π/2, +π/2].
///     - `ρ`: Euclidean norm of the vector.
///
/// Remarks
/// -------
/// * A zero vector gives `(0.0, 0.0, 0.0)`.
/// * At the poles the right ascension is undefined and reported as 0.
pub fn cartesian_to_radec(cartesian_position: Vector3<f64>) -> (Radian, Radian, f64) {
    let pos_norm = cartesian_position.norm();
    if pos_norm == 0. {
        return (0.0, 0.0, pos_norm);
    }

    let delta = (cartesian_position.z / pos_norm).clamp(-1.0, 1.0).asin();
    if cartesian_position.x == 0.0 && cartesian_position.y == 0.0 {
        return (0.0, delta, pos_norm);
    }

    let alpha = principal_angle(cartesian_position.y.atan2(cartesian_position.x), DPI);
    (alpha, delta, pos_norm)
}

/// Reduce `angle` to `[0, turn)`.
///
/// `rem_euclid` rounds tiny negative angles up to `turn` itself; those fold back to 0.
pub fn principal_angle(angle: f64, turn: f64) -> f64 {
    let reduced = angle.rem_euclid(turn);
    if reduced >= turn {
        0.0
    } else {
        reduced
    }
}

/// Apply the first-order stellar aberration to a direction.
///
/// Arguments
/// ---------
/// * `direction`: direction of the source as seen by the observer (any norm, non-zero).
/// * `observer_velocity`: barycentric velocity of the observer [AU/day].
///
/// Returns
/// --------
/// * The **unit** apparent direction.
///
/// Formula
/// -------
/// ```text
/// u' = normalize( u + v/c − u (u·v)/c )
/// ```
/// with `u` the unit geometric direction and `c` the speed of light in AU/day.
/// The neglected terms are of order (v/c)², i.e. below 0.001″ for the Earth.
pub fn apply_aberration(direction: Vector3<f64>, observer_velocity: Vector3<f64>) -> Vector3<f64> {
    let u = direction.normalize();
    let beta = observer_velocity / VLIGHT_AU;
    (u + beta - u * u.dot(&beta)).normalize()
}
