//! Earth orientation: obliquity, precession, nutation and sidereal rotation.
//!
//! All matrices returned here act on **column vectors** and follow one convention:
//! the matrix named `a_to_b` (or documented as such) gives `x_b = M · x_a`.
//!
//! ```text
//! body-fixed --R3(-GAST)--> true equator of date --Nᵀ--> mean equator of date --Pᵀ--> mean J2000
//! ```
//!
//! The nutation series keeps the dominant terms of the IAU 1980 theory, which is good to
//! about half an arcsecond: far below what a whole-sky chart can show.
use hifitime::{ut1::Ut1Provider, Epoch};
use nalgebra::Matrix3;

use crate::{
    constants::{ArcSec, Radian, MJD, RADEG, RADSEC, T2000},
    ref_system::rotmt,
    time::{gmst, mjd_ut1},
};

/// Compute the mean obliquity of the ecliptic at a given epoch (IAU 1976 model).
///
/// Arguments
/// ---------
/// * `tjm`: Modified Julian Date (TT scale).
///
/// Returns
/// --------
/// * Mean obliquity of the ecliptic in radians.
///
/// Formula
/// -------
/// ```text
/// ε(t) = 84381.448″ − 46.8150″·T − 0.00059″·T² + 0.001813″·T³
/// ```
/// with `T` in Julian centuries since J2000, evaluated with Horner's scheme.
pub fn obleq(tjm: MJD) -> Radian {
    let t = (tjm - T2000) / 36525.0;
    (((0.001813 * t - 0.00059) * t - 46.8150) * t + 84381.448) * RADSEC
}

/// One row of the nutation series: multipliers of (D, M, M', F, Ω), then
/// Δψ = (s0 + s1·T) sin(arg) and Δε = (c0 + c1·T) cos(arg), in units of 0.1 mas.
struct NutationTerm {
    args: [f64; 5],
    s0: f64,
    s1: f64,
    c0: f64,
    c1: f64,
}

const fn term(args: [f64; 5], s0: f64, s1: f64, c0: f64, c1: f64) -> NutationTerm {
    NutationTerm {
        args,
        s0,
        s1,
        c0,
        c1,
    }
}

/// Largest terms of the IAU 1980 nutation series.
const NUTATION_TERMS: [NutationTerm; 18] = [
    term([0., 0., 0., 0., 1.], -171996.0, -174.2, 92025.0, 8.9),
    term([-2., 0., 0., 2., 2.], -13187.0, -1.6, 5736.0, -3.1),
    term([0., 0., 0., 2., 2.], -2274.0, -0.2, 977.0, -0.5),
    term([0., 0., 0., 0., 2.], 2062.0, 0.2, -895.0, 0.5),
    term([0., 1., 0., 0., 0.], 1426.0, -3.4, 54.0, -0.1),
    term([0., 0., 1., 0., 0.], 712.0, 0.1, -7.0, 0.0),
    term([-2., 1., 0., 2., 2.], -517.0, 1.2, 224.0, -0.6),
    term([0., 0., 0., 2., 1.], -386.0, -0.4, 200.0, 0.0),
    term([0., 0., 1., 2., 2.], -301.0, 0.0, 129.0, -0.1),
    term([-2., -1., 0., 2., 2.], 217.0, -0.5, -95.0, 0.3),
    term([-2., 0., 1., 0., 0.], -158.0, 0.0, 0.0, 0.0),
    term([-2., 0., 0., 2., 1.], 129.0, 0.1, -70.0, 0.0),
    term([0., 0., -1., 2., 2.], 123.0, 0.0, -53.0, 0.0),
    term([2., 0., 0., 0., 0.], 63.0, 0.0, 0.0, 0.0),
    term([0., 0., 1., 0., 1.], 63.0, 0.1, -33.0, 0.0),
    term([2., 0., -1., 2., 2.], -59.0, 0.0, 26.0, 0.0),
    term([0., 0., -1., 0., 1.], -58.0, -0.1, 32.0, 0.0),
    term([0., 0., 1., 2., 1.], -51.0, 0.0, 27.0, 0.0),
];

/// Compute the nutation angles in longitude and obliquity (IAU 1980 theory, main terms).
///
/// Arguments
/// ---------
/// * `tjm`: Modified Julian Date (in TT time scale).
///
/// Returns
/// --------
/// * A tuple `(Δψ, Δε)` in **arcseconds**.
///
/// Description
/// -----------
/// The five fundamental arguments are the mean elongation of the Moon from the Sun (D),
/// the mean anomalies of the Sun (M) and of the Moon (M'), the Moon's argument of
/// latitude (F) and the longitude of the Moon's ascending node (Ω), all cubic in `T`.
pub fn nutn80(tjm: MJD) -> (ArcSec, ArcSec) {
    let t = (tjm - T2000) / 36525.0;

    let fundamental = [
        // D
        297.85036 + t * (445267.111480 + t * (-0.0019142 + t / 189474.0)),
        // M
        357.52772 + t * (35999.050340 + t * (-0.0001603 - t / 300000.0)),
        // M'
        134.96298 + t * (477198.867398 + t * (0.0086972 + t / 56250.0)),
        // F
        93.27191 + t * (483202.017538 + t * (-0.0036825 + t / 327270.0)),
        // Ω
        125.04452 + t * (-1934.136261 + t * (0.0020708 + t / 450000.0)),
    ]
    .map(|deg: f64| (deg % 360.0) * RADEG);

    let (dpsi, deps) = NUTATION_TERMS.iter().fold((0.0, 0.0), |(dpsi, deps), nt| {
        let arg: f64 = nt
            .args
            .iter()
            .zip(fundamental.iter())
            .map(|(k, a)| k * a)
            .sum();
        (
            dpsi + (nt.s0 + nt.s1 * t) * arg.sin(),
            deps + (nt.c0 + nt.c1 * t) * arg.cos(),
        )
    });

    // series unit is 0.1 mas
    (dpsi * 1e-4, deps * 1e-4)
}

/// Compute the equation of the equinoxes in radians.
///
/// ```text
/// Eq_eq = Δψ · cos(ε)
/// ```
///
/// # Arguments
/// * `tjm` - Modified Julian Date (TT scale)
pub fn equequ(tjm: MJD) -> Radian {
    let (dpsi, _deps) = nutn80(tjm);
    RADSEC * dpsi * obleq(tjm).cos()
}

/// Precession matrix from the mean equator and equinox of J2000 to those of date
/// (IAU 1976, Lieske angles).
///
/// ```text
/// P = R3(−z) · R2(θ) · R3(−ζ)      x_date = P · x_J2000
/// ```
/// where `Rk` are frame rotations.
///
/// Arguments
/// ---------
/// * `tjm`: Modified Julian Date in TT scale.
pub fn prec(tjm: MJD) -> Matrix3<f64> {
    let t = (tjm - T2000) / 36525.0;

    let zeta = ((0.017998 * t + 0.30188) * t + 2306.2181) * t * RADSEC;
    let z = ((0.018203 * t + 1.09468) * t + 2306.2181) * t * RADSEC;
    let theta = ((-0.041833 * t - 0.42665) * t + 2004.3109) * t * RADSEC;

    // a frame rotation by φ is the active rotation by −φ
    rotmt(z, 2) * rotmt(-theta, 1) * rotmt(zeta, 2)
}

/// Nutation matrix from the mean equator of date to the true equator of date.
///
/// ```text
/// N = R1(−ε − Δε) · R3(−Δψ) · R1(ε)      x_true = N · x_mean
/// ```
pub fn rnut80(tjm: MJD) -> Matrix3<f64> {
    let epsm = obleq(tjm);
    let (dpsi, deps) = nutn80(tjm);
    let epst = epsm + deps * RADSEC;

    rotmt(epst, 0) * rotmt(dpsi * RADSEC, 2) * rotmt(-epsm, 0)
}

/// Greenwich apparent sidereal time in radians.
///
/// Arguments
/// ---------
/// * `epoch`: instant of evaluation
/// * `ut1_provider`: optional UT1 table, UTC is used when absent
pub fn gast(epoch: &Epoch, ut1_provider: Option<&Ut1Provider>) -> Radian {
    gmst(mjd_ut1(epoch, ut1_provider)) + equequ(epoch.to_mjd_tt_days())
}

/// Rotation from the Earth body-fixed frame to the mean equator and equinox of J2000.
///
/// Polar motion is neglected.
///
/// Return
/// ------
/// * `M` such that `x_J2000 = M · x_body_fixed`.
pub fn body_fixed_to_j2000(epoch: &Epoch, ut1_provider: Option<&Ut1Provider>) -> Matrix3<f64> {
    let tjm = epoch.to_mjd_tt_days();
    let earth_rotation = rotmt(gast(epoch, ut1_provider), 2);

    prec(tjm).transpose() * rnut80(tjm).transpose() * earth_rotation
}
