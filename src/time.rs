use hifitime::{ut1::Ut1Provider, Epoch};
use std::str::FromStr;

use crate::{
    constants::{DPI, MJD, SIDEREAL_RATE, T2000},
    starmap_errors::StarMapError,
};

/// Current instant, in the UTC time scale.
///
/// Return
/// ------
/// * The wall-clock instant, or an error if the system clock cannot be read.
pub fn now_utc() -> Result<Epoch, StarMapError> {
    Ok(Epoch::now()?)
}

/// Parse an instant given as an ISO-8601 / RFC-3339 string.
///
/// Strings without an explicit time scale are read as UTC
/// (e.g. `"2024-03-20T21:00:00"` or `"2024-03-20T21:00:00 UTC"`).
///
/// Argument
/// --------
/// * `instant`: the date string
///
/// Return
/// ------
/// * The corresponding [`Epoch`], or [`StarMapError::InvalidConfiguration`] if unreadable.
pub fn parse_instant(instant: &str) -> Result<Epoch, StarMapError> {
    Epoch::from_str(instant.trim()).map_err(|e| {
        StarMapError::InvalidConfiguration(format!("invalid instant {instant:?}: {e}"))
    })
}

/// Modified Julian Date of an instant in the UT1 scale.
///
/// With a UT1 provider the JPL Earth orientation offsets are applied, otherwise UT1 is
/// approximated by UTC (error below one second of time, i.e. 15″ of hour angle).
///
/// Arguments
/// ---------
/// * `epoch`: the instant
/// * `ut1_provider`: optional UT1 - UTC table
pub fn mjd_ut1(epoch: &Epoch, ut1_provider: Option<&Ut1Provider>) -> MJD {
    match ut1_provider {
        Some(provider) => epoch.to_ut1(provider).to_mjd_tai_days(),
        None => epoch.to_mjd_utc_days(),
    }
}

/// Compute the Greenwich Mean Sidereal Time (GMST) in radians
/// for a given Modified Julian Date (UT1 time scale).
///
/// This function implements the IAU 1982 polynomial formula
/// for the mean sidereal time at 0h UT1, plus the fractional-day
/// correction term due to Earth's rotation rate.
///
/// # Arguments
/// * `tjm` - Modified Julian Date (MJD, UT1 time scale)
///
/// # Returns
/// * GMST angle in radians, normalized to the interval [0, 2π).
///
/// # References
/// * IAU 1982, IERS Conventions 1996/2000.
/// * Explanatory Supplement to the Astronomical Almanac (1992).
pub fn gmst(tjm: MJD) -> f64 {
    // Polynomial coefficients for GMST at 0h UT1 (in seconds)
    const C0: f64 = 24110.54841;
    const C1: f64 = 8640184.812866;
    const C2: f64 = 9.3104e-2;
    const C3: f64 = -6.2e-6;

    // Midnight of the current day and Julian centuries since J2000.0
    let midnight = tjm.floor();
    let t = (midnight - T2000) / 36525.0;

    let gmst0 = (((C3 * t + C2) * t + C1) * t + C0) * DPI / 86400.0;

    // Sidereal angle swept since midnight
    let day_angle = (tjm - midnight) * DPI * SIDEREAL_RATE;

    (gmst0 + day_angle).rem_euclid(DPI)
}

#[cfg(test)]
mod time_test {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_gmst() {
        let res_gmst = gmst(57028.478514610404);
        assert_abs_diff_eq!(res_gmst, 4.851925725092499, epsilon = 1e-9);

        let res_gmst = gmst(T2000);
        assert_abs_diff_eq!(res_gmst, 4.894961212789145, epsilon = 1e-9);
    }

    #[test]
    fn test_gmst_range() {
        for i in 0..200 {
            let tjm = 60000.0 + i as f64 * 0.37;
            let g = gmst(tjm);
            assert!((0.0..DPI).contains(&g), "gmst out of range: {g}");
        }
    }

    #[test]
    fn test_gmst_sidereal_day() {
        // After one sidereal day GMST comes back to the same angle.
        let t0 = 60310.25;
        let t1 = t0 + 1.0 / SIDEREAL_RATE;
        let diff = (gmst(t1) - gmst(t0)).rem_euclid(DPI);
        assert!(diff < 1e-5 || DPI - diff < 1e-5, "diff = {diff}");
    }

    #[test]
    fn test_parse_instant() {
        let epoch = parse_instant("2021-01-01T00:00:00").unwrap();
        assert_abs_diff_eq!(epoch.to_mjd_utc_days(), 59215.0, epsilon = 1e-9);
        assert_abs_diff_eq!(mjd_ut1(&epoch, None), 59215.0, epsilon = 1e-9);

        assert!(matches!(
            parse_instant("yesterday evening"),
            Err(StarMapError::InvalidConfiguration(_))
        ));
    }

    #[test]
    fn test_now_utc() {
        let now = now_utc().unwrap();
        // any date after 2020-01-01
        assert!(now.to_mjd_utc_days() > 58849.0);
    }
}
