mod common;

use std::f64::consts::FRAC_PI_2;

use approx::assert_abs_diff_eq;
use starmap::{
    catalog::StarRecord,
    chart::{render, Cardinal, ChartParams},
    constants::RADEG,
    projection::{ProjectedPoint, StereographicProjection},
};

use crate::common::assert_point_close;

#[test]
fn test_zenith_maps_to_origin() {
    let projection = StereographicProjection::zenith();
    for az in [0.0, 1.0, 3.5, 6.2] {
        assert_point_close(&projection.project(FRAC_PI_2, az).unwrap(), 0.0, 0.0, 1e-15);
    }
}

#[test]
fn test_horizon_on_unit_circle() {
    let projection = StereographicProjection::zenith();
    for step in 0..360 {
        let az = f64::from(step) * RADEG;
        let point = projection.project(0.0, az).unwrap();
        assert_abs_diff_eq!(point.radius(), 1.0, epsilon = 1e-12);
    }
}

#[test]
fn test_cardinal_labels_lie_on_horizon_directions() {
    let projection = StereographicProjection::zenith();
    let params = ChartParams::default();
    let chart = render(&[], &[], &params).unwrap();

    for cardinal in Cardinal::ALL {
        let on_horizon = projection
            .project(0.0, cardinal.azimuth_deg() * RADEG)
            .unwrap();
        let label = chart.label(cardinal).unwrap();
        assert_abs_diff_eq!(label.x, on_horizon.x * params.label_radius, epsilon = 1e-12);
        assert_abs_diff_eq!(label.y, on_horizon.y * params.label_radius, epsilon = 1e-12);
    }
}

#[test]
fn test_radius_grows_with_zenith_distance() {
    let projection = StereographicProjection::zenith();
    let radii: Vec<f64> = (0..=170)
        .map(|i| 90.0 - f64::from(i))
        .map(|alt_deg| projection.project(alt_deg * RADEG, 1.0).unwrap().radius())
        .collect();
    assert!(radii.windows(2).all(|w| w[0] < w[1]));
}

#[test]
fn test_projection_is_continuous() {
    let projection = StereographicProjection::zenith();
    let delta = 1e-7;
    for (alt_deg, az_deg) in [(80.0, 10.0), (45.0, 359.9), (5.0, 180.0), (-60.0, 270.0)] {
        let (alt, az) = (alt_deg * RADEG, az_deg * RADEG);
        let p = projection.project(alt, az).unwrap();
        let q = projection.project(alt + delta, az - delta).unwrap();
        let jump = (p.x - q.x).hypot(p.y - q.y);
        assert!(jump < 1e-5, "jump {jump} at ({alt_deg}, {az_deg})");
    }

    // across the 0/360 seam
    let a = projection.project(0.5, 1e-9).unwrap();
    let b = projection.project(0.5, 2.0 * std::f64::consts::PI - 1e-9).unwrap();
    assert!((a.x - b.x).hypot(a.y - b.y) < 1e-8);
}

#[test]
fn test_nadir_is_a_domain_error() {
    let projection = StereographicProjection::zenith();
    let err = projection.project(-FRAC_PI_2, 0.0).unwrap_err();
    assert_eq!(err.kind(), "ProjectionDomainError");

    // close to, but not at, the singularity
    let far = projection.project(-FRAC_PI_2 + 1e-3, 0.0).unwrap();
    assert!(far.radius() > 1000.0);
}

#[test]
fn test_invalid_angles() {
    let projection = StereographicProjection::zenith();
    assert!(projection.project(f64::NAN, 0.0).is_err());
    assert!(projection.project(0.3, f64::INFINITY).is_err());
    assert!(projection.project(2.0, 0.0).is_err());
    assert!(StereographicProjection::new(f64::NAN, 0.0).is_err());
}

#[test]
fn test_marker_size_monotonic() {
    let params = ChartParams::default();
    let sizes: Vec<f64> = (-15..=130)
        .map(|m| params.marker_size(f64::from(m) / 10.0))
        .collect();
    assert!(sizes.windows(2).all(|w| w[0] > w[1]));
    assert!(sizes.iter().all(|s| s.is_finite() && *s > 0.0));
}

#[test]
fn test_zero_and_negative_magnitudes_render() {
    let stars = vec![
        StarRecord::fixed(32349, 101.29, -16.72, -1.44),
        StarRecord::fixed(91262, 279.23, 38.78, 0.0),
        StarRecord::fixed(1, 0.0, 0.0, -30.0),
    ];
    let points = vec![
        ProjectedPoint::new(0.1, 0.2),
        ProjectedPoint::new(-0.3, 0.0),
        ProjectedPoint::new(0.0, -0.9),
    ];
    let chart = render(&points, &stars, &ChartParams::default()).unwrap();

    assert_eq!(chart.markers.len(), 3);
    assert!(chart.markers.iter().all(|m| m.size.is_finite()));
    // the denominator floor caps very bright markers
    assert_abs_diff_eq!(chart.markers[2].size, 10.0 / 0.25, epsilon = 1e-12);
}

#[test]
fn test_render_rejects_mismatched_inputs() {
    let stars = vec![StarRecord::fixed(1, 0.0, 0.0, 1.0)];
    let err = render(&[], &stars, &ChartParams::default()).unwrap_err();
    assert_eq!(err.kind(), "RenderError");

    let points = vec![ProjectedPoint::new(f64::NAN, 0.0)];
    assert!(render(&points, &stars, &ChartParams::default()).is_err());
}
