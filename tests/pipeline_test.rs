mod common;

use std::sync::Arc;
use std::thread;

use approx::assert_abs_diff_eq;
use camino::Utf8PathBuf;
use nalgebra::Vector3;
use starmap::{
    catalog::{StarCatalog, StarRecord},
    chart::{Cardinal, ChartParams},
    jpl_ephem::{download_jpl_file::EphemFileSource, EphemerisProvider},
    observers::{observer_frame::ObserverFrame, Observer},
    ref_system::cartesian_to_radec,
    starmap::StarMap,
};

use crate::common::{earth_kernel, spring_equinox_2024, test_env, FailingLoader, FixedEphemeris};

fn frame_at_origin(site: &Observer) -> ObserverFrame {
    FixedEphemeris::at_origin()
        .observer_at(site, &spring_equinox_2024(), None)
        .unwrap()
}

/// Catalog entry pointing along `direction` (equatorial J2000).
fn star_toward(hip: u32, direction: Vector3<f64>, magnitude: f64) -> StarRecord {
    let (ra, dec, _) = cartesian_to_radec(direction);
    StarRecord::fixed(hip, ra.to_degrees(), dec.to_degrees(), magnitude)
}

fn starmap_with(catalog: StarCatalog, params: ChartParams) -> (tempfile::TempDir, StarMap) {
    let (tmp, env) = test_env();
    let starmap = StarMap::builder()
        .env(env)
        .catalog(catalog)
        .ephemeris(Arc::new(FixedEphemeris::at_origin()))
        .params(params)
        .build()
        .unwrap();
    (tmp, starmap)
}

#[test]
fn test_zenith_star_at_chart_centre() {
    let site = Observer::default_site();
    let frame = frame_at_origin(&site);
    let catalog = StarCatalog::new(vec![star_toward(42, frame.zenith(), 2.0)]);
    let (_tmp, starmap) = starmap_with(catalog, ChartParams::default());

    let chart = starmap
        .try_plot_sky(&spring_equinox_2024(), &site)
        .unwrap();
    assert_eq!(chart.markers.len(), 1);
    let marker = &chart.markers[0];
    assert_eq!(marker.hip, 42);
    assert_abs_diff_eq!(marker.x, 0.0, epsilon = 1e-5);
    assert_abs_diff_eq!(marker.y, 0.0, epsilon = 1e-5);
}

#[test]
fn test_chart_orientation() {
    let site = Observer::default_site();
    let frame = frame_at_origin(&site);
    let catalog = StarCatalog::new(vec![
        star_toward(1, frame.up + frame.north, 3.0),
        star_toward(2, frame.up + frame.east, 3.0),
    ]);
    let (_tmp, starmap) = starmap_with(catalog, ChartParams::default());
    let chart = starmap
        .try_plot_sky(&spring_equinox_2024(), &site)
        .unwrap();

    // altitude 45°: radius tan(22.5°)
    let r = 22.5f64.to_radians().tan();
    let north = &chart.markers[0];
    assert_abs_diff_eq!(north.x, 0.0, epsilon = 1e-5);
    assert_abs_diff_eq!(north.y, r, epsilon = 1e-5);
    let east = &chart.markers[1];
    assert_abs_diff_eq!(east.x, r, epsilon = 1e-5);
    assert_abs_diff_eq!(east.y, 0.0, epsilon = 1e-5);
}

#[test]
fn test_below_horizon_filter() {
    let site = Observer::default_site();
    let frame = frame_at_origin(&site);
    let catalog = StarCatalog::new(vec![
        star_toward(1, frame.up, 1.0),
        star_toward(2, -frame.up * 0.9 + frame.north * 0.45, 1.0),
        star_toward(3, frame.up * 0.2 + frame.east, 1.0),
    ]);

    let (_tmp, starmap) = starmap_with(catalog.clone(), ChartParams::default());
    let chart = starmap
        .try_plot_sky(&spring_equinox_2024(), &site)
        .unwrap();
    assert_eq!(
        chart.markers.iter().map(|m| m.hip).collect::<Vec<_>>(),
        vec![1, 3]
    );
    assert_eq!(chart.below_horizon, 1);

    let params = ChartParams::builder()
        .include_below_horizon(true)
        .build()
        .unwrap();
    let (_tmp, starmap) = starmap_with(catalog, params);
    let chart = starmap
        .try_plot_sky(&spring_equinox_2024(), &site)
        .unwrap();
    assert_eq!(chart.markers.len(), 3);
    assert_eq!(chart.below_horizon, 1);
    assert!(chart.markers[1].x.hypot(chart.markers[1].y) > 1.0);
}

#[test]
fn test_star_at_nadir_does_not_void_chart() {
    let site = Observer::default_site();
    let frame = frame_at_origin(&site);
    let catalog = StarCatalog::new(vec![
        star_toward(1, frame.up + frame.east * 0.3, 2.0),
        star_toward(2, -frame.up, 0.0),
    ]);
    let (_tmp, starmap) = starmap_with(catalog, ChartParams::default());

    let outcome = starmap.plot_sky(&spring_equinox_2024(), &site);
    let chart = outcome.chart().unwrap();
    assert_eq!(
        chart.markers.iter().map(|m| m.hip).collect::<Vec<_>>(),
        vec![1]
    );
    assert_eq!(chart.below_horizon, 1);
}

#[test]
fn test_brighter_star_gets_larger_marker() {
    let site = Observer::default_site();
    let frame = frame_at_origin(&site);
    let catalog = StarCatalog::new(vec![
        star_toward(10, frame.up + frame.north * 0.1, 6.0),
        star_toward(11, frame.up - frame.north * 0.1, 1.0),
        star_toward(12, frame.up + frame.east * 0.1, -1.46),
    ]);
    let (_tmp, starmap) = starmap_with(catalog, ChartParams::default());
    let chart = starmap
        .try_plot_sky(&spring_equinox_2024(), &site)
        .unwrap();

    let sizes: Vec<f64> = chart.markers.iter().map(|m| m.size).collect();
    assert!(sizes[1] > sizes[0]);
    assert!(sizes[2] > sizes[1]);
    assert!(sizes.iter().all(|s| s.is_finite() && *s > 0.0));
}

#[test]
fn test_markers_follow_catalog_order() {
    let site = Observer::default_site();
    let frame = frame_at_origin(&site);
    let hips = [907, 3, 55_000, 12];
    let stars = hips
        .iter()
        .enumerate()
        .map(|(i, hip)| star_toward(*hip, frame.up + frame.east * (0.1 * i as f64), 4.0))
        .collect();
    let (_tmp, starmap) = starmap_with(StarCatalog::new(stars), ChartParams::default());

    let chart = starmap
        .try_plot_sky(&spring_equinox_2024(), &site)
        .unwrap();
    assert_eq!(
        chart.markers.iter().map(|m| m.hip).collect::<Vec<_>>(),
        hips.to_vec()
    );
    // further east, further right
    assert!(chart.markers.windows(2).all(|w| w[0].x < w[1].x));
}

#[test]
fn test_empty_catalog_still_labelled() {
    let (_tmp, starmap) = starmap_with(StarCatalog::empty(), ChartParams::default());
    let outcome = starmap.plot_sky(&spring_equinox_2024(), &Observer::default_site());

    let chart = outcome.chart().unwrap();
    assert!(chart.markers.is_empty());
    assert_eq!(chart.labels.len(), 4);
    let north = chart.label(Cardinal::North).unwrap();
    assert_eq!((north.x, north.y, north.text()), (0.0, 1.1, "N"));
    let west = chart.label(Cardinal::West).unwrap();
    assert_eq!((west.x, west.y, west.text()), (-1.1, 0.0, "W"));
    assert_eq!(chart.axis_limit, 1.2);
}

#[test]
fn test_unavailable_catalog_is_reported() {
    let (_tmp, env) = test_env();
    let starmap = StarMap::builder()
        .env(env)
        .catalog_loader(Arc::new(FailingLoader("mirror down")))
        .ephemeris(Arc::new(FixedEphemeris::at_origin()))
        .build()
        .unwrap();

    let outcome = starmap.plot_sky(&spring_equinox_2024(), &Observer::default_site());
    assert!(!outcome.is_rendered());
    assert_eq!(
        outcome.message(),
        Some("could not render sky chart: Star catalog unavailable: mirror down")
    );
    assert_eq!(
        starmap
            .try_plot_sky(&spring_equinox_2024(), &Observer::default_site())
            .unwrap_err()
            .kind(),
        "CatalogUnavailable"
    );
}

#[test]
fn test_invalid_observer_is_rejected() {
    let err = Observer::new(91.0, 0.0, 0.0, None).unwrap_err();
    assert_eq!(err.kind(), "InvalidObserverLocation");
    assert!(Observer::new(0.0, f64::NAN, 0.0, None).is_err());
}

#[test]
fn test_pipeline_over_kernel_file() {
    let (tmp, env) = test_env();
    let path = Utf8PathBuf::from_path_buf(tmp.path().join("earth.bsp")).unwrap();
    std::fs::write(&path, earth_kernel()).unwrap();

    let site = Observer::new(-33.87, 151.21, 58.0, Some("Sydney".into())).unwrap();
    let frame = FixedEphemeris::at_origin()
        .observer_at(&site, &spring_equinox_2024(), None)
        .unwrap();
    let catalog = StarCatalog::new(vec![star_toward(1, frame.up, 0.5)]);

    let starmap = StarMap::builder()
        .env(env)
        .catalog(catalog)
        .jpl_source(EphemFileSource::LocalFile(path))
        .build()
        .unwrap();
    let chart = starmap
        .try_plot_sky(&spring_equinox_2024(), &site)
        .unwrap();

    // annual aberration moves the zenith star by at most ~20″
    assert_eq!(chart.markers.len(), 1);
    let marker = &chart.markers[0];
    let radius = marker.x.hypot(marker.y);
    assert!(radius > 0.0 && radius < 1e-4, "radius {radius}");

    let svg = chart.to_svg(800).unwrap();
    assert!(svg.contains("HIP 1 (mag 0.50)"));
}

#[test]
fn test_concurrent_renders_agree() {
    let site = Observer::default_site();
    let frame = frame_at_origin(&site);
    let stars = (0..50)
        .map(|i| {
            let tilt = f64::from(i) * 0.05;
            star_toward(i + 1, frame.up + frame.north * tilt + frame.east * (1.0 - tilt), 5.0)
        })
        .collect();
    let (_tmp, starmap) = starmap_with(StarCatalog::new(stars), ChartParams::default());
    let starmap = Arc::new(starmap);

    let reference = starmap
        .try_plot_sky(&spring_equinox_2024(), &site)
        .unwrap();

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let starmap = Arc::clone(&starmap);
            let site = site.clone();
            thread::spawn(move || starmap.plot_sky(&spring_equinox_2024(), &site))
        })
        .collect();

    for handle in handles {
        let outcome = handle.join().unwrap();
        assert_eq!(outcome.chart(), Some(&reference));
    }
}
