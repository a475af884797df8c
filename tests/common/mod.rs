#![allow(dead_code)]

use approx::assert_abs_diff_eq;
use hifitime::Epoch;
use nalgebra::Vector3;
use starmap::{
    catalog::{CatalogLoader, StarCatalog},
    constants::{AU, SECONDS_PER_DAY},
    env_state::StarMapEnv,
    jpl_ephem::{naif::naif_ids::NaifIds, EphemerisProvider, StateVector},
    projection::ProjectedPoint,
    starmap_errors::StarMapError,
};

pub fn assert_point_close(actual: &ProjectedPoint, x: f64, y: f64, epsilon: f64) {
    assert_abs_diff_eq!(actual.x, x, epsilon = epsilon);
    assert_abs_diff_eq!(actual.y, y, epsilon = epsilon);
}

/// Cache directory that lives as long as the returned guard.
pub fn test_env() -> (tempfile::TempDir, StarMapEnv) {
    let tmp = tempfile::tempdir().unwrap();
    let env = StarMapEnv::with_cache_dir(tmp.path().to_str().unwrap());
    (tmp, env)
}

pub fn spring_equinox_2024() -> Epoch {
    Epoch::from_gregorian_utc_at_noon(2024, 3, 20)
}

/// Earth-Moon barycenter frozen at a barycentric state given in AU and AU/day, with the
/// Earth on the barycenter.
pub struct FixedEphemeris {
    pub position_au: Vector3<f64>,
    pub velocity_au_day: Vector3<f64>,
}

impl FixedEphemeris {
    pub fn at_origin() -> Self {
        FixedEphemeris {
            position_au: Vector3::zeros(),
            velocity_au_day: Vector3::zeros(),
        }
    }
}

impl EphemerisProvider for FixedEphemeris {
    fn position_of(
        &self,
        target: NaifIds,
        center: NaifIds,
        _epoch: &Epoch,
    ) -> Result<StateVector, StarMapError> {
        match (target, center) {
            (NaifIds::EarthMoonBarycenter, NaifIds::SolarSystemBarycenter) => Ok(StateVector {
                position: self.position_au * AU,
                velocity: self.velocity_au_day * AU / SECONDS_PER_DAY,
            }),
            (NaifIds::Earth, NaifIds::EarthMoonBarycenter) => Ok(StateVector {
                position: Vector3::zeros(),
                velocity: Vector3::zeros(),
            }),
            (target, center) => Err(StarMapError::EphemerisError(format!(
                "no fixed state for {target} relative to {center}"
            ))),
        }
    }
}

pub struct FailingLoader(pub &'static str);

impl CatalogLoader for FailingLoader {
    fn load_catalog(&self) -> Result<StarCatalog, StarMapError> {
        Err(StarMapError::CatalogUnavailable(self.0.to_string()))
    }
}

/// One SPK type 2 segment holding a single record of linear motion:
/// `position + velocity · (et − mid)` over `[start_et, end_et]`.
#[derive(Debug, Clone)]
pub struct LinearSegment {
    pub target: i32,
    pub center: i32,
    pub data_type: i32,
    pub start_et: f64,
    pub end_et: f64,
    /// km, at the middle of the segment
    pub position: [f64; 3],
    /// km/s
    pub velocity: [f64; 3],
}

impl LinearSegment {
    pub fn new(target: i32, center: i32, position: [f64; 3], velocity: [f64; 3]) -> Self {
        LinearSegment {
            target,
            center,
            data_type: 2,
            start_et: -1.0e9,
            end_et: 2.0e9,
            position,
            velocity,
        }
    }

    pub fn mid(&self) -> f64 {
        0.5 * (self.start_et + self.end_et)
    }

    fn record_words(&self) -> Vec<f64> {
        let radius = 0.5 * (self.end_et - self.start_et);
        let mut words = vec![self.mid(), radius];
        for axis in 0..3 {
            words.push(self.position[axis]);
            words.push(self.velocity[axis] * radius);
        }
        words
    }
}

const RECORD_BYTES: usize = 1024;
const WORDS_PER_RECORD: usize = RECORD_BYTES / 8;

/// Little-endian DAF/SPK image: file record, one summary record, an empty name record,
/// then the segments, each followed by its four-word directory.
pub fn synthetic_spk(segments: &[LinearSegment]) -> Vec<u8> {
    let mut data_words: Vec<f64> = Vec::new();
    let mut addresses = Vec::with_capacity(segments.len());
    let first_data_addr = 3 * WORDS_PER_RECORD + 1;

    for segment in segments {
        let record = segment.record_words();
        let initial = first_data_addr + data_words.len();
        data_words.extend_from_slice(&record);
        data_words.extend_from_slice(&[
            segment.start_et,
            segment.end_et - segment.start_et,
            record.len() as f64,
            1.0,
        ]);
        let last = first_data_addr + data_words.len() - 1;
        addresses.push((initial as i32, last as i32));
    }
    let free = (first_data_addr + data_words.len()) as i32;

    let mut file = Vec::with_capacity(3 * RECORD_BYTES + 8 * data_words.len());

    file.extend_from_slice(b"DAF/SPK ");
    file.extend_from_slice(&2i32.to_le_bytes());
    file.extend_from_slice(&6i32.to_le_bytes());
    let mut name = [b' '; 60];
    name[..13].copy_from_slice(b"SYNTHETIC SPK");
    file.extend_from_slice(&name);
    file.extend_from_slice(&2i32.to_le_bytes());
    file.extend_from_slice(&2i32.to_le_bytes());
    file.extend_from_slice(&free.to_le_bytes());
    file.extend_from_slice(b"LTL-IEEE");
    file.resize(RECORD_BYTES, 0);

    for control in [0.0f64, 0.0, segments.len() as f64] {
        file.extend_from_slice(&control.to_le_bytes());
    }
    for (segment, (initial, last)) in segments.iter().zip(&addresses) {
        file.extend_from_slice(&segment.start_et.to_le_bytes());
        file.extend_from_slice(&segment.end_et.to_le_bytes());
        for v in [
            segment.target,
            segment.center,
            1,
            segment.data_type,
            *initial,
            *last,
        ] {
            file.extend_from_slice(&v.to_le_bytes());
        }
    }
    file.resize(3 * RECORD_BYTES, 0);

    for word in data_words {
        file.extend_from_slice(&word.to_le_bytes());
    }
    file
}

/// Earth-Moon barycenter one AU from the solar system barycenter on +x at
/// [`spring_equinox_2024`], moving at 29.78 km/s on +y, and the Earth on the barycenter.
pub fn earth_segments() -> Vec<LinearSegment> {
    let mid = spring_equinox_2024().to_et_seconds();
    [
        LinearSegment::new(3, 0, [AU, 0.0, 0.0], [0.0, 29.78, 0.0]),
        LinearSegment::new(399, 3, [0.0, 0.0, 0.0], [0.0, 0.0, 0.0]),
    ]
    .into_iter()
    .map(|segment| LinearSegment {
        start_et: mid - 1.0e9,
        end_et: mid + 1.0e9,
        ..segment
    })
    .collect()
}

pub fn earth_kernel() -> Vec<u8> {
    synthetic_spk(&earth_segments())
}
