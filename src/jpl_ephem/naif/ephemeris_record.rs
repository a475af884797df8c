//! Chebyshev records of SPK type 2 segments and their interpolation.
//!
//! Each record stores, as little-endian `f64`:
//! 1. `mid`, the record midpoint (TDB seconds from J2000),
//! 2. `radius`, half the time span of the record (seconds),
//! 3. `n` Chebyshev coefficients for X, then Y, then Z (km).
//!
//! With `τ = (et − mid) / radius`, the position is `Σ cₙ Tₙ(τ)` and the velocity is
//! `Σ cₙ T'ₙ(τ) / radius`.
use std::io::{Read, Seek, SeekFrom};

use nalgebra::Vector3;

use crate::starmap_errors::StarMapError;

#[derive(Debug, Clone, PartialEq)]
pub struct EphemerisRecord {
    pub mid: f64,
    pub radius: f64,
    pub x: Vec<f64>,
    pub y: Vec<f64>,
    pub z: Vec<f64>,
}

impl EphemerisRecord {
    fn from_words(words: &[f64]) -> Self {
        let ncoeff = (words.len() - 2) / 3;
        let coeffs = &words[2..];
        EphemerisRecord {
            mid: words[0],
            radius: words[1],
            x: coeffs[..ncoeff].to_vec(),
            y: coeffs[ncoeff..2 * ncoeff].to_vec(),
            z: coeffs[2 * ncoeff..3 * ncoeff].to_vec(),
        }
    }

    /// Read the `n_records` contiguous records of a segment.
    ///
    /// Arguments
    /// ---------
    /// * `file`: the kernel
    /// * `segment_start_addr`: first word of the segment (1-based)
    /// * `rsize`: record size in words (`2 + 3·n`)
    /// * `n_records`: number of records
    pub fn read_segment<R: Read + Seek>(
        file: &mut R,
        segment_start_addr: usize,
        rsize: usize,
        n_records: usize,
    ) -> Result<Vec<Self>, StarMapError> {
        if segment_start_addr == 0 || rsize < 5 || (rsize - 2) % 3 != 0 {
            return Err(StarMapError::EphemerisError(format!(
                "invalid type 2 segment layout: start={segment_start_addr}, rsize={rsize}"
            )));
        }

        let len = rsize
            .checked_mul(n_records)
            .and_then(|words| words.checked_mul(8))
            .ok_or_else(|| {
                StarMapError::EphemerisError(format!(
                    "segment size overflows: rsize={rsize}, records={n_records}"
                ))
            })?;
        let mut buf = vec![0u8; len];
        file.seek(SeekFrom::Start(((segment_start_addr - 1) * 8) as u64))
            .and_then(|_| file.read_exact(&mut buf))
            .map_err(|e| StarMapError::EphemerisError(format!("truncated SPK segment: {e}")))?;

        let words: Vec<f64> = buf
            .chunks_exact(8)
            .map(|chunk| {
                let mut bytes = [0u8; 8];
                bytes.copy_from_slice(chunk);
                f64::from_le_bytes(bytes)
            })
            .collect();

        let records: Vec<Self> = words.chunks_exact(rsize).map(Self::from_words).collect();
        if records.iter().any(|r| !(r.radius > 0.0)) {
            return Err(StarMapError::EphemerisError(
                "SPK record with a non-positive radius".into(),
            ));
        }
        Ok(records)
    }

    /// Position (km) and velocity (km/s) at `ephem_time` (TDB seconds from J2000).
    pub fn interpolate(&self, ephem_time: f64) -> (Vector3<f64>, Vector3<f64>) {
        let tau = ((ephem_time - self.mid) / self.radius).clamp(-1.0, 1.0);

        let n = self.x.len();
        let mut t = vec![0.0; n];
        let mut dt = vec![0.0; n];

        // T_0 = 1, T_1 = τ, T_n = 2τ T_{n-1} − T_{n-2}
        // T'_0 = 0, T'_1 = 1, T'_n = 2τ T'_{n-1} + 2 T_{n-1} − T'_{n-2}
        if n > 0 {
            t[0] = 1.0;
        }
        if n > 1 {
            t[1] = tau;
            dt[1] = 1.0;
        }
        for k in 2..n {
            t[k] = 2.0 * tau * t[k - 1] - t[k - 2];
            dt[k] = 2.0 * tau * dt[k - 1] + 2.0 * t[k - 1] - dt[k - 2];
        }

        let eval = |coeffs: &[f64], basis: &[f64]| -> f64 {
            coeffs.iter().zip(basis).map(|(c, b)| c * b).sum()
        };

        let position = Vector3::new(eval(&self.x, &t), eval(&self.y, &t), eval(&self.z, &t));
        let velocity =
            Vector3::new(eval(&self.x, &dt), eval(&self.y, &dt), eval(&self.z, &dt)) / self.radius;

        (position, velocity)
    }
}
