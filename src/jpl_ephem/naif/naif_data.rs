//! High-level loader for NAIF/JPL SPK ephemerides.
//!
//! This module ties together the DAF header, the summary records, the segment
//! directories and the Chebyshev records to expose state vectors of solar system
//! bodies.
//!
//! # What this module does
//! 1. Reads the **DAF header** to check the binary layout (`ND`, `NI`, `LTL-IEEE`).
//! 2. Walks the linked list of **summary records** to discover segments (`target`,
//!    `center`, addressing, time span).
//! 3. Uses the **directory** of each type 2 segment to obtain `rsize` and `n_records`.
//! 4. Loads all **ephemeris records** (Chebyshev coefficients) in memory.
//!
//! # Units & time scales
//! * Times are **TDB seconds from J2000**.
//! * Positions are **kilometers**, velocities are **km/s**, in the ICRF/J2000 frame.
use std::{
    collections::HashMap,
    fs::File,
    io::{BufReader, Read, Seek, SeekFrom},
};

use camino::Utf8Path;
use hifitime::Epoch;
use itertools::Itertools;
use tracing::{debug, info};

use crate::{
    jpl_ephem::{EphemerisProvider, StateVector},
    starmap_errors::StarMapError,
};

use super::{
    daf_header::{DAFHeader, DAF_RECORD_BYTES},
    directory::DirectoryData,
    ephemeris_record::EphemerisRecord,
    naif_ids::NaifIds,
    summary_record::{Summary, SummaryRecord},
};

/// SPK data type of Chebyshev position-only segments.
const SPK_TYPE_CHEBYSHEV_POSITION: i32 = 2;

#[derive(Debug, Clone)]
enum SegmentData {
    Chebyshev {
        directory: DirectoryData,
        records: Vec<EphemerisRecord>,
    },
    Unsupported,
}

#[derive(Debug, Clone)]
struct Segment {
    summary: Summary,
    data: SegmentData,
}

/// In-memory bundle of a loaded NAIF/JPL SPK kernel.
///
/// Segments are indexed by `(target, center)` NAIF IDs. A pair may be covered by
/// several segments with contiguous time spans.
///
/// See also
/// ------------
/// * [`NaifData::read_naif_file`] – Build this structure from an SPK file.
/// * [`NaifData::ephemeris`] – Interpolate state vectors at TDB epochs.
#[derive(Debug, Clone)]
pub struct NaifData {
    pub(crate) daf_header: DAFHeader,
    segments: HashMap<(i32, i32), Vec<Segment>>,
}

impl NaifData {
    /// Load and decode a NAIF/JPL SPK file.
    ///
    /// Arguments
    /// -----------------
    /// * `file_path`: location of the SPK kernel.
    ///
    /// Return
    /// ----------
    /// * A [`NaifData`] with all segments indexed by `(target, center)`, or
    ///   [`StarMapError::EphemerisError`] if the file is missing, truncated or not a
    ///   little-endian SPK kernel.
    pub fn read_naif_file(file_path: &Utf8Path) -> Result<Self, StarMapError> {
        let file = File::open(file_path).map_err(|e| {
            StarMapError::EphemerisError(format!("cannot open ephemeris file {file_path}: {e}"))
        })?;

        let data = Self::from_reader(&mut BufReader::new(file))?;
        info!(
            path = %file_path,
            name = %data.daf_header.internal_filename,
            segments = data.segments.values().map(Vec::len).sum::<usize>(),
            bodies = %data
                .available_pairs()
                .iter()
                .map(|(target, center)| format!("{target}/{center}"))
                .join(", "),
            "ephemeris kernel loaded"
        );
        Ok(data)
    }

    /// Decode an SPK kernel from any seekable byte source.
    pub fn from_reader<R: Read + Seek>(file: &mut R) -> Result<Self, StarMapError> {
        let io_err =
            |e: std::io::Error| StarMapError::EphemerisError(format!("cannot read SPK file: {e}"));

        let file_len = file.seek(SeekFrom::End(0)).map_err(io_err)?;

        let mut buffer = [0u8; DAF_RECORD_BYTES];
        file.seek(SeekFrom::Start(0))
            .and_then(|_| file.read_exact(&mut buffer))
            .map_err(|e| StarMapError::EphemerisError(format!("missing DAF file record: {e}")))?;
        let daf_header = DAFHeader::read(&buffer)?;
        debug!(header = %daf_header, "DAF header");

        let summary_words = daf_header.summary_words();
        let max_records = file_len as usize / DAF_RECORD_BYTES;

        let mut segments: HashMap<(i32, i32), Vec<Segment>> = HashMap::new();
        let mut next = daf_header.fward as usize;
        let mut visited = 0;

        while next != 0 {
            visited += 1;
            if next > max_records || visited > max_records {
                return Err(StarMapError::EphemerisError(format!(
                    "broken summary record list (record {next})"
                )));
            }

            file.seek(SeekFrom::Start(((next - 1) * DAF_RECORD_BYTES) as u64))
                .and_then(|_| file.read_exact(&mut buffer))
                .map_err(io_err)?;
            let record = SummaryRecord::read(&buffer, summary_words)?;

            for summary in record.summaries {
                let segment = Self::load_segment(file, summary)?;
                segments
                    .entry((segment.summary.target, segment.summary.center))
                    .or_default()
                    .push(segment);
            }
            next = record.next;
        }

        Ok(NaifData {
            daf_header,
            segments,
        })
    }

    fn load_segment<R: Read + Seek>(
        file: &mut R,
        summary: Summary,
    ) -> Result<Segment, StarMapError> {
        if summary.data_type != SPK_TYPE_CHEBYSHEV_POSITION {
            debug!(%summary, "skipping segment with unsupported SPK type");
            return Ok(Segment {
                summary,
                data: SegmentData::Unsupported,
            });
        }

        if summary.initial_addr < 1 || summary.final_addr < summary.initial_addr {
            return Err(StarMapError::EphemerisError(format!(
                "invalid segment addresses in {summary}"
            )));
        }

        let directory = DirectoryData::read(file, summary.final_addr as usize)?;
        let span = (summary.final_addr - summary.initial_addr) as usize + 1;
        let expected = directory
            .rsize
            .checked_mul(directory.n_records)
            .and_then(|words| words.checked_add(4));
        if expected != Some(span) {
            return Err(StarMapError::EphemerisError(format!(
                "segment directory ({directory}) does not match the {span} words of {summary}"
            )));
        }

        let records = EphemerisRecord::read_segment(
            file,
            summary.initial_addr as usize,
            directory.rsize,
            directory.n_records,
        )?;

        Ok(Segment {
            summary,
            data: SegmentData::Chebyshev { directory, records },
        })
    }

    /// `(target, center)` pairs available in the kernel.
    pub fn available_pairs(&self) -> Vec<(i32, i32)> {
        let mut pairs: Vec<_> = self.segments.keys().copied().collect();
        pairs.sort_unstable();
        pairs
    }

    /// Interpolate **position** and **velocity** for a `(target, center)` pair.
    ///
    /// Arguments
    /// -----------------
    /// * `target`: NAIF ID of the target body.
    /// * `center`: NAIF ID of the center (e.g., SSB).
    /// * `et_seconds`: Epoch in **TDB seconds from J2000**.
    ///
    /// Return
    /// ----------
    /// * [`StateVector`]: position in **km**, velocity in **km/s**.
    /// * [`StarMapError::EphemerisError`] if the pair is not in the kernel, the epoch is
    ///   outside the coverage or the segment type is not supported.
    pub fn ephemeris(
        &self,
        target: NaifIds,
        center: NaifIds,
        et_seconds: f64,
    ) -> Result<StateVector, StarMapError> {
        let segments = self
            .segments
            .get(&(target.to_id(), center.to_id()))
            .ok_or_else(|| {
                StarMapError::EphemerisError(format!(
                    "no ephemeris segment for {target} relative to {center}"
                ))
            })?;

        let segment = segments
            .iter()
            .find(|s| s.summary.covers(et_seconds))
            .ok_or_else(|| {
                StarMapError::EphemerisError(format!(
                    "epoch {} is outside the coverage of {target} relative to {center}",
                    Epoch::from_et_seconds(et_seconds)
                ))
            })?;

        match &segment.data {
            SegmentData::Chebyshev { directory, records } => {
                let record = &records[directory.record_index(et_seconds)];
                let (position, velocity) = record.interpolate(et_seconds);
                Ok(StateVector { position, velocity })
            }
            SegmentData::Unsupported => Err(StarMapError::EphemerisError(format!(
                "unsupported SPK data type {} for {target} relative to {center}",
                segment.summary.data_type
            ))),
        }
    }
}

impl EphemerisProvider for NaifData {
    fn position_of(
        &self,
        target: NaifIds,
        center: NaifIds,
        epoch: &Epoch,
    ) -> Result<StateVector, StarMapError> {
        self.ephemeris(target, center, epoch.to_et_seconds())
    }
}
