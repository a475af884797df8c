//! Directory (footer) of an SPK type 2 segment.
//!
//! The last four words of a segment describe how its records are laid out:
//!
//! * `init`: start epoch of the first record (TDB seconds from J2000),
//! * `intlen`: time span covered by each record (seconds),
//! * `rsize`: size of one record in 8-byte words,
//! * `n_records`: number of records in the segment.
use std::{
    fmt,
    io::{Read, Seek, SeekFrom},
};

use nom::{number::complete::le_f64, IResult};

use crate::starmap_errors::StarMapError;

#[derive(Debug, PartialEq, Clone)]
pub struct DirectoryData {
    pub init: f64,
    pub intlen: f64,
    pub rsize: usize,
    pub n_records: usize,
}

impl DirectoryData {
    /// Read the directory ending at the 1-based word address `end_addr`.
    pub fn read<R: Read + Seek>(file: &mut R, end_addr: usize) -> Result<Self, StarMapError> {
        if end_addr < 4 {
            return Err(StarMapError::EphemerisError(format!(
                "segment end address {end_addr} is too small for a directory"
            )));
        }

        // Last four f64 values live at addresses end_addr-3 .. end_addr (DP-words).
        let mut dir_buf = [0u8; 32];
        file.seek(SeekFrom::Start(((end_addr - 4) * 8) as u64))
            .and_then(|_| file.read_exact(&mut dir_buf))
            .map_err(|e| {
                StarMapError::EphemerisError(format!("cannot read segment directory: {e}"))
            })?;

        let (_, [init, intlen, rsize, n_records]) = directory_words(&dir_buf).map_err(|e| {
            StarMapError::EphemerisError(format!("cannot decode segment directory: {e}"))
        })?;

        if !(intlen > 0.0) || !(rsize >= 5.0) || !(n_records >= 1.0) {
            return Err(StarMapError::EphemerisError(format!(
                "invalid segment directory: intlen={intlen}, rsize={rsize}, n={n_records}"
            )));
        }

        Ok(DirectoryData {
            init,
            intlen,
            rsize: rsize as usize,
            n_records: n_records as usize,
        })
    }

    /// Index of the record covering `et_seconds`, clamped to the segment.
    pub fn record_index(&self, et_seconds: f64) -> usize {
        let idx = ((et_seconds - self.init) / self.intlen).floor();
        (idx.max(0.0) as usize).min(self.n_records - 1)
    }
}

fn directory_words(input: &[u8]) -> IResult<&[u8], [f64; 4]> {
    let (input, init) = le_f64(input)?;
    let (input, intlen) = le_f64(input)?;
    let (input, rsize) = le_f64(input)?;
    let (input, n_records) = le_f64(input)?;
    Ok((input, [init, intlen, rsize, n_records]))
}

impl fmt::Display for DirectoryData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "init = {:.2}, interval length = {:.2} s, record size = {} words, records = {}",
            self.init, self.intlen, self.rsize, self.n_records
        )
    }
}

#[cfg(test)]
mod test_directory {
    use super::*;
    use std::io::Cursor;

    fn segment_with_directory(values: [f64; 4]) -> Cursor<Vec<u8>> {
        let mut buf = vec![0u8; 16 * 8];
        for v in values {
            buf.extend_from_slice(&v.to_le_bytes());
        }
        Cursor::new(buf)
    }

    #[test]
    fn test_read_directory() {
        let mut file = segment_with_directory([-14200747200.0, 1382400.0, 41.0, 25112.0]);
        let dir = DirectoryData::read(&mut file, 20).unwrap();
        assert_eq!(
            dir,
            DirectoryData {
                init: -14200747200.0,
                intlen: 1382400.0,
                rsize: 41,
                n_records: 25112
            }
        );
        assert_eq!(dir.record_index(-14200747200.0), 0);
        assert_eq!(dir.record_index(-14200747200.0 + 1382400.5), 1);
        assert_eq!(dir.record_index(1e12), 25111);
    }

    #[test]
    fn test_invalid_directory() {
        let mut file = segment_with_directory([0.0, 0.0, 41.0, 10.0]);
        assert!(DirectoryData::read(&mut file, 20).is_err());

        let mut file = segment_with_directory([0.0, 10.0, 41.0, 10.0]);
        assert!(DirectoryData::read(&mut file, 200).is_err());
        assert!(DirectoryData::read(&mut file, 3).is_err());

        let mut file = segment_with_directory([0.0, 10.0, 41.0, f64::NAN]);
        assert!(DirectoryData::read(&mut file, 20).is_err());
    }
}
