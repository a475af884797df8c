//! DAF (Double precision Array File) header of a NAIF SPK kernel.
//!
//! The first 1024-byte record of a DAF container describes the layout of the rest of
//! the file:
//!
//! * **`idword`**: format identifier, `"DAF/SPK"` for a planetary kernel.
//! * **`nd`** / **`ni`**: number of double / integer components of each array summary
//!   (`2` and `6` for SPK).
//! * **`fward`** / **`bward`**: record numbers (1-based) of the first and last summary
//!   record of the doubly linked summary list.
//! * **`free`**: first free address of the file (1-based, in 8-byte words).
//! * **`locfmt`**: numeric encoding of the file, only `"LTL-IEEE"` is decoded here.
//!
//! # See also
//! ------------
//! * NAIF DAF Required Reading – file layout, summaries, addresses.
use std::fmt;

use nom::{bytes::complete::take, number::complete::le_i32, IResult};

use crate::starmap_errors::StarMapError;

/// Size in bytes of a DAF physical record.
pub(crate) const DAF_RECORD_BYTES: usize = 1024;

#[derive(Debug, PartialEq, Clone)]
pub struct DAFHeader {
    pub idword: String,
    pub internal_filename: String,
    pub nd: i32,
    pub ni: i32,
    pub fward: i32,
    pub bward: i32,
    pub free: i32,
    pub locfmt: String,
}

impl DAFHeader {
    /// Decode the fields of the file record. The reserved area and the FTP
    /// validation string are skipped.
    pub fn parse(input: &[u8]) -> IResult<&[u8], Self> {
        let (input, id_word) = take(8usize)(input)?;
        let (input, nd) = le_i32(input)?;
        let (input, ni) = le_i32(input)?;
        let (input, ifname) = take(60usize)(input)?;
        let (input, fward) = le_i32(input)?;
        let (input, bward) = le_i32(input)?;
        let (input, free) = le_i32(input)?;
        let (input, locfmt) = take(8usize)(input)?;
        let (input, _) = take(603usize)(input)?; // reserved
        let (input, _) = take(28usize)(input)?; // ftp string
        Ok((
            input,
            DAFHeader {
                idword: ascii_field(id_word),
                internal_filename: ascii_field(ifname),
                nd,
                ni,
                fward,
                bward,
                free,
                locfmt: ascii_field(locfmt),
            },
        ))
    }

    /// Parse the header and check that the file is a little-endian SPK kernel
    /// with the standard summary layout.
    pub fn read(input: &[u8]) -> Result<Self, StarMapError> {
        let (_, header) = Self::parse(input).map_err(|e| {
            StarMapError::EphemerisError(format!("truncated DAF file record: {e}"))
        })?;

        if header.idword != "DAF/SPK" {
            return Err(StarMapError::EphemerisError(format!(
                "not an SPK kernel (id word {:?})",
                header.idword
            )));
        }
        if header.locfmt != "LTL-IEEE" {
            return Err(StarMapError::EphemerisError(format!(
                "unsupported binary format {:?}, only LTL-IEEE kernels are read",
                header.locfmt
            )));
        }
        if header.nd != 2 || header.ni != 6 {
            return Err(StarMapError::EphemerisError(format!(
                "unexpected summary layout ND={}, NI={}",
                header.nd, header.ni
            )));
        }
        if header.fward < 2 {
            return Err(StarMapError::EphemerisError(format!(
                "invalid first summary record number {}",
                header.fward
            )));
        }
        Ok(header)
    }

    /// Size of one array summary, in 8-byte words.
    pub fn summary_words(&self) -> usize {
        self.nd as usize + (self.ni as usize).div_ceil(2)
    }
}

fn ascii_field(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes)
        .trim_matches(|c: char| c.is_whitespace() || c == '\0')
        .to_string()
}

impl fmt::Display for DAFHeader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} '{}' (ND={}, NI={}, summaries {}..{}, free={}, {})",
            self.idword,
            self.internal_filename,
            self.nd,
            self.ni,
            self.fward,
            self.bward,
            self.free,
            self.locfmt
        )
    }
}

#[cfg(test)]
mod test_daf_header {
    use super::*;

    fn file_record(idword: &[u8; 8], locfmt: &[u8; 8]) -> Vec<u8> {
        let mut buf = Vec::with_capacity(DAF_RECORD_BYTES);
        buf.extend_from_slice(idword);
        buf.extend_from_slice(&2i32.to_le_bytes());
        buf.extend_from_slice(&6i32.to_le_bytes());
        let mut name = [b' '; 60];
        name[..7].copy_from_slice(b"NIO2SPK");
        buf.extend_from_slice(&name);
        buf.extend_from_slice(&4i32.to_le_bytes());
        buf.extend_from_slice(&4i32.to_le_bytes());
        buf.extend_from_slice(&14974889i32.to_le_bytes());
        buf.extend_from_slice(locfmt);
        buf.resize(DAF_RECORD_BYTES, 0);
        buf
    }

    #[test]
    fn test_parse_daf_header() {
        let header = DAFHeader::read(&file_record(b"DAF/SPK ", b"LTL-IEEE")).unwrap();
        assert_eq!(
            header,
            DAFHeader {
                idword: "DAF/SPK".to_string(),
                internal_filename: "NIO2SPK".to_string(),
                nd: 2,
                ni: 6,
                fward: 4,
                bward: 4,
                free: 14974889,
                locfmt: "LTL-IEEE".to_string(),
            }
        );
        assert_eq!(header.summary_words(), 5);
        assert_eq!(
            header.to_string(),
            "DAF/SPK 'NIO2SPK' (ND=2, NI=6, summaries 4..4, free=14974889, LTL-IEEE)"
        );
    }

    #[test]
    fn test_reject_big_endian() {
        let err = DAFHeader::read(&file_record(b"DAF/SPK ", b"BIG-IEEE")).unwrap_err();
        assert_eq!(err.kind(), "EphemerisError");
    }

    #[test]
    fn test_reject_other_daf() {
        assert!(DAFHeader::read(&file_record(b"DAF/PCK ", b"LTL-IEEE")).is_err());
        assert!(DAFHeader::read(&[0u8; 100]).is_err());
    }
}
