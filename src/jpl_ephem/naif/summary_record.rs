//! Array summaries of an SPK file.
//!
//! Summary records form a doubly linked list starting at the record given by the
//! `fward` pointer of the file header. Each record holds three control words
//! (`next`, `prev`, `nsum`) followed by `nsum` packed summaries of `ND` doubles and
//! `NI` integers.
use std::fmt;

use hifitime::Epoch;
use nom::{
    number::complete::{le_f64, le_i32},
    IResult,
};

use crate::starmap_errors::StarMapError;

/// Descriptor of one SPK segment.
#[derive(Debug, PartialEq, Clone)]
pub struct Summary {
    /// First epoch covered (TDB seconds from J2000)
    pub start_epoch: f64,
    /// Last epoch covered (TDB seconds from J2000)
    pub end_epoch: f64,
    pub target: i32,
    pub center: i32,
    pub frame_id: i32,
    /// SPK data type (2 for Chebyshev position only)
    pub data_type: i32,
    /// First word of the segment (1-based)
    pub initial_addr: i32,
    /// Last word of the segment (1-based)
    pub final_addr: i32,
}

impl Summary {
    pub fn parse(input: &[u8]) -> IResult<&[u8], Self> {
        let (input, start_epoch) = le_f64(input)?;
        let (input, end_epoch) = le_f64(input)?;

        let (input, target) = le_i32(input)?;
        let (input, center) = le_i32(input)?;
        let (input, frame_id) = le_i32(input)?;
        let (input, data_type) = le_i32(input)?;
        let (input, initial_addr) = le_i32(input)?;
        let (input, final_addr) = le_i32(input)?;
        Ok((
            input,
            Summary {
                start_epoch,
                end_epoch,
                target,
                center,
                frame_id,
                data_type,
                initial_addr,
                final_addr,
            },
        ))
    }

    pub fn covers(&self, et_seconds: f64) -> bool {
        (self.start_epoch..=self.end_epoch).contains(&et_seconds)
    }
}

/// One decoded summary record: the link to the next record and its summaries.
#[derive(Debug, PartialEq)]
pub struct SummaryRecord {
    pub next: usize,
    pub summaries: Vec<Summary>,
}

impl SummaryRecord {
    /// Decode a 1024-byte summary record.
    ///
    /// Arguments
    /// ---------
    /// * `record`: raw bytes of the record
    /// * `summary_words`: size of one summary in 8-byte words (`ND + ceil(NI/2)`)
    pub fn read(record: &[u8], summary_words: usize) -> Result<Self, StarMapError> {
        let corrupt =
            |what: &str| StarMapError::EphemerisError(format!("corrupt summary record: {what}"));

        let (_, (next, _prev, nsum)) =
            control_words(record).map_err(|_| corrupt("missing control words"))?;

        let summary_bytes = summary_words * 8;
        let capacity = (record.len().saturating_sub(24)) / summary_bytes.max(1);
        if nsum < 0.0 || nsum as usize > capacity || next < 0.0 {
            return Err(corrupt(&format!("nsum={nsum}, next={next}")));
        }

        let summaries = (0..nsum as usize)
            .map(|i| {
                let start = 24 + i * summary_bytes;
                Summary::parse(&record[start..start + summary_bytes])
                    .map(|(_, summary)| summary)
                    .map_err(|_| corrupt(&format!("summary #{i}")))
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(SummaryRecord {
            next: next as usize,
            summaries,
        })
    }
}

fn control_words(input: &[u8]) -> IResult<&[u8], (f64, f64, f64)> {
    let (input, next) = le_f64(input)?;
    let (input, prev) = le_f64(input)?;
    let (input, nsum) = le_f64(input)?;
    Ok((input, (next, prev, nsum)))
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "target {} / center {} (type {}, frame {}) from {} to {}, words {}..{}",
            self.target,
            self.center,
            self.data_type,
            self.frame_id,
            Epoch::from_et_seconds(self.start_epoch),
            Epoch::from_et_seconds(self.end_epoch),
            self.initial_addr,
            self.final_addr
        )
    }
}
