use std::fmt;
use std::str::FromStr;

use crate::RecordError;

/// On-disk encoding of a stream of shot records.
///
/// The name of each variant matches the name used in record files and on
/// command lines: `01`, `b8`, `hits`, `r8`, `dets`, and `ptb64`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SampleFormat {
    /// One ASCII `'0'` or `'1'` per bit, one newline-terminated line per shot.
    ZeroOne,
    /// Raw little-endian packed bytes, eight bits per byte.
    B8,
    /// Comma-separated indices of set bits, one line per shot.
    Hits,
    /// Run-length encoded gaps between set bits.
    R8,
    /// Tagged `shot M<i> D<j> L<k>` lines with per-section indices.
    Dets,
    /// Sixty-four shots transposed into each word; not streamable one record
    /// at a time.
    Ptb64,
}

impl SampleFormat {
    pub fn name(self) -> &'static str {
        match self {
            Self::ZeroOne => "01",
            Self::B8 => "b8",
            Self::Hits => "hits",
            Self::R8 => "r8",
            Self::Dets => "dets",
            Self::Ptb64 => "ptb64",
        }
    }
}

impl fmt::Display for SampleFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for SampleFormat {
    type Err = RecordError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "01" => Ok(Self::ZeroOne),
            "b8" => Ok(Self::B8),
            "hits" => Ok(Self::Hits),
            "r8" => Ok(Self::R8),
            "dets" => Ok(Self::Dets),
            "ptb64" => Ok(Self::Ptb64),
            _ => Err(RecordError::UnknownFormat { name: s.to_string() }),
        }
    }
}

/// Section of a shot record a bit belongs to.
///
/// Non-`dets` records only contain measurement bits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ResultType {
    Measurement,
    Detector,
    Observable,
}

impl ResultType {
    /// The section prefix character used by the `dets` format.
    pub fn prefix(self) -> char {
        match self {
            Self::Measurement => 'M',
            Self::Detector => 'D',
            Self::Observable => 'L',
        }
    }
}
