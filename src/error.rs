use thiserror::Error;

use crate::SampleFormat;

pub type Result<T> = std::result::Result<T, RecordError>;

fn describe_opt_byte(byte: &Option<u8>) -> String {
    match byte {
        Some(b'\n') => String::from("a newline"),
        Some(b) if b.is_ascii_graphic() => format!("'{}'", *b as char),
        Some(b) => format!("byte {b:#04x}"),
        None => String::from("end of stream"),
    }
}

fn describe_byte(byte: &u8) -> String {
    describe_opt_byte(&Some(*byte))
}

#[derive(Error, Debug)]
pub enum RecordError {
    #[error("I/O error")]
    Io(#[from] std::io::Error),

    #[error("Expected \"{keyword}\" but found {}", describe_opt_byte(.found))]
    MissingKeyword {
        keyword: &'static str,
        found: Option<u8>,
    },

    #[error("Integer in record data exceeded 64 bits")]
    IntegerOverflow,

    #[error("Expected a '0' or '1' but found {}", describe_byte(.found))]
    NotABit { found: u8 },

    #[error("Record ended after {got} of {expected} bits")]
    RecordTooShort { got: usize, expected: usize },

    #[error("Record did not end after {expected} bits")]
    RecordTooLong { expected: usize },

    #[error("Expected an integer at the start of a line or after a ','")]
    MissingHitValue,

    #[error("Expected a ',' or newline after a hit value but found {}", describe_opt_byte(.found))]
    MissingHitSeparator { found: Option<u8> },

    #[error("Hit index ({index}) must be less than the record width ({width})")]
    HitOutOfRange { index: u64, width: usize },

    #[error("Run-length data ended on a continuation (0xff) byte")]
    DanglingContinuation,

    #[error(
        "Run-length data ended in a one bit but the 0x00 terminator for the \
         encoded one just past the end of the record was missing; found {}",
        describe_opt_byte(.found)
    )]
    MissingTerminator { found: Option<u8> },

    #[error("Run-length data encoded a jump past the end of the record")]
    JumpPastEnd,

    #[error("Detection record values must be separated by spaces")]
    MissingSpacing,

    #[error("Expected an 'M', 'D', or 'L' prefix but found {}", describe_byte(.found))]
    UnknownPrefix { found: u8 },

    #[error("Prefix '{prefix}' was not followed by an integer")]
    MissingPrefixValue { prefix: char },

    #[error("Index ({index}) of '{prefix}' must be less than the section width ({width})")]
    SectionOutOfRange {
        prefix: char,
        index: u64,
        width: usize,
    },

    #[error("Attempted to read a bit past the end of the record")]
    ReadPastEnd,

    #[error("Unexpected end of stream inside a record")]
    TruncatedRecord,

    #[error("Unrecognized sample format: {name:?}")]
    UnknownFormat { name: String },

    #[error("Format {format} only carries measurement bits, but the shape has detection events or observables")]
    ShapeMismatch { format: SampleFormat },

    #[error("Format {format} cannot be decoded one record at a time")]
    UnstreamableFormat { format: SampleFormat },

    #[error("A record contained more bits than fit in the table row ({width})")]
    OversizedRecord { width: usize },

    #[error("Record has {got} bits but the shape requires {expected}")]
    WrongRecordWidth { got: usize, expected: usize },
}
