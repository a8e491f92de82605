//! Streaming readers and writers for per-shot measurement bit records.
//!
//! Shot records come in five on-disk encodings (`01`, `b8`, `hits`, `r8`,
//! and `dets`); every decoder exposes the same [`RecordReader`] contract
//! over an unseekable byte stream and can drain whole streams into a
//! SIMD-padded [`BitTable`].
//!
//! ```
//! use std::io::Cursor;
//! use shotrec::{record_reader, RecordShape, SampleFormat};
//!
//! let mut reader = record_reader(
//!     Cursor::new(b"010\n111\n".to_vec()),
//!     SampleFormat::ZeroOne,
//!     RecordShape::measurements_only(3),
//! )?;
//! let mut shots = Vec::new();
//! while reader.start_record()? {
//!     let mut bits = Vec::new();
//!     while !reader.is_end_of_record()? {
//!         bits.push(reader.read_bit()?);
//!     }
//!     shots.push(bits);
//! }
//! assert_eq!(shots, [[false, true, false], [true, true, true]]);
//! # Ok::<(), shotrec::RecordError>(())
//! ```

mod constructs;
mod error;
mod io;

pub use constructs::{BitTable, RecordShape, ResultType, SampleFormat, SIMD_WORD_BITS};
pub use error::{RecordError, Result};
pub use io::{
    record_reader, record_reader_from_optional_path, record_reader_from_path,
    record_reader_from_stdin, B8Reader, BoxedByteSource, DetsReader, HitsReader, R8Reader,
    RecordReader, RecordWriter, ZeroOneReader,
};
