use std::io::Read;

use super::scan::Scanner;
use crate::{RecordError, RecordReader, Result};

/// Decoder for the `01` format: one ASCII digit per bit, one newline-
/// terminated line per shot.
///
/// The record width is fixed; a line that is shorter or longer than the
/// configured width is a framing error.
pub struct ZeroOneReader<R> {
    scanner: Scanner<R>,
    cursor: Option<u8>,
    position: usize,
    bits_per_record: usize,
}

impl<R: Read> ZeroOneReader<R> {
    pub fn new(inner: R, bits_per_record: usize) -> Self {
        Self {
            scanner: Scanner::new(inner),
            cursor: Some(b'\n'),
            position: bits_per_record,
            bits_per_record,
        }
    }
}

impl<R: Read> RecordReader for ZeroOneReader<R> {
    fn start_record(&mut self) -> Result<bool> {
        self.cursor = self.scanner.read_byte()?;
        self.position = 0;
        Ok(self.cursor.is_some())
    }

    fn next_record(&mut self) -> Result<bool> {
        while !matches!(self.cursor, None | Some(b'\n')) {
            if self.position > self.bits_per_record {
                return Err(RecordError::RecordTooLong {
                    expected: self.bits_per_record,
                });
            }
            self.cursor = self.scanner.read_byte()?;
            self.position += 1;
        }
        self.start_record()
    }

    fn read_bit(&mut self) -> Result<bool> {
        let byte = match self.cursor {
            None => return Err(RecordError::TruncatedRecord),
            Some(b'\n') => return Err(RecordError::ReadPastEnd),
            Some(byte) => byte,
        };
        if self.position >= self.bits_per_record {
            return Err(RecordError::ReadPastEnd);
        }
        let bit = match byte {
            b'0' => false,
            b'1' => true,
            _ => return Err(RecordError::NotABit { found: byte }),
        };
        self.cursor = self.scanner.read_byte()?;
        self.position += 1;
        Ok(bit)
    }

    fn is_end_of_record(&self) -> Result<bool> {
        let line_ended = matches!(self.cursor, None | Some(b'\n'));
        let width_reached = self.position >= self.bits_per_record;
        if line_ended && !width_reached {
            return Err(RecordError::RecordTooShort {
                got: self.position,
                expected: self.bits_per_record,
            });
        }
        if !line_ended && width_reached {
            return Err(RecordError::RecordTooLong {
                expected: self.bits_per_record,
            });
        }
        Ok(line_ended)
    }
}
