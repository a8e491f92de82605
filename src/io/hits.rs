use std::io::Read;

use super::scan::Scanner;
use crate::{RecordError, RecordReader, Result};

/// Decoder for the `hits` format: one newline-terminated line per shot,
/// holding comma-separated indices of toggled bits.
///
/// Indices toggle rather than set, so a duplicated index cancels itself.
/// The whole record is materialised up front and replayed bit by bit.
pub struct HitsReader<R> {
    scanner: Scanner<R>,
    bits_per_record: usize,
    buffer: Vec<bool>,
    position_in_buffer: usize,
}

impl<R: Read> HitsReader<R> {
    pub fn new(inner: R, bits_per_record: usize) -> Self {
        Self {
            scanner: Scanner::new(inner),
            bits_per_record,
            buffer: vec![false; bits_per_record],
            position_in_buffer: bits_per_record,
        }
    }
}

impl<R: Read> RecordReader for HitsReader<R> {
    fn start_record(&mut self) -> Result<bool> {
        let mut cursor = self.scanner.read_byte()?;
        if cursor.is_none() {
            return Ok(false);
        }
        self.buffer.fill(false);
        self.position_in_buffer = 0;
        let mut is_first = true;
        while cursor != Some(b'\n') {
            let value = self
                .scanner
                .read_u64(&mut cursor, is_first)?
                .ok_or(RecordError::MissingHitValue)?;
            if !matches!(cursor, Some(b',') | Some(b'\n')) {
                return Err(RecordError::MissingHitSeparator { found: cursor });
            }
            if value >= self.bits_per_record as u64 {
                return Err(RecordError::HitOutOfRange {
                    index: value,
                    width: self.bits_per_record,
                });
            }
            self.buffer[value as usize] ^= true;
            is_first = false;
        }
        Ok(true)
    }

    fn next_record(&mut self) -> Result<bool> {
        self.start_record()
    }

    fn read_bit(&mut self) -> Result<bool> {
        if self.position_in_buffer >= self.bits_per_record {
            return Err(RecordError::ReadPastEnd);
        }
        let bit = self.buffer[self.position_in_buffer];
        self.position_in_buffer += 1;
        Ok(bit)
    }

    fn is_end_of_record(&self) -> Result<bool> {
        Ok(self.position_in_buffer >= self.bits_per_record)
    }
}
