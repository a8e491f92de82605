use std::io::Read;

use super::scan::{KeywordMatch, Scanner};
use crate::{RecordError, RecordReader, RecordShape, Result, ResultType};

/// Decoder for the `dets` format: one line per shot of the form
/// `shot M0 D2 L0`, where each space-separated token toggles one bit of
/// the measurement, detection-event, or observable section.
///
/// Like `hits`, the record is materialised up front and replayed.
pub struct DetsReader<R> {
    scanner: Scanner<R>,
    shape: RecordShape,
    buffer: Vec<bool>,
    position_in_buffer: usize,
}

impl<R: Read> DetsReader<R> {
    pub fn new(inner: R, shape: RecordShape) -> Self {
        let num_bits = shape.num_bits();
        Self {
            scanner: Scanner::new(inner),
            shape,
            buffer: vec![false; num_bits],
            position_in_buffer: num_bits,
        }
    }
}

impl<R: Read> RecordReader for DetsReader<R> {
    fn start_record(&mut self) -> Result<bool> {
        let mut cursor = match self.scanner.expect_keyword("shot")? {
            KeywordMatch::StreamEnd => return Ok(false),
            KeywordMatch::Found(byte) => byte,
        };
        self.buffer.fill(false);
        self.position_in_buffer = 0;
        loop {
            let had_spacing = cursor == Some(b' ');
            while cursor == Some(b' ') {
                cursor = self.scanner.read_byte()?;
            }
            let prefix = match cursor {
                None | Some(b'\n') => break,
                Some(byte) => byte,
            };
            if !had_spacing {
                return Err(RecordError::MissingSpacing);
            }
            let (offset, width) = self
                .shape
                .section_span(prefix)
                .ok_or(RecordError::UnknownPrefix { found: prefix })?;
            let prefix = prefix as char;
            let index = self
                .scanner
                .read_u64(&mut cursor, false)?
                .ok_or(RecordError::MissingPrefixValue { prefix })?;
            if index >= width as u64 {
                return Err(RecordError::SectionOutOfRange {
                    prefix,
                    index,
                    width,
                });
            }
            self.buffer[offset + index as usize] ^= true;
        }
        Ok(true)
    }

    fn next_record(&mut self) -> Result<bool> {
        self.start_record()
    }

    fn read_bit(&mut self) -> Result<bool> {
        if self.position_in_buffer >= self.buffer.len() {
            return Err(RecordError::ReadPastEnd);
        }
        let bit = self.buffer[self.position_in_buffer];
        self.position_in_buffer += 1;
        Ok(bit)
    }

    fn is_end_of_record(&self) -> Result<bool> {
        Ok(self.position_in_buffer >= self.buffer.len())
    }

    fn result_type(&self) -> ResultType {
        self.shape.section_at(self.position_in_buffer)
    }
}
