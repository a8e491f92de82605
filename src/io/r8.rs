use std::io::Read;

use super::scan::Scanner;
use crate::{RecordError, RecordReader, Result};

/// Decoder for the `r8` format: each byte is the length of a zero run
/// before the next one bit, with `0xff` continuing the run.
///
/// The writer appends a synthetic one just past the record's final bit, so
/// every record ends in one of two admissible states: the last data bit is
/// a one and is followed by the synthetic one's `0x00` gap byte, or the
/// synthetic one itself absorbs the trailing zero run. A run that jumps
/// further past the end is a framing error.
pub struct R8Reader<R> {
    scanner: Scanner<R>,
    bits_per_record: usize,
    position: usize,
    buffered_0s: usize,
    buffered_1s: usize,
    have_seen_terminal_1: bool,
}

impl<R: Read> R8Reader<R> {
    pub fn new(inner: R, bits_per_record: usize) -> Self {
        Self {
            scanner: Scanner::new(inner),
            bits_per_record,
            position: 0,
            buffered_0s: 0,
            buffered_1s: 0,
            have_seen_terminal_1: false,
        }
    }

    fn at_end(&self) -> bool {
        self.position == self.bits_per_record && self.have_seen_terminal_1
    }

    /// Decode the next zero run and its trailing one, classifying how the
    /// record ends. Returns false on a clean end of stream at a record
    /// boundary.
    fn buffer_run(&mut self) -> Result<bool> {
        debug_assert_eq!(self.buffered_0s, 0);
        debug_assert_eq!(self.buffered_1s, 0);
        if self.at_end() {
            return Err(RecordError::ReadPastEnd);
        }

        loop {
            let byte = match self.scanner.read_byte()? {
                Some(byte) => byte,
                None if self.buffered_0s == 0 && self.position == 0 => return Ok(false),
                None if self.buffered_0s > 0 => return Err(RecordError::DanglingContinuation),
                None => return Err(RecordError::TruncatedRecord),
            };
            self.buffered_0s += byte as usize;
            if byte != 0xFF {
                break;
            }
        }
        self.buffered_1s = 1;

        let total = self.position + self.buffered_0s + self.buffered_1s;
        if total == self.bits_per_record {
            // The one lands exactly on the record's last bit, so the
            // synthetic one past the end must follow as a 0x00 gap byte.
            match self.scanner.read_byte()? {
                Some(0) => self.have_seen_terminal_1 = true,
                found => return Err(RecordError::MissingTerminator { found }),
            }
        } else if total == self.bits_per_record + 1 {
            // The buffered one is the synthetic one past the end; drop it.
            self.have_seen_terminal_1 = true;
            self.buffered_1s = 0;
        } else if total > self.bits_per_record + 1 {
            return Err(RecordError::JumpPastEnd);
        }
        Ok(true)
    }
}

impl<R: Read> RecordReader for R8Reader<R> {
    fn start_record(&mut self) -> Result<bool> {
        self.position = 0;
        self.have_seen_terminal_1 = false;
        self.buffer_run()
    }

    fn next_record(&mut self) -> Result<bool> {
        while !self.at_end() {
            self.read_bit()?;
        }
        self.start_record()
    }

    fn read_bit(&mut self) -> Result<bool> {
        if self.buffered_0s == 0 && self.buffered_1s == 0 {
            self.buffer_run()?;
        }
        if self.buffered_0s > 0 {
            self.buffered_0s -= 1;
            self.position += 1;
            Ok(false)
        } else if self.buffered_1s > 0 {
            self.buffered_1s -= 1;
            self.position += 1;
            Ok(true)
        } else {
            Err(RecordError::ReadPastEnd)
        }
    }

    fn is_end_of_record(&self) -> Result<bool> {
        Ok(self.at_end())
    }

    fn read_bits_into_bytes(&mut self, out: &mut [u8]) -> Result<usize> {
        let mut written = 0;
        for byte in out.iter_mut() {
            *byte = 0;
            if self.buffered_0s >= 8 {
                self.position += 8;
                self.buffered_0s -= 8;
                written += 8;
                continue;
            }
            for k in 0..8 {
                if self.buffered_0s == 0 && self.buffered_1s == 0 && !self.have_seen_terminal_1 {
                    self.buffer_run()?;
                }
                if self.at_end() {
                    return Ok(written);
                }
                *byte |= u8::from(self.read_bit()?) << k;
                written += 1;
            }
        }
        Ok(written)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn reader(bytes: &[u8], bits_per_record: usize) -> R8Reader<Cursor<Vec<u8>>> {
        R8Reader::new(Cursor::new(bytes.to_vec()), bits_per_record)
    }

    fn drain(reader: &mut R8Reader<Cursor<Vec<u8>>>) -> Vec<bool> {
        let mut bits = Vec::new();
        while !reader.is_end_of_record().unwrap() {
            bits.push(reader.read_bit().unwrap());
        }
        bits
    }

    #[test]
    fn one_on_the_last_bit_consumes_its_terminator() {
        let mut reader = reader(&[0x02, 0x01, 0x00], 5);
        assert!(reader.start_record().unwrap());
        assert_eq!(drain(&mut reader), [false, false, true, false, true]);
        assert!(!reader.start_record().unwrap());
    }

    #[test]
    fn synthetic_one_past_the_end_is_dropped() {
        let mut reader = reader(&[0x05], 5);
        assert!(reader.start_record().unwrap());
        assert_eq!(drain(&mut reader), [false; 5]);
        assert!(!reader.start_record().unwrap());
    }

    #[test]
    fn one_on_last_bit_after_leading_zeros() {
        let mut reader = reader(&[0x05, 0x00], 6);
        assert!(reader.start_record().unwrap());
        assert_eq!(drain(&mut reader), [false, false, false, false, false, true]);
        assert!(!reader.start_record().unwrap());
    }

    #[test]
    fn runs_spanning_buffer_refills() {
        let mut reader = reader(&[0x02, 0x01, 0x01, 0x00], 7);
        assert!(reader.start_record().unwrap());
        assert_eq!(
            drain(&mut reader),
            [false, false, true, false, true, false, true]
        );
        assert!(!reader.start_record().unwrap());
    }

    #[test]
    fn continuation_byte_extends_the_run() {
        // 255 + 2 zeros, a one, then the record's remaining zero and the
        // synthetic one past the end.
        let mut reader = reader(&[0xFF, 0x02, 0x01], 259);
        assert!(reader.start_record().unwrap());
        let bits = drain(&mut reader);
        assert_eq!(bits.len(), 259);
        assert!(bits[..257].iter().all(|&b| !b));
        assert!(bits[257]);
        assert!(!bits[258]);
        assert!(!reader.start_record().unwrap());
    }

    #[test]
    fn stream_ending_on_a_continuation_is_an_error() {
        let mut reader = reader(&[0xFF], 300);
        let err = reader.start_record().unwrap_err();
        assert!(matches!(err, RecordError::DanglingContinuation));
    }

    #[test]
    fn jump_past_the_end_is_an_error() {
        let mut reader = reader(&[0x07], 5);
        let err = reader.start_record().unwrap_err();
        assert!(matches!(err, RecordError::JumpPastEnd));
    }

    #[test]
    fn missing_terminator_is_an_error() {
        // The one lands on the last bit, then the stream ends instead of
        // providing the 0x00 terminator.
        let mut reader1 = reader(&[0x04], 5);
        let err = reader1.start_record().unwrap_err();
        assert!(matches!(err, RecordError::MissingTerminator { found: None }));

        // A non-zero byte in the terminator slot is also an error.
        let mut reader2 = reader(&[0x04, 0x02], 5);
        let err = reader2.start_record().unwrap_err();
        assert!(matches!(
            err,
            RecordError::MissingTerminator { found: Some(0x02) }
        ));
    }

    #[test]
    fn empty_records_are_a_bare_terminator() {
        let mut reader = reader(&[0x00, 0x00], 0);
        assert!(reader.start_record().unwrap());
        assert!(reader.is_end_of_record().unwrap());
        assert!(reader.start_record().unwrap());
        assert!(reader.is_end_of_record().unwrap());
        assert!(!reader.start_record().unwrap());
    }

    #[test]
    fn bulk_path_skips_buffered_zero_runs() {
        let mut reader = reader(&[0x10, 0x00], 17);
        assert!(reader.start_record().unwrap());
        let mut row = [0u8; 3];
        assert_eq!(reader.read_bits_into_bytes(&mut row).unwrap(), 17);
        assert_eq!(row[0], 0x00);
        assert_eq!(row[1], 0x00);
        assert_eq!(row[2], 0x01);
        assert!(reader.is_end_of_record().unwrap());
    }
}
