use std::io::Read;

use super::read::drain_bitwise;
use super::scan::Scanner;
use crate::{RecordError, RecordReader, Result};

/// Decoder for the `b8` format: raw packed bytes, bit `k` of each byte
/// holding the record's next little-endian bit.
///
/// A record of `m` bits occupies exactly `ceil(m / 8)` bytes. Unused high
/// bits in a record's final byte are ignored.
pub struct B8Reader<R> {
    scanner: Scanner<R>,
    bits_per_record: usize,
    payload: Option<u8>,
    bits_available: u8,
    position: usize,
}

impl<R: Read> B8Reader<R> {
    pub fn new(inner: R, bits_per_record: usize) -> Self {
        Self {
            scanner: Scanner::new(inner),
            bits_per_record,
            payload: None,
            bits_available: 0,
            position: bits_per_record,
        }
    }

    fn refill_payload(&mut self) -> Result<()> {
        if self.bits_available > 0 {
            return Ok(());
        }
        self.payload = self.scanner.read_byte()?;
        if self.payload.is_some() {
            self.bits_available = 8;
        }
        Ok(())
    }
}

impl<R: Read> RecordReader for B8Reader<R> {
    fn start_record(&mut self) -> Result<bool> {
        self.position = 0;
        self.bits_available = 0;
        self.payload = None;
        self.refill_payload()?;
        Ok(self.payload.is_some())
    }

    fn next_record(&mut self) -> Result<bool> {
        while !self.is_end_of_record()? {
            self.read_bit()?;
        }
        self.start_record()
    }

    fn read_bit(&mut self) -> Result<bool> {
        if self.position >= self.bits_per_record {
            return Err(RecordError::ReadPastEnd);
        }
        self.refill_payload()?;
        let Some(payload) = self.payload else {
            return Err(RecordError::TruncatedRecord);
        };
        let bit = payload & 1 == 1;
        self.payload = Some(payload >> 1);
        self.bits_available -= 1;
        self.position += 1;
        Ok(bit)
    }

    fn is_end_of_record(&self) -> Result<bool> {
        Ok(self.position >= self.bits_per_record)
    }

    fn read_bits_into_bytes(&mut self, out: &mut [u8]) -> Result<usize> {
        if self.position >= self.bits_per_record || out.is_empty() {
            return Ok(0);
        }
        // A partially consumed byte leaves the stream and the output
        // disagreeing on byte alignment; only the bit path can bridge that.
        if self.bits_available > 0 && self.bits_available < 8 {
            return drain_bitwise(self, out);
        }

        let mut written = 0;
        if self.bits_available == 8 {
            let payload = self.payload.take().ok_or(RecordError::TruncatedRecord)?;
            self.bits_available = 0;
            out[0] = payload;
            let bits = (self.bits_per_record - self.position).min(8);
            self.position += bits;
            written += bits;
            if bits < 8 || out.len() == 1 {
                return Ok(written);
            }
        }

        // Byte-aligned on both sides: block-read the rest of the record.
        let out = &mut out[written / 8..];
        let want_bits = (8 * out.len()).min(self.bits_per_record - self.position);
        let want_bytes = (want_bits + 7) / 8;
        let got_bytes = self.scanner.read_block(&mut out[..want_bytes])?;
        let got_bits = want_bits.min(8 * got_bytes);
        self.position += got_bits;
        Ok(written + got_bits)
    }
}
