use std::io::Write;

use crate::{BitTable, RecordError, RecordShape, Result, SampleFormat};

/// Streaming encoder producing the byte streams the readers consume.
///
/// One writer encodes successive records of a fixed shape in a fixed
/// format. Output is unbuffered beyond what the inner writer provides;
/// call [`finish`] to flush it.
///
/// [`finish`]: RecordWriter::finish
pub struct RecordWriter<W: Write> {
    inner: W,
    format: SampleFormat,
    shape: RecordShape,
}

impl<W: Write> RecordWriter<W> {
    /// Create a writer, applying the same shape rules as the reader
    /// factory.
    pub fn new(inner: W, format: SampleFormat, shape: RecordShape) -> Result<Self> {
        if format == SampleFormat::Ptb64 {
            return Err(RecordError::UnstreamableFormat { format });
        }
        if format != SampleFormat::Dets && !shape.is_measurements_only() {
            return Err(RecordError::ShapeMismatch { format });
        }
        Ok(Self {
            inner,
            format,
            shape,
        })
    }

    /// Encode one record. `bits` must hold exactly the shape's bit count.
    pub fn write_record(&mut self, bits: &[bool]) -> Result<()> {
        if bits.len() != self.shape.num_bits() {
            return Err(RecordError::WrongRecordWidth {
                got: bits.len(),
                expected: self.shape.num_bits(),
            });
        }
        match self.format {
            SampleFormat::ZeroOne => self.write_zero_one(bits),
            SampleFormat::B8 => self.write_b8(bits),
            SampleFormat::Hits => self.write_hits(bits),
            SampleFormat::R8 => self.write_r8(bits),
            SampleFormat::Dets => self.write_dets(bits),
            SampleFormat::Ptb64 => unreachable!("rejected at construction"),
        }
    }

    /// Encode the first `num_records` rows of `table` as successive
    /// records.
    pub fn write_table(&mut self, table: &BitTable, num_records: usize) -> Result<()> {
        let mut bits = vec![false; self.shape.num_bits()];
        for major in 0..num_records {
            for (minor, bit) in bits.iter_mut().enumerate() {
                *bit = table.get(major, minor);
            }
            self.write_record(&bits)?;
        }
        Ok(())
    }

    /// Flush the inner writer.
    pub fn finish(&mut self) -> Result<()> {
        self.inner.flush()?;
        Ok(())
    }

    fn write_zero_one(&mut self, bits: &[bool]) -> Result<()> {
        let mut line = Vec::with_capacity(bits.len() + 1);
        line.extend(bits.iter().map(|&bit| if bit { b'1' } else { b'0' }));
        line.push(b'\n');
        self.inner.write_all(&line)?;
        Ok(())
    }

    fn write_b8(&mut self, bits: &[bool]) -> Result<()> {
        let mut bytes = vec![0u8; (bits.len() + 7) / 8];
        for (k, &bit) in bits.iter().enumerate() {
            bytes[k / 8] |= u8::from(bit) << (k % 8);
        }
        self.inner.write_all(&bytes)?;
        Ok(())
    }

    fn write_hits(&mut self, bits: &[bool]) -> Result<()> {
        let mut first = true;
        for (index, &bit) in bits.iter().enumerate() {
            if !bit {
                continue;
            }
            if first {
                write!(self.inner, "{index}")?;
                first = false;
            } else {
                write!(self.inner, ",{index}")?;
            }
        }
        self.inner.write_all(b"\n")?;
        Ok(())
    }

    fn write_r8(&mut self, bits: &[bool]) -> Result<()> {
        let mut gap: usize = 0;
        for &bit in bits {
            if bit {
                self.write_gap(gap)?;
                gap = 0;
            } else {
                gap += 1;
            }
        }
        // Gap byte(s) for the synthetic one just past the record's end.
        self.write_gap(gap)?;
        Ok(())
    }

    fn write_gap(&mut self, mut gap: usize) -> Result<()> {
        while gap >= 0xFF {
            self.inner.write_all(&[0xFF])?;
            gap -= 0xFF;
        }
        self.inner.write_all(&[gap as u8])?;
        Ok(())
    }

    fn write_dets(&mut self, bits: &[bool]) -> Result<()> {
        self.inner.write_all(b"shot")?;
        for (position, &bit) in bits.iter().enumerate() {
            if !bit {
                continue;
            }
            let section = self.shape.section_at(position);
            let index = position - self.shape.section_offset(section);
            write!(self.inner, " {}{}", section.prefix(), index)?;
        }
        self.inner.write_all(b"\n")?;
        Ok(())
    }
}
