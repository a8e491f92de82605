use crate::{BitTable, RecordError, Result, ResultType};

/// Streaming decoder for one record encoding.
///
/// A reader owns its byte source for its lifetime and decodes one record at
/// a time. Records are transient: each call to [`start_record`] re-frames
/// the decoder on the next record in the stream. After an error the stream
/// is left in an unspecified position and the reader should be discarded.
///
/// [`start_record`]: RecordReader::start_record
pub trait RecordReader {
    /// Begin a new record.
    ///
    /// Returns false iff the stream ended cleanly before the first byte of a
    /// new record. A stream that ends in the middle of a record is an error.
    fn start_record(&mut self) -> Result<bool>;

    /// Abandon any remaining bits of the current record, then begin the
    /// next one.
    fn next_record(&mut self) -> Result<bool>;

    /// Emit the next bit of the current record.
    fn read_bit(&mut self) -> Result<bool>;

    /// True once every bit of the current record has been emitted.
    fn is_end_of_record(&self) -> Result<bool>;

    /// Section of the record that the next bit belongs to.
    fn result_type(&self) -> ResultType {
        ResultType::Measurement
    }

    /// Fill `out` with upcoming bits, little-endian within each byte.
    ///
    /// Stops when `out` is full, when the record ends, or just before the
    /// result type of the next bit would differ from the first bit's.
    /// Returns the number of bits written.
    fn read_bits_into_bytes(&mut self, out: &mut [u8]) -> Result<usize> {
        drain_bitwise(self, out)
    }

    /// Drain successive records into rows of `table`.
    ///
    /// With `major_is_shot` each record lands in one padded row; otherwise a
    /// transposed scratch table is filled row-wise and transposed into
    /// `table`, so that shots run along the minor axis. Stops at
    /// `max_shots`, at the table's padded row capacity, or at the end of the
    /// stream, whichever comes first, and returns the number of records
    /// read. A record with more bits than a row holds is an error.
    fn read_records_into(
        &mut self,
        table: &mut BitTable,
        major_is_shot: bool,
        max_shots: Option<usize>,
    ) -> Result<usize> {
        if !major_is_shot {
            let mut scratch = BitTable::new(table.num_minor_padded(), table.num_major_padded());
            let shots = self.read_records_into(&mut scratch, true, max_shots)?;
            scratch.transpose_into(table);
            return Ok(shots);
        }

        let max_shots = max_shots
            .unwrap_or(usize::MAX)
            .min(table.num_major_padded());
        let mut shot = 0;
        while shot < max_shots && self.start_record()? {
            self.read_bits_into_bytes(table.row_bytes_mut(shot))?;
            if !self.is_end_of_record()? {
                return Err(RecordError::OversizedRecord {
                    width: table.num_minor(),
                });
            }
            shot += 1;
        }
        Ok(shot)
    }
}

/// Shared bit-by-bit body of [`RecordReader::read_bits_into_bytes`].
///
/// Kept as a free function so the formats that override the bulk path can
/// still fall back to it.
pub(crate) fn drain_bitwise<R: RecordReader + ?Sized>(
    reader: &mut R,
    out: &mut [u8],
) -> Result<usize> {
    if reader.is_end_of_record()? {
        return Ok(0);
    }
    let section = reader.result_type();
    let mut written = 0;
    for byte in out.iter_mut() {
        *byte = 0;
        for k in 0..8 {
            *byte |= u8::from(reader.read_bit()?) << k;
            written += 1;
            if reader.is_end_of_record()? || reader.result_type() != section {
                return Ok(written);
            }
        }
    }
    Ok(written)
}
