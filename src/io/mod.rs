mod b8;
mod dets;
mod hits;
mod r8;
mod read;
mod scan;
mod write;
mod zero_one;

pub use b8::B8Reader;
pub use dets::DetsReader;
pub use hits::HitsReader;
pub use r8::R8Reader;
pub use read::RecordReader;
pub use write::RecordWriter;
pub use zero_one::ZeroOneReader;

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use crate::{RecordError, RecordShape, Result, SampleFormat};

pub type BoxedByteSource = Box<dyn Read + Send>;

/// Instantiate the decoder matching `format`.
///
/// Formats other than `dets` only carry measurement bits, so their shape
/// must have zero detection events and observables. `ptb64` interleaves 64
/// shots per word and cannot be decoded one record at a time.
pub fn record_reader<'a, R: Read + 'a>(
    inner: R,
    format: SampleFormat,
    shape: RecordShape,
) -> Result<Box<dyn RecordReader + 'a>> {
    if format != SampleFormat::Dets && !shape.is_measurements_only() {
        return Err(RecordError::ShapeMismatch { format });
    }
    match format {
        SampleFormat::ZeroOne => Ok(Box::new(ZeroOneReader::new(inner, shape.measurements))),
        SampleFormat::B8 => Ok(Box::new(B8Reader::new(inner, shape.measurements))),
        SampleFormat::Hits => Ok(Box::new(HitsReader::new(inner, shape.measurements))),
        SampleFormat::R8 => Ok(Box::new(R8Reader::new(inner, shape.measurements))),
        SampleFormat::Dets => Ok(Box::new(DetsReader::new(inner, shape))),
        SampleFormat::Ptb64 => Err(RecordError::UnstreamableFormat { format }),
    }
}

pub fn record_reader_from_path<P: AsRef<Path>>(
    path: P,
    format: SampleFormat,
    shape: RecordShape,
) -> Result<Box<dyn RecordReader>> {
    let source: BoxedByteSource = Box::new(File::open(path).map(BufReader::new)?);
    record_reader(source, format, shape)
}

pub fn record_reader_from_stdin(
    format: SampleFormat,
    shape: RecordShape,
) -> Result<Box<dyn RecordReader>> {
    let source: BoxedByteSource = Box::new(std::io::stdin());
    record_reader(source, format, shape)
}

pub fn record_reader_from_optional_path<P: AsRef<Path>>(
    path: Option<P>,
    format: SampleFormat,
    shape: RecordShape,
) -> Result<Box<dyn RecordReader>> {
    match path {
        Some(path) => record_reader_from_path(path, format, shape),
        None => record_reader_from_stdin(format, shape),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::BitTable;
    use rand::rngs::SmallRng;
    use rand::{Rng, SeedableRng};
    use std::io::Cursor;

    const STREAMED_FORMATS: [SampleFormat; 4] = [
        SampleFormat::ZeroOne,
        SampleFormat::B8,
        SampleFormat::Hits,
        SampleFormat::R8,
    ];

    fn random_records(shape: RecordShape, count: usize, seed: u64) -> Vec<Vec<bool>> {
        let mut rng = SmallRng::seed_from_u64(seed);
        (0..count)
            .map(|_| (0..shape.num_bits()).map(|_| rng.random()).collect())
            .collect()
    }

    fn encode(format: SampleFormat, shape: RecordShape, records: &[Vec<bool>]) -> Vec<u8> {
        let mut bytes = Vec::new();
        let mut writer = RecordWriter::new(&mut bytes, format, shape).unwrap();
        for record in records {
            writer.write_record(record).unwrap();
        }
        writer.finish().unwrap();
        bytes
    }

    fn decode(format: SampleFormat, shape: RecordShape, bytes: Vec<u8>) -> Vec<Vec<bool>> {
        let mut reader = record_reader(Cursor::new(bytes), format, shape).unwrap();
        let mut records = Vec::new();
        while reader.start_record().unwrap() {
            let mut bits = Vec::new();
            while !reader.is_end_of_record().unwrap() {
                bits.push(reader.read_bit().unwrap());
            }
            records.push(bits);
        }
        records
    }

    #[test]
    fn factory_rejects_unstreamable_and_mismatched_shapes() {
        let err = record_reader(
            Cursor::new(Vec::new()),
            SampleFormat::Ptb64,
            RecordShape::measurements_only(8),
        )
        .map(|_| ())
        .unwrap_err();
        assert!(matches!(err, RecordError::UnstreamableFormat { .. }));

        for format in STREAMED_FORMATS {
            let err = record_reader(
                Cursor::new(Vec::new()),
                format,
                RecordShape::new(8, 1, 0),
            )
            .map(|_| ())
            .unwrap_err();
            assert!(matches!(err, RecordError::ShapeMismatch { .. }));
        }

        assert!(record_reader(
            Cursor::new(Vec::new()),
            SampleFormat::Dets,
            RecordShape::new(8, 1, 2),
        )
        .is_ok());
    }

    #[test]
    fn start_record_reports_stream_end_exactly_once() {
        for format in STREAMED_FORMATS {
            let shape = RecordShape::measurements_only(9);
            let records = random_records(shape, 3, 11);
            let bytes = encode(format, shape, &records);
            let mut reader = record_reader(Cursor::new(bytes), format, shape).unwrap();
            assert!(reader.start_record().unwrap(), "{format}");
            for _ in 1..records.len() {
                assert!(reader.next_record().unwrap(), "{format}");
            }
            assert!(!reader.next_record().unwrap(), "{format}");
        }
    }

    #[test]
    fn round_trips_through_every_streamed_format() {
        for format in STREAMED_FORMATS {
            for width in [1, 7, 8, 9, 64, 300] {
                let shape = RecordShape::measurements_only(width);
                let records = random_records(shape, 5, width as u64);
                let bytes = encode(format, shape, &records);
                let decoded = decode(format, shape, bytes);
                assert_eq!(decoded, records, "{format} width {width}");
            }
        }
    }

    #[test]
    fn round_trips_through_dets_shapes() {
        for shape in [
            RecordShape::new(2, 3, 1),
            RecordShape::new(0, 12, 2),
            RecordShape::new(5, 0, 0),
            RecordShape::default(),
        ] {
            let records = random_records(shape, 4, 7);
            let bytes = encode(SampleFormat::Dets, shape, &records);
            let decoded = decode(SampleFormat::Dets, shape, bytes);
            assert_eq!(decoded, records, "{shape:?}");
        }
    }

    #[test]
    fn tables_round_trip_through_the_bulk_reader() {
        let shots = 17;
        let width = 41;
        let shape = RecordShape::measurements_only(width);
        let mut rng = SmallRng::seed_from_u64(3);
        let mut table = BitTable::new(shots, width);
        for major in 0..shots {
            for minor in 0..width {
                table.set(major, minor, rng.random());
            }
        }

        for format in STREAMED_FORMATS {
            let mut bytes = Vec::new();
            let mut writer = RecordWriter::new(&mut bytes, format, shape).unwrap();
            writer.write_table(&table, shots).unwrap();
            writer.finish().unwrap();

            let mut reader = record_reader(Cursor::new(bytes), format, shape).unwrap();
            let mut decoded = BitTable::new(shots, width);
            let n = reader.read_records_into(&mut decoded, true, None).unwrap();
            assert_eq!(n, shots, "{format}");
            for major in 0..shots {
                for minor in 0..width {
                    assert_eq!(
                        decoded.get(major, minor),
                        table.get(major, minor),
                        "{format} at ({major}, {minor})"
                    );
                }
            }
        }
    }
}
