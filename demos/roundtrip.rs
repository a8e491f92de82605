use std::io::Cursor;
use std::time::Instant;

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use shotrec::{record_reader, BitTable, RecordShape, RecordWriter, SampleFormat};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let shots = 10_000;
    let bits_per_shot = 512;
    let shape = RecordShape::measurements_only(bits_per_shot);

    let mut rng = SmallRng::seed_from_u64(42);
    let mut table = BitTable::new(shots, bits_per_shot);
    for major in 0..shots {
        for minor in 0..bits_per_shot {
            table.set(major, minor, rng.random_bool(0.01));
        }
    }

    println!("Shot record roundtrip");
    println!("=====================");
    println!("Shots: {shots}, bits per shot: {bits_per_shot}\n");

    for format in [
        SampleFormat::ZeroOne,
        SampleFormat::B8,
        SampleFormat::Hits,
        SampleFormat::R8,
    ] {
        let write_start = Instant::now();
        let mut encoded = Vec::new();
        let mut writer = RecordWriter::new(&mut encoded, format, shape)?;
        writer.write_table(&table, shots)?;
        writer.finish()?;
        let write_elapsed = write_start.elapsed();

        let read_start = Instant::now();
        let mut reader = record_reader(Cursor::new(encoded.as_slice()), format, shape)?;
        let mut decoded = BitTable::new(shots, bits_per_shot);
        let n = reader.read_records_into(&mut decoded, true, None)?;
        let read_elapsed = read_start.elapsed();

        assert_eq!(n, shots);
        for major in 0..shots {
            assert_eq!(decoded.row_bytes(major), table.row_bytes(major));
        }

        println!(
            "{:>5}: {:>9} bytes, write {:>8.2?}, read {:>8.2?}",
            format.name(),
            encoded.len(),
            write_elapsed,
            read_elapsed,
        );
    }

    println!("\nAll formats round-tripped bit for bit.");
    Ok(())
}
