use criterion::{black_box, criterion_group, criterion_main, Criterion};
use std::io::Cursor;

use shotrec::{record_reader, BitTable, RecordShape, RecordWriter, SampleFormat};

const SHOTS: usize = 256;
const BITS_PER_SHOT: usize = 1024;

// Sparse-ish deterministic pattern; roughly one bit in seventeen set.
fn build_table() -> BitTable {
    let mut table = BitTable::new(SHOTS, BITS_PER_SHOT);
    for major in 0..SHOTS {
        for minor in 0..BITS_PER_SHOT {
            table.set(major, minor, (major * 31 + minor) % 17 == 0);
        }
    }
    table
}

fn encode(table: &BitTable, format: SampleFormat) -> Vec<u8> {
    let shape = RecordShape::measurements_only(BITS_PER_SHOT);
    let mut bytes = Vec::new();
    let mut writer = RecordWriter::new(&mut bytes, format, shape).unwrap();
    writer.write_table(table, SHOTS).unwrap();
    writer.finish().unwrap();
    bytes
}

fn bench_decode(c: &mut Criterion) {
    let table = build_table();
    let shape = RecordShape::measurements_only(BITS_PER_SHOT);

    let mut group = c.benchmark_group("decode");
    for format in [
        SampleFormat::ZeroOne,
        SampleFormat::B8,
        SampleFormat::Hits,
        SampleFormat::R8,
    ] {
        let encoded = encode(&table, format);
        group.bench_function(format.name(), |b| {
            b.iter(|| {
                let mut reader =
                    record_reader(Cursor::new(encoded.as_slice()), format, shape).unwrap();
                let mut out = BitTable::new(SHOTS, BITS_PER_SHOT);
                let shots = reader.read_records_into(&mut out, true, None).unwrap();
                assert_eq!(shots, SHOTS);
                black_box(out)
            });
        });
    }
    group.finish();
}

criterion_group!(benches, bench_decode);
criterion_main!(benches);
