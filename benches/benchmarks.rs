use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use tsdelta::{decode, Decoder, Encoder};

const BASE_TS: i64 = 1_760_000_000_000_000_000;
const STEP: i64 = 10_000_000_000;

/// Evenly spaced, jittered by whole milliseconds, and a raw-forcing sequence
fn patterns(count: usize) -> [(&'static str, Vec<i64>); 3] {
    let regular = (0..count).map(|i| BASE_TS + i as i64 * STEP).collect();
    let jittered = (0..count)
        .map(|i| BASE_TS + i as i64 * STEP + ((i * 7919) % 201) as i64 * 1_000_000 - 100_000_000)
        .collect();
    let raw = (0..count)
        .map(|i| if i % 2 == 0 { i64::MIN + i as i64 } else { i64::MAX - i as i64 })
        .collect();
    [("regular", regular), ("jittered", jittered), ("raw", raw)]
}

fn bench_encode(c: &mut Criterion) {
    let mut group = c.benchmark_group("encode");

    for count in [100, 1000, 10000] {
        group.throughput(Throughput::Elements(count as u64));
        for (name, ts) in patterns(count) {
            group.bench_function(format!("{name}_{count}"), |b| {
                b.iter(|| {
                    let mut enc: Encoder = Encoder::with_capacity(ts.len());
                    for &t in &ts {
                        enc.write(black_box(t));
                    }
                    black_box(enc.finalize())
                })
            });
        }
    }
    group.finish();
}

fn bench_decode(c: &mut Criterion) {
    let mut group = c.benchmark_group("decode");
    group.throughput(Throughput::Elements(10000));

    for (name, ts) in patterns(10000) {
        // Pre-encode data
        let bytes = tsdelta::encode(&ts).unwrap();
        group.bench_function(format!("{name}_10000"), |b| {
            b.iter(|| black_box(decode(black_box(&bytes))))
        });
        group.bench_function(format!("{name}_10000_pull"), |b| {
            b.iter(|| {
                let mut dec = Decoder::new(black_box(&bytes)).unwrap();
                let mut sum = 0i64;
                while dec.next() {
                    sum = sum.wrapping_add(dec.read().unwrap_or(0));
                }
                black_box(sum)
            })
        });
    }
    group.finish();
}

fn bench_roundtrip(c: &mut Criterion) {
    let mut group = c.benchmark_group("roundtrip");
    group.throughput(Throughput::Elements(1000));

    for (name, ts) in patterns(1000) {
        group.bench_function(format!("{name}_1000"), |b| {
            b.iter(|| {
                let enc: Encoder = ts.iter().copied().collect();
                let bytes = enc.finalize().unwrap();
                black_box(decode(&bytes))
            })
        });
    }
    group.finish();
}

criterion_group!(benches, bench_encode, bench_decode, bench_roundtrip);
criterion_main!(benches);
