//! Pair serializer benchmarks
//!
//! Measures each output format over small and large pair sets.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use reqlog::{serialize_pairs, OutputFormat, SerializationOptions};

fn pairs(count: usize) -> Vec<(String, String)> {
    (0..count)
        .map(|i| (format!("key{i}"), format!("value \"{i}\"")))
        .collect()
}

fn bench_formats(c: &mut Criterion) {
    let mut group = c.benchmark_group("serialize_pairs");

    for count in [2usize, 32] {
        let input = pairs(count);
        for format in [
            OutputFormat::Flat,
            OutputFormat::JsonArray,
            OutputFormat::JsonDictionary,
        ] {
            let options = SerializationOptions::new(format);
            group.bench_with_input(
                BenchmarkId::new(format.as_str(), count),
                &input,
                |b, input| {
                    b.iter(|| {
                        serialize_pairs(
                            black_box(input.iter().map(|(k, v)| (k.as_str(), v.as_str()))),
                            &options,
                        )
                    })
                },
            );
        }
    }

    group.finish();
}

fn bench_values_only(c: &mut Criterion) {
    let input = pairs(8);
    let options = SerializationOptions::new(OutputFormat::JsonArray).values_only(true);

    c.bench_function("serialize_pairs/values_only", |b| {
        b.iter(|| {
            serialize_pairs(
                black_box(input.iter().map(|(k, v)| (k.as_str(), v.as_str()))),
                &options,
            )
        })
    });
}

criterion_group!(benches, bench_formats, bench_values_only);
criterion_main!(benches);
