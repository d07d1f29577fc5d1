use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use omnisketch::{AttributeSource, OmniSketch, RandomSource};

/// Cheap, deterministic `RandomSource` for benchmarks, so timings aren't
/// perturbed by a syscall into the OS RNG on every sketch creation.
struct CountingRandomSource(u32);

impl RandomSource for CountingRandomSource {
    fn u32(&mut self) -> u32 {
        self.0 = self.0.wrapping_add(0x9E37_79B9);
        self.0
    }
}

fn build_sketch(num_attributes: usize, records: usize) -> OmniSketch {
    let mut rng = CountingRandomSource(1);
    let mut sketch: Option<OmniSketch> = None;
    for r in 0..records {
        let record: Vec<u64> = (0..num_attributes)
            .map(|a| (r as u64).wrapping_mul(31).wrapping_add(a as u64))
            .collect();
        sketch = Some(OmniSketch::add(sketch, 0.05, 0.05, record.as_slice(), &mut rng).unwrap());
    }
    sketch.unwrap()
}

fn bench_add(c: &mut Criterion) {
    let mut group = c.benchmark_group("add");
    for &num_attributes in &[1usize, 4, 8] {
        group.bench_with_input(
            BenchmarkId::from_parameter(num_attributes),
            &num_attributes,
            |b, &num_attributes| {
                let mut rng = CountingRandomSource(1);
                let record: Vec<u64> = (0..num_attributes as u64).collect();
                b.iter_batched(
                    || None::<OmniSketch>,
                    |acc| {
                        OmniSketch::add(acc, 0.05, 0.05, record.as_slice(), &mut rng).unwrap()
                    },
                    criterion::BatchSize::SmallInput,
                );
            },
        );
    }
    group.finish();
}

fn bench_estimate(c: &mut Criterion) {
    let mut group = c.benchmark_group("estimate");
    for &num_attributes in &[1usize, 4, 8] {
        let mut sketch = build_sketch(num_attributes, 5_000);
        let query: Vec<u64> = (0..num_attributes as u64).collect();
        group.bench_with_input(
            BenchmarkId::from_parameter(num_attributes),
            &num_attributes,
            |b, _| {
                b.iter(|| OmniSketch::estimate(Some(&mut sketch), query.as_slice()).unwrap());
            },
        );
    }
    group.finish();
}

fn bench_combine(c: &mut Criterion) {
    let mut group = c.benchmark_group("combine");
    for &records in &[500usize, 5_000] {
        let a = build_sketch(4, records);
        let b_sketch = build_sketch(4, records);
        group.bench_with_input(BenchmarkId::from_parameter(records), &records, |bencher, _| {
            bencher.iter_batched(
                || a.clone(),
                |acc| OmniSketch::combine(Some(acc), Some(&b_sketch)).unwrap(),
                criterion::BatchSize::LargeInput,
            );
        });
    }
    group.finish();
}

criterion_group!(benches, bench_add, bench_estimate, bench_combine);
criterion_main!(benches);
