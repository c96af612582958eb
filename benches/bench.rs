use criterion::{criterion_group, criterion_main, Bencher, Criterion};
use interval_tree::{Interval, IntervalTree};
use std::hint::black_box;

struct Rng {
    state: u32,
}
impl Rng {
    fn new() -> Self {
        Self { state: 0x87654321 }
    }

    fn gen_u32(&mut self) -> u32 {
        self.state ^= self.state << 13;
        self.state ^= self.state >> 17;
        self.state ^= self.state << 5;
        self.state
    }

    fn gen_range_i32(&mut self, low: i32, high: i32) -> i32 {
        let d = (high - low) as u32;
        low + (self.gen_u32() % d) as i32
    }
}

struct IntervalGenerator {
    rng: Rng,
    limit: i32,
}
impl IntervalGenerator {
    fn new() -> Self {
        const LIMIT: i32 = 100000;
        Self {
            rng: Rng::new(),
            limit: LIMIT,
        }
    }

    fn next(&mut self) -> Interval<i32> {
        let low = self.rng.gen_range_i32(0, self.limit - 1);
        let high = self.rng.gen_range_i32(low, self.limit);
        Interval::new(low, high)
    }
}

// insert helper fn
fn tree_insert(count: usize, bench: &mut Bencher) {
    let mut gen = IntervalGenerator::new();
    let intervals: Vec<_> = std::iter::repeat_with(|| gen.next()).take(count).collect();
    bench.iter(|| {
        let mut tree = IntervalTree::new();
        for i in intervals.clone() {
            black_box(tree.insert(i));
        }
    });
}

// insert and erase helper fn
fn tree_insert_erase(count: usize, bench: &mut Bencher) {
    let mut gen = IntervalGenerator::new();
    let intervals: Vec<_> = std::iter::repeat_with(|| gen.next()).take(count).collect();
    bench.iter(|| {
        let mut tree = IntervalTree::new();
        let handles: Vec<_> = intervals.iter().map(|i| tree.insert(i.clone())).collect();
        for handle in handles {
            black_box(tree.erase(handle));
        }
    });
}

// overlap enumeration helper fn
fn tree_find(count: usize, bench: &mut Bencher) {
    let mut gen = IntervalGenerator::new();
    let mut tree = IntervalTree::new();
    for _ in 0..count {
        let _handle = tree.insert(gen.next());
    }
    let queries: Vec<_> = std::iter::repeat_with(|| gen.next()).take(100).collect();
    bench.iter(|| {
        for query in &queries {
            black_box(tree.find(query.low, query.high).count());
        }
    });
}

fn bench_tree_insert(c: &mut Criterion) {
    c.bench_function("bench_tree_insert_100", |b| tree_insert(100, b));
    c.bench_function("bench_tree_insert_1000", |b| tree_insert(1000, b));
    c.bench_function("bench_tree_insert_10,000", |b| tree_insert(10_000, b));
    c.bench_function("bench_tree_insert_100,000", |b| tree_insert(100_000, b));
}

fn bench_tree_insert_erase(c: &mut Criterion) {
    c.bench_function("bench_tree_insert_erase_100", |b| tree_insert_erase(100, b));
    c.bench_function("bench_tree_insert_erase_1000", |b| {
        tree_insert_erase(1000, b)
    });
    c.bench_function("bench_tree_insert_erase_10,000", |b| {
        tree_insert_erase(10_000, b)
    });
    c.bench_function("bench_tree_insert_erase_100,000", |b| {
        tree_insert_erase(100_000, b)
    });
}

fn bench_tree_find(c: &mut Criterion) {
    c.bench_function("bench_tree_find_1000", |b| tree_find(1000, b));
    c.bench_function("bench_tree_find_10,000", |b| tree_find(10_000, b));
}

fn criterion_config() -> Criterion {
    Criterion::default().configure_from_args().without_plots()
}

criterion_group! {
    name = benches;
    config = criterion_config();
    targets = bench_tree_insert, bench_tree_insert_erase, bench_tree_find
}

criterion_main!(benches);
