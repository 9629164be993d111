use criterion::{criterion_group, criterion_main, Bencher, Criterion};
use std::hint::black_box;
use std::iter::FromIterator;

use verso::Vector;

mod utils;
use utils::*;

// Trait to abstract over vector-like implementations, so the persistent
// vector can be compared against the naive copy-the-whole-thing baseline.
trait BenchVector<T>: Clone + FromIterator<T>
where
    T: Clone,
{
    fn new() -> Self;
    fn push_back(&mut self, value: T);
    fn pop_back(&mut self) -> Option<T>;
    fn get(&self, index: usize) -> Option<&T>;
    // Persistent update: the receiver must stay usable afterwards.
    fn update_clone(&self, index: usize, value: T) -> Self;
    fn count(&self) -> usize;
}

impl<T: Clone> BenchVector<T> for Vector<T> {
    fn new() -> Self {
        Vector::new()
    }

    fn push_back(&mut self, value: T) {
        Vector::push_back(self, value);
    }

    fn pop_back(&mut self) -> Option<T> {
        Vector::pop_back(self)
    }

    fn get(&self, index: usize) -> Option<&T> {
        Vector::get(self, index)
    }

    fn update_clone(&self, index: usize, value: T) -> Self {
        self.update(index, value)
    }

    fn count(&self) -> usize {
        self.iter().count()
    }
}

// The baseline everyone reaches for first: version = copy the whole Vec.
impl<T: Clone> BenchVector<T> for Vec<T> {
    fn new() -> Self {
        Vec::new()
    }

    fn push_back(&mut self, value: T) {
        self.push(value);
    }

    fn pop_back(&mut self) -> Option<T> {
        self.pop()
    }

    fn get(&self, index: usize) -> Option<&T> {
        self.as_slice().get(index)
    }

    fn update_clone(&self, index: usize, value: T) -> Self {
        let mut out = self.clone();
        out[index] = value;
        out
    }

    fn count(&self) -> usize {
        self.iter().count()
    }
}

fn bench_push_back_mut<V: BenchVector<i64>>(b: &mut Bencher<'_>, size: usize) {
    let values = i64::distinct(size);
    b.iter(|| {
        let mut vec = V::new();
        for value in &values {
            vec.push_back(*value);
        }
        black_box(vec)
    })
}

fn bench_pop_back_mut<V: BenchVector<i64>>(b: &mut Bencher<'_>, size: usize) {
    let values = i64::distinct(size);
    let vec: V = values.iter().cloned().collect();
    b.iter(|| {
        let mut vec = vec.clone();
        while let Some(value) = vec.pop_back() {
            black_box(value);
        }
        vec
    })
}

fn bench_get<V: BenchVector<i64>>(b: &mut Bencher<'_>, size: usize) {
    let values = i64::distinct(size);
    let vec: V = values.iter().cloned().collect();
    let indices = shuffled(&(0..size).collect::<Vec<_>>());
    b.iter(|| {
        for index in &indices {
            black_box(vec.get(*index));
        }
    })
}

// Each update spawns a new version; the old one is kept live so structural
// sharing (or the lack of it) is actually exercised.
fn bench_update<V: BenchVector<i64>>(b: &mut Bencher<'_>, size: usize) {
    let values = i64::distinct(size);
    let vec: V = values.iter().cloned().collect();
    let indices = shuffled(&(0..size).collect::<Vec<_>>());
    b.iter(|| {
        let mut current = vec.clone();
        for index in &indices {
            current = current.update_clone(*index, *index as i64);
        }
        black_box((vec.get(0), current))
    })
}

fn bench_iter<V: BenchVector<i64>>(b: &mut Bencher<'_>, size: usize) {
    let values = i64::distinct(size);
    let vec: V = values.iter().cloned().collect();
    b.iter(|| black_box(vec.count()))
}

fn bench_group<V: BenchVector<i64>>(c: &mut Criterion, group_name: &str) {
    let mut group = c.benchmark_group(group_name);

    for size in &[100, 1000, 10000] {
        group.bench_function(format!("push_back_mut_{}", size), |b| {
            bench_push_back_mut::<V>(b, *size)
        });
        group.bench_function(format!("pop_back_mut_{}", size), |b| {
            bench_pop_back_mut::<V>(b, *size)
        });
        group.bench_function(format!("get_{}", size), |b| bench_get::<V>(b, *size));
        group.bench_function(format!("iter_{}", size), |b| bench_iter::<V>(b, *size));
    }

    for size in &[100, 1000] {
        group.bench_function(format!("update_{}", size), |b| bench_update::<V>(b, *size));
    }

    group.finish();
}

fn bench_vector(c: &mut Criterion) {
    bench_group::<Vector<i64>>(c, "vector");
}

fn bench_naive_vec(c: &mut Criterion) {
    bench_group::<Vec<i64>>(c, "naive_vec");
}

criterion_group!(benches, bench_vector, bench_naive_vec);
criterion_main!(benches);
