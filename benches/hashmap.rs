use criterion::{criterion_group, criterion_main, Bencher, Criterion};
use std::borrow::Borrow;
use std::collections::HashMap as StdHashMap;
use std::hash::Hash;
use std::hint::black_box;
use std::iter::FromIterator;

use verso::{HashMap, MapKey};

mod utils;
use utils::*;

// Trait to abstract over map implementations, so the HAMT can be compared
// against the naive copy-the-whole-map baseline.
trait BenchMap<K, V>: Clone + FromIterator<(K, V)>
where
    K: Clone + Hash + Eq,
    V: Clone,
{
    fn new() -> Self;
    fn insert(&mut self, k: K, v: V) -> Option<V>;
    // Persistent insert/remove: the receiver must stay usable afterwards.
    fn insert_clone(&self, k: K, v: V) -> Self;
    fn remove(&mut self, k: &K) -> Option<V>;
    fn remove_clone(&self, k: &K) -> Self;
    fn get<Q>(&self, k: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized;
    fn count(&self) -> usize;
}

impl<K, V> BenchMap<K, V> for HashMap<K, V>
where
    K: MapKey + Clone,
    V: Clone,
{
    fn new() -> Self {
        HashMap::new()
    }

    fn insert(&mut self, k: K, v: V) -> Option<V> {
        HashMap::insert(self, k, v)
    }

    fn insert_clone(&self, k: K, v: V) -> Self {
        self.update(k, v)
    }

    fn remove(&mut self, k: &K) -> Option<V> {
        HashMap::remove(self, k)
    }

    fn remove_clone(&self, k: &K) -> Self {
        self.without(k)
    }

    fn get<Q>(&self, k: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        HashMap::get(self, k)
    }

    fn count(&self) -> usize {
        self.iter().count()
    }
}

impl<K, V> BenchMap<K, V> for StdHashMap<K, V>
where
    K: Clone + Hash + Eq,
    V: Clone,
{
    fn new() -> Self {
        StdHashMap::new()
    }

    fn insert(&mut self, k: K, v: V) -> Option<V> {
        StdHashMap::insert(self, k, v)
    }

    fn insert_clone(&self, k: K, v: V) -> Self {
        let mut out = self.clone();
        out.insert(k, v);
        out
    }

    fn remove(&mut self, k: &K) -> Option<V> {
        StdHashMap::remove(self, k)
    }

    fn remove_clone(&self, k: &K) -> Self {
        let mut out = self.clone();
        out.remove(k);
        out
    }

    fn get<Q>(&self, k: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        StdHashMap::get(self, k)
    }

    fn count(&self) -> usize {
        self.iter().count()
    }
}

fn bench_lookup<M, K>(b: &mut Bencher<'_>, size: usize)
where
    M: BenchMap<K, i64>,
    K: KeySet,
{
    let keys = K::distinct(size);
    let map: M = keys.iter().map(|k| (k.clone(), 0)).collect();
    let order = shuffled(&keys);
    b.iter(|| {
        for key in &order {
            black_box(map.get(key));
        }
    })
}

fn bench_lookup_ne<M, K>(b: &mut Bencher<'_>, size: usize)
where
    M: BenchMap<K, i64>,
    K: KeySet,
{
    let keys = K::distinct(size * 2);
    let map: M = keys[..size].iter().map(|k| (k.clone(), 0)).collect();
    let order = shuffled(&keys[size..]);
    b.iter(|| {
        for key in &order {
            black_box(map.get(key));
        }
    })
}

fn bench_insert_mut<M, K>(b: &mut Bencher<'_>, size: usize)
where
    M: BenchMap<K, i64>,
    K: KeySet,
{
    let keys = K::distinct(size);
    b.iter(|| {
        let mut map = M::new();
        for key in &keys {
            map.insert(key.clone(), 0);
        }
        black_box(map)
    })
}

// Each insert spawns a new version; keeping the predecessors alive is the
// whole point of the comparison.
fn bench_insert<M, K>(b: &mut Bencher<'_>, size: usize)
where
    M: BenchMap<K, i64>,
    K: KeySet,
{
    let keys = K::distinct(size);
    b.iter(|| {
        let mut versions = Vec::with_capacity(size + 1);
        versions.push(M::new());
        for key in &keys {
            let next = versions.last().unwrap().insert_clone(key.clone(), 0);
            versions.push(next);
        }
        black_box(versions)
    })
}

fn bench_remove_mut<M, K>(b: &mut Bencher<'_>, size: usize)
where
    M: BenchMap<K, i64>,
    K: KeySet,
{
    let keys = K::distinct(size);
    let map: M = keys.iter().map(|k| (k.clone(), 0)).collect();
    let order = shuffled(&keys);
    b.iter(|| {
        let mut map = map.clone();
        for key in &order {
            black_box(map.remove(key));
        }
        map
    })
}

fn bench_remove<M, K>(b: &mut Bencher<'_>, size: usize)
where
    M: BenchMap<K, i64>,
    K: KeySet,
{
    let keys = K::distinct(size);
    let map: M = keys.iter().map(|k| (k.clone(), 0)).collect();
    let order = shuffled(&keys);
    b.iter(|| {
        let mut current = map.clone();
        for key in &order {
            current = current.remove_clone(key);
        }
        black_box((map.count(), current))
    })
}

fn bench_iter<M, K>(b: &mut Bencher<'_>, size: usize)
where
    M: BenchMap<K, i64>,
    K: KeySet,
{
    let keys = K::distinct(size);
    let map: M = keys.iter().map(|k| (k.clone(), 0)).collect();
    b.iter(|| black_box(map.count()))
}

fn bench_group<M, K>(c: &mut Criterion, group_name: &str)
where
    M: BenchMap<K, i64>,
    K: KeySet,
{
    let mut group = c.benchmark_group(group_name);

    for size in &[100, 1000, 10000] {
        group.bench_function(format!("lookup_{}", size), |b| {
            bench_lookup::<M, K>(b, *size)
        });
        group.bench_function(format!("insert_mut_{}", size), |b| {
            bench_insert_mut::<M, K>(b, *size)
        });
        group.bench_function(format!("remove_mut_{}", size), |b| {
            bench_remove_mut::<M, K>(b, *size)
        });
    }

    for size in &[1000, 10000] {
        group.bench_function(format!("lookup_ne_{}", size), |b| {
            bench_lookup_ne::<M, K>(b, *size)
        });
        group.bench_function(format!("iter_{}", size), |b| bench_iter::<M, K>(b, *size));
    }

    for size in &[100, 1000] {
        group.bench_function(format!("insert_{}", size), |b| bench_insert::<M, K>(b, *size));
        group.bench_function(format!("remove_{}", size), |b| bench_remove::<M, K>(b, *size));
    }

    group.finish();
}

fn bench_hashmap(c: &mut Criterion) {
    bench_group::<HashMap<i64, i64>, i64>(c, "hashmap_i64");
    bench_group::<HashMap<String, i64>, String>(c, "hashmap_str");
}

fn bench_naive_stdhashmap(c: &mut Criterion) {
    bench_group::<StdHashMap<i64, i64>, i64>(c, "naive_stdhashmap_i64");
    bench_group::<StdHashMap<String, i64>, String>(c, "naive_stdhashmap_str");
}

criterion_group!(benches, bench_hashmap, bench_naive_stdhashmap);
criterion_main!(benches);
