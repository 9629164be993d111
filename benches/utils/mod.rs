#![allow(dead_code)]
use rand::seq::SliceRandom;
use rand::{rngs::SmallRng, SeedableRng};
use std::fmt::Debug;
use std::hash::Hash;

// Stepping by a large odd constant walks the whole 2^64 ring, so keys are
// distinct by construction and spread across the hash space without any
// rejection sampling.
const STRIDE: u64 = 0x9e37_79b9_7f4a_7c15;

// Deterministic key generation for the benches.
pub trait KeySet: Clone + Debug + Eq + Hash {
    fn distinct(count: usize) -> Vec<Self>;
}

impl KeySet for i64 {
    fn distinct(count: usize) -> Vec<Self> {
        (0..count as u64)
            .map(|i| i.wrapping_mul(STRIDE) as i64)
            .collect()
    }
}

impl KeySet for String {
    fn distinct(count: usize) -> Vec<Self> {
        (0..count as u64)
            .map(|i| format!("key-{:016x}", i.wrapping_mul(STRIDE)))
            .collect()
    }
}

// A shuffled copy, deterministically seeded so runs stay comparable.
pub fn shuffled<T: Clone>(input: &[T]) -> Vec<T> {
    let mut gen = SmallRng::seed_from_u64(2);
    let mut out = input.to_vec();
    out.shuffle(&mut gen);
    out
}
