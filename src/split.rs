//! Deterministic train/test partitioning.
//!
//! The shuffle is a Fisher–Yates pass driven by ChaCha8 seeded with
//! `seed_from_u64`. Position `i` (walking down from the end) swaps with
//! `j = (next_u64() * (i + 1)) >> 64`, so the permutation depends only on the
//! seed and the input length.

use rand::{RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Number of examples held out: `max(1, floor(len * ratio))`, or 0 for an empty set.
pub fn test_size(len: usize, test_ratio: f64) -> usize {
    if len == 0 {
        return 0;
    }
    let size = ((len as f64) * test_ratio).floor() as usize;
    size.clamp(1, len)
}

fn shuffle<T>(items: &mut [T], rng: &mut ChaCha8Rng) {
    for i in (1..items.len()).rev() {
        let bound = (i + 1) as u128;
        let j = ((rng.next_u64() as u128 * bound) >> 64) as usize;
        items.swap(i, j);
    }
}

/// Shuffle with `seed` and split off the first `test_size` items as the test set.
/// Returns `(train, test)`; empty input gives two empty sets.
pub fn split<T>(mut items: Vec<T>, test_ratio: f64, seed: u64) -> (Vec<T>, Vec<T>) {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    shuffle(&mut items, &mut rng);

    let n_test = test_size(items.len(), test_ratio);
    let train = items.split_off(n_test);
    let test = items;

    tracing::info!(
        "Split data into {} training and {} test examples",
        train.len(),
        test.len()
    );
    (train, test)
}
