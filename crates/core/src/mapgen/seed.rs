//! Uniform draws over the injected random source.

use rand_chacha::ChaCha8Rng;
use rand_chacha::rand_core::{Rng, SeedableRng};

pub fn seeded_rng(seed: u64) -> ChaCha8Rng {
    ChaCha8Rng::seed_from_u64(seed)
}

pub(super) fn random_index<R: Rng + ?Sized>(rng: &mut R, len: usize) -> Option<usize> {
    if len == 0 {
        return None;
    }
    Some((rng.next_u64() % len as u64) as usize)
}

pub(super) fn random_inclusive<R: Rng + ?Sized>(rng: &mut R, lower: usize, upper: usize) -> usize {
    debug_assert!(lower <= upper);
    let range_size = (upper - lower) as u64 + 1;
    lower + (rng.next_u64() % range_size) as usize
}

pub(super) fn choose<R: Rng + ?Sized, T: Copy>(rng: &mut R, items: &[T]) -> Option<T> {
    random_index(rng, items.len()).map(|index| items[index])
}
