use rand::Rng;
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};
use thiserror::Error;

//
// ─── SEED ──────────────────────────────────────────────────────────────────────
//

/// Largest value a [`Seed`] may hold (31 bits).
pub const MAX_SEED: u32 = 0x7fff_ffff;

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[error("seed {provided} exceeds the 31-bit maximum {MAX_SEED}")]
pub struct SeedOutOfRange {
    pub provided: u32,
}

/// 31-bit non-negative integer driving the deterministic shuffle for one
/// source file.
///
/// A seed is minted once per source id, persisted, and stays fixed for the
/// life of that source's scheduling state, so the same permutation can be
/// reproduced whenever the remaining queue has to be rebuilt.
///
/// # Examples
///
/// ```
/// # use quiz_core::shuffle::Seed;
/// let seed = Seed::new(42)?;
/// assert_eq!(seed.value(), 42);
/// # Ok::<(), quiz_core::shuffle::SeedOutOfRange>(())
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Seed(u32);

impl Seed {
    /// Wrap a raw seed value.
    ///
    /// # Errors
    ///
    /// Returns `SeedOutOfRange` if `value` does not fit in 31 bits.
    pub fn new(value: u32) -> Result<Self, SeedOutOfRange> {
        if value > MAX_SEED {
            return Err(SeedOutOfRange { provided: value });
        }
        Ok(Self(value))
    }

    /// Mint a fresh random seed from the thread RNG.
    #[must_use]
    pub fn generate() -> Self {
        Self(rand::rng().random_range(0..=MAX_SEED))
    }

    #[must_use]
    pub fn value(self) -> u32 {
        self.0
    }
}

//
// ─── PERMUTATION ───────────────────────────────────────────────────────────────
//

/// Produce the fixed pseudo-random permutation of `[0, n)` for a seed.
///
/// The generator is a `StdRng` keyed by the seed alone, and the shuffle is
/// the standard back-to-front exchange, so the same `(n, seed)` input always
/// yields the same ordering. The scheduler builds this once per source and
/// thereafter only consumes from it.
///
/// # Examples
///
/// ```
/// # use quiz_core::shuffle::{Seed, permute};
/// let seed = Seed::new(42).unwrap();
/// assert_eq!(permute(3, seed), permute(3, seed));
/// ```
#[must_use]
pub fn permute(n: u32, seed: Seed) -> Vec<u32> {
    let mut order: Vec<u32> = (0..n).collect();
    let mut rng = StdRng::seed_from_u64(u64::from(seed.value()));
    order.shuffle(&mut rng);
    order
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
