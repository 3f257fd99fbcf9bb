//! Deterministic per-federate and run-level RNG wrappers.
//!
//! # Determinism strategy
//!
//! Each federate gets its own independent `SmallRng` seeded by:
//!
//!   seed = global_seed XOR (salt * MIXING_CONSTANT)
//!
//! where `salt` is a fixed per-role constant (see [`RngStream`]).  The mixing
//! constant is the 64-bit fractional part of the golden ratio, which spreads
//! nearby salts uniformly across the seed space.  This means:
//!
//! - Federates never share RNG state, so the order in which the time manager
//!   grants them does not change what any single federate draws.
//! - The same global seed always reproduces the same run.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

/// 64-bit fractional golden-ratio constant for seed mixing.
const MIXING_CONSTANT: u64 = 0x9e37_79b9_7f4a_7c15;

/// Which random stream a federate draws from.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum RngStream {
    /// Ferry boarding coin flips.
    Ferry,
    /// Station fills and arrivals.
    Station,
    /// Anything else (tests, application federates).
    Custom(u64),
}

impl RngStream {
    fn salt(self) -> u64 {
        match self {
            RngStream::Ferry     => 1,
            RngStream::Station   => 2,
            RngStream::Custom(n) => n.wrapping_add(16),
        }
    }
}

// ── FederateRng ───────────────────────────────────────────────────────────────

/// Per-federate deterministic RNG.
pub struct FederateRng(SmallRng);

impl FederateRng {
    /// Seed deterministically from the run's global seed and a stream.
    pub fn new(global_seed: u64, stream: RngStream) -> Self {
        let seed = global_seed ^ stream.salt().wrapping_mul(MIXING_CONSTANT);
        FederateRng(SmallRng::seed_from_u64(seed))
    }

    /// Expose the inner `SmallRng` for use with `rand` distribution types.
    #[inline]
    pub fn inner(&mut self) -> &mut SmallRng {
        &mut self.0
    }

    /// Sample a uniformly distributed value of any `Standard`-distributed type.
    #[inline]
    pub fn random<T>(&mut self) -> T
    where
        rand::distributions::Standard: rand::distributions::Distribution<T>,
    {
        self.0.r#gen()
    }

    /// Generate a value uniformly in `range`.
    #[inline]
    pub fn gen_range<T, R>(&mut self, range: R) -> T
    where
        T: rand::distributions::uniform::SampleUniform,
        R: rand::distributions::uniform::SampleRange<T>,
    {
        self.0.gen_range(range)
    }

    /// `true` with probability `p` (clamped to [0, 1]).
    #[inline]
    pub fn gen_bool(&mut self, p: f64) -> bool {
        self.0.gen_bool(p.clamp(0.0, 1.0))
    }

    /// A fair coin.
    #[inline]
    pub fn coin(&mut self) -> bool {
        self.0.r#gen()
    }
}

// ── SimRng ────────────────────────────────────────────────────────────────────

/// Run-level RNG used to derive seeds for whole replications.
///
/// Used only in single-threaded contexts.  Each replication receives a plain
/// `u64` seed derived from this one, so replications can then run on any
/// thread without sharing state.
pub struct SimRng(SmallRng);

impl SimRng {
    pub fn new(seed: u64) -> Self {
        SimRng(SmallRng::seed_from_u64(seed))
    }

    /// Derive a replication seed with a different offset.
    pub fn child_seed(&mut self, offset: u64) -> u64 {
        self.0.r#gen::<u64>() ^ offset.wrapping_mul(MIXING_CONSTANT)
    }

    #[inline]
    pub fn inner(&mut self) -> &mut SmallRng {
        &mut self.0
    }
}
