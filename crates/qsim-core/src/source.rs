//! Bit source capability and the built-in generators.
//!
//! Every generator implements the [`BitSource`] trait, which stands in for
//! reading a register of qubits prepared in equal superposition. Downstream
//! modules only ever see the trait, so a seeded source can replace the
//! default one without touching packing, aggregation, or key derivation.

use std::sync::Mutex;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::bits::BitSequence;

/// Metadata about a bit source.
#[derive(Debug, Clone)]
pub struct SourceInfo {
    /// Short label reported alongside results (e.g. `"prng"`).
    pub name: &'static str,
    /// One-line human-readable description.
    pub description: &'static str,
    /// Whether two instances built the same way produce the same stream.
    pub deterministic: bool,
}

/// Trait that every bit source must implement.
pub trait BitSource: Send + Sync {
    /// Source metadata.
    fn info(&self) -> &SourceInfo;

    /// Draw exactly `count` independent, uniformly distributed bits.
    fn generate(&self, count: usize) -> BitSequence;

    /// Convenience: name from info.
    fn name(&self) -> &'static str {
        self.info().name
    }
}

// ---------------------------------------------------------------------------
// Thread-local PRNG
// ---------------------------------------------------------------------------

static THREAD_RNG_INFO: SourceInfo = SourceInfo {
    name: "prng",
    description: "Thread-local pseudo-random generator",
    deterministic: false,
};

/// Default source backed by `rand`'s thread-local generator.
#[derive(Debug, Default)]
pub struct ThreadRngSource;

impl BitSource for ThreadRngSource {
    fn info(&self) -> &SourceInfo {
        &THREAD_RNG_INFO
    }

    fn generate(&self, count: usize) -> BitSequence {
        let mut rng = rand::rng();
        (0..count).map(|_| rng.random::<bool>()).collect()
    }
}

// ---------------------------------------------------------------------------
// Operating system CSPRNG
// ---------------------------------------------------------------------------

static OS_INFO: SourceInfo = SourceInfo {
    name: "os",
    description: "Operating system CSPRNG via getrandom",
    deterministic: false,
};

/// Source that reads the operating system's CSPRNG.
#[derive(Debug, Default)]
pub struct OsBitSource;

impl BitSource for OsBitSource {
    fn info(&self) -> &SourceInfo {
        &OS_INFO
    }

    /// # Panics
    /// Panics if the OS CSPRNG fails, which indicates a fatal platform issue.
    fn generate(&self, count: usize) -> BitSequence {
        let mut buf = vec![0u8; count.div_ceil(8)];
        getrandom::fill(&mut buf).expect("OS CSPRNG failed");
        (0..count).map(|i| (buf[i / 8] >> (i % 8)) & 1 == 1).collect()
    }
}

// ---------------------------------------------------------------------------
// Seeded generator
// ---------------------------------------------------------------------------

static SEEDED_INFO: SourceInfo = SourceInfo {
    name: "seeded",
    description: "Seeded StdRng, reproducible across runs",
    deterministic: true,
};

/// Reproducible source: identical seeds yield identical bit streams.
///
/// The generator sits behind a `Mutex` so one instance can be shared across
/// threads; concurrent callers interleave draws from the same stream.
#[derive(Debug)]
pub struct SeededBitSource {
    seed: u64,
    rng: Mutex<StdRng>,
}

impl SeededBitSource {
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }
}

impl BitSource for SeededBitSource {
    fn info(&self) -> &SourceInfo {
        &SEEDED_INFO
    }

    fn generate(&self, count: usize) -> BitSequence {
        let mut rng = self.rng.lock().unwrap_or_else(|e| e.into_inner());
        (0..count).map(|_| rng.random::<bool>()).collect()
    }
}
