// Per-request pseudo-random source for shot sampling.
//
// Implements xoshiro256++ (Blackman & Vigna, 2019) with SplitMix64 seeding.
// The generator itself is hand-rolled so a given seed produces the same shot
// sequence on every platform; `rand` is used only to pull an unpredictable
// seed from the operating system.
//
// Every melody request owns exactly one `ShotRng`. The simulator borrows it
// mutably for the duration of `sample_shots`; nothing in the workspace keeps
// a generator in a static or shares one between threads. The server builds a
// fresh generator per request via `ShotRng::from_entropy()`, while the CLI
// and tests use `ShotRng::new(seed)` for reproducible output.
//
// **Determinism.** The integer core must produce identical output given the
// same prior state. Only `next_f64` touches floating point, and it does so
// with an exact power-of-two division.

use rand::TryRngCore;
use rand::rngs::OsRng;
use serde::{Deserialize, Serialize};

/// Failure to read a seed from the operating system's entropy source.
pub type EntropyError = <OsRng as TryRngCore>::Error;

/// Xoshiro256++ generator. Owned by a single request.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShotRng {
    s: [u64; 4],
}

impl ShotRng {
    /// Create a generator from a `u64` seed.
    ///
    /// SplitMix64 expands the seed into the 256-bit state. Equal seeds give
    /// equal streams.
    pub fn new(seed: u64) -> Self {
        let mut sm = seed;
        Self {
            s: [
                splitmix64(&mut sm),
                splitmix64(&mut sm),
                splitmix64(&mut sm),
                splitmix64(&mut sm),
            ],
        }
    }

    /// Create a generator seeded from OS entropy. Not reproducible; use
    /// `new` when the seed matters.
    pub fn from_entropy() -> Result<Self, EntropyError> {
        let seed = OsRng.try_next_u64()?;
        Ok(Self::new(seed))
    }

    pub fn next_u64(&mut self) -> u64 {
        let result = (self.s[0].wrapping_add(self.s[3]))
            .rotate_left(23)
            .wrapping_add(self.s[0]);

        let t = self.s[1] << 17;

        self.s[2] ^= self.s[0];
        self.s[3] ^= self.s[1];
        self.s[1] ^= self.s[2];
        self.s[0] ^= self.s[3];

        self.s[2] ^= t;
        self.s[3] = self.s[3].rotate_left(45);

        result
    }

    /// Uniform `f64` in [0, 1) built from the upper 53 bits of `next_u64`.
    pub fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }
}

/// SplitMix64 step, used only to expand seeds.
fn splitmix64(state: &mut u64) -> u64 {
    *state = state.wrapping_add(0x9e37_79b9_7f4a_7c15);
    let mut z = *state;
    z = (z ^ (z >> 30)).wrapping_mul(0xbf58_476d_1ce4_e5b9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94d0_49bb_1331_11eb);
    z ^ (z >> 31)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_seed_same_stream() {
        let mut a = ShotRng::new(16);
        let mut b = ShotRng::new(16);
        for _ in 0..1000 {
            assert_eq!(a.next_u64(), b.next_u64());
        }
    }

    #[test]
    fn different_seeds_diverge() {
        let mut a = ShotRng::new(1);
        let mut b = ShotRng::new(2);
        assert_ne!(a.next_u64(), b.next_u64());
    }

    #[test]
    fn f64_in_unit_range() {
        let mut rng = ShotRng::new(12345);
        for _ in 0..10_000 {
            let v = rng.next_f64();
            assert!((0.0..1.0).contains(&v), "f64 out of range: {v}");
        }
    }

    #[test]
    fn f64_mean_is_near_half() {
        let mut rng = ShotRng::new(3);
        let n = 20_000;
        let mean = (0..n).map(|_| rng.next_f64()).sum::<f64>() / n as f64;
        assert!((0.48..0.52).contains(&mean), "mean drifted: {mean}");
    }

    #[test]
    fn entropy_generators_are_distinct() {
        let mut a = ShotRng::from_entropy().unwrap();
        let mut b = ShotRng::from_entropy().unwrap();
        assert_ne!(a, b);
        assert_ne!(a.next_u64(), b.next_u64());
    }

    #[test]
    fn serialization_roundtrip_continues_stream() {
        let mut rng = ShotRng::new(42);
        for _ in 0..50 {
            rng.next_u64();
        }
        let json = serde_json::to_string(&rng).unwrap();
        let mut restored: ShotRng = serde_json::from_str(&json).unwrap();
        for _ in 0..50 {
            assert_eq!(rng.next_u64(), restored.next_u64());
        }
    }
}
