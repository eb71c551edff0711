//! # Deterministic Noise
//!
//! A pure `f64 -> [0, 1)` hash. Every "random but reproducible" draw in the
//! world (asteroid placement, stats, outline jitter) goes through
//! [`noise`].
//!
//! ## Determinism Guarantee
//!
//! The output depends only on the bit pattern of the input, so the same
//! seed yields **exactly** the same value on any platform, any time.
//! `0.0` and `-0.0` are treated as the same seed.
//!
//! ## Distribution
//!
//! The seed bits run through the SplitMix64 finaliser (full avalanche), and
//! the top 53 bits of the result become the mantissa of the output. Adjacent
//! integer seeds are uncorrelated.

/// World seed for deterministic generation.
///
/// All procedural generation derives from this seed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct WorldSeed(u64);

impl WorldSeed {
    /// Creates a new world seed.
    #[inline]
    #[must_use]
    pub const fn new(seed: u64) -> Self {
        Self(seed)
    }

    /// Returns the raw seed value.
    #[inline]
    #[must_use]
    pub const fn value(self) -> u64 {
        self.0
    }

    /// The 32-bit salt folded into every chunk seed.
    ///
    /// Seed 0 gives salt 0, which leaves chunk seeds untouched.
    #[inline]
    #[must_use]
    pub const fn salt(self) -> i64 {
        (self.0 & 0xFFFF_FFFF) as i64
    }

    /// Derives a sub-seed for a specific purpose.
    ///
    /// Uses a hash function to create independent streams from one seed.
    #[inline]
    #[must_use]
    pub const fn derive(self, purpose: u64) -> Self {
        let mut hash = self.0;
        hash ^= purpose;
        hash = hash.wrapping_mul(0x517c_c1b7_2722_0a95);
        hash ^= hash >> 32;
        Self(hash)
    }
}

/// SplitMix64 output function.
#[inline]
const fn mix64(mut z: u64) -> u64 {
    z = z.wrapping_add(0x9E37_79B9_7F4A_7C15);
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}

/// 2^-53, the spacing of the output grid.
const UNIT: f64 = 1.0 / (1u64 << 53) as f64;

/// Maps `seed` to a reproducible value in `[0, 1)`.
#[inline]
#[must_use]
pub fn noise(seed: f64) -> f64 {
    // -0.0 == 0.0, so this also folds the negative zero bit pattern.
    let bits = if seed == 0.0 { 0 } else { seed.to_bits() };
    (mix64(bits) >> 11) as f64 * UNIT
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_noise_is_pure() {
        for i in -1000..1000 {
            let seed = f64::from(i) * 0.37;
            assert_eq!(noise(seed).to_bits(), noise(seed).to_bits());
        }
    }

    #[test]
    fn test_noise_range() {
        for i in 0..10_000 {
            let value = noise(f64::from(i));
            assert!((0.0..1.0).contains(&value), "noise({i}) = {value}");
        }
    }

    #[test]
    fn test_negative_zero_matches_zero() {
        assert_eq!(noise(0.0).to_bits(), noise(-0.0).to_bits());
    }

    #[test]
    fn test_noise_roughly_uniform() {
        let mut buckets = [0u32; 10];
        let samples = 100_000;
        for i in 0..samples {
            let value = noise(f64::from(i));
            buckets[(value * 10.0) as usize] += 1;
        }
        for (index, count) in buckets.iter().enumerate() {
            let share = f64::from(*count) / f64::from(samples);
            assert!((0.08..0.12).contains(&share), "bucket {index} holds {share}");
        }
    }

    #[test]
    fn test_adjacent_seeds_differ() {
        let a = noise(1337.0);
        let b = noise(1338.0);
        assert!((a - b).abs() > 1e-9);
    }

    #[test]
    fn test_salt_and_derive() {
        assert_eq!(WorldSeed::default().salt(), 0);
        assert_eq!(WorldSeed::new(0xFFFF_FFFF_0000_0001).salt(), 1);

        let seed = WorldSeed::new(12345);
        assert_eq!(seed.derive(1), seed.derive(1));
        assert_ne!(seed.derive(1), seed.derive(2));
    }
}
