//! Jitter sources for density bands.
//!
//! Jitter keeps neighbouring regions in the same band from showing
//! identical densities. [`HashJitter`] derives it from an MD5 digest of
//! the seed and region id, so the same selection always yields the same
//! estimate.

/// Picks an offset in `[0, spread)` for a region.
pub trait Jitter {
    /// Returns the offset to add to a band's minimum for `key`.
    fn offset(&self, key: &str, spread: u32) -> u32;
}

/// Deterministic jitter keyed on a seed and the region id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct HashJitter {
    seed: u64,
}

impl HashJitter {
    /// Creates a jitter source with the given seed.
    #[must_use]
    pub const fn new(seed: u64) -> Self {
        Self { seed }
    }
}

impl Jitter for HashJitter {
    fn offset(&self, key: &str, spread: u32) -> u32 {
        if spread == 0 {
            return 0;
        }

        let mut context = md5::Context::new();
        context.consume(self.seed.to_le_bytes());
        context.consume(key.as_bytes());
        let digest = context.finalize();

        let mut head = [0u8; 4];
        head.copy_from_slice(&digest.0[..4]);
        u32::from_le_bytes(head) % spread
    }
}

/// Always returns the same fraction of the spread. Useful for a flat,
/// reproducible estimate (`FixedJitter(0.0)` yields every band minimum).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FixedJitter(pub f64);

impl Jitter for FixedJitter {
    fn offset(&self, _key: &str, spread: u32) -> u32 {
        if spread == 0 {
            return 0;
        }
        let fraction = self.0.clamp(0.0, 1.0);
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let offset = (f64::from(spread) * fraction).floor() as u32;
        offset.min(spread - 1)
    }
}
