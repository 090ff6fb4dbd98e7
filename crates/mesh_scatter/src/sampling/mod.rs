//! Candidate sources that feed the placement loop.
//!
//! This module defines the [`CandidateSource`] trait and the two sources used by
//! the runner: a field-weighted point cloud drawn from at random, and a
//! connectivity-ordered vertex sequence for clustered growth.
use glam::Vec3;
use rand::Rng;

pub mod connectivity;
pub mod point_cloud;

pub use connectivity::ConnectivitySequence;
pub use point_cloud::WeightedPointCloud;

/// Field value a vertex must reach (inclusive) to be a field-weighted candidate.
pub const DEFAULT_FIELD_CUTOFF: f32 = 0.5;

/// A not-yet-placed point on the surface.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Candidate {
    /// Surface vertex this candidate was taken from.
    pub vertex: u32,
    /// Position in surface-local space.
    pub position: Vec3,
    /// Direction the prototype's up axis gets aligned to.
    pub normal: Vec3,
    /// Acceptance weight in [0, 1].
    pub weight: f32,
}

/// Outcome of drawing from a [`CandidateSource`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Draw {
    /// No candidates remain.
    Exhausted,
    /// The candidate was consumed but failed the stochastic weight test.
    Skipped {
        candidate: Candidate,
        /// Uniform roll the weight was compared against.
        roll: f32,
    },
    /// The candidate was consumed and should be tried for placement.
    Ready(Candidate),
}

/// A pool of candidates, each handed out at most once.
pub trait CandidateSource {
    /// Number of candidates not yet drawn.
    fn remaining(&self) -> usize;

    /// Takes the next candidate out of the pool.
    fn draw(&mut self, rng: &mut dyn Rng) -> Draw;
}

/// Generate a random float in the range [0, 1).
#[inline]
pub(crate) fn rand01(rng: &mut dyn Rng) -> f32 {
    (rng.next_u32() as f32) / ((u32::MAX as f32) + 1.0)
}

/// Generate a uniform index in `0..len`. `len` must be non-zero.
#[inline]
pub(crate) fn rand_index(rng: &mut dyn Rng, len: usize) -> usize {
    debug_assert!(len > 0, "rand_index needs a non-empty range");
    // Multiply-shift on the high 32 bits.
    (((rng.next_u64() >> 32) * len as u64) >> 32) as usize
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;

    struct FixedRng {
        value: u32,
    }

    impl rand::TryRng for FixedRng {
        type Error = core::convert::Infallible;

        fn try_next_u32(&mut self) -> Result<u32, Self::Error> {
            Ok(self.value)
        }

        fn try_next_u64(&mut self) -> Result<u64, Self::Error> {
            Ok((self.value as u64) << 32 | self.value as u64)
        }

        fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), Self::Error> {
            let bytes = self.value.to_le_bytes();
            for (i, b) in dest.iter_mut().enumerate() {
                *b = bytes[i % 4];
            }
            Ok(())
        }
    }

    #[test]
    fn rand01_bounds() {
        assert_eq!(rand01(&mut FixedRng { value: 0 }), 0.0);
        let top = rand01(&mut FixedRng { value: u32::MAX });
        assert!((0.0..=1.0).contains(&top));
    }

    #[test]
    fn rand_index_covers_range_ends() {
        assert_eq!(rand_index(&mut FixedRng { value: 0 }, 7), 0);
        assert_eq!(rand_index(&mut FixedRng { value: u32::MAX }, 7), 6);
        assert_eq!(rand_index(&mut FixedRng { value: u32::MAX }, 1), 0);
    }

    #[test]
    fn rand_index_stays_in_range() {
        let mut rng = StdRng::seed_from_u64(9);
        for len in [1usize, 2, 3, 10, 1000] {
            for _ in 0..200 {
                assert!(rand_index(&mut rng, len) < len);
            }
        }
    }
}
