//! Target-emotion policy and the random source behind it
//!
//! The only randomness in the learning core is the epsilon gate, the
//! uniform pick among suggestions, and the softer target chosen for sad
//! users. All of it goes through `RandomSource` so callers can seed it or
//! replace it with a scripted stub.

use crate::emotion::Emotion;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Probability of settling for `neutral` instead of `happy` when the user is sad
pub const SAD_SETTLE_PROBABILITY: f64 = 0.3;

/// Injectable source of uniform draws
pub trait RandomSource: Send {
    /// Uniform draw in `[0, 1)`
    fn next_unit(&mut self) -> f64;

    /// Uniform index in `0..len`; `len` is never zero
    fn next_index(&mut self, len: usize) -> usize;
}

/// `StdRng`-backed source
#[derive(Debug, Clone)]
pub struct StdRandom {
    rng: StdRng,
}

impl StdRandom {
    /// Seeded from the operating system
    pub fn from_entropy() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    /// Reproducible sequence
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Default for StdRandom {
    fn default() -> Self {
        Self::from_entropy()
    }
}

impl RandomSource for StdRandom {
    fn next_unit(&mut self) -> f64 {
        self.rng.gen::<f64>()
    }

    fn next_index(&mut self, len: usize) -> usize {
        self.rng.gen_range(0..len)
    }
}

/// Emotion the next reply should steer toward.
///
/// Keep happy users happy, calm angry users first, lift neutral users,
/// and usually lift sad users (sometimes settling for neutral).
pub fn target_emotion(current: Emotion, rng: &mut dyn RandomSource) -> Emotion {
    match current {
        Emotion::Happy => Emotion::Happy,
        Emotion::Angry => Emotion::Neutral,
        Emotion::Neutral => Emotion::Happy,
        Emotion::Sad => {
            if rng.next_unit() < SAD_SETTLE_PROBABILITY {
                Emotion::Neutral
            } else {
                Emotion::Happy
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Fixed(f64);

    impl RandomSource for Fixed {
        fn next_unit(&mut self) -> f64 {
            self.0
        }

        fn next_index(&mut self, _len: usize) -> usize {
            0
        }
    }

    #[test]
    fn test_deterministic_targets() {
        let mut rng = StdRandom::seeded(7);
        for _ in 0..50 {
            assert_eq!(target_emotion(Emotion::Happy, &mut rng), Emotion::Happy);
            assert_eq!(target_emotion(Emotion::Angry, &mut rng), Emotion::Neutral);
            assert_eq!(target_emotion(Emotion::Neutral, &mut rng), Emotion::Happy);
        }
    }

    #[test]
    fn test_sad_branch_threshold() {
        assert_eq!(target_emotion(Emotion::Sad, &mut Fixed(0.0)), Emotion::Neutral);
        assert_eq!(target_emotion(Emotion::Sad, &mut Fixed(0.29)), Emotion::Neutral);
        assert_eq!(target_emotion(Emotion::Sad, &mut Fixed(0.3)), Emotion::Happy);
        assert_eq!(target_emotion(Emotion::Sad, &mut Fixed(0.99)), Emotion::Happy);
    }

    #[test]
    fn test_sad_branch_frequency() {
        let mut rng = StdRandom::seeded(42);
        let trials = 10_000;
        let neutral = (0..trials)
            .filter(|_| target_emotion(Emotion::Sad, &mut rng) == Emotion::Neutral)
            .count();
        let ratio = neutral as f64 / trials as f64;
        assert!((ratio - SAD_SETTLE_PROBABILITY).abs() < 0.03, "ratio {}", ratio);
    }

    #[test]
    fn test_seeded_is_reproducible() {
        let mut a = StdRandom::seeded(99);
        let mut b = StdRandom::seeded(99);
        for _ in 0..10 {
            assert_eq!(a.next_unit(), b.next_unit());
            assert_eq!(a.next_index(5), b.next_index(5));
        }
    }
}
