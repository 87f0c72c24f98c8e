//! Production random number generator and its request-shared wrapper.

use std::sync::{Mutex, PoisonError};

use quizrush_core::rng::DeterministicRng;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// OS-seeded generator used to draw quiz questions.
#[derive(Debug)]
pub struct SystemRng(StdRng);

impl SystemRng {
    /// Seeds a new generator from the operating system.
    #[must_use]
    pub fn new() -> Self {
        Self(StdRng::from_os_rng())
    }

    /// A generator with a fixed seed, for reproducible draws.
    #[must_use]
    pub fn seeded(seed: u64) -> Self {
        Self(StdRng::seed_from_u64(seed))
    }
}

impl Default for SystemRng {
    fn default() -> Self {
        Self::new()
    }
}

impl DeterministicRng for SystemRng {
    fn next_u32_range(&mut self, min: u32, max: u32) -> u32 {
        if min >= max {
            return min;
        }
        self.0.random_range(min..=max)
    }
}

/// One generator shared by every request.
///
/// The lock is held for one draw at a time and never across an await.
pub struct SharedRng(Mutex<Box<dyn DeterministicRng>>);

impl SharedRng {
    #[must_use]
    pub fn new(inner: Box<dyn DeterministicRng>) -> Self {
        Self(Mutex::new(inner))
    }

    /// A per-call view to hand to a command handler.
    #[must_use]
    pub fn handle(&self) -> SharedRngHandle<'_> {
        SharedRngHandle(&self.0)
    }
}

/// Borrowed view of a [`SharedRng`] that locks once per value.
pub struct SharedRngHandle<'a>(&'a Mutex<Box<dyn DeterministicRng>>);

impl DeterministicRng for SharedRngHandle<'_> {
    fn next_u32_range(&mut self, min: u32, max: u32) -> u32 {
        // A panicked draw leaves no partial state behind.
        self.0
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .next_u32_range(min, max)
    }
}

#[cfg(test)]
mod tests {
    use quizrush_test_support::SequenceRng;

    use super::*;

    #[test]
    fn test_values_stay_within_inclusive_bounds() {
        let mut rng = SystemRng::seeded(7);

        for _ in 0..200 {
            let value = rng.next_u32_range(3, 6);
            assert!((3..=6).contains(&value));
        }
    }

    #[test]
    fn test_same_seed_gives_same_sequence() {
        let mut first = SystemRng::seeded(42);
        let mut second = SystemRng::seeded(42);

        let a: Vec<u32> = (0..10).map(|_| first.next_u32_range(0, 100)).collect();
        let b: Vec<u32> = (0..10).map(|_| second.next_u32_range(0, 100)).collect();

        assert_eq!(a, b);
    }

    #[test]
    fn test_degenerate_range_returns_min() {
        assert_eq!(SystemRng::seeded(1).next_u32_range(9, 9), 9);
    }

    #[test]
    fn test_shared_handle_delegates_to_the_inner_generator() {
        let shared = SharedRng::new(Box::new(SequenceRng::new(vec![4, 1, 7])));
        let mut handle = shared.handle();

        let drawn: Vec<u32> = (0..3).map(|_| handle.next_u32_range(0, 9)).collect();

        assert_eq!(drawn, vec![4, 1, 7]);
    }

    #[test]
    fn test_shared_lock_is_released_between_draws() {
        let shared = SharedRng::new(Box::new(SystemRng::seeded(3)));
        let mut handle = shared.handle();

        handle.next_u32_range(0, 9);

        assert!(shared.0.try_lock().is_ok());
    }
}
