//! Resources provided to every app

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::ops::{Deref, DerefMut};
use std::time::{SystemTime, UNIX_EPOCH};

/// The app's time step. Managed by the scheduler; units should only read it.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Tick {
    pub tick: u64,
}

/// Whether the run should stop after the current cycle. Set by units.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Termination {
    pub terminate: bool,
}

/// The entity currently selected, for communication between UI units
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SelectedEntity {
    pub selected: Option<hecs::Entity>,
}

/// Shared PRNG. Units should draw all randomness from here so runs are
/// reproducible from a single seed.
#[derive(Debug, Clone)]
pub struct Rand {
    rng: ChaCha8Rng,
}

impl Rand {
    pub fn from_seed(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    /// Seeded from the current wall-clock time
    pub fn from_time() -> Self {
        Self::from_seed(time_seed())
    }
}

impl Default for Rand {
    fn default() -> Self {
        Self::from_time()
    }
}

impl Deref for Rand {
    type Target = ChaCha8Rng;

    fn deref(&self) -> &ChaCha8Rng {
        &self.rng
    }
}

impl DerefMut for Rand {
    fn deref_mut(&mut self) -> &mut ChaCha8Rng {
        &mut self.rng
    }
}

pub(crate) fn time_seed() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::Rng;

    #[test]
    fn test_same_seed_same_sequence() {
        let mut a = Rand::from_seed(123);
        let mut b = Rand::from_seed(123);
        let xs: Vec<u64> = (0..4).map(|_| a.random()).collect();
        let ys: Vec<u64> = (0..4).map(|_| b.random()).collect();
        assert_eq!(xs, ys);
    }

    #[test]
    fn test_different_seed_differs() {
        let mut a = Rand::from_seed(1);
        let mut b = Rand::from_seed(2);
        assert_ne!(a.random::<u64>(), b.random::<u64>());
    }

    #[test]
    fn test_defaults() {
        assert_eq!(Tick::default().tick, 0);
        assert!(!Termination::default().terminate);
        assert!(SelectedEntity::default().selected.is_none());
    }
}
