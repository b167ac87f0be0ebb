//! Sources of simulated phase durations.

use std::sync::Mutex;
use std::time::Duration;

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::config::SimConfig;

/// Supplies the wall-clock length of each timed phase.
pub trait DurationProvider: Send + Sync {
    /// One-way trip between the mine and the unloading area.
    fn travel(&self) -> Duration;
    /// A single loading at the mine; may differ per call.
    fn loading(&self) -> Duration;
    /// A single unload at a station; constant for a given provider.
    fn unloading(&self) -> Duration;
}

/// Durations derived from [`SimConfig`], with uniformly random loading times.
pub struct ScaledDurations {
    travel: Duration,
    unloading: Duration,
    loading_min_ms: u64,
    loading_max_ms: u64,
    rng: Mutex<SmallRng>,
}

impl ScaledDurations {
    pub fn from_config(config: &SimConfig) -> Self {
        let (min, max) = config.loading_bounds();
        let rng = match config.seed {
            Some(seed) => SmallRng::seed_from_u64(seed),
            None => SmallRng::from_entropy(),
        };
        Self {
            travel: config.travel_duration(),
            unloading: config.unload_duration(),
            loading_min_ms: min.as_millis() as u64,
            loading_max_ms: max.as_millis() as u64,
            rng: Mutex::new(rng),
        }
    }
}

impl DurationProvider for ScaledDurations {
    fn travel(&self) -> Duration {
        self.travel
    }

    fn loading(&self) -> Duration {
        let mut rng = self.rng.lock().expect("duration rng mutex poisoned");
        let (low, high) = if self.loading_min_ms <= self.loading_max_ms {
            (self.loading_min_ms, self.loading_max_ms)
        } else {
            (self.loading_max_ms, self.loading_min_ms)
        };
        Duration::from_millis(rng.gen_range(low..=high))
    }

    fn unloading(&self) -> Duration {
        self.unloading
    }
}

/// Constant durations, mainly for deterministic tests.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FixedDurations {
    pub travel: Duration,
    pub loading: Duration,
    pub unloading: Duration,
}

impl FixedDurations {
    /// Same duration for every phase.
    pub fn uniform(duration: Duration) -> Self {
        Self {
            travel: duration,
            loading: duration,
            unloading: duration,
        }
    }
}

impl DurationProvider for FixedDurations {
    fn travel(&self) -> Duration {
        self.travel
    }

    fn loading(&self) -> Duration {
        self.loading
    }

    fn unloading(&self) -> Duration {
        self.unloading
    }
}
