//! Simulation knobs and their scaled wall-clock equivalents.

use std::time::Duration;

use crate::error::ConfigError;

const MILLIS_PER_MINUTE: u64 = 60 * 1000;
const MILLIS_PER_HOUR: u64 = 60 * MILLIS_PER_MINUTE;

/// Simulated-time settings. Every duration is divided by `speed_factor`
/// before it is slept on.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SimConfig {
    pub trucks: u32,
    pub stations: u32,
    /// One-way trip between the mine and the unloading area.
    pub travel_minutes: u64,
    pub unload_minutes: u64,
    pub loading_min_hours: u64,
    pub loading_max_hours: u64,
    pub simulation_hours: u64,
    pub speed_factor: u32,
    /// Seed for the loading-time RNG; `None` seeds from entropy.
    pub seed: Option<u64>,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            trucks: 1,
            stations: 1,
            travel_minutes: 30,
            unload_minutes: 5,
            loading_min_hours: 1,
            loading_max_hours: 5,
            simulation_hours: 72,
            speed_factor: 100,
            seed: None,
        }
    }
}

impl SimConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.trucks == 0 {
            return Err(ConfigError::NoTrucks);
        }
        if self.stations == 0 {
            return Err(ConfigError::NoStations);
        }
        if self.speed_factor == 0 {
            return Err(ConfigError::ZeroSpeedFactor);
        }
        if self.loading_min_hours > self.loading_max_hours {
            return Err(ConfigError::LoadingBounds {
                min: self.loading_min_hours,
                max: self.loading_max_hours,
            });
        }
        Ok(())
    }

    pub fn travel_duration(&self) -> Duration {
        self.scale(self.travel_minutes * MILLIS_PER_MINUTE)
    }

    pub fn unload_duration(&self) -> Duration {
        self.scale(self.unload_minutes * MILLIS_PER_MINUTE)
    }

    /// Scaled `(min, max)` loading bounds.
    pub fn loading_bounds(&self) -> (Duration, Duration) {
        (
            self.scale(self.loading_min_hours * MILLIS_PER_HOUR),
            self.scale(self.loading_max_hours * MILLIS_PER_HOUR),
        )
    }

    pub fn simulation_duration(&self) -> Duration {
        self.scale(self.simulation_hours * MILLIS_PER_HOUR)
    }

    fn scale(&self, millis: u64) -> Duration {
        Duration::from_millis(millis) / self.speed_factor.max(1)
    }
}
