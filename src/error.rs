//! Error types for configuration and worker lifecycle failures.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("at least one truck is required")]
    NoTrucks,

    #[error("at least one unloading station is required")]
    NoStations,

    #[error("speed factor must be greater than zero")]
    ZeroSpeedFactor,

    #[error("loading bounds inverted: min {min}h > max {max}h")]
    LoadingBounds { min: u64, max: u64 },
}

#[derive(Debug, Error)]
pub enum SimError {
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("failed to spawn worker {worker}: {source}")]
    Spawn {
        worker: String,
        #[source]
        source: std::io::Error,
    },

    #[error("worker {worker} panicked before shutdown")]
    WorkerPanicked { worker: String },
}

pub type SimResult<T> = Result<T, SimError>;
