//! Mining fleet simulation: trucks cycling between a mine and a set of
//! unloading stations, each truck and station running on its own thread.

pub mod blocking_queue;
pub mod config;
pub mod dispatch;
pub mod durations;
pub mod error;
pub mod executor;
pub mod logging;
pub mod report;
pub mod sim;
pub mod state_machine;
pub mod station;
pub mod stop;
pub mod truck;
pub mod types;

pub use blocking_queue::BlockingQueue;
pub use config::SimConfig;
pub use durations::{DurationProvider, FixedDurations, ScaledDurations};
pub use error::{ConfigError, SimError, SimResult};
pub use executor::Executor;
pub use report::{SimulationReport, StationReport, TruckReport};
pub use sim::Simulation;
pub use station::Station;
pub use stop::StopToken;
pub use truck::Truck;
pub use types::{StationId, TruckId, TruckState, WaitOutcome};
