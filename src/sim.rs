//! Simulation driver: spawns station and truck workers, runs them for a fixed
//! wall-clock time, then stops and joins everything.

use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use tracing::{debug, error, info};

use crate::config::SimConfig;
use crate::durations::{DurationProvider, ScaledDurations};
use crate::error::{SimError, SimResult};
use crate::executor::Executor;
use crate::report::{SimulationReport, StationReport, TruckReport};
use crate::station::Station;
use crate::truck::Truck;

/// Best-effort process CPU user/system time snapshot (seconds) on Unix platforms.
#[cfg(unix)]
fn cpu_times_seconds() -> Option<(f64, f64)> {
    // SAFETY: rusage is plain old data; getrusage fully initializes it on success.
    let mut usage: libc::rusage = unsafe { std::mem::zeroed() };
    let rc = unsafe { libc::getrusage(libc::RUSAGE_SELF, &mut usage) };
    if rc != 0 {
        return None;
    }
    let seconds =
        |tv: libc::timeval| tv.tv_sec as f64 + (tv.tv_usec as f64 / 1_000_000.0);
    Some((seconds(usage.ru_utime), seconds(usage.ru_stime)))
}

/// Stub on non-Unix platforms.
#[cfg(not(unix))]
fn cpu_times_seconds() -> Option<(f64, f64)> {
    None
}

fn spawn_worker<F>(name: String, work: F) -> SimResult<thread::JoinHandle<()>>
where
    F: FnOnce() + Send + 'static,
{
    thread::Builder::new()
        .name(name.clone())
        .spawn(work)
        .map_err(|source| SimError::Spawn {
            worker: name,
            source,
        })
}

#[derive(Default)]
struct Workers {
    stations: Vec<Arc<Station>>,
    trucks: Vec<Arc<Truck>>,
    executors: Vec<Arc<Executor>>,
    handles: Vec<(String, thread::JoinHandle<()>)>,
}

impl Workers {
    /// Request stop on every entity, then join every worker thread.
    ///
    /// All workers are joined even if one of them panicked; the first
    /// panicked worker is reported.
    fn shutdown(&mut self) -> SimResult<()> {
        for station in &self.stations {
            station.request_stop();
        }
        for executor in &self.executors {
            executor.request_stop();
        }
        for truck in &self.trucks {
            truck.request_stop();
        }

        let mut failure = None;
        for (name, handle) in self.handles.drain(..) {
            if handle.join().is_err() {
                error!(worker = %name, "worker panicked");
                failure.get_or_insert(SimError::WorkerPanicked { worker: name });
            }
        }
        match failure {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

/// A fleet of trucks contending for a set of unloading stations.
pub struct Simulation {
    config: SimConfig,
    durations: Arc<dyn DurationProvider>,
}

impl Simulation {
    /// Validate `config` and derive scaled, randomized durations from it.
    pub fn new(config: SimConfig) -> SimResult<Self> {
        let durations = Arc::new(ScaledDurations::from_config(&config));
        Self::with_durations(config, durations)
    }

    /// Use caller-supplied durations instead of ones derived from `config`.
    pub fn with_durations(
        config: SimConfig,
        durations: Arc<dyn DurationProvider>,
    ) -> SimResult<Self> {
        config.validate()?;
        Ok(Self { config, durations })
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    /// Run for the configured, scaled simulation time.
    pub fn run(&self) -> SimResult<SimulationReport> {
        self.run_for(self.config.simulation_duration())
    }

    /// Run for `wall_time`, then stop every worker and collect statistics.
    pub fn run_for(&self, wall_time: Duration) -> SimResult<SimulationReport> {
        let cpu_start = cpu_times_seconds();
        let start = Instant::now();
        let mut workers = Workers::default();

        if let Err(err) = self.start_workers(&mut workers) {
            if let Err(join_err) = workers.shutdown() {
                error!(%join_err, "shutdown after failed start");
            }
            return Err(err);
        }

        info!(
            trucks = self.config.trucks,
            stations = self.config.stations,
            wall_ms = wall_time.as_millis() as u64,
            "simulation running"
        );
        thread::sleep(wall_time);

        debug!("stopping workers");
        workers.shutdown()?;
        let elapsed = start.elapsed();
        info!(elapsed_ms = elapsed.as_millis() as u64, "simulation finished");

        let (cpu_user_s, cpu_sys_s) = match (cpu_start, cpu_times_seconds()) {
            (Some((user_start, sys_start)), Some((user_end, sys_end))) => {
                (Some(user_end - user_start), Some(sys_end - sys_start))
            }
            _ => (None, None),
        };

        Ok(SimulationReport {
            trucks: workers
                .trucks
                .iter()
                .map(|truck| TruckReport::snapshot(truck))
                .collect(),
            stations: workers
                .stations
                .iter()
                .map(|station| StationReport::snapshot(station))
                .collect(),
            elapsed,
            cpu_user_s,
            cpu_sys_s,
        })
    }

    fn start_workers(&self, workers: &mut Workers) -> SimResult<()> {
        let unload_duration = self.durations.unloading();
        for id in 1..=self.config.stations {
            let station = Arc::new(Station::new(id, unload_duration));
            workers.stations.push(Arc::clone(&station));
            let name = format!("station-{id}");
            let handle = spawn_worker(name.clone(), move || station.run())?;
            workers.handles.push((name, handle));
        }

        for id in 1..=self.config.trucks {
            let truck = Arc::new(Truck::new(id));
            let executor = Arc::new(Executor::new(Arc::clone(&self.durations)));
            workers.trucks.push(Arc::clone(&truck));
            workers.executors.push(Arc::clone(&executor));
            let stations = workers.stations.clone();
            let name = format!("truck-{id}");
            let handle = spawn_worker(name.clone(), move || executor.drive(&truck, &stations))?;
            workers.handles.push((name, handle));
        }
        Ok(())
    }
}
