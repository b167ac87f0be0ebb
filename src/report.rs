//! End-of-run statistics.

use std::fmt;
use std::time::Duration;

use crate::station::Station;
use crate::truck::Truck;
use crate::types::{StationId, TruckId};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TruckReport {
    pub id: TruckId,
    pub travel_count: u64,
    pub unload_count: u64,
    pub load_count: u64,
    pub total_loading_time: Duration,
}

impl TruckReport {
    /// Snapshot a truck; only meaningful once its executor has been joined.
    pub fn snapshot(truck: &Truck) -> Self {
        Self {
            id: truck.id(),
            travel_count: truck.travel_count(),
            unload_count: truck.unload_count(),
            load_count: truck.load_count(),
            total_loading_time: truck.total_loading_time(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StationReport {
    pub id: StationId,
    pub unload_count: u64,
    /// Trucks still waiting when the station shut down.
    pub left_queued: usize,
}

impl StationReport {
    pub fn snapshot(station: &Station) -> Self {
        Self {
            id: station.id(),
            unload_count: station.unload_count(),
            left_queued: station.queued(),
        }
    }
}

/// Aggregated results of one simulation run.
#[derive(Clone, Debug)]
pub struct SimulationReport {
    pub trucks: Vec<TruckReport>,
    pub stations: Vec<StationReport>,
    pub elapsed: Duration,
    pub cpu_user_s: Option<f64>,
    pub cpu_sys_s: Option<f64>,
}

impl SimulationReport {
    pub fn total_truck_unloads(&self) -> u64 {
        self.trucks.iter().map(|truck| truck.unload_count).sum()
    }

    pub fn total_station_unloads(&self) -> u64 {
        self.stations.iter().map(|station| station.unload_count).sum()
    }
}

fn format_seconds(value: Option<f64>) -> String {
    value
        .map(|v| format!("{v:.4}"))
        .unwrap_or_else(|| "NA".to_string())
}

impl fmt::Display for SimulationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "SIMULATION SUMMARY")?;
        writeln!(
            f,
            "trucks={} stations={} elapsed_ms={}",
            self.trucks.len(),
            self.stations.len(),
            self.elapsed.as_millis()
        )?;
        writeln!(
            f,
            "cpu_user_s={} cpu_sys_s={}",
            format_seconds(self.cpu_user_s),
            format_seconds(self.cpu_sys_s)
        )?;
        writeln!(f, "truck,travel_count,unload_count,load_count,total_loading_ms")?;
        for truck in &self.trucks {
            writeln!(
                f,
                "{},{},{},{},{}",
                truck.id,
                truck.travel_count,
                truck.unload_count,
                truck.load_count,
                truck.total_loading_time.as_millis()
            )?;
        }
        writeln!(f, "station,unload_count,left_queued")?;
        for station in &self.stations {
            writeln!(
                f,
                "{},{},{}",
                station.id, station.unload_count, station.left_queued
            )?;
        }
        write!(f, "total_unloads={}", self.total_station_unloads())
    }
}
