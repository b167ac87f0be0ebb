//! Shortest-expected-wait station selection.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::station::Station;
use crate::truck::Truck;
use crate::types::StationId;

/// Station with the smallest waiting-time estimate; the earliest one wins ties.
pub fn select_station(stations: &[Arc<Station>]) -> Option<&Arc<Station>> {
    let mut best: Option<(&Arc<Station>, std::time::Duration)> = None;
    for station in stations {
        let estimate = station.waiting_time_estimate();
        match best {
            Some((_, shortest)) if estimate >= shortest => {}
            _ => best = Some((station, estimate)),
        }
    }
    best.map(|(station, _)| station)
}

/// Queue `truck` at the selected station and return that station's id.
///
/// Stations that trucks never prefer can starve; the choice is a heuristic
/// over possibly stale estimates.
pub fn dispatch(truck: &Arc<Truck>, stations: &[Arc<Station>]) -> Option<StationId> {
    let Some(station) = select_station(stations) else {
        warn!(truck = truck.id(), "no unloading station to dispatch to");
        return None;
    };
    debug!(
        truck = truck.id(),
        station = station.id(),
        estimate_ms = station.waiting_time_estimate().as_millis() as u64,
        "dispatching to shortest queue"
    );
    station.push_to_queue(Arc::clone(truck));
    Some(station.id())
}
