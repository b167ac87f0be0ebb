//! Unloading station: a FIFO of waiting trucks served one at a time.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::{Duration, Instant};

use tracing::{debug, trace};

use crate::blocking_queue::BlockingQueue;
use crate::stop::StopToken;
use crate::truck::Truck;
use crate::types::{StationId, TruckId};

/// How long the service loop blocks on an empty queue before re-checking stop.
pub const STATION_POLL_INTERVAL: Duration = Duration::from_millis(1000);

#[derive(Clone, Copy, Debug)]
struct Service {
    truck: TruckId,
    started: Instant,
}

pub struct Station {
    id: StationId,
    unload_duration: Duration,
    unload_count: AtomicU64,
    queue: BlockingQueue<Arc<Truck>>,
    current: Mutex<Option<Service>>,
    stop: StopToken,
}

impl Station {
    /// Create an idle station whose every unload takes `unload_duration`.
    pub fn new(id: StationId, unload_duration: Duration) -> Self {
        Self::with_stop_token(id, unload_duration, StopToken::new())
    }

    pub fn with_stop_token(id: StationId, unload_duration: Duration, stop: StopToken) -> Self {
        Self {
            id,
            unload_duration,
            unload_count: AtomicU64::new(0),
            queue: BlockingQueue::new(),
            current: Mutex::new(None),
            stop,
        }
    }

    pub fn id(&self) -> StationId {
        self.id
    }

    pub fn unload_count(&self) -> u64 {
        self.unload_count.load(Ordering::SeqCst)
    }

    /// Number of trucks waiting behind the one being unloaded.
    pub fn queued(&self) -> usize {
        self.queue.len()
    }

    /// Truck currently being unloaded, if any.
    pub fn unloading_truck(&self) -> Option<TruckId> {
        let guard = self.current.lock().expect("station service mutex poisoned");
        guard.map(|service| service.truck)
    }

    /// Enqueue a truck for unloading. Never blocks.
    pub fn push_to_queue(&self, truck: Arc<Truck>) {
        trace!(station = self.id, truck = truck.id(), "truck queued");
        self.queue.push(truck);
    }

    /// Expected wait for a truck joining the queue now.
    ///
    /// Queued trucks each cost one full unload; the truck in service costs
    /// whatever is left of its unload. The snapshot may be slightly stale.
    pub fn waiting_time_estimate(&self) -> Duration {
        let queued = u32::try_from(self.queue.len()).unwrap_or(u32::MAX);
        let remaining = {
            let guard = self.current.lock().expect("station service mutex poisoned");
            guard
                .map(|service| {
                    self.unload_duration
                        .saturating_sub(service.started.elapsed())
                })
                .unwrap_or(Duration::ZERO)
        };
        self.unload_duration.saturating_mul(queued) + remaining
    }

    /// Service loop. Returns once stop is observed between unloads.
    ///
    /// An unload already in progress is finished before stop is honored.
    pub fn run(&self) {
        debug!(station = self.id, "station open");
        while !self.stop.is_cancelled() {
            let Some(truck) = self.queue.pop(STATION_POLL_INTERVAL) else {
                continue;
            };
            self.begin_service(truck.id());
            debug!(station = self.id, truck = truck.id(), "unloading started");
            thread::sleep(self.unload_duration);
            truck.notify_unload_complete();
            self.finish_service();
            self.unload_count.fetch_add(1, Ordering::SeqCst);
            debug!(station = self.id, truck = truck.id(), "unloading finished");
        }
        debug!(
            station = self.id,
            unloads = self.unload_count(),
            left_queued = self.queued(),
            "station closed"
        );
    }

    /// Ask the service loop to exit at its next check.
    pub fn request_stop(&self) {
        self.stop.cancel();
    }

    fn begin_service(&self, truck: TruckId) {
        let mut guard = self.current.lock().expect("station service mutex poisoned");
        *guard = Some(Service {
            truck,
            started: Instant::now(),
        });
    }

    fn finish_service(&self) {
        let mut guard = self.current.lock().expect("station service mutex poisoned");
        *guard = None;
    }
}

impl fmt::Debug for Station {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Station")
            .field("id", &self.id)
            .field("unload_count", &self.unload_count())
            .field("queued", &self.queued())
            .field("unloading_truck", &self.unloading_truck())
            .finish()
    }
}
