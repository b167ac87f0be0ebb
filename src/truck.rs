//! Mining truck entity: lifecycle state, counters and its two signals.

use std::fmt;
use std::sync::atomic::{AtomicU8, AtomicU64, Ordering};
use std::sync::{Arc, Condvar, Mutex};
use std::time::{Duration, Instant};

use crate::stop::StopToken;
use crate::types::{TruckId, TruckState, WaitOutcome};

struct SignalState {
    // One-shot slot set by the station and consumed by the waiting truck.
    unload_complete: bool,
}

struct Signal {
    state: Mutex<SignalState>,
    wake: Condvar,
}

impl Signal {
    fn lock(&self) -> std::sync::MutexGuard<'_, SignalState> {
        self.state.lock().expect("truck signal mutex poisoned")
    }

    fn wake_all(&self) {
        // Notify under the guard so a waiter between its check and its wait
        // cannot miss the wake-up.
        let _guard = self.lock();
        self.wake.notify_all();
    }
}

/// A truck cycling between the mine and the unloading stations.
///
/// State and counters are atomics so reporting threads can take snapshots;
/// the signal guard only covers the unload slot and stop wake-ups.
pub struct Truck {
    id: TruckId,
    state: AtomicU8,
    travel_count: AtomicU64,
    unload_count: AtomicU64,
    load_count: AtomicU64,
    loading_time_ms: AtomicU64,
    signal: Arc<Signal>,
    stop: StopToken,
}

impl Truck {
    /// Create an empty truck with its own stop token.
    pub fn new(id: TruckId) -> Self {
        Self::with_stop_token(id, StopToken::new())
    }

    /// Create an empty truck observing a caller-provided stop token.
    ///
    /// Cancelling the token from anywhere wakes this truck's waiters.
    pub fn with_stop_token(id: TruckId, stop: StopToken) -> Self {
        let signal = Arc::new(Signal {
            state: Mutex::new(SignalState {
                unload_complete: false,
            }),
            wake: Condvar::new(),
        });
        let waker = Arc::downgrade(&signal);
        stop.on_cancel(move || {
            if let Some(signal) = waker.upgrade() {
                signal.wake_all();
            }
        });
        Self {
            id,
            state: AtomicU8::new(TruckState::Empty as u8),
            travel_count: AtomicU64::new(0),
            unload_count: AtomicU64::new(0),
            load_count: AtomicU64::new(0),
            loading_time_ms: AtomicU64::new(0),
            signal,
            stop,
        }
    }

    pub fn id(&self) -> TruckId {
        self.id
    }

    pub fn state(&self) -> TruckState {
        let raw = self.state.load(Ordering::SeqCst);
        TruckState::from_index(raw).unwrap_or_default()
    }

    /// Overwrite the current state. Transition legality lives in the state machine.
    pub fn set_state(&self, state: TruckState) {
        self.state.store(state as u8, Ordering::SeqCst);
    }

    pub fn increment_travel_count(&self) {
        self.travel_count.fetch_add(1, Ordering::SeqCst);
    }

    pub fn increment_unload_count(&self) {
        self.unload_count.fetch_add(1, Ordering::SeqCst);
    }

    /// Accrue one completed loading and its duration.
    pub fn record_loading(&self, loading_time: Duration) {
        let millis = u64::try_from(loading_time.as_millis()).unwrap_or(u64::MAX);
        self.loading_time_ms.fetch_add(millis, Ordering::SeqCst);
        self.load_count.fetch_add(1, Ordering::SeqCst);
    }

    pub fn travel_count(&self) -> u64 {
        self.travel_count.load(Ordering::SeqCst)
    }

    pub fn unload_count(&self) -> u64 {
        self.unload_count.load(Ordering::SeqCst)
    }

    pub fn load_count(&self) -> u64 {
        self.load_count.load(Ordering::SeqCst)
    }

    pub fn total_loading_time(&self) -> Duration {
        Duration::from_millis(self.loading_time_ms.load(Ordering::SeqCst))
    }

    pub fn stop_requested(&self) -> bool {
        self.stop.is_cancelled()
    }

    /// Block until a station reports this truck unloaded, or stop is requested.
    ///
    /// A notification delivered before this call is not lost: it is consumed
    /// immediately.
    pub fn wait_for_unload_signal(&self) -> WaitOutcome {
        let guard = self.signal.lock();
        let mut guard = self
            .signal
            .wake
            .wait_while(guard, |state| {
                !state.unload_complete && !self.stop.is_cancelled()
            })
            .expect("condvar wait failed");
        if guard.unload_complete {
            guard.unload_complete = false;
            WaitOutcome::Completed
        } else {
            WaitOutcome::Interrupted
        }
    }

    /// Wake the truck waiting in `wait_for_unload_signal`.
    pub fn notify_unload_complete(&self) {
        let mut guard = self.signal.lock();
        guard.unload_complete = true;
        self.signal.wake.notify_all();
    }

    /// Suspend for up to `duration`; returns early if stop is requested.
    pub fn wait(&self, duration: Duration) -> WaitOutcome {
        let deadline = Instant::now() + duration;
        let mut guard = self.signal.lock();
        loop {
            if self.stop.is_cancelled() {
                return WaitOutcome::Interrupted;
            }
            let now = Instant::now();
            if now >= deadline {
                return WaitOutcome::Completed;
            }
            let (next, _) = self
                .signal
                .wake
                .wait_timeout(guard, deadline - now)
                .expect("condvar wait failed");
            guard = next;
        }
    }

    /// Request stop and wake every waiter. Idempotent.
    pub fn request_stop(&self) {
        self.stop.cancel();
    }
}

impl fmt::Debug for Truck {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Truck")
            .field("id", &self.id)
            .field("state", &self.state())
            .field("travel_count", &self.travel_count())
            .field("unload_count", &self.unload_count())
            .field("load_count", &self.load_count())
            .field("total_loading_time", &self.total_loading_time())
            .finish()
    }
}
