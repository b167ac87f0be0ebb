//! Per-truck driving loop.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use tracing::{debug, trace, warn};

use crate::durations::DurationProvider;
use crate::state_machine::{StateContext, StateTable};
use crate::station::Station;
use crate::stop::StopToken;
use crate::truck::Truck;

/// Pause between lookups while the truck sits in a state with no behavior.
pub const STALL_BACKOFF: Duration = Duration::from_millis(50);

/// Advances one truck through its lifecycle until stopped.
pub struct Executor {
    table: StateTable,
    durations: Arc<dyn DurationProvider>,
    stop: StopToken,
    stalled_ticks: AtomicU64,
}

impl Executor {
    pub fn new(durations: Arc<dyn DurationProvider>) -> Self {
        Self::with_table(StateTable::standard(), durations)
    }

    pub fn with_table(table: StateTable, durations: Arc<dyn DurationProvider>) -> Self {
        Self {
            table,
            durations,
            stop: StopToken::new(),
            stalled_ticks: AtomicU64::new(0),
        }
    }

    /// Drive `truck` one state at a time until stop is requested.
    ///
    /// Stop is checked between states; a task in progress is left to the
    /// truck's own interruptible waits.
    pub fn drive(&self, truck: &Arc<Truck>, stations: &[Arc<Station>]) {
        let ctx = StateContext {
            stations,
            durations: self.durations.as_ref(),
        };
        let mut warned_unbound = false;
        debug!(truck = truck.id(), "executor started");
        while !self.stop.is_cancelled() {
            let state = truck.state();
            let Some(behavior) = self.table.lookup(state) else {
                if !warned_unbound {
                    warn!(truck = truck.id(), %state, "no behavior bound for state; truck stalls");
                    warned_unbound = true;
                }
                self.stalled_ticks.fetch_add(1, Ordering::SeqCst);
                // Interrupted early when the truck is stopped.
                truck.wait(STALL_BACKOFF);
                continue;
            };
            behavior.handle(truck, &ctx);
            trace!(truck = truck.id(), from = %state, to = %truck.state(), "transition");
        }
        debug!(truck = truck.id(), state = %truck.state(), "executor stopped");
    }

    /// Ask the driving loop to exit before its next state.
    pub fn request_stop(&self) {
        self.stop.cancel();
    }

    /// Lookups that found no behavior for the truck's state.
    pub fn stalled_ticks(&self) -> u64 {
        self.stalled_ticks.load(Ordering::SeqCst)
    }
}
