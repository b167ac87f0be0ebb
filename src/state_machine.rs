//! Truck lifecycle behaviors and the table that maps states to them.
//!
//! Each lifecycle value is bound to a [`Behavior`]: a task to perform and the
//! state that follows it. Behaviors hold no per-truck data, so one static
//! table is shared by every executor thread.
//!
//! A full cycle runs:
//!
//! ```text
//! empty -> travel_to_mine_site -> approaching_to_mine_site -> loading_mine
//!   -> travel_to_unloading_station -> approaching_unloading_station
//!   -> waiting_in_queue -> unloading -> empty
//! ```

use std::sync::Arc;

use crate::dispatch;
use crate::durations::DurationProvider;
use crate::station::Station;
use crate::truck::Truck;
use crate::types::TruckState;

/// Everything a behavior may consult besides the truck itself.
pub struct StateContext<'a> {
    pub stations: &'a [Arc<Station>],
    pub durations: &'a dyn DurationProvider,
}

type Task = fn(&Arc<Truck>, &StateContext<'_>);

/// Task and successor for one lifecycle value.
#[derive(Clone, Copy)]
pub struct Behavior {
    task: Task,
    next: TruckState,
}

impl Behavior {
    const fn new(task: Task, next: TruckState) -> Self {
        Self { task, next }
    }

    /// Successor state; independent of the truck and the outcome of the task.
    pub fn next_state(&self) -> TruckState {
        self.next
    }

    pub fn perform_task(&self, truck: &Arc<Truck>, ctx: &StateContext<'_>) {
        (self.task)(truck, ctx);
    }

    /// Perform the task, then move the truck to the successor state.
    pub fn handle(&self, truck: &Arc<Truck>, ctx: &StateContext<'_>) {
        self.perform_task(truck, ctx);
        truck.set_state(self.next);
    }
}

fn no_task(_truck: &Arc<Truck>, _ctx: &StateContext<'_>) {}

fn travel(truck: &Arc<Truck>, ctx: &StateContext<'_>) {
    // An interrupted trip is not credited.
    if truck.wait(ctx.durations.travel()).is_completed() {
        truck.increment_travel_count();
    }
}

fn load(truck: &Arc<Truck>, ctx: &StateContext<'_>) {
    let loading_time = ctx.durations.loading();
    if truck.wait(loading_time).is_completed() {
        truck.record_loading(loading_time);
    }
}

fn unload(truck: &Arc<Truck>, _ctx: &StateContext<'_>) {
    if truck.wait_for_unload_signal().is_completed() {
        truck.increment_unload_count();
    }
}

fn join_shortest_queue(truck: &Arc<Truck>, ctx: &StateContext<'_>) {
    dispatch::dispatch(truck, ctx.stations);
}

static STANDARD_BEHAVIORS: [Behavior; 8] = [
    // empty
    Behavior::new(no_task, TruckState::TravelToMineSite),
    // travel_to_mine_site
    Behavior::new(travel, TruckState::ApproachingToMineSite),
    // travel_to_unloading_station
    Behavior::new(travel, TruckState::ApproachingUnloadingStation),
    // approaching_to_mine_site
    Behavior::new(no_task, TruckState::LoadingMine),
    // loading_mine
    Behavior::new(load, TruckState::TravelToUnloadingStation),
    // approaching_unloading_station
    Behavior::new(no_task, TruckState::WaitingInQueue),
    // unloading
    Behavior::new(unload, TruckState::Empty),
    // waiting_in_queue
    Behavior::new(join_shortest_queue, TruckState::Unloading),
];

/// Lookup from lifecycle value to behavior. Missing entries are allowed.
#[derive(Clone)]
pub struct StateTable {
    behaviors: [Option<&'static Behavior>; 8],
}

impl StateTable {
    /// Table with every lifecycle value bound.
    pub fn standard() -> Self {
        let mut behaviors = [None; 8];
        for (slot, behavior) in behaviors.iter_mut().zip(STANDARD_BEHAVIORS.iter()) {
            *slot = Some(behavior);
        }
        Self { behaviors }
    }

    /// Same table with `state` unbound.
    pub fn without(mut self, state: TruckState) -> Self {
        self.behaviors[state.index()] = None;
        self
    }

    pub fn lookup(&self, state: TruckState) -> Option<&'static Behavior> {
        self.behaviors[state.index()]
    }
}

impl Default for StateTable {
    fn default() -> Self {
        Self::standard()
    }
}
