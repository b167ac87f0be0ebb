//! Shared identifiers and lifecycle values used across the simulation.

use std::fmt;

/// Unique identifier for a mining truck.
pub type TruckId = u32;
/// Unique identifier for an unloading station.
pub type StationId = u32;

/// Lifecycle phase of a truck.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum TruckState {
    #[default]
    Empty = 0,
    TravelToMineSite = 1,
    TravelToUnloadingStation = 2,
    ApproachingToMineSite = 3,
    LoadingMine = 4,
    ApproachingUnloadingStation = 5,
    Unloading = 6,
    WaitingInQueue = 7,
}

impl TruckState {
    /// Every lifecycle value in declaration order.
    pub const ALL: [TruckState; 8] = [
        TruckState::Empty,
        TruckState::TravelToMineSite,
        TruckState::TravelToUnloadingStation,
        TruckState::ApproachingToMineSite,
        TruckState::LoadingMine,
        TruckState::ApproachingUnloadingStation,
        TruckState::Unloading,
        TruckState::WaitingInQueue,
    ];

    /// Position of this value in [`TruckState::ALL`].
    pub fn index(self) -> usize {
        self as usize
    }

    pub(crate) fn from_index(index: u8) -> Option<Self> {
        Self::ALL.get(index as usize).copied()
    }

    pub fn as_str(self) -> &'static str {
        match self {
            TruckState::Empty => "empty",
            TruckState::TravelToMineSite => "travel_to_mine_site",
            TruckState::TravelToUnloadingStation => "travel_to_unloading_station",
            TruckState::ApproachingToMineSite => "approaching_to_mine_site",
            TruckState::LoadingMine => "loading_mine",
            TruckState::ApproachingUnloadingStation => "approaching_unloading_station",
            TruckState::Unloading => "unloading",
            TruckState::WaitingInQueue => "waiting_in_queue",
        }
    }
}

impl fmt::Display for TruckState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How a suspension on a truck ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WaitOutcome {
    /// The full duration elapsed, or the awaited signal arrived.
    Completed,
    /// Stop was requested before the wait could complete.
    Interrupted,
}

impl WaitOutcome {
    pub fn is_completed(self) -> bool {
        matches!(self, WaitOutcome::Completed)
    }
}
