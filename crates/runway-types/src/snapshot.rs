//! Read-only view of the simulation handed to the renderer after each tick.

use serde::{Deserialize, Serialize};

use crate::aircraft::Aircraft;
use crate::call_sign::CallSign;

/// Display fields of one aircraft.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AircraftView {
    /// Aircraft identifier.
    pub call_sign: CallSign,
    /// Remaining fuel in percent.
    pub fuel: i32,
    /// Ticks spent waiting in the airspace.
    pub wait: u32,
    /// Ticks needed to land once cleared.
    pub landing_duration: i32,
    /// Ticks left before touchdown (queued aircraft only).
    pub time_to_land: i32,
    /// Queue rank (queued aircraft only).
    pub priority: i32,
}

impl From<&Aircraft> for AircraftView {
    fn from(a: &Aircraft) -> Self {
        Self {
            call_sign: a.call_sign.clone(),
            fuel: a.fuel,
            wait: a.time_since_request,
            landing_duration: a.landing_duration,
            time_to_land: a.time_to_land,
            priority: a.priority,
        }
    }
}

/// Everything the renderer needs to draw one frame.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    /// Simulated seconds since the start (one per tick).
    pub elapsed_seconds: u64,
    /// Current score.
    pub score: u64,
    /// Aircraft awaiting orders, in arrival order.
    pub airspace: Vec<AircraftView>,
    /// Cleared aircraft, in priority order.
    pub landing_queue: Vec<AircraftView>,
    /// Call signs of landed aircraft, in landing order.
    pub landed: Vec<CallSign>,
}
