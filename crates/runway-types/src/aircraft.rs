//! The aircraft record.
//!
//! An aircraft lives in exactly one place at a time: the airspace (waiting
//! for an order), the landing queue (cleared and counting down), or the
//! landed history. The engine moves the record between those collections;
//! the record itself only carries per-plane state.

use serde::{Deserialize, Serialize};

use crate::call_sign::CallSign;

/// State of a single aircraft.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Aircraft {
    /// Identifier, unique among aircraft in airspace and the landing queue.
    pub call_sign: CallSign,
    /// Remaining fuel in percent. Zero or below is terminal while airborne.
    pub fuel: i32,
    /// Ticks spent in the airspace.
    pub time_since_request: u32,
    /// Ticks remaining before touchdown. Only meaningful while queued.
    pub time_to_land: i32,
    /// Ticks needed to land once cleared, fixed at creation.
    pub landing_duration: i32,
    /// Rank in the landing queue. Only meaningful while queued.
    pub priority: i32,
    /// Whether the aircraft currently holds a landing clearance.
    pub permission_to_land: bool,
}

impl Aircraft {
    /// Create a freshly arrived aircraft with no clearance.
    pub const fn new(call_sign: CallSign, fuel: i32, landing_duration: i32) -> Self {
        Self {
            call_sign,
            fuel,
            time_since_request: 0,
            time_to_land: 0,
            landing_duration,
            priority: 0,
            permission_to_land: false,
        }
    }

    /// Clear the aircraft to land at the given queue priority.
    ///
    /// Resets the touchdown countdown to the full landing duration.
    pub const fn grant(&mut self, priority: i32) {
        self.priority = priority;
        self.time_to_land = self.landing_duration;
        self.permission_to_land = true;
    }

    /// Withdraw the landing clearance.
    pub const fn revoke(&mut self) {
        self.permission_to_land = false;
    }

    /// Apply one tick of holding: the wait grows and fuel burns.
    ///
    /// Returns the remaining fuel.
    pub const fn age(&mut self, burn: i32) -> i32 {
        self.time_since_request = self.time_since_request.saturating_add(1);
        self.fuel = self.fuel.saturating_sub(burn);
        self.fuel
    }

    /// Count the touchdown timer down by one tick.
    ///
    /// Returns the remaining ticks.
    pub const fn count_down(&mut self) -> i32 {
        self.time_to_land = self.time_to_land.saturating_sub(1);
        self.time_to_land
    }

    /// Whether the aircraft has run dry.
    pub const fn out_of_fuel(&self) -> bool {
        self.fuel <= 0
    }

    /// Whether the touchdown timer has expired.
    pub const fn touched_down(&self) -> bool {
        self.time_to_land <= 0
    }
}
