//! Landing queue manager.
//!
//! The queue is ordered by ascending priority, and after every grant or
//! landing the priorities are renumbered to the dense sequence `0..len`.
//! Priority is therefore a rank that always matches queue position, which is
//! what makes the out-of-order touchdown check meaningful.
//!
//! Conflicting grants displace rather than reject: asking for priority `P`
//! pushes every queued aircraft at `P` or later back by one.

use runway_types::{Aircraft, CallSign};
use tracing::debug;

use crate::collection::OrderedCollection;

/// Aircraft holding in the airspace, in arrival order.
pub type Airspace = OrderedCollection<Aircraft>;

/// Recoverable order errors: the command named an aircraft that is not
/// where the command needs it.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum OrderError {
    /// A grant named an aircraft that is not holding in the airspace.
    #[error("no plane with call sign {0} found in airspace")]
    NotInAirspace(CallSign),

    /// A delay named an aircraft that is not in the landing queue.
    #[error("no plane with call sign {0} found in landing queue")]
    NotInLandingQueue(CallSign),
}

/// Result of a successful grant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Clearance {
    /// The cleared aircraft.
    pub call_sign: CallSign,
    /// Its priority after renumbering.
    pub priority: i32,
    /// Ticks until touchdown.
    pub time_to_land: i32,
}

/// Outcome of counting every queued aircraft down by one tick.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Countdown {
    /// Nobody reached touchdown, or the queue is empty.
    Holding,
    /// The queue head reached touchdown and may land.
    HeadTouchedDown,
    /// An aircraft behind the head reached touchdown first.
    OutOfOrder(CallSign),
}

/// The priority-ordered queue of cleared aircraft.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LandingQueue {
    aircraft: OrderedCollection<Aircraft>,
}

impl LandingQueue {
    /// Create an empty queue.
    pub const fn new() -> Self {
        Self {
            aircraft: OrderedCollection::new(),
        }
    }

    /// Number of queued aircraft.
    pub fn len(&self) -> usize {
        self.aircraft.len()
    }

    /// Whether the queue is empty.
    pub fn is_empty(&self) -> bool {
        self.aircraft.is_empty()
    }

    /// Iterate in landing order.
    pub fn iter(&self) -> impl Iterator<Item = &Aircraft> {
        self.aircraft.iter()
    }

    /// The aircraft next to land.
    pub fn head(&self) -> Option<&Aircraft> {
        self.aircraft.front()
    }

    /// Find a queued aircraft.
    pub fn find(&self, call_sign: &CallSign) -> Option<&Aircraft> {
        self.aircraft.find(call_sign)
    }

    /// Priorities in landing order.
    pub fn priorities(&self) -> Vec<i32> {
        self.aircraft.ranks()
    }

    /// Whether priorities are exactly `0..len`.
    pub fn is_contiguous(&self) -> bool {
        self.aircraft.is_dense()
    }

    /// Whether priorities never decrease along the queue.
    pub fn is_ascending(&self) -> bool {
        self.aircraft.is_ascending()
    }

    /// Clear an aircraft from the airspace to land at `priority`.
    ///
    /// Every queued aircraft at `priority` or later moves back by one, the
    /// target is inserted after any equal priorities, and the queue is
    /// renumbered from zero.
    ///
    /// # Errors
    ///
    /// Returns [`OrderError::NotInAirspace`] if the call sign is not holding
    /// in `airspace`. Nothing is changed in that case.
    pub fn grant(
        &mut self,
        airspace: &mut Airspace,
        call_sign: &CallSign,
        priority: i32,
    ) -> Result<Clearance, OrderError> {
        let mut aircraft = airspace
            .remove(call_sign)
            .ok_or_else(|| OrderError::NotInAirspace(call_sign.clone()))?;

        // Displacement is monotone, so a sorted queue stays sorted and the
        // insert position is the final rank.
        self.aircraft.sort_by_rank();
        for queued in self.aircraft.iter_mut() {
            if queued.priority >= priority {
                queued.priority = queued.priority.saturating_add(1);
            }
        }

        aircraft.grant(priority);
        let cleared_sign = aircraft.call_sign.clone();
        let time_to_land = aircraft.time_to_land;
        let position = self.aircraft.insert_by_rank(aircraft);
        self.aircraft.renumber();
        let rank = i32::try_from(position).unwrap_or(i32::MAX);

        debug!(
            call_sign = %cleared_sign,
            requested = priority,
            priority = rank,
            queue_len = self.aircraft.len(),
            "Landing clearance granted"
        );

        Ok(Clearance {
            call_sign: cleared_sign,
            priority: rank,
            time_to_land,
        })
    }

    /// Cancel a clearance and send the aircraft back to the airspace.
    ///
    /// The aircraft keeps its wait time and fuel and joins the back of the
    /// airspace. With `renumber` the remaining queue is renumbered from
    /// zero; without it the remaining priorities are left as they were
    /// (still ascending, possibly with a gap).
    ///
    /// # Errors
    ///
    /// Returns [`OrderError::NotInLandingQueue`] if the call sign is not
    /// queued. Nothing is changed in that case.
    pub fn delay(
        &mut self,
        airspace: &mut Airspace,
        call_sign: &CallSign,
        renumber: bool,
    ) -> Result<CallSign, OrderError> {
        let mut aircraft = self
            .aircraft
            .remove(call_sign)
            .ok_or_else(|| OrderError::NotInLandingQueue(call_sign.clone()))?;

        aircraft.revoke();
        let returned = aircraft.call_sign.clone();
        airspace.push_back(aircraft);

        if renumber {
            self.aircraft.renumber();
        }

        debug!(call_sign = %returned, renumber, "Landing delayed, aircraft returned to airspace");
        Ok(returned)
    }

    /// Count every queued aircraft down by one tick.
    ///
    /// Stops at the first aircraft behind the head that reaches touchdown,
    /// since that ends the game.
    pub fn count_down(&mut self) -> Countdown {
        let mut head_down = false;
        for (idx, aircraft) in self.aircraft.iter_mut().enumerate() {
            aircraft.count_down();
            if !aircraft.touched_down() {
                continue;
            }
            if idx == 0 {
                head_down = true;
            } else {
                return Countdown::OutOfOrder(aircraft.call_sign.clone());
            }
        }

        if head_down {
            Countdown::HeadTouchedDown
        } else {
            Countdown::Holding
        }
    }

    /// Remove the head if it has touched down and renumber the rest.
    pub fn land_head(&mut self) -> Option<Aircraft> {
        if !self.aircraft.front().is_some_and(Aircraft::touched_down) {
            return None;
        }
        let landed = self.aircraft.pop_front()?;
        self.aircraft.renumber();
        Some(landed)
    }

    /// Stable sort by priority, then renumber from zero.
    pub fn normalize(&mut self) {
        self.aircraft.sort_by_rank();
        self.aircraft.renumber();
    }

    /// Put an already-cleared aircraft at the back of the queue.
    ///
    /// Bypasses displacement; used to build states directly.
    pub fn push_back(&mut self, aircraft: Aircraft) {
        self.aircraft.push_back(aircraft);
    }
}
