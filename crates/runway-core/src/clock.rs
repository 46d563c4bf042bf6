//! Simulation clock.
//!
//! One tick is one simulated second. The clock also carries the arrival
//! timer, which the plane generator resets after each wave of arrivals and
//! may set negative to lengthen the cooldown after a double arrival.

/// Errors that can occur during clock operations.
#[derive(Debug, thiserror::Error)]
pub enum ClockError {
    /// A counter would overflow.
    #[error("clock overflow: cannot advance {counter} further")]
    Overflow {
        /// Which counter overflowed.
        counter: &'static str,
    },
}

/// Elapsed time and the arrival timer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SimulationClock {
    /// Simulated seconds since the start.
    seconds: u64,

    /// Ticks since the last arrival wave. Negative after a double arrival.
    generation_timer: i64,
}

impl SimulationClock {
    /// Create a clock at zero.
    pub const fn new() -> Self {
        Self {
            seconds: 0,
            generation_timer: 0,
        }
    }

    /// Advance both counters by one tick. Returns the new elapsed seconds.
    ///
    /// # Errors
    ///
    /// Returns [`ClockError::Overflow`] if either counter would overflow.
    pub fn advance(&mut self) -> Result<u64, ClockError> {
        let seconds = self
            .seconds
            .checked_add(1)
            .ok_or(ClockError::Overflow { counter: "seconds" })?;
        let timer = self
            .generation_timer
            .checked_add(1)
            .ok_or(ClockError::Overflow {
                counter: "generation timer",
            })?;
        self.seconds = seconds;
        self.generation_timer = timer;
        Ok(seconds)
    }

    /// Simulated seconds since the start.
    pub const fn seconds(&self) -> u64 {
        self.seconds
    }

    /// Ticks since the last arrival wave.
    pub const fn generation_timer(&self) -> i64 {
        self.generation_timer
    }

    /// Overwrite the arrival timer.
    pub const fn set_generation_timer(&mut self, value: i64) {
        self.generation_timer = value;
    }
}
