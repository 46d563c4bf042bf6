//! Shared control state for the tick loop and the input reader.
//!
//! The tick loop owns all aircraft state. The one piece of control data that
//! crosses threads is the running flag: it is flipped on game over or an
//! operator stop, and polled by the reader between lines. It is an atomic
//! behind an [`Arc`](std::sync::Arc) so neither side takes a lock.

use std::sync::atomic::{AtomicBool, Ordering};

use serde::{Deserialize, Serialize};

use runway_types::GameOverCause;

use crate::config::SimulationBoundsConfig;

/// Reason the simulation loop ended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SimulationEndReason {
    /// A terminal condition ended the game.
    GameOver(GameOverCause),
    /// The configured `max_ticks` limit was reached.
    MaxTicksReached,
    /// A stop was requested from outside the tick loop.
    OperatorStop,
}

impl core::fmt::Display for SimulationEndReason {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::GameOver(cause) => write!(f, "game over: {cause}"),
            Self::MaxTicksReached => f.write_str("tick limit reached"),
            Self::OperatorStop => f.write_str("stopped by operator"),
        }
    }
}

/// Cross-thread control flags.
#[derive(Debug)]
pub struct ControlState {
    /// Cleared once the simulation stops; the reader exits on its next line.
    running: AtomicBool,

    /// Wall-clock pause between ticks in milliseconds.
    tick_interval_ms: u64,

    /// Maximum number of ticks (0 = unlimited).
    max_ticks: u64,
}

impl ControlState {
    /// Create a running control state.
    ///
    /// A zero interval runs ticks back to back.
    pub const fn new(tick_interval_ms: u64, bounds: &SimulationBoundsConfig) -> Self {
        Self {
            running: AtomicBool::new(true),
            tick_interval_ms,
            max_ticks: bounds.max_ticks,
        }
    }

    /// Whether the simulation is still running.
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Acquire)
    }

    /// Flip the running flag off. Idempotent.
    pub fn request_stop(&self) {
        self.running.store(false, Ordering::Release);
    }

    /// Wall-clock pause between ticks in milliseconds.
    pub const fn tick_interval_ms(&self) -> u64 {
        self.tick_interval_ms
    }

    /// Whether `ticks_run` has reached the configured limit.
    pub const fn tick_limit_reached(&self, ticks_run: u64) -> bool {
        self.max_ticks > 0 && ticks_run >= self.max_ticks
    }

    /// Configured tick limit (0 = unlimited).
    pub const fn max_ticks(&self) -> u64 {
        self.max_ticks
    }
}
