//! Enumeration types for engine status and terminal conditions.

use serde::{Deserialize, Serialize};

use crate::call_sign::CallSign;

/// Lifecycle state of the tick engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum EngineStatus {
    /// Ticks are still being scheduled.
    Running,
    /// A terminal condition was reached. There is no way back.
    GameOver(GameOverCause),
}

impl EngineStatus {
    /// Whether the engine has reached a terminal condition.
    pub const fn is_over(&self) -> bool {
        matches!(self, Self::GameOver(_))
    }
}

/// The terminal condition that ended the game.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "cause", rename_all = "snake_case")]
pub enum GameOverCause {
    /// An aircraft in the airspace ran out of fuel.
    FuelExhaustion {
        /// The aircraft that ran dry.
        call_sign: CallSign,
    },
    /// More aircraft were holding than the airspace allows.
    Overcrowding {
        /// Number of aircraft in the airspace.
        count: usize,
        /// Configured airspace capacity.
        capacity: usize,
    },
    /// A queued aircraft other than the queue head reached touchdown.
    OutOfOrderLanding {
        /// The aircraft that touched down out of turn.
        call_sign: CallSign,
    },
}

impl core::fmt::Display for GameOverCause {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::FuelExhaustion { call_sign } => {
                write!(f, "plane {call_sign} ran out of fuel")
            }
            Self::Overcrowding { count, capacity } => {
                write!(
                    f,
                    "overcrowding: {count} planes in the air (limit {capacity})"
                )
            }
            Self::OutOfOrderLanding { call_sign } => {
                write!(
                    f,
                    "plane {call_sign} reached zero time to land while not at the front of the queue"
                )
            }
        }
    }
}
