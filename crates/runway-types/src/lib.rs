//! Shared type definitions for the Runway tower simulation.
//!
//! This crate holds the plain data that flows between the engine core and
//! the terminal front end: aircraft records, call signs, terminal causes,
//! and the per-tick state snapshot handed to the renderer.
//!
//! # Modules
//!
//! - [`call_sign`] -- Normalized four-letter aircraft identifiers
//! - [`aircraft`] -- The per-plane state record
//! - [`enums`] -- Engine status and game-over causes
//! - [`snapshot`] -- Read-only view of the simulation for rendering

pub mod aircraft;
pub mod call_sign;
pub mod enums;
pub mod snapshot;

// Re-export all public types at crate root for convenience.
pub use aircraft::Aircraft;
pub use call_sign::{CALL_SIGN_LEN, CallSign};
pub use enums::{EngineStatus, GameOverCause};
pub use snapshot::{AircraftView, Snapshot};
