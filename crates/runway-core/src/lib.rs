//! Tick engine, landing queue, and command channel for the Runway tower
//! simulation.
//!
//! This crate owns the tick cycle that drives the simulation: age the
//! airspace, count the landing queue down, generate arrivals, and apply the
//! operator commands queued since the previous tick.
//!
//! # Modules
//!
//! - [`channel`] -- [`CommandSource`] trait and the thread-safe
//!   [`CommandChannel`].
//! - [`clock`] -- Elapsed seconds and the arrival timer.
//! - [`collection`] -- Insertion-ordered collection with key lookup and
//!   rank ordering.
//! - [`command`] -- Operator command grammar.
//! - [`config`] -- Configuration loading from `runway-config.yaml` into
//!   strongly-typed structs.
//! - [`control`] -- Cross-thread running flag, fixed tick interval, and tick bound.
//! - [`generator`] -- Random arrivals with unique call signs.
//! - [`landing`] -- Landing queue: grant, delay, countdown, touchdown.
//! - [`reader`] -- Background thread feeding input lines into a channel.
//! - [`runner`] -- The async tick loop.
//! - [`tick`] -- One tick of the simulation.
//!
//! [`CommandSource`]: channel::CommandSource
//! [`CommandChannel`]: channel::CommandChannel

pub mod channel;
pub mod clock;
pub mod collection;
pub mod command;
pub mod config;
pub mod control;
pub mod generator;
pub mod landing;
pub mod reader;
pub mod runner;
pub mod tick;
