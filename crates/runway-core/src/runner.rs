//! Simulation loop runner.
//!
//! [`run_simulation`] drives [`run_tick`] on a fixed wall-clock interval
//! until one of these happens:
//!
//! - a tick ends the game (fuel, overcrowding, or out-of-order landing)
//! - the optional `max_ticks` bound is reached
//! - a stop is requested through [`ControlState`]
//!
//! Rendering happens in the [`TickCallback`], after every tick including
//! the one that ends the game.
//!
//! [`run_tick`]: crate::tick::run_tick

use std::sync::Arc;

use tracing::{info, warn};

use crate::channel::CommandSource;
use crate::control::{ControlState, SimulationEndReason};
use crate::tick::{self, SimulationState, TickError, TickSummary};

/// Errors that can occur during the simulation run.
#[derive(Debug, thiserror::Error)]
pub enum RunnerError {
    /// A tick execution failed.
    #[error("tick error: {source}")]
    Tick {
        /// The underlying tick error.
        #[from]
        source: TickError,
    },
}

/// Result of the simulation run.
#[derive(Debug)]
pub struct SimulationResult {
    /// The reason the simulation ended.
    pub end_reason: SimulationEndReason,
    /// The last tick summary, if any tick completed.
    pub final_summary: Option<TickSummary>,
    /// Total number of ticks executed.
    pub total_ticks: u64,
    /// Number of aircraft landed.
    pub planes_landed: usize,
    /// Final score.
    pub score: u64,
}

/// Callback invoked after each tick completes.
///
/// The terminal renderer implements this; tests use [`NoOpCallback`].
pub trait TickCallback: Send {
    /// Called after a tick completes successfully.
    fn on_tick(&mut self, summary: &TickSummary, state: &SimulationState);
}

/// A no-op tick callback for testing.
pub struct NoOpCallback;

impl TickCallback for NoOpCallback {
    fn on_tick(&mut self, _summary: &TickSummary, _state: &SimulationState) {}
}

/// Run the simulation loop until a termination condition is met.
///
/// On game over the running flag in `control` is cleared so the input
/// reader winds down too.
///
/// # Errors
///
/// Returns [`RunnerError`] if a tick execution fails unrecoverably.
pub async fn run_simulation(
    state: &mut SimulationState,
    commands: &mut dyn CommandSource,
    control: &Arc<ControlState>,
    callback: &mut dyn TickCallback,
) -> Result<SimulationResult, RunnerError> {
    let mut last_summary: Option<TickSummary> = None;
    let mut total_ticks: u64 = 0;

    info!(
        max_ticks = control.max_ticks(),
        tick_interval_ms = control.tick_interval_ms(),
        capacity = state.rules.capacity,
        "Simulation starting"
    );

    loop {
        // --- Check stop request (before tick) ---
        if !control.is_running() {
            info!("Operator stop requested");
            return Ok(finish(
                state,
                SimulationEndReason::OperatorStop,
                last_summary,
                total_ticks,
            ));
        }

        // --- Execute tick ---
        let summary = tick::run_tick(state, commands)?;
        total_ticks = total_ticks.saturating_add(1);

        // --- Notify callback ---
        callback.on_tick(&summary, state);

        // --- Check game over ---
        if let Some(cause) = summary.game_over().cloned() {
            control.request_stop();
            return Ok(finish(
                state,
                SimulationEndReason::GameOver(cause),
                Some(summary),
                total_ticks,
            ));
        }

        // --- Check tick limit (after tick) ---
        if control.tick_limit_reached(total_ticks) {
            info!(
                tick = summary.tick,
                max_ticks = control.max_ticks(),
                "Tick limit reached"
            );
            control.request_stop();
            return Ok(finish(
                state,
                SimulationEndReason::MaxTicksReached,
                Some(summary),
                total_ticks,
            ));
        }

        last_summary = Some(summary);

        // --- Sleep for tick interval ---
        let interval_ms = control.tick_interval_ms();
        if interval_ms > 0 {
            tokio::time::sleep(tokio::time::Duration::from_millis(interval_ms)).await;
        }
    }
}

/// Build the result from the final state.
fn finish(
    state: &SimulationState,
    end_reason: SimulationEndReason,
    final_summary: Option<TickSummary>,
    total_ticks: u64,
) -> SimulationResult {
    SimulationResult {
        end_reason,
        final_summary,
        total_ticks,
        planes_landed: state.landed.len(),
        score: state.score,
    }
}

/// Log the simulation end sequence.
pub fn log_simulation_end(result: &SimulationResult) {
    info!(
        reason = %result.end_reason,
        total_ticks = result.total_ticks,
        planes_landed = result.planes_landed,
        score = result.score,
        "Simulation ended"
    );

    if result.final_summary.is_none() {
        warn!("Simulation ended with no ticks executed");
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use runway_types::{Aircraft, CallSign, GameOverCause};

    use super::*;
    use crate::channel::ScriptedCommands;
    use crate::config::{SimulationBoundsConfig, TrafficConfig};
    use crate::generator::PlaneGenerator;
    use crate::tick::TickRules;

    fn quiet_state() -> SimulationState {
        let traffic = TrafficConfig {
            base_generation_interval: 1_000,
            min_generation_interval: 1_000,
            ..TrafficConfig::default()
        };
        SimulationState::with_generator(TickRules::default(), PlaneGenerator::new(traffic, Some(1)))
    }

    fn control(max_ticks: u64) -> Arc<ControlState> {
        Arc::new(ControlState::new(0, &SimulationBoundsConfig { max_ticks }))
    }

    /// Records every tick it sees.
    #[derive(Default)]
    struct Recorder {
        ticks: Vec<u64>,
    }

    impl TickCallback for Recorder {
        fn on_tick(&mut self, summary: &TickSummary, _state: &SimulationState) {
            self.ticks.push(summary.tick);
        }
    }

    #[tokio::test]
    async fn bounded_by_max_ticks() {
        let mut state = quiet_state();
        let control = control(5);
        let mut cb = Recorder::default();

        let result = run_simulation(&mut state, &mut ScriptedCommands::default(), &control, &mut cb)
            .await
            .unwrap();

        assert_eq!(result.end_reason, SimulationEndReason::MaxTicksReached);
        assert_eq!(result.total_ticks, 5);
        assert_eq!(cb.ticks, vec![1, 2, 3, 4, 5]);
        assert!(!control.is_running());
    }

    #[tokio::test]
    async fn operator_stop() {
        let mut state = quiet_state();
        let control = control(0);
        control.request_stop();

        let result = run_simulation(
            &mut state,
            &mut ScriptedCommands::default(),
            &control,
            &mut NoOpCallback,
        )
        .await
        .unwrap();

        assert_eq!(result.end_reason, SimulationEndReason::OperatorStop);
        assert_eq!(result.total_ticks, 0);
        assert!(result.final_summary.is_none());
    }

    #[tokio::test]
    async fn game_over_stops_and_clears_running_flag() {
        let mut state = quiet_state();
        state
            .airspace
            .push_back(Aircraft::new(CallSign::new("LOWW"), 3, 5));
        let control = control(0);
        let mut cb = Recorder::default();

        let result = run_simulation(&mut state, &mut ScriptedCommands::default(), &control, &mut cb)
            .await
            .unwrap();

        assert_eq!(
            result.end_reason,
            SimulationEndReason::GameOver(GameOverCause::FuelExhaustion {
                call_sign: CallSign::new("LOWW")
            })
        );
        assert_eq!(result.total_ticks, 3);
        assert!(!control.is_running());
        // The final frame is still rendered.
        assert_eq!(cb.ticks.last(), Some(&3));
    }

    #[tokio::test]
    async fn landing_is_counted_in_result() {
        let mut state = quiet_state();
        state
            .airspace
            .push_back(Aircraft::new(CallSign::new("FAST"), 20, 2));
        let mut commands = ScriptedCommands::new(["fast 0"]);
        let control = control(4);

        let result = run_simulation(&mut state, &mut commands, &control, &mut NoOpCallback)
            .await
            .unwrap();

        // Granted at tick 1 with fuel 19; touches down at tick 3.
        assert_eq!(result.planes_landed, 1);
        assert_eq!(result.score, 29);
    }
}
