//! Terminal binary for the Runway tower simulation.
//!
//! Wires the tick loop to a terminal: operator commands come in on stdin
//! through a background reader thread, and every tick is drawn on stdout.
//! Logs go to stderr so they never interleave with the game screen.
//!
//! # Startup Sequence
//!
//! 1. Load configuration from `runway-config.yaml` (optional)
//! 2. Initialize structured logging (tracing)
//! 3. Show the welcome screen and wait for ENTER
//! 4. Spawn the stdin reader feeding the command channel
//! 5. Run the simulation loop until game over
//! 6. Print the final summary

mod error;
mod render;

use std::io::{self, BufRead, BufReader};
use std::path::Path;
use std::sync::Arc;

use runway_core::channel::CommandChannel;
use runway_core::config::SimulationConfig;
use runway_core::control::ControlState;
use runway_core::reader;
use runway_core::runner;
use runway_core::tick::SimulationState;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::error::EngineError;
use crate::render::TerminalRenderer;

/// Config file looked up in the working directory.
const CONFIG_FILE: &str = "runway-config.yaml";

/// Application entry point.
///
/// # Errors
///
/// Returns an error if configuration is invalid, the terminal cannot be
/// written, or the tick loop fails.
#[tokio::main]
async fn main() -> Result<(), EngineError> {
    // 1. Load configuration. The log level lives there, so this comes first.
    let config = load_config()?;

    // 2. Initialize structured logging.
    init_tracing(&config);
    info!(
        seed = config.world.seed,
        tick_interval_ms = config.world.tick_interval_ms,
        capacity = config.airspace.capacity,
        max_ticks = config.simulation.max_ticks,
        "Configuration loaded"
    );

    // 3. Welcome screen.
    let mut renderer = TerminalRenderer::new(io::stdout(), &config.render, config.airspace.capacity);
    renderer.welcome()?;
    if config.render.format == runway_core::config::RenderFormat::Text {
        io::stdin().lock().read_line(&mut String::new())?;
    }

    // 4. Command channel and stdin reader.
    let control = Arc::new(ControlState::new(
        config.world.tick_interval_ms,
        &config.simulation,
    ));
    let mut channel = CommandChannel::new();
    let input = reader::spawn_line_reader(
        BufReader::new(io::stdin()),
        channel.clone(),
        Arc::clone(&control),
    );

    // Ctrl-C ends the run at the next tick boundary with a summary.
    {
        let control = Arc::clone(&control);
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                info!("Interrupt received, stopping after the current tick");
                control.request_stop();
            }
        });
    }

    // 5. Run the simulation.
    let mut state = SimulationState::new(&config);
    let result =
        runner::run_simulation(&mut state, &mut channel, &control, &mut renderer).await?;
    runner::log_simulation_end(&result);

    // 6. Final summary.
    renderer.summary(&result)?;

    let pending = channel.pending();
    if pending > 0 {
        warn!(pending, "Commands left unapplied at shutdown");
    }
    let reader_exit = input.shutdown();
    info!(?reader_exit, "runway-engine shutdown complete");

    Ok(())
}

/// Load the simulation configuration from `runway-config.yaml`.
///
/// Looks for the config file relative to the current working directory and
/// falls back to defaults when it is absent.
fn load_config() -> Result<SimulationConfig, EngineError> {
    let config_path = Path::new(CONFIG_FILE);
    if config_path.exists() {
        Ok(SimulationConfig::from_file(config_path)?)
    } else {
        Ok(SimulationConfig::default())
    }
}

/// Install the `tracing` subscriber on stderr.
///
/// `RUST_LOG` takes precedence over `logging.level`.
fn init_tracing(config: &SimulationConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.logging.level));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(true);
    if config.logging.json {
        builder.json().init();
    } else {
        builder.init();
    }
}
