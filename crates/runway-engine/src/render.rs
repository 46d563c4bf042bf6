//! Terminal renderer.
//!
//! [`TerminalRenderer`] is the [`TickCallback`] that draws every tick: a full
//! text screen with the airspace, landing queue, landed history, and command
//! help, followed by the messages the tick produced. In JSON mode it writes
//! one document per tick instead.

use std::io::{self, Write};

use runway_core::config::{RenderConfig, RenderFormat};
use runway_core::control::SimulationEndReason;
use runway_core::runner::{SimulationResult, TickCallback};
use runway_core::tick::{RejectionKind, SimulationState, TickEvent, TickSummary};
use runway_types::{AircraftView, Snapshot};
use serde::Serialize;
use tracing::warn;

/// ANSI sequence that clears the screen and homes the cursor.
const CLEAR_SCREEN: &str = "\x1b[2J\x1b[1;1H";

/// Horizontal rule between screen sections.
const RULE: &str = "-------------------------------------";

/// One tick in JSON mode.
#[derive(Serialize)]
struct JsonFrame<'a> {
    summary: &'a TickSummary,
    state: Snapshot,
}

/// End of the run in JSON mode.
#[derive(Serialize)]
struct JsonResult<'a> {
    end_reason: &'a SimulationEndReason,
    total_ticks: u64,
    planes_landed: usize,
    score: u64,
}

/// Tick callback that writes the game screen to `out`.
pub struct TerminalRenderer<W> {
    out: W,
    format: RenderFormat,
    clear_screen: bool,
    capacity: usize,
}

impl<W: Write> TerminalRenderer<W> {
    /// Create a renderer writing to `out`.
    pub const fn new(out: W, config: &RenderConfig, capacity: usize) -> Self {
        Self {
            out,
            format: config.format,
            clear_screen: config.clear_screen,
            capacity,
        }
    }

    /// Print the welcome screen. Nothing is printed in JSON mode.
    pub fn welcome(&mut self) -> io::Result<()> {
        if self.format == RenderFormat::Json {
            return Ok(());
        }
        write!(
            self.out,
            "Welcome to the Air Traffic Controller Simulation.\n\n\
             Your goal is to safely manage and land incoming planes.\n\n\
             GAME OVER CONDITIONS:\n\
             \x20 1. A plane runs out of fuel (fuel <= 0).\n\
             \x20 2. Overcrowding: more than {} planes in the airspace.\n\
             \x20 3. Multiple planes landing simultaneously.\n\
             \x20 4. A plane that is not at the front of the landing queue\n\
             \x20    reaches zero time to land.\n\n\
             Score points by landing planes safely. Planes that land with\n\
             more fuel score more.\n\
             Good luck!\n\n\
             Press ENTER to start...",
            self.capacity
        )?;
        self.out.flush()
    }

    /// Draw one tick.
    pub fn render(&mut self, summary: &TickSummary, snapshot: Snapshot) -> io::Result<()> {
        match self.format {
            RenderFormat::Json => {
                let frame = JsonFrame {
                    summary,
                    state: snapshot,
                };
                serde_json::to_writer(&mut self.out, &frame)?;
                writeln!(self.out)?;
            }
            RenderFormat::Text => {
                self.write_screen(&snapshot)?;
                for event in &summary.events {
                    if let Some(message) = event_message(event) {
                        writeln!(self.out, "{message}")?;
                    }
                }
            }
        }
        self.out.flush()
    }

    /// Print the end-of-game summary.
    pub fn summary(&mut self, result: &SimulationResult) -> io::Result<()> {
        match self.format {
            RenderFormat::Json => {
                let doc = JsonResult {
                    end_reason: &result.end_reason,
                    total_ticks: result.total_ticks,
                    planes_landed: result.planes_landed,
                    score: result.score,
                };
                serde_json::to_writer(&mut self.out, &doc)?;
                writeln!(self.out)?;
            }
            RenderFormat::Text => {
                writeln!(self.out, "\n=== GAME OVER ===")?;
                writeln!(self.out, "Reason: {}", result.end_reason)?;
                writeln!(self.out, "Total planes landed: {}", result.planes_landed)?;
                writeln!(self.out, "Final Score: {}", result.score)?;
            }
        }
        self.out.flush()
    }

    /// Give back the underlying writer.
    pub fn into_inner(self) -> W {
        self.out
    }

    fn write_screen(&mut self, snap: &Snapshot) -> io::Result<()> {
        let out = &mut self.out;
        if self.clear_screen {
            write!(out, "{CLEAR_SCREEN}")?;
        }
        writeln!(out, "==== AIR TRAFFIC CONTROLLER ====")?;
        writeln!(
            out,
            "Time elapsed: {} seconds    Score: {}",
            snap.elapsed_seconds, snap.score
        )?;
        writeln!(out, "{RULE}")?;

        writeln!(
            out,
            "Airspace ({}/{} planes waiting):",
            snap.airspace.len(),
            self.capacity
        )?;
        write_list(out, &snap.airspace, |a| {
            format!(
                "  CallSign: {} | Fuel: {}% | Wait: {}s | Landing Duration: {}s",
                a.call_sign, a.fuel, a.wait, a.landing_duration
            )
        })?;
        writeln!(out, "{RULE}")?;

        writeln!(out, "Landing Queue (by priority):")?;
        write_list(out, &snap.landing_queue, |a| {
            format!(
                "  CallSign: {} | Fuel: {}% | Time to land: {}s | Priority: {}",
                a.call_sign, a.fuel, a.time_to_land, a.priority
            )
        })?;
        writeln!(out, "{RULE}")?;

        writeln!(out, "Landed Planes:")?;
        if snap.landed.is_empty() {
            writeln!(out, "  [None]")?;
        }
        for (n, call_sign) in (1_usize..).zip(&snap.landed) {
            writeln!(out, "  {n}. {call_sign}")?;
        }
        writeln!(out, "{RULE}")?;

        writeln!(out, "Commands:")?;
        writeln!(out, "  To order landing: <CALLSIGN> <PRIORITY>   (e.g. abcd 0)")?;
        writeln!(out, "  To delay landing: delay <CALLSIGN>        (returns plane to airspace)")?;
        writeln!(out, "{RULE}")
    }
}

impl<W: Write + Send> TickCallback for TerminalRenderer<W> {
    fn on_tick(&mut self, summary: &TickSummary, state: &SimulationState) {
        if let Err(e) = self.render(summary, state.snapshot()) {
            warn!(tick = summary.tick, error = %e, "Failed to render tick");
        }
    }
}

fn write_list<W, F>(out: &mut W, aircraft: &[AircraftView], line: F) -> io::Result<()>
where
    W: Write,
    F: Fn(&AircraftView) -> String,
{
    if aircraft.is_empty() {
        return writeln!(out, "  [None]");
    }
    for a in aircraft {
        writeln!(out, "{}", line(a))?;
    }
    Ok(())
}

/// Operator-facing line for a tick event. Arrivals are visible on the
/// screen itself and get no message.
fn event_message(event: &TickEvent) -> Option<String> {
    let message = match event {
        TickEvent::Arrived { .. } => return None,
        TickEvent::Landed {
            call_sign,
            points,
            score,
        } => format!(
            "\n+++ Plane {call_sign} has landed successfully! +++\n     Score +{points} (Total: {score})"
        ),
        TickEvent::Granted {
            call_sign,
            priority,
            time_to_land,
        } => format!(
            ">> Order: Plane {call_sign} cleared to land with priority {priority} (touchdown in {time_to_land}s)"
        ),
        TickEvent::Delayed { call_sign } => {
            format!(">> Order: Landing for plane {call_sign} delayed; returned to airspace")
        }
        TickEvent::CommandRejected {
            kind: RejectionKind::Format,
            reason,
            ..
        } => format!(">> Invalid command: {reason}"),
        TickEvent::CommandRejected {
            kind: RejectionKind::Order,
            reason,
            ..
        } => format!(">> Order Error: {reason}"),
        TickEvent::GameOver(cause) => format!("\n*** {cause} ***\nGame Over!"),
    };
    Some(message)
}
