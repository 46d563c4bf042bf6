//! Tick cycle: the fixed pipeline that advances the tower simulation.
//!
//! Each tick runs these steps in order:
//!
//! 1. **Clock** -- advance elapsed seconds and the arrival timer.
//! 2. **Interval** -- recompute the arrival interval from the score.
//! 3. **Airspace** -- age every holding aircraft and burn fuel. Running dry
//!    or overcrowding ends the game.
//! 4. **Landing** -- count the queue down. A touchdown behind the head ends
//!    the game; a touchdown at the head lands the aircraft and scores.
//! 5. **Arrivals** -- run the plane generator.
//! 6. **Commands** -- drain the [`CommandSource`] and apply every command in
//!    arrival order. Each command succeeds or fails on its own.
//!
//! The caller renders the resulting state after the tick returns.
//!
//! The first terminal condition met stops the tick at once: nothing after
//! it runs, and the state is frozen in [`EngineStatus::GameOver`].

use runway_types::{Aircraft, CallSign, EngineStatus, GameOverCause, Snapshot};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::channel::CommandSource;
use crate::clock::SimulationClock;
use crate::command::{self, Command};
use crate::config::SimulationConfig;
use crate::generator::PlaneGenerator;
use crate::landing::{Airspace, Clearance, Countdown, LandingQueue};

/// Errors that can occur during tick execution.
#[derive(Debug, thiserror::Error)]
pub enum TickError {
    /// A clock operation failed.
    #[error("clock error: {source}")]
    Clock {
        /// The underlying clock error.
        #[from]
        source: crate::clock::ClockError,
    },

    /// A tick was requested after the game ended.
    #[error("the game is already over: {cause}")]
    AlreadyOver {
        /// The cause that ended the game.
        cause: GameOverCause,
    },
}

/// Which tier an operator error belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RejectionKind {
    /// The line did not parse.
    Format,
    /// The line parsed but named an aircraft that is not where it must be.
    Order,
}

/// Something the operator should see from this tick.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum TickEvent {
    /// A new aircraft entered the airspace.
    Arrived {
        /// The new aircraft.
        call_sign: CallSign,
    },
    /// The queue head landed.
    Landed {
        /// The landed aircraft.
        call_sign: CallSign,
        /// Points awarded for this landing.
        points: u64,
        /// Score after the landing.
        score: u64,
    },
    /// A grant command succeeded.
    Granted {
        /// The cleared aircraft.
        call_sign: CallSign,
        /// Priority after renumbering.
        priority: i32,
        /// Ticks until touchdown.
        time_to_land: i32,
    },
    /// A delay command succeeded.
    Delayed {
        /// The aircraft returned to the airspace.
        call_sign: CallSign,
    },
    /// A command failed; nothing was changed.
    CommandRejected {
        /// The raw command line.
        input: String,
        /// Error tier.
        kind: RejectionKind,
        /// Human-readable reason.
        reason: String,
    },
    /// A terminal condition ended the game.
    GameOver(GameOverCause),
}

/// Summary of one tick.
#[derive(Debug, Clone, Serialize)]
pub struct TickSummary {
    /// Elapsed simulated seconds after this tick.
    pub tick: u64,
    /// Arrival interval used this tick.
    pub generation_interval: i64,
    /// Operator-visible outcomes, in the order they happened.
    pub events: Vec<TickEvent>,
    /// Engine status at the end of the tick.
    pub status: EngineStatus,
}

impl TickSummary {
    /// The game-over cause, if this tick ended the game.
    pub const fn game_over(&self) -> Option<&GameOverCause> {
        match &self.status {
            EngineStatus::GameOver(cause) => Some(cause),
            EngineStatus::Running => None,
        }
    }
}

/// Rule values the tick cycle reads every tick.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TickRules {
    /// Most aircraft allowed to hold at once.
    pub capacity: usize,
    /// Points for any landing before the fuel bonus.
    pub landing_base_points: u64,
    /// Score per extra unit of fuel burned each tick.
    pub score_per_extra_burn: u64,
    /// Renumber the queue after a delay.
    pub renumber_on_delay: bool,
}

impl From<&SimulationConfig> for TickRules {
    fn from(config: &SimulationConfig) -> Self {
        Self {
            capacity: config.airspace.capacity,
            landing_base_points: config.scoring.landing_base_points,
            score_per_extra_burn: config.scoring.score_per_extra_burn,
            renumber_on_delay: config.landing.renumber_on_delay,
        }
    }
}

impl Default for TickRules {
    fn default() -> Self {
        Self::from(&SimulationConfig::default())
    }
}

/// The mutable simulation state, owned by the tick loop.
#[derive(Debug)]
pub struct SimulationState {
    /// Elapsed time and arrival timer.
    pub clock: SimulationClock,
    /// Aircraft awaiting orders, in arrival order.
    pub airspace: Airspace,
    /// Cleared aircraft, in landing order.
    pub landing_queue: LandingQueue,
    /// Landed aircraft, in landing order. Append-only.
    pub landed: Vec<Aircraft>,
    /// Current score.
    pub score: u64,
    /// Running or game over.
    pub status: EngineStatus,
    /// Arrival generator.
    pub generator: PlaneGenerator,
    /// Rule values.
    pub rules: TickRules,
}

impl SimulationState {
    /// Create an empty state from configuration.
    pub fn new(config: &SimulationConfig) -> Self {
        let generator = PlaneGenerator::new(config.traffic.clone(), config.world.seed);
        Self::with_generator(TickRules::from(config), generator)
    }

    /// Create an empty state with an explicit generator.
    pub const fn with_generator(rules: TickRules, generator: PlaneGenerator) -> Self {
        Self {
            clock: SimulationClock::new(),
            airspace: Airspace::new(),
            landing_queue: LandingQueue::new(),
            landed: Vec::new(),
            score: 0,
            status: EngineStatus::Running,
            generator,
            rules,
        }
    }

    /// Build the read-only view handed to the renderer.
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            elapsed_seconds: self.clock.seconds(),
            score: self.score,
            airspace: self.airspace.iter().map(Into::into).collect(),
            landing_queue: self.landing_queue.iter().map(Into::into).collect(),
            landed: self.landed.iter().map(|a| a.call_sign.clone()).collect(),
        }
    }

    /// Fuel burned per tick by each holding aircraft at the current score.
    pub fn fuel_burn(&self) -> i32 {
        let extra = self
            .score
            .checked_div(self.rules.score_per_extra_burn)
            .unwrap_or(0);
        i32::try_from(extra).unwrap_or(i32::MAX).saturating_add(1)
    }

    /// Freeze the state with the given cause.
    fn end_game(&mut self, cause: GameOverCause, events: &mut Vec<TickEvent>) {
        warn!(tick = self.clock.seconds(), %cause, score = self.score, "Game over");
        self.status = EngineStatus::GameOver(cause.clone());
        events.push(TickEvent::GameOver(cause));
    }
}

/// Execute one tick of the simulation.
///
/// `commands` is drained exactly once, after arrivals are generated. If a
/// terminal condition is met earlier, the tick stops and the commands stay
/// queued in the source.
///
/// # Errors
///
/// Returns [`TickError::AlreadyOver`] if the game has ended, or
/// [`TickError::Clock`] if the clock cannot advance.
pub fn run_tick(
    state: &mut SimulationState,
    commands: &mut dyn CommandSource,
) -> Result<TickSummary, TickError> {
    if let EngineStatus::GameOver(cause) = &state.status {
        return Err(TickError::AlreadyOver {
            cause: cause.clone(),
        });
    }

    let mut events = Vec::new();

    // --- Step 1: Clock ---
    let tick = state.clock.advance()?;

    // --- Step 2: Interval ---
    let generation_interval = state.generator.interval(state.score);
    debug!(
        tick,
        generation_interval,
        airspace = state.airspace.len(),
        landing_queue = state.landing_queue.len(),
        score = state.score,
        "Tick started"
    );

    let summary = |state: &SimulationState, events: Vec<TickEvent>| TickSummary {
        tick,
        generation_interval,
        events,
        status: state.status.clone(),
    };

    // --- Step 3: Airspace ---
    if let Some(cause) = step_age_airspace(state) {
        state.end_game(cause, &mut events);
        return Ok(summary(state, events));
    }

    // --- Step 4: Landing ---
    if let Some(cause) = step_landing(state, &mut events) {
        state.end_game(cause, &mut events);
        return Ok(summary(state, events));
    }

    // --- Step 5: Arrivals ---
    let capacity = state.rules.capacity;
    let arrivals = state.generator.generate(
        &mut state.airspace,
        &state.landing_queue,
        &mut state.clock,
        generation_interval,
        capacity,
    );
    events.extend(
        arrivals
            .into_iter()
            .map(|call_sign| TickEvent::Arrived { call_sign }),
    );

    // --- Step 6: Commands ---
    for line in commands.drain_all() {
        events.push(apply_command(state, &line));
    }

    Ok(summary(state, events))
}

/// Apply one raw operator command to the state.
///
/// Never fails: format and order errors come back as
/// [`TickEvent::CommandRejected`] with the state unchanged.
pub fn apply_command(state: &mut SimulationState, line: &str) -> TickEvent {
    let rejected = |kind: RejectionKind, reason: String| {
        info!(input = line, ?kind, %reason, "Command rejected");
        TickEvent::CommandRejected {
            input: line.to_owned(),
            kind,
            reason,
        }
    };

    let command = match command::parse(line) {
        Ok(command) => command,
        Err(e) => return rejected(RejectionKind::Format, e.to_string()),
    };

    match command {
        Command::Grant {
            call_sign,
            priority,
        } => match state
            .landing_queue
            .grant(&mut state.airspace, &call_sign, priority)
        {
            Ok(Clearance {
                call_sign,
                priority,
                time_to_land,
            }) => {
                info!(%call_sign, priority, time_to_land, "Landing permission granted");
                TickEvent::Granted {
                    call_sign,
                    priority,
                    time_to_land,
                }
            }
            Err(e) => rejected(RejectionKind::Order, e.to_string()),
        },
        Command::Delay { call_sign } => match state.landing_queue.delay(
            &mut state.airspace,
            &call_sign,
            state.rules.renumber_on_delay,
        ) {
            Ok(call_sign) => {
                info!(%call_sign, "Landing delayed");
                TickEvent::Delayed { call_sign }
            }
            Err(e) => rejected(RejectionKind::Order, e.to_string()),
        },
    }
}

/// Step 3: age holding aircraft. Returns the terminal cause, if any.
///
/// Stops at the first aircraft that runs dry.
fn step_age_airspace(state: &mut SimulationState) -> Option<GameOverCause> {
    let burn = state.fuel_burn();
    for aircraft in state.airspace.iter_mut() {
        aircraft.age(burn);
        if aircraft.out_of_fuel() {
            return Some(GameOverCause::FuelExhaustion {
                call_sign: aircraft.call_sign.clone(),
            });
        }
    }

    let count = state.airspace.len();
    let capacity = state.rules.capacity;
    (count > capacity).then_some(GameOverCause::Overcrowding { count, capacity })
}

/// Step 4: count the queue down and land the head. Returns the terminal
/// cause, if any.
fn step_landing(state: &mut SimulationState, events: &mut Vec<TickEvent>) -> Option<GameOverCause> {
    match state.landing_queue.count_down() {
        Countdown::Holding => None,
        Countdown::OutOfOrder(call_sign) => Some(GameOverCause::OutOfOrderLanding { call_sign }),
        Countdown::HeadTouchedDown => {
            if let Some(aircraft) = state.landing_queue.land_head() {
                let bonus = u64::try_from(aircraft.fuel.max(0)).unwrap_or(0);
                let points = state.rules.landing_base_points.saturating_add(bonus);
                state.score = state.score.saturating_add(points);
                info!(
                    call_sign = %aircraft.call_sign,
                    points,
                    score = state.score,
                    "Aircraft landed"
                );
                events.push(TickEvent::Landed {
                    call_sign: aircraft.call_sign.clone(),
                    points,
                    score: state.score,
                });
                state.landed.push(aircraft);
            }
            None
        }
    }
}
