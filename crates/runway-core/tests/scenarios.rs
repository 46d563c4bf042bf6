//! End-to-end scenarios for the tower simulation.
//!
//! These drive the public API the way the engine binary does: build a
//! [`SimulationState`], queue operator lines, and run ticks.

#![allow(
    clippy::unwrap_used,
    clippy::indexing_slicing,
    clippy::arithmetic_side_effects,
    clippy::missing_panics_doc
)]

use std::collections::BTreeSet;
use std::io::Cursor;
use std::sync::Arc;
use std::thread;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use runway_core::channel::{CommandChannel, CommandSource, ScriptedCommands};
use runway_core::config::{SimulationBoundsConfig, SimulationConfig, TrafficConfig};
use runway_core::control::ControlState;
use runway_core::generator::PlaneGenerator;
use runway_core::reader::{ReaderExit, spawn_line_reader};
use runway_core::tick::{
    RejectionKind, SimulationState, TickEvent, TickRules, apply_command, run_tick,
};
use runway_types::{Aircraft, CallSign, EngineStatus, GameOverCause};

// =============================================================================
// Helpers
// =============================================================================

/// A state whose generator stays silent for the length of any scenario.
fn quiet_state() -> SimulationState {
    quiet_state_with(TickRules::default())
}

fn quiet_state_with(rules: TickRules) -> SimulationState {
    let traffic = TrafficConfig {
        base_generation_interval: 10_000,
        min_generation_interval: 10_000,
        ..TrafficConfig::default()
    };
    SimulationState::with_generator(rules, PlaneGenerator::new(traffic, Some(0)))
}

/// Rules that keep the queue contiguous after delays too.
fn renumbering_rules() -> TickRules {
    TickRules {
        renumber_on_delay: true,
        ..TickRules::default()
    }
}

fn hold(state: &mut SimulationState, call_sign: &str, fuel: i32, landing_duration: i32) {
    state
        .airspace
        .push_back(Aircraft::new(CallSign::new(call_sign), fuel, landing_duration));
}

fn cs(raw: &str) -> CallSign {
    CallSign::new(raw)
}

fn queue_order(state: &SimulationState) -> Vec<(String, i32)> {
    state
        .landing_queue
        .iter()
        .map(|a| (a.call_sign.to_string(), a.priority))
        .collect()
}

fn tick(state: &mut SimulationState) -> Vec<TickEvent> {
    run_tick(state, &mut ScriptedCommands::default())
        .unwrap()
        .events
}

/// Every aircraft is in exactly one of airspace, landing queue, or landed.
fn assert_single_membership(state: &SimulationState) {
    let mut seen = BTreeSet::new();
    let all = state
        .airspace
        .iter()
        .chain(state.landing_queue.iter())
        .chain(state.landed.iter());
    for aircraft in all {
        assert!(
            seen.insert(aircraft.call_sign.clone()),
            "{} is in more than one place",
            aircraft.call_sign
        );
    }
    assert!(state.airspace.iter().all(|a| !a.permission_to_land));
    assert!(state.landing_queue.iter().all(|a| a.permission_to_land));
}

fn assert_contiguous(state: &SimulationState) {
    let expected: Vec<i32> = (0..).take(state.landing_queue.len()).collect();
    assert_eq!(state.landing_queue.priorities(), expected);
}

// =============================================================================
// Scenarios
// =============================================================================

#[test]
fn grant_moves_aircraft_into_the_queue() {
    let mut state = quiet_state();
    hold(&mut state, "AAAA", 30, 7);

    let event = apply_command(&mut state, "aaaa 0");

    assert!(matches!(event, TickEvent::Granted { priority: 0, time_to_land: 7, .. }));
    assert!(state.airspace.is_empty());
    let queued = state.landing_queue.head().unwrap();
    assert_eq!(queued.call_sign, cs("AAAA"));
    assert_eq!(queued.priority, 0);
    assert_eq!(queued.time_to_land, queued.landing_duration);
    assert!(queued.permission_to_land);
}

#[test]
fn grant_at_front_displaces_the_queue() {
    let mut state = quiet_state();
    hold(&mut state, "AAAA", 30, 5);
    hold(&mut state, "BBBB", 30, 6);
    hold(&mut state, "CCCC", 30, 4);
    apply_command(&mut state, "aaaa 0");
    apply_command(&mut state, "bbbb 1");

    apply_command(&mut state, "cccc 0");

    assert_eq!(
        queue_order(&state),
        vec![
            ("CCCC".to_owned(), 0),
            ("AAAA".to_owned(), 1),
            ("BBBB".to_owned(), 2)
        ]
    );
}

#[test]
fn head_lands_and_scores_with_fuel_bonus() {
    let mut state = quiet_state();
    hold(&mut state, "AAAA", 30, 1);
    hold(&mut state, "BBBB", 25, 6);
    apply_command(&mut state, "aaaa 0");
    apply_command(&mut state, "bbbb 1");
    let score_before = state.score;

    let events = tick(&mut state);

    assert_eq!(state.score, score_before + 10 + 30);
    assert_eq!(state.landed.last().unwrap().call_sign, cs("AAAA"));
    assert_eq!(queue_order(&state), vec![("BBBB".to_owned(), 0)]);
    assert!(events.contains(&TickEvent::Landed {
        call_sign: cs("AAAA"),
        points: 40,
        score: 40
    }));
}

#[test]
fn fuel_reaching_zero_ends_the_game_before_landing() {
    let mut state = quiet_state();
    hold(&mut state, "QQQQ", 30, 1);
    apply_command(&mut state, "qqqq 0");
    hold(&mut state, "DRYY", 1, 5);
    let mut commands = ScriptedCommands::new(["delay qqqq"]);

    let summary = run_tick(&mut state, &mut commands).unwrap();

    assert_eq!(
        summary.status,
        EngineStatus::GameOver(GameOverCause::FuelExhaustion {
            call_sign: cs("DRYY")
        })
    );
    assert_eq!(state.airspace.find(&cs("DRYY")).unwrap().fuel, 0);
    // Landing and command steps never ran.
    assert_eq!(state.landing_queue.head().unwrap().time_to_land, 1);
    assert!(state.landed.is_empty());
    assert_eq!(commands.drain_all(), vec!["delay qqqq"]);
    assert!(run_tick(&mut state, &mut ScriptedCommands::default()).is_err());
}

#[test]
fn delay_returns_aircraft_to_airspace() {
    let mut state = quiet_state_with(renumbering_rules());
    hold(&mut state, "AAAA", 30, 5);
    hold(&mut state, "BBBB", 30, 6);
    hold(&mut state, "CCCC", 30, 7);
    apply_command(&mut state, "aaaa 0");
    apply_command(&mut state, "bbbb 1");
    apply_command(&mut state, "cccc 2");

    let event = apply_command(&mut state, "delay bbbb");

    assert_eq!(event, TickEvent::Delayed { call_sign: cs("BBBB") });
    let back = state.airspace.iter().last().unwrap();
    assert_eq!(back.call_sign, cs("BBBB"));
    assert!(!back.permission_to_land);
    assert_contiguous(&state);

    let again = apply_command(&mut state, "delay bbbb");
    assert!(matches!(
        again,
        TickEvent::CommandRejected {
            kind: RejectionKind::Order,
            ..
        }
    ));
    assert_eq!(state.airspace.len(), 1);
    assert_eq!(state.landing_queue.len(), 2);
}

#[test]
fn delay_leaves_a_gap_by_default() {
    let mut state = quiet_state();
    hold(&mut state, "AAAA", 30, 5);
    hold(&mut state, "BBBB", 30, 6);
    apply_command(&mut state, "aaaa 0");
    apply_command(&mut state, "bbbb 1");

    apply_command(&mut state, "delay aaaa");

    assert_eq!(state.landing_queue.priorities(), vec![1]);
    assert!(state.landing_queue.is_ascending());
}

#[test]
fn grant_after_delay_uses_the_remaining_priorities() {
    let mut state = SimulationState::new(&SimulationConfig::default());
    for name in ["AAAA", "BBBB", "CCCC", "XXXX"] {
        hold(&mut state, name, 40, 8);
    }
    for line in ["aaaa 0", "bbbb 1", "cccc 2", "delay bbbb", "xxxx 2"] {
        apply_command(&mut state, line);
    }

    // The delay left [AAAA:0, CCCC:2], so XXXX at 2 goes ahead of CCCC.
    assert_eq!(
        queue_order(&state),
        vec![
            ("AAAA".to_owned(), 0),
            ("XXXX".to_owned(), 1),
            ("CCCC".to_owned(), 2)
        ]
    );
}

#[test]
fn grant_after_delay_with_renumbering() {
    let mut state = quiet_state_with(renumbering_rules());
    for name in ["AAAA", "BBBB", "CCCC", "XXXX"] {
        hold(&mut state, name, 40, 8);
    }
    for line in ["aaaa 0", "bbbb 1", "cccc 2", "delay bbbb", "xxxx 2"] {
        apply_command(&mut state, line);
    }

    assert_eq!(
        queue_order(&state),
        vec![
            ("AAAA".to_owned(), 0),
            ("CCCC".to_owned(), 1),
            ("XXXX".to_owned(), 2)
        ]
    );
}

// =============================================================================
// Properties
// =============================================================================

#[test]
fn commands_apply_in_enqueue_order() {
    let mut state = quiet_state();
    hold(&mut state, "AAAA", 30, 5);
    let mut channel = CommandChannel::new();

    let producer = channel.clone();
    thread::spawn(move || {
        producer.push("aaaa 0");
        producer.push("delay aaaa");
        producer.push("aaaa 0");
    })
    .join()
    .unwrap();

    let summary = run_tick(&mut state, &mut channel).unwrap();

    let kinds: Vec<&str> = summary
        .events
        .iter()
        .map(|e| match e {
            TickEvent::Granted { .. } => "grant",
            TickEvent::Delayed { .. } => "delay",
            _ => "other",
        })
        .collect();
    assert_eq!(kinds, vec!["grant", "delay", "grant"]);
    assert_eq!(state.landing_queue.len(), 1);
    assert_eq!(channel.pending(), 0);
}

#[test]
fn commands_queued_between_ticks_wait_for_the_next_drain() {
    let mut state = quiet_state();
    hold(&mut state, "AAAA", 30, 5);
    let mut channel = CommandChannel::new();

    run_tick(&mut state, &mut channel).unwrap();
    channel.push("aaaa 0");
    assert_eq!(state.landing_queue.len(), 0);

    run_tick(&mut state, &mut channel).unwrap();
    assert_eq!(state.landing_queue.len(), 1);
}

#[test]
fn invariants_hold_under_random_play() {
    for seed in 0..20_u64 {
        let config = SimulationConfig::default();
        let mut state = SimulationState::with_generator(
            renumbering_rules(),
            PlaneGenerator::new(config.traffic.clone(), Some(seed)),
        );
        let mut operator = StdRng::seed_from_u64(seed.wrapping_add(1_000));

        for _ in 0..300 {
            let mut commands = ScriptedCommands::default();
            for _ in 0..operator.random_range(0..3_u32) {
                commands.push(random_command(&mut operator, &state));
            }

            if run_tick(&mut state, &mut commands).is_err() {
                break;
            }
            assert_single_membership(&state);
            assert_contiguous(&state);
            if state.status.is_over() {
                break;
            }
        }
    }
}

/// A plausible operator line: mostly grants, some delays, some garbage.
fn random_command(rng: &mut StdRng, state: &SimulationState) -> String {
    let pick = |rng: &mut StdRng, names: Vec<String>| {
        if names.is_empty() {
            "ZZZZ".to_owned()
        } else {
            names[rng.random_range(0..names.len())].clone()
        }
    };
    let airspace: Vec<String> = state.airspace.iter().map(|a| a.call_sign.to_string()).collect();
    let queued: Vec<String> = state
        .landing_queue
        .iter()
        .map(|a| a.call_sign.to_string())
        .collect();

    match rng.random_range(0..10_u32) {
        0..=5 => {
            let priority = rng.random_range(-1..=4_i32);
            format!("{} {priority}", pick(rng, airspace).to_lowercase())
        }
        6..=7 => format!("delay {}", pick(rng, queued)),
        8 => "delay".to_owned(),
        _ => format!("{} soon", pick(rng, airspace)),
    }
}

#[test]
fn renumbering_twice_matches_once() {
    let mut state = quiet_state();
    for (i, name) in ["AAAA", "BBBB", "CCCC", "DDDD"].iter().enumerate() {
        hold(&mut state, name, 40, 5 + i32::try_from(i).unwrap());
        apply_command(&mut state, &format!("{name} 9"));
    }
    state.landing_queue.normalize();
    let once = queue_order(&state);
    state.landing_queue.normalize();
    assert_eq!(queue_order(&state), once);
}

#[test]
fn out_of_order_touchdown_is_unreachable_with_staggered_grants() {
    for seed in 0..50_u64 {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut state = quiet_state();

        // Strictly increasing durations granted front to back.
        let mut duration = 0;
        for i in 0..5 {
            duration += rng.random_range(1..=4_i32);
            let name = format!("P{i:03}");
            hold(&mut state, &name, 100, duration);
            apply_command(&mut state, &format!("{name} {i}"));
        }

        for _ in 0..duration {
            let events = tick(&mut state);
            assert!(
                !events
                    .iter()
                    .any(|e| matches!(e, TickEvent::GameOver(GameOverCause::OutOfOrderLanding { .. }))),
                "seed {seed} produced an out-of-order touchdown"
            );
            assert_contiguous(&state);
        }
        assert_eq!(state.landed.len(), 5);
        assert_eq!(state.status, EngineStatus::Running);
    }
}

#[test]
fn faster_aircraft_behind_slower_one_ends_the_game() {
    let mut state = quiet_state();
    hold(&mut state, "SLOW", 50, 8);
    hold(&mut state, "FAST", 50, 2);
    apply_command(&mut state, "slow 0");
    apply_command(&mut state, "fast 1");

    tick(&mut state);
    let events = tick(&mut state);

    assert_eq!(
        events.last(),
        Some(&TickEvent::GameOver(GameOverCause::OutOfOrderLanding {
            call_sign: cs("FAST")
        }))
    );
}

#[test]
fn overcrowding_is_checked_after_aging() {
    let mut state = quiet_state();
    for i in 0..11 {
        hold(&mut state, &format!("H{i:03}"), 50, 5);
    }
    let events = tick(&mut state);
    assert_eq!(
        events,
        vec![TickEvent::GameOver(GameOverCause::Overcrowding {
            count: 11,
            capacity: 10
        })]
    );
}

// =============================================================================
// Input path
// =============================================================================

#[test]
fn reader_feeds_the_tick_engine() {
    let mut state = quiet_state();
    hold(&mut state, "AAAA", 30, 5);
    hold(&mut state, "BBBB", 30, 6);
    let mut channel = CommandChannel::new();
    let control = Arc::new(ControlState::new(0, &SimulationBoundsConfig::default()));

    let input = Cursor::new("aaaa 0\n\nbbbb x\nbbbb 0\n");
    let reader = spawn_line_reader(input, channel.clone(), Arc::clone(&control));
    assert_eq!(reader.join(), ReaderExit::EndOfStream);

    let summary = run_tick(&mut state, &mut channel).unwrap();

    assert!(summary.events.iter().any(|e| matches!(
        e,
        TickEvent::CommandRejected {
            kind: RejectionKind::Format,
            ..
        }
    )));
    assert_eq!(
        queue_order(&state),
        vec![("BBBB".to_owned(), 0), ("AAAA".to_owned(), 1)]
    );
}
