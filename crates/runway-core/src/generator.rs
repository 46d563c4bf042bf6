//! Plane generator: new arrivals with a score-driven arrival rate.
//!
//! The generator owns its random number generator, seeded once at startup,
//! so a fixed seed reproduces the same traffic. Call signs come from a
//! pluggable [`CallSignSource`].
//!
//! # Arrival rules
//!
//! - The arrival interval is `max(min, base - score / step)`.
//! - When the arrival timer reaches the interval and the airspace has room,
//!   one aircraft arrives, or two with `double_arrival_percent` chance if
//!   there is room for both.
//! - A single arrival resets the timer to 0; a pair sets it to `-interval`.
//! - Starting fuel is never equal to the previous arrival's fuel.

use rand::rngs::StdRng;
use rand::{Rng, RngCore, SeedableRng};
use runway_types::{Aircraft, CALL_SIGN_LEN, CallSign};
use tracing::{debug, warn};

use crate::clock::SimulationClock;
use crate::config::TrafficConfig;
use crate::landing::{Airspace, LandingQueue};

/// Letters in the call-sign alphabet.
const ALPHABET_LEN: u8 = 26;

/// Attempts at drawing a call sign not already in use.
const MAX_CALL_SIGN_ATTEMPTS: usize = 64;

/// Attempts at drawing a fuel value different from the previous arrival.
const MAX_FUEL_ATTEMPTS: usize = 64;

/// Supplier of call signs for new arrivals.
pub trait CallSignSource: core::fmt::Debug + Send {
    /// Produce the next candidate call sign.
    ///
    /// The generator rejects candidates already in use and asks again.
    fn next_call_sign(&mut self, rng: &mut dyn RngCore) -> CallSign;
}

/// Uniformly random four-letter call signs.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomCallSigns;

impl CallSignSource for RandomCallSigns {
    fn next_call_sign(&mut self, rng: &mut dyn RngCore) -> CallSign {
        let letters: [u8; CALL_SIGN_LEN] =
            core::array::from_fn(|_| b'A'.saturating_add(rng.random_range(0..ALPHABET_LEN)));
        CallSign::from_letters(letters)
    }
}

/// Produces new aircraft for the airspace.
#[derive(Debug)]
pub struct PlaneGenerator {
    /// Owned generator; every random draw in the simulation comes from here.
    rng: StdRng,

    /// Call-sign supplier.
    call_signs: Box<dyn CallSignSource>,

    /// Fuel of the most recent arrival.
    last_fuel: Option<i32>,

    /// Arrival parameters.
    traffic: TrafficConfig,
}

impl PlaneGenerator {
    /// Create a generator with random call signs.
    ///
    /// `seed` of `None` seeds from OS entropy.
    pub fn new(traffic: TrafficConfig, seed: Option<u64>) -> Self {
        let rng = seed.map_or_else(StdRng::from_os_rng, StdRng::seed_from_u64);
        Self::with_source(traffic, rng, Box::new(RandomCallSigns))
    }

    /// Create a generator from an explicit RNG and call-sign source.
    pub fn with_source(
        traffic: TrafficConfig,
        rng: StdRng,
        call_signs: Box<dyn CallSignSource>,
    ) -> Self {
        Self {
            rng,
            call_signs,
            last_fuel: None,
            traffic,
        }
    }

    /// Arrival interval in ticks at the given score.
    pub fn interval(&self, score: u64) -> i64 {
        let steps = score
            .checked_div(self.traffic.score_per_interval_step)
            .unwrap_or(0);
        let steps = i64::try_from(steps).unwrap_or(i64::MAX);
        self.traffic
            .base_generation_interval
            .saturating_sub(steps)
            .max(self.traffic.min_generation_interval)
    }

    /// Run the arrival step for one tick.
    ///
    /// Adds zero, one, or two aircraft to the back of `airspace`, never
    /// growing it past `capacity`, and resets the arrival timer on `clock`
    /// when anything arrives. Returns the call signs of the new arrivals.
    pub fn generate(
        &mut self,
        airspace: &mut Airspace,
        queue: &LandingQueue,
        clock: &mut SimulationClock,
        interval: i64,
        capacity: usize,
    ) -> Vec<CallSign> {
        if clock.generation_timer() < interval || airspace.len() >= capacity {
            return Vec::new();
        }

        let room = capacity.saturating_sub(airspace.len());
        let wants_pair =
            self.rng.random_range(0..100_u32) < self.traffic.double_arrival_percent;
        let count: usize = if wants_pair && room >= 2 { 2 } else { 1 };

        let mut arrivals = Vec::with_capacity(count);
        for _ in 0..count {
            if airspace.len() >= capacity {
                break;
            }
            let aircraft = self.spawn(airspace, queue);
            debug!(
                call_sign = %aircraft.call_sign,
                fuel = aircraft.fuel,
                landing_duration = aircraft.landing_duration,
                "Aircraft entered airspace"
            );
            arrivals.push(aircraft.call_sign.clone());
            airspace.push_back(aircraft);
        }

        if count > 1 {
            clock.set_generation_timer(interval.saturating_neg());
        } else {
            clock.set_generation_timer(0);
        }
        arrivals
    }

    /// Create one aircraft with a free call sign and fresh fuel.
    pub fn spawn(&mut self, airspace: &Airspace, queue: &LandingQueue) -> Aircraft {
        let call_sign = self.free_call_sign(airspace, queue);
        let fuel = self.fresh_fuel();
        let landing_duration = self.rng.random_range(
            self.traffic.landing_duration_min..=self.traffic.landing_duration_max,
        );
        Aircraft::new(call_sign, fuel, landing_duration)
    }

    /// Draw call signs until one is not in the airspace or the queue.
    fn free_call_sign(&mut self, airspace: &Airspace, queue: &LandingQueue) -> CallSign {
        let mut candidate = self.call_signs.next_call_sign(&mut self.rng);
        for _ in 1..MAX_CALL_SIGN_ATTEMPTS {
            if !airspace.contains(&candidate) && queue.find(&candidate).is_none() {
                return candidate;
            }
            candidate = self.call_signs.next_call_sign(&mut self.rng);
        }
        warn!(call_sign = %candidate, "Could not find an unused call sign, reusing one");
        candidate
    }

    /// Draw a fuel value that differs from the previous arrival's.
    fn fresh_fuel(&mut self) -> i32 {
        let range = self.traffic.fuel_min..=self.traffic.fuel_max;
        let mut fuel = self.rng.random_range(range.clone());
        for _ in 1..MAX_FUEL_ATTEMPTS {
            if self.last_fuel != Some(fuel) {
                break;
            }
            fuel = self.rng.random_range(range.clone());
        }
        self.last_fuel = Some(fuel);
        fuel
    }
}
