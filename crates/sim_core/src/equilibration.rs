//! Supply and demand feedback loops that nudge fleet size and price toward
//! a market-clearing point.
//!
//! Coefficients live in a plain `Copy` struct consumed by free functions,
//! not a stateful object. The functions are gathered behind an
//! `Equilibrator` so
//! `Simulation::step` has one call site regardless of which loops are
//! switched on, per `Config::equilibrate`.

use crate::config::{Config, EquilibrationMode};
use crate::history::PhaseFractions;

/// Driver utility: earnings per block of P3 time minus the opportunity cost
/// of time spent not earning, relative to a reserved wage.
///
/// `U_driver = price * (1 - platform_commission) * p3_fraction - reserved_wage`
pub fn driver_utility(price: f64, platform_commission: f64, phases: PhaseFractions, reserved_wage: f64) -> f64 {
    price * (1.0 - platform_commission) * phases.p3 - reserved_wage
}

/// Rider utility: a baseline utility net of price paid while waiting and the
/// direct cost of waiting itself, both scaled by how much of a trip's total
/// time is spent waiting rather than riding.
///
/// `U_rider = base_utility - price * (1 - wait_fraction) - wait_cost * wait_fraction`
pub fn rider_utility(base_utility: f64, wait_cost: f64, price: f64, wait_fraction: f64) -> f64 {
    base_utility - price * (1.0 - wait_fraction) - wait_cost * wait_fraction
}

/// Result of one equilibration pass: the (possibly clamped) new values, plus
/// whether either loop hit a configured bound — surfaced non-fatally on the
/// next [`crate::observation::Observation`].
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct EquilibrationOutcome {
    pub vehicle_count: Option<u32>,
    pub price: Option<f64>,
    pub supply_clamped: bool,
    pub demand_clamped: bool,
}

/// Vehicle count moves by `ceil(|U_driver| * current_vehicle_count)`
/// vehicles per equilibration block, in the direction driver utility
/// indicates; price moves by a small damped step in the direction rider
/// utility indicates.
#[derive(Debug, Clone, Copy)]
pub struct Equilibrator {
    pub reserved_wage: f64,
    pub wait_cost: f64,
    pub base_rider_utility: f64,
    pub min_vehicles: u32,
    pub max_vehicles: Option<u32>,
    pub price_step: f64,
}

impl Equilibrator {
    pub fn from_config(config: &Config) -> Self {
        Self {
            reserved_wage: config.reserved_wage,
            wait_cost: config.wait_cost,
            base_rider_utility: config.base_rider_utility,
            min_vehicles: config.min_vehicles,
            max_vehicles: config.max_vehicles,
            // Price moves in 5% increments of its current value per
            // adjustment block; a fixed default rather than an additional
            // config field.
            price_step: 0.05,
        }
    }

    /// Apply the configured loops for one equilibration block. `current_*`
    /// are the simulation's current vehicle count and price; the result
    /// carries whichever of the two the mode enables.
    pub fn apply(
        &self,
        mode: EquilibrationMode,
        current_vehicle_count: u32,
        current_price: f64,
        platform_commission: f64,
        phases: PhaseFractions,
        wait_fraction: f64,
    ) -> EquilibrationOutcome {
        let mut outcome = EquilibrationOutcome::default();

        if mode.supply_enabled() {
            let utility = driver_utility(current_price, platform_commission, phases, self.reserved_wage);
            let magnitude = (utility.abs() * current_vehicle_count as f64).ceil() as i64;
            let delta: i64 = if utility > 0.0 {
                magnitude
            } else if utility < 0.0 {
                -magnitude
            } else {
                0
            };
            let proposed = current_vehicle_count as i64 + delta;
            let floor = self.min_vehicles as i64;
            let ceiling = self.max_vehicles.map(|m| m as i64).unwrap_or(i64::MAX);
            let clamped = proposed.clamp(floor, ceiling);
            outcome.supply_clamped = clamped != proposed;
            outcome.vehicle_count = Some(clamped as u32);
        }

        if mode.demand_enabled() {
            let utility = rider_utility(self.base_rider_utility, self.wait_cost, current_price, wait_fraction);
            let adjustment = if utility < 0.0 {
                1.0 + self.price_step
            } else {
                1.0 - self.price_step
            };
            let proposed = (current_price * adjustment).max(0.0);
            outcome.price = Some(proposed);
            outcome.demand_clamped = proposed <= 0.0;
        }

        outcome
    }
}
