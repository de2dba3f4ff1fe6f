//! The block-stepped simulation driver.
//!
//! REDESIGN from a discrete-event engine: a prior design drove a
//! `BinaryHeap<Event>` through a scheduled graph of event-gated systems.
//! This engine instead runs discrete time in fixed-size blocks with one
//! deterministic operation order, so the clock here is a plain `u64`
//! counter and the schedule is a fixed sequence of method calls in
//! [`Simulation::step`] rather than an event-driven graph. The trait seams
//! used for substitutable behavior (matching algorithm, pricing config) are
//! kept; only the outer drive loop changes shape.

use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{debug, error, warn};

use crate::config::Config;
use crate::demand::{draw_request_count, DemandModel, ElasticDemand, FixedDemand};
use crate::dispatch::{policy_for, DispatchPolicy};
use crate::equilibration::Equilibrator;
use crate::error::SimError;
use crate::geometry::{random_intersection, random_trip_endpoints, Direction};
use crate::history::{CompletedTripRecord, History, PhaseCounts};
use crate::observation::{ControlMessage, EquilibrationReport, Observation, RunState};
use crate::pricing::{calculate_driver_earnings, calculate_trip_fare};
use crate::trip::{Trip, TripPhase};
use crate::vehicle::{Vehicle, VehiclePhase};

/// Owns every table and piece of mutable state; the only type a caller
/// drives directly. Vehicles and trips reference each other exclusively by
/// index into `vehicles`/`trips`, never a reference, so the two tables
/// can't form a reference cycle.
pub struct Simulation {
    config: Config,
    rng: StdRng,
    block: u64,
    run_state: RunState,

    vehicles: Vec<Vehicle>,
    trips: Vec<Trip>,

    price: f64,
    base_demand: f64,

    dispatch_policy: Box<dyn DispatchPolicy>,
    demand_model: Box<dyn DemandModel>,
    equilibrator: Equilibrator,

    history: History,
}

impl Simulation {
    /// Build a new simulation. Validates `config` once; all vehicles start
    /// idle at random locations.
    pub fn new(config: Config) -> Result<Self, SimError> {
        config.validate()?;

        let mut rng = match config.random_number_seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        let vehicles = (0..config.vehicle_count)
            .map(|index| {
                let location = random_intersection(&mut rng, config.city_size, 0.0);
                let direction = Direction::ALL[rng.gen_range_usize(4)];
                Vehicle::new_idle(index as usize, location, direction)
            })
            .collect();

        let demand_model: Box<dyn DemandModel> =
            if config.demand_elasticity > 0.0 && config.equilibrate.demand_enabled() {
                Box::new(ElasticDemand {
                    demand_elasticity: config.demand_elasticity,
                })
            } else {
                Box::new(FixedDemand)
            };

        Ok(Self {
            dispatch_policy: policy_for(config.dispatch_method),
            demand_model,
            equilibrator: Equilibrator::from_config(&config),
            history: History::new(config.trailing_window, config.results_window),
            price: config.price,
            base_demand: config.base_demand,
            vehicles,
            trips: Vec::new(),
            block: 0,
            run_state: RunState::Running,
            rng,
            config,
        })
    }

    pub fn block(&self) -> u64 {
        self.block
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Advance exactly one block, in fixed order:
    /// move vehicles, process arrivals, generate demand, dispatch, sample
    /// (history), equilibrate, emit the observation.
    pub fn step(&mut self) -> Result<Observation, SimError> {
        self.move_vehicles();
        self.process_arrivals()?;
        self.generate_demand()?;
        self.dispatch();
        let phase_counts = self.sample_phase_counts();
        self.history.record_block_phases(phase_counts);

        let equilibration = self.maybe_equilibrate();

        #[cfg(debug_assertions)]
        self.check_invariants()?;

        let observation = self.build_observation(phase_counts, equilibration);
        debug!(block = self.block, price = self.price, "block complete");
        self.block += 1;
        Ok(observation)
    }

    /// Run up to `blocks` further steps, stopping early on `Stop` or a
    /// fatal error.
    pub fn run(&mut self, blocks: u64) -> Result<Vec<Observation>, SimError> {
        let mut observations = Vec::with_capacity(blocks as usize);
        for _ in 0..blocks {
            if self.run_state == RunState::Stopped {
                break;
            }
            if self.run_state == RunState::Paused {
                continue;
            }
            observations.push(self.step()?);
        }
        Ok(observations)
    }

    /// Apply a control message. Only valid between blocks; the caller must
    /// not call this from inside `step`.
    pub fn apply_control(&mut self, message: ControlMessage) {
        match message {
            ControlMessage::Pause => self.run_state = RunState::Paused,
            ControlMessage::Resume => {
                if self.run_state == RunState::Paused {
                    self.run_state = RunState::Running;
                }
            }
            ControlMessage::Stop => self.run_state = RunState::Stopped,
            ControlMessage::AdjustVehicleCount(delta) => self.adjust_vehicle_count(delta),
            ControlMessage::AdjustBaseDemand(new_base_demand) => {
                self.base_demand = new_base_demand.max(0.0);
            }
            ControlMessage::SetDispatchMethod(method) => {
                self.config.dispatch_method = method;
                self.dispatch_policy = policy_for(method);
            }
            ControlMessage::Reset => self.reset(),
        }
    }

    fn reset(&mut self) {
        let config = self.config.clone();
        if let Ok(fresh) = Simulation::new(config) {
            *self = fresh;
        }
    }

    fn adjust_vehicle_count(&mut self, delta: i64) {
        if delta > 0 {
            for _ in 0..delta {
                let location = random_intersection(&mut self.rng, self.config.city_size, 0.0);
                let direction = Direction::ALL[self.rng.gen_range_usize(4)];
                let index = self.vehicles.len();
                self.vehicles.push(Vehicle::new_idle(index, location, direction));
            }
        } else {
            // Evict idle (P1) vehicles only, lowest index first — supply-down
            // eviction never preempts a vehicle mid-trip.
            let mut remaining = (-delta) as usize;
            let mut evict = vec![false; self.vehicles.len()];
            for vehicle in self.vehicles.iter() {
                if remaining == 0 {
                    break;
                }
                if vehicle.is_idle() {
                    evict[vehicle.index] = true;
                    remaining -= 1;
                }
            }
            self.vehicles.retain(|v| !evict[v.index]);
            for (new_index, vehicle) in self.vehicles.iter_mut().enumerate() {
                vehicle.index = new_index;
            }
        }
    }

    fn move_vehicles(&mut self) {
        let trips = &self.trips;
        for vehicle in &mut self.vehicles {
            let (pickup, dropoff) = match vehicle.current_trip {
                Some(trip_index) => {
                    let trip = &trips[trip_index];
                    (Some(trip.origin), Some(trip.destination))
                }
                None => (None, None),
            };
            vehicle.advance_one_block(
                pickup,
                dropoff,
                self.config.city_size,
                self.config.idle_vehicles_moving,
                &mut self.rng,
            );
        }
    }

    /// Handle pickup-dwell countdowns and dropoff arrivals.
    fn process_arrivals(&mut self) -> Result<(), SimError> {
        for vehicle in &mut self.vehicles {
            let Some(trip_index) = vehicle.current_trip else {
                continue;
            };
            match vehicle.phase {
                VehiclePhase::P2 => {
                    let pickup = self.trips[trip_index].origin;
                    if vehicle.location == pickup {
                        let countdown = vehicle.pickup_countdown.get_or_insert(self.config.pickup_time);
                        if *countdown == 0 {
                            self.trips[trip_index].update_phase(TripPhase::Riding, self.block);
                            vehicle.update_phase(VehiclePhase::P3);
                        } else {
                            *countdown -= 1;
                        }
                    }
                }
                VehiclePhase::P3 => {
                    let dropoff = self.trips[trip_index].destination;
                    if vehicle.location == dropoff {
                        self.trips[trip_index].update_phase(TripPhase::Completed, self.block);
                        let ride_distance = self.trips[trip_index].distance(self.config.city_size);
                        let fare = calculate_trip_fare(ride_distance, self.price);
                        self.trips[trip_index].fare = Some(fare);
                        let driver_earnings = calculate_driver_earnings(fare, self.config.platform_commission);

                        let trip = &self.trips[trip_index];
                        let record = CompletedTripRecord {
                            block: self.block,
                            wait_blocks: trip.wait_blocks().unwrap_or(0),
                            ride_blocks: trip.ride_blocks().unwrap_or(0),
                            fare,
                            driver_earnings,
                        };
                        self.history.record_completed_trip(record);

                        if let Some(next_trip) = vehicle.forward_dispatched_next.take() {
                            vehicle.current_trip = Some(next_trip);
                            vehicle.update_phase(VehiclePhase::P2);
                            self.trips[next_trip].assigned_vehicle = Some(vehicle.index);
                        } else {
                            vehicle.current_trip = None;
                            vehicle.update_phase(VehiclePhase::P1);
                        }
                    }
                }
                VehiclePhase::P1 => {}
            }
        }
        Ok(())
    }

    fn generate_demand(&mut self) -> Result<(), SimError> {
        let expected_rate = self.demand_model.expected_rate(self.base_demand, self.price);
        let count = draw_request_count(&mut self.rng, expected_rate);
        for _ in 0..count {
            match random_trip_endpoints(
                &mut self.rng,
                self.config.city_size,
                self.config.trip_inhomogeneity,
                self.config.min_trip_distance,
                self.config.max_trip_distance,
            ) {
                Some((origin, destination)) => {
                    let index = self.trips.len();
                    let mut trip = Trip::new(index, origin, destination, self.block);
                    trip.update_phase(TripPhase::Waiting, self.block);
                    self.trips.push(trip);
                }
                None => {
                    return Err(SimError::ExhaustedDraw {
                        block: self.block,
                        attempts: crate::geometry::MAX_TRIP_ENDPOINT_DRAWS,
                    });
                }
            }
        }
        Ok(())
    }

    fn dispatch(&mut self) {
        let waiting: Vec<(usize, crate::geometry::Intersection)> = self
            .trips
            .iter()
            .filter(|t| t.phase == TripPhase::Waiting && t.assigned_vehicle.is_none())
            .map(|t| (t.index, t.origin))
            .collect();

        if waiting.is_empty() {
            return;
        }

        let mut idle: Vec<(usize, crate::geometry::Intersection)> = self
            .vehicles
            .iter()
            .filter(|v| v.is_idle())
            .map(|v| (v.index, v.location))
            .collect();

        if self.config.forward_dispatch {
            let horizon = self.config.forward_dispatch_horizon;
            let city_size = self.config.city_size;
            idle.extend(self.vehicles.iter().filter_map(|v| {
                if v.phase != VehiclePhase::P3 || v.forward_dispatched_next.is_some() {
                    return None;
                }
                let trip_index = v.current_trip?;
                let dropoff = self.trips[trip_index].destination;
                let remaining = crate::geometry::distance(v.location, dropoff, city_size);
                (remaining <= horizon).then_some((v.index, v.location))
            }));
        }

        if idle.is_empty() {
            return;
        }

        let assignments = self
            .dispatch_policy
            .assign(&waiting, &idle, self.config.city_size);

        for (trip_index, vehicle_index) in assignments {
            self.trips[trip_index].assigned_vehicle = Some(vehicle_index);
            let vehicle = &mut self.vehicles[vehicle_index];
            if vehicle.phase == VehiclePhase::P3 {
                vehicle.forward_dispatched_next = Some(trip_index);
            } else {
                vehicle.current_trip = Some(trip_index);
                vehicle.update_phase(VehiclePhase::P2);
            }
        }
    }

    fn sample_phase_counts(&self) -> PhaseCounts {
        let mut counts = PhaseCounts::default();
        for vehicle in &self.vehicles {
            counts.record(vehicle.phase);
        }
        counts
    }

    fn maybe_equilibrate(&mut self) -> Option<EquilibrationReport> {
        if self.config.equilibrate == crate::config::EquilibrationMode::Off {
            return None;
        }
        if self.block == 0 || self.block as u32 % self.config.equilibration_interval != 0 {
            return None;
        }

        let fractions = self.history.trailing_phase_fractions();
        let outcome = self.equilibrator.apply(
            self.config.equilibrate,
            self.vehicles.len() as u32,
            self.price,
            self.config.platform_commission,
            fractions,
            self.history.trailing_wait_fraction(),
        );

        if let Some(new_count) = outcome.vehicle_count {
            let delta = new_count as i64 - self.vehicles.len() as i64;
            if delta != 0 {
                self.adjust_vehicle_count(delta);
            }
            if outcome.supply_clamped {
                warn!(block = self.block, "supply equilibration clamped at fleet bound");
            }
        }
        if let Some(new_price) = outcome.price {
            self.price = new_price;
            if outcome.demand_clamped {
                warn!(block = self.block, "demand equilibration clamped price at zero");
            }
        }

        Some(EquilibrationReport {
            vehicle_count: outcome.vehicle_count,
            price: outcome.price,
            supply_clamped: outcome.supply_clamped,
            demand_clamped: outcome.demand_clamped,
        })
    }

    fn build_observation(
        &self,
        phase_counts: PhaseCounts,
        equilibration: Option<EquilibrationReport>,
    ) -> Observation {
        let waiting_trips = self
            .trips
            .iter()
            .filter(|t| t.phase == TripPhase::Waiting)
            .count() as u32;
        let riding_trips = self
            .trips
            .iter()
            .filter(|t| t.phase == TripPhase::Riding)
            .count() as u32;
        let completed_trips_this_block = self
            .trips
            .iter()
            .filter(|t| t.block_completed == Some(self.block))
            .count() as u32;

        Observation {
            block: self.block,
            vehicle_count: self.vehicles.len() as u32,
            p1_vehicles: phase_counts.p1,
            p2_vehicles: phase_counts.p2,
            p3_vehicles: phase_counts.p3,
            waiting_trips,
            riding_trips,
            completed_trips_this_block,
            price: self.price,
            trailing_mean_wait: self.history.trailing_mean_wait(),
            trailing_mean_ride: self.history.trailing_mean_ride(),
            trailing_mean_fare: self.history.trailing_mean_fare(),
            results_mean_wait: self.history.results_mean_wait(),
            results_mean_ride: self.history.results_mean_ride(),
            results_mean_fare: self.history.results_mean_fare(),
            results_trip_count: self.history.results_trip_count() as u32,
            results_total_driver_earnings: self.history.results_total_driver_earnings(),
            results_total_platform_revenue: self.history.results_total_platform_revenue(),
            equilibration,
        }
    }

    /// Check the structural invariants of the phase machines. Debug/test
    /// builds only, plus once before returning a fatal error.
    fn check_invariants(&self) -> Result<(), SimError> {
        for vehicle in &self.vehicles {
            match vehicle.phase {
                VehiclePhase::P1 => {
                    if vehicle.current_trip.is_some() {
                        return self.invariant_violation(format!(
                            "idle vehicle {} still holds a trip",
                            vehicle.index
                        ));
                    }
                }
                VehiclePhase::P2 | VehiclePhase::P3 => {
                    if vehicle.current_trip.is_none() {
                        return self.invariant_violation(format!(
                            "vehicle {} in phase {:?} has no trip",
                            vehicle.index, vehicle.phase
                        ));
                    }
                }
            }
            if vehicle.phase != VehiclePhase::P2 && vehicle.pickup_countdown.is_some() {
                return self.invariant_violation(format!(
                    "vehicle {} outside P2 still carries a pickup countdown",
                    vehicle.index
                ));
            }
        }
        for trip in &self.trips {
            if trip.phase == TripPhase::Riding || trip.phase == TripPhase::Completed {
                if trip.assigned_vehicle.is_none() {
                    return self.invariant_violation(format!(
                        "trip {} in phase {:?} has no assigned vehicle",
                        trip.index, trip.phase
                    ));
                }
            }
        }
        Ok(())
    }

    fn invariant_violation(&self, detail: String) -> Result<(), SimError> {
        error!(block = self.block, detail = %detail, "invariant violation");
        Err(SimError::InvariantViolation {
            block: self.block,
            detail,
        })
    }
}

/// `StdRng` only exposes `gen_range` through the `Rng` trait; this keeps
/// `use rand::Rng` scoped to call sites that need it without polluting the
/// module with a blanket import.
trait RngRangeUsizeExt {
    fn gen_range_usize(&mut self, bound: usize) -> usize;
}

impl RngRangeUsizeExt for StdRng {
    fn gen_range_usize(&mut self, bound: usize) -> usize {
        use rand::Rng;
        self.gen_range(0..bound)
    }
}
