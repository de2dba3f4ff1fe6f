//! Vehicle state machine: position, direction, phase, and the pickup dwell.

use rand::Rng;

use crate::geometry::{distance, step, Direction, Intersection};

/// The three vehicle phases.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VehiclePhase {
    /// Idle, no trip.
    P1,
    /// Dispatched, en route to pickup, or dwelling at pickup.
    P2,
    /// Occupied, carrying a rider to dropoff.
    P3,
}

/// A vehicle in the fleet.
///
/// `current_trip` and `forward_dispatched_next` are indices into the
/// simulation's trip table, not references — a vehicle and its trip would
/// otherwise form a reference cycle.
#[derive(Debug, Clone, PartialEq)]
pub struct Vehicle {
    pub index: usize,
    pub location: Intersection,
    pub direction: Direction,
    pub phase: VehiclePhase,
    pub current_trip: Option<usize>,
    /// A trip accepted while still carrying a rider (FORWARD_DISPATCH).
    pub forward_dispatched_next: Option<usize>,
    /// `Some(n)` once the vehicle has arrived at its pickup and is dwelling;
    /// `None` at every other time, including while still en route.
    pub pickup_countdown: Option<u32>,
}

impl Vehicle {
    pub fn new_idle(index: usize, location: Intersection, direction: Direction) -> Self {
        Self {
            index,
            location,
            direction,
            phase: VehiclePhase::P1,
            current_trip: None,
            forward_dispatched_next: None,
            pickup_countdown: None,
        }
    }

    pub fn is_idle(&self) -> bool {
        self.phase == VehiclePhase::P1
    }

    /// Advance the vehicle one block. `pickup`/`dropoff` are the active
    /// trip's pickup/dropoff locations; required when `phase` is `P2`/`P3`
    /// respectively.
    pub fn advance_one_block(
        &mut self,
        pickup: Option<Intersection>,
        dropoff: Option<Intersection>,
        city_size: u32,
        idle_vehicles_moving: bool,
        rng: &mut impl Rng,
    ) {
        match self.phase {
            VehiclePhase::P1 => {
                if !idle_vehicles_moving {
                    return;
                }
                if !rng.gen_bool(0.5) {
                    let candidates: Vec<Direction> = Direction::ALL
                        .into_iter()
                        .filter(|d| *d != self.direction.reverse())
                        .collect();
                    self.direction = candidates[rng.gen_range(0..candidates.len())];
                }
                self.location = step(self.location, self.direction, city_size);
            }
            VehiclePhase::P2 => {
                let target = pickup.expect("P2 vehicle must carry a pickup target");
                if let Some(dir) = greedy_direction_toward(self.location, target, city_size, rng)
                {
                    self.direction = dir;
                    self.location = step(self.location, dir, city_size);
                }
                // Already at pickup: dwelling, no movement.
            }
            VehiclePhase::P3 => {
                let target = dropoff.expect("P3 vehicle must carry a dropoff target");
                if let Some(dir) = greedy_direction_toward(self.location, target, city_size, rng)
                {
                    self.direction = dir;
                    self.location = step(self.location, dir, city_size);
                }
            }
        }
    }

    /// Transition to a new phase. Clears `pickup_countdown` whenever leaving
    /// `P2`.
    pub fn update_phase(&mut self, to: VehiclePhase) {
        if self.phase == VehiclePhase::P2 && to != VehiclePhase::P2 {
            self.pickup_countdown = None;
        }
        self.phase = to;
    }
}

/// Pick a direction that strictly reduces taxicab distance to `target`, with
/// ties among reducing axes broken uniformly. Returns `None` if already at
/// `target` (the vehicle dwells rather than moving).
fn greedy_direction_toward(
    location: Intersection,
    target: Intersection,
    city_size: u32,
    rng: &mut impl Rng,
) -> Option<Direction> {
    if location == target {
        return None;
    }
    let current_distance = distance(location, target, city_size);
    let candidates: Vec<Direction> = Direction::ALL
        .into_iter()
        .filter(|&d| distance(step(location, d, city_size), target, city_size) < current_distance)
        .collect();
    debug_assert!(
        !candidates.is_empty(),
        "a non-degenerate torus always has a reducing move"
    );
    Some(candidates[rng.gen_range(0..candidates.len())])
}
