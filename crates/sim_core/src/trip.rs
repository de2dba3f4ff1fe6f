//! Trip state machine: origin/destination, phase, timers, and fare.

use crate::geometry::{distance, Intersection};

/// Trip lifecycle phases. `Cancelled` only appears when explicitly enabled;
/// this engine does not model per-trip timeouts, so it is never reached and
/// is kept only so the type is forward-compatible with a front-end that
/// wants to model cancellation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TripPhase {
    Unassigned,
    Waiting,
    Riding,
    Completed,
    Cancelled,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Trip {
    pub index: usize,
    pub origin: Intersection,
    pub destination: Intersection,
    pub phase: TripPhase,
    pub assigned_vehicle: Option<usize>,
    pub fare: Option<f64>,

    pub block_unassigned: u64,
    pub block_waiting: Option<u64>,
    pub block_riding: Option<u64>,
    pub block_completed: Option<u64>,
}

impl Trip {
    pub fn new(index: usize, origin: Intersection, destination: Intersection, block: u64) -> Self {
        Self {
            index,
            origin,
            destination,
            phase: TripPhase::Unassigned,
            assigned_vehicle: None,
            fare: None,
            block_unassigned: block,
            block_waiting: None,
            block_riding: None,
            block_completed: None,
        }
    }

    /// Taxicab distance from origin to destination; always >= 1 because
    /// [`crate::geometry::random_trip_endpoints`] rejects coincident draws.
    pub fn distance(&self, city_size: u32) -> u32 {
        distance(self.origin, self.destination, city_size)
    }

    /// Enforce UNASSIGNED -> WAITING -> RIDING -> COMPLETED monotonicity and
    /// stamp the block the new phase was entered.
    pub fn update_phase(&mut self, to: TripPhase, block: u64) {
        debug_assert!(
            is_legal_trip_transition(self.phase, to),
            "illegal trip transition {:?} -> {:?}",
            self.phase,
            to
        );
        match to {
            TripPhase::Waiting => self.block_waiting = Some(block),
            TripPhase::Riding => self.block_riding = Some(block),
            TripPhase::Completed => self.block_completed = Some(block),
            TripPhase::Cancelled => {}
            TripPhase::Unassigned => {}
        }
        self.phase = to;
    }

    /// `block_at_RIDING - block_at_UNASSIGNED`.
    pub fn wait_blocks(&self) -> Option<u64> {
        self.block_riding.map(|riding| riding - self.block_unassigned)
    }

    /// `block_at_COMPLETED - block_at_RIDING`.
    pub fn ride_blocks(&self) -> Option<u64> {
        match (self.block_riding, self.block_completed) {
            (Some(riding), Some(completed)) => Some(completed - riding),
            _ => None,
        }
    }
}

fn is_legal_trip_transition(from: TripPhase, to: TripPhase) -> bool {
    use TripPhase::*;
    matches!(
        (from, to),
        (Unassigned, Waiting)
            | (Waiting, Riding)
            | (Riding, Completed)
            | (Unassigned, Cancelled)
            | (Waiting, Cancelled)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn distance_is_taxicab() {
        let t = Trip::new(0, Intersection::new(0, 0), Intersection::new(2, 2), 0);
        assert_eq!(t.distance(10), 4);
    }

    #[test]
    fn timers_derive_from_stamps() {
        let mut t = Trip::new(0, Intersection::new(0, 0), Intersection::new(2, 2), 0);
        t.update_phase(TripPhase::Waiting, 0);
        t.update_phase(TripPhase::Riding, 2);
        t.update_phase(TripPhase::Completed, 6);
        assert_eq!(t.wait_blocks(), Some(2));
        assert_eq!(t.ride_blocks(), Some(4));
    }

    #[test]
    #[should_panic]
    fn skipping_waiting_is_illegal() {
        let mut t = Trip::new(0, Intersection::new(0, 0), Intersection::new(1, 1), 0);
        t.update_phase(TripPhase::Riding, 1);
    }
}
