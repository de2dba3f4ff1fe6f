//! Greedy per-request nearest-vehicle dispatch.
//!
//! Visits trips in a stable order, assigns each the nearest still-idle
//! vehicle, and marks that vehicle unavailable for the remainder of the
//! pass.

use super::{Candidate, DispatchPolicy};
use crate::geometry::distance;

#[derive(Debug, Clone, Copy, Default)]
pub struct ImmediateNearest;

impl DispatchPolicy for ImmediateNearest {
    fn assign(
        &self,
        waiting_trips: &[Candidate],
        idle_vehicles: &[Candidate],
        city_size: u32,
    ) -> Vec<(usize, usize)> {
        let mut available: Vec<Candidate> = idle_vehicles.to_vec();
        let mut assignments = Vec::with_capacity(waiting_trips.len().min(idle_vehicles.len()));

        for &(trip_index, origin) in waiting_trips {
            if available.is_empty() {
                break;
            }
            // `swap_remove` below scrambles `available`'s order after the
            // first removal, so ties must be broken explicitly on vehicle
            // index rather than relying on iteration order.
            let (slot, &(vehicle_index, _)) = available
                .iter()
                .enumerate()
                .min_by_key(|(_, &(vi, location))| (distance(origin, location, city_size), vi))
                .expect("available is non-empty");
            assignments.push((trip_index, vehicle_index));
            available.swap_remove(slot);
        }

        assignments
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Intersection;

    #[test]
    fn assigns_closest_vehicle_first() {
        let policy = ImmediateNearest;
        let trips = vec![(0, Intersection::new(0, 0))];
        let vehicles = vec![(0, Intersection::new(5, 5)), (1, Intersection::new(1, 0))];
        let out = policy.assign(&trips, &vehicles, 10);
        assert_eq!(out, vec![(0, 1)]);
    }

    #[test]
    fn leftover_trips_remain_unassigned_when_vehicles_run_out() {
        let policy = ImmediateNearest;
        let trips = vec![(0, Intersection::new(0, 0)), (1, Intersection::new(1, 1))];
        let vehicles = vec![(0, Intersection::new(0, 1))];
        let out = policy.assign(&trips, &vehicles, 10);
        assert_eq!(out.len(), 1);
    }

    #[test]
    fn distance_ties_break_on_lowest_vehicle_index() {
        let policy = ImmediateNearest;
        // All four vehicles are equidistant from both trip origins on this
        // torus; greedy per-trip assignment must take the lowest remaining
        // vehicle index each time, not whatever swap_remove happens to leave
        // in place after the first assignment.
        let trips = vec![(0, Intersection::new(0, 0)), (1, Intersection::new(0, 0))];
        let vehicles = vec![
            (0, Intersection::new(1, 0)),
            (1, Intersection::new(0, 1)),
            (2, Intersection::new(9, 0)),
            (3, Intersection::new(0, 9)),
        ];
        let out = policy.assign(&trips, &vehicles, 10);
        assert_eq!(out, vec![(0, 0), (1, 1)]);
    }

    #[test]
    fn each_vehicle_assigned_at_most_once() {
        let policy = ImmediateNearest;
        let trips = vec![(0, Intersection::new(0, 0)), (1, Intersection::new(0, 1))];
        let vehicles = vec![(0, Intersection::new(0, 0))];
        let out = policy.assign(&trips, &vehicles, 10);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].1, 0);
    }
}
