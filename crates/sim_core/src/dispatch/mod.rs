//! Dispatch policies: matching unmatched trips to idle vehicles.
//!
//! Expressed as a capability trait — "assign over the given idle set and
//! waiting set" — selected once at configuration time and boxed on
//! [`crate::simulation::Simulation`] to avoid per-block dynamic dispatch
//! selection in the hot loop.

mod batch_nearest;
mod immediate_nearest;

pub use batch_nearest::ImmediateBatchNearest;
pub use immediate_nearest::ImmediateNearest;

use crate::config::DispatchMethod;
use crate::geometry::Intersection;

/// One candidate: a stable table index plus its current location.
pub type Candidate = (usize, Intersection);

/// A dispatch policy assigns a subset of waiting trips to idle vehicles.
///
/// Trips not present in the result remain `UNASSIGNED` and are reconsidered
/// next block — no policy here ever drops a trip.
pub trait DispatchPolicy: std::fmt::Debug {
    /// Returns `(trip_index, vehicle_index)` pairs to assign this block.
    /// Every vehicle index appears at most once; every trip index appears
    /// at most once.
    fn assign(&self, waiting_trips: &[Candidate], idle_vehicles: &[Candidate], city_size: u32)
        -> Vec<(usize, usize)>;
}

/// Construct the configured policy. `QUEUE_NEAREST` shares
/// `ImmediateNearest`'s mechanics: the two only differ in how the caller
/// should *describe* what happens to surplus trips (neither ever drops
/// one — see the trait doc above), so there is nothing left to implement
/// differently.
pub fn policy_for(method: DispatchMethod) -> Box<dyn DispatchPolicy> {
    match method {
        DispatchMethod::ImmediateNearest | DispatchMethod::QueueNearest => {
            Box::new(ImmediateNearest)
        }
        DispatchMethod::ImmediateBatchNearest => Box::new(ImmediateBatchNearest::default()),
    }
}
