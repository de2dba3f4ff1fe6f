mod support;

use sim_core::Config;
use support::{run_blocks, ScenarioBuilder};

/// With `forward_dispatch` on, an occupied (P3) vehicle may be assigned its
/// next trip before it finishes its current one, and should pick that trip
/// up immediately on dropoff instead of returning to idle first.
#[test]
fn forward_dispatch_runs_to_completion_under_heavy_demand() {
    let mut sim = ScenarioBuilder::new()
        .with_config(|c| Config {
            city_size: 8,
            vehicle_count: 2,
            base_demand: 2.0,
            forward_dispatch: true,
            ..c
        })
        .build();

    let observations = run_blocks(&mut sim, 400);
    let completed: u32 = observations.iter().map(|o| o.completed_trips_this_block).sum();
    assert!(completed > 0);
}

#[test]
fn forward_dispatched_vehicle_starts_its_next_trip_without_returning_to_idle() {
    let mut sim = ScenarioBuilder::new()
        .with_config(|c| Config {
            city_size: 8,
            vehicle_count: 1,
            base_demand: 2.5,
            forward_dispatch: true,
            ..c
        })
        .build();

    let observations = run_blocks(&mut sim, 300);
    // At least one block should show the single vehicle already riding
    // (P3) immediately, i.e. it never idled between back-to-back trips.
    assert!(observations.iter().any(|o| o.p3_vehicles == 1));
}
