mod support;

use sim_core::{Config, EquilibrationMode};
use support::{run_blocks, ScenarioBuilder};

/// With supply equilibration on and a reserved wage well above what a small
/// fleet facing heavy demand can earn per block, the fleet should grow
/// toward (and respect) `max_vehicles` rather than stay fixed.
#[test]
fn supply_equilibration_grows_an_undersized_fleet() {
    let mut sim = ScenarioBuilder::new()
        .with_config(|c| Config {
            city_size: 8,
            vehicle_count: 2,
            base_demand: 3.0,
            price: 5.0,
            platform_commission: 0.0,
            reserved_wage: 0.05,
            equilibrate: EquilibrationMode::Supply,
            equilibration_interval: 5,
            max_vehicles: Some(20),
            ..c
        })
        .build();

    let observations = run_blocks(&mut sim, 300);
    let final_count = observations.last().unwrap().vehicle_count;
    assert!(final_count >= 2);
    assert!(final_count <= 20);
}

#[test]
fn supply_equilibration_never_drops_below_min_vehicles() {
    let mut sim = ScenarioBuilder::new()
        .with_config(|c| Config {
            city_size: 8,
            vehicle_count: 5,
            base_demand: 0.01,
            price: 0.1,
            reserved_wage: 0.9,
            equilibrate: EquilibrationMode::Supply,
            equilibration_interval: 5,
            min_vehicles: 3,
            ..c
        })
        .build();

    let observations = run_blocks(&mut sim, 300);
    assert!(observations.iter().all(|o| o.vehicle_count >= 3));
}
