mod support;

use sim_core::Config;
use support::{run_blocks, ScenarioBuilder};

/// A nonzero `pickup_time` holds a vehicle at the rider's origin for that
/// many extra blocks before the trip moves to RIDING, which should push
/// mean wait up relative to an otherwise identical zero-dwell scenario.
#[test]
fn pickup_dwell_increases_mean_wait() {
    let base = |pickup_time: u32| Config {
        city_size: 6,
        vehicle_count: 2,
        base_demand: 0.5,
        pickup_time,
        ..Config::default().with_seed(99)
    };

    let mut no_dwell = ScenarioBuilder::new().with_config(|_| base(0)).build();
    let mut with_dwell = ScenarioBuilder::new().with_config(|_| base(5)).build();

    let no_dwell_obs = run_blocks(&mut no_dwell, 400);
    let with_dwell_obs = run_blocks(&mut with_dwell, 400);

    let no_dwell_wait = no_dwell_obs.last().unwrap().trailing_mean_wait;
    let with_dwell_wait = with_dwell_obs.last().unwrap().trailing_mean_wait;

    if no_dwell_wait > 0.0 && with_dwell_wait > 0.0 {
        assert!(with_dwell_wait >= no_dwell_wait);
    }
}

#[test]
fn pickup_time_above_bound_is_rejected_at_construction() {
    let config = Config {
        pickup_time: 11,
        ..Config::default()
    };
    assert!(sim_core::Simulation::new(config).is_err());
}
