#![allow(dead_code)]

use sim_core::{Config, Observation, Simulation};

/// Builder for reproducible test scenarios: a setter-chain wrapper over a
/// plain `Config`.
pub struct ScenarioBuilder {
    config: Config,
}

impl ScenarioBuilder {
    pub fn new() -> Self {
        Self {
            config: Config::default().with_seed(1234),
        }
    }

    pub fn with_config(mut self, f: impl FnOnce(Config) -> Config) -> Self {
        self.config = f(self.config);
        self
    }

    pub fn build(self) -> Simulation {
        Simulation::new(self.config).expect("scenario config must be valid")
    }
}

impl Default for ScenarioBuilder {
    fn default() -> Self {
        Self::new()
    }
}

pub fn run_blocks(sim: &mut Simulation, blocks: u64) -> Vec<Observation> {
    sim.run(blocks).expect("scenario run must not error")
}
