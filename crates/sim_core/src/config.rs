//! The immutable scenario configuration record.

use crate::error::SimError;

/// Dispatch policy selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchMethod {
    ImmediateNearest,
    ImmediateBatchNearest,
    QueueNearest,
}

/// Equilibration mode. `Supply` and `Demand` are independent
/// switches; `Full` runs both.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EquilibrationMode {
    Off,
    Supply,
    Demand,
    Full,
}

impl EquilibrationMode {
    pub fn supply_enabled(self) -> bool {
        matches!(self, EquilibrationMode::Supply | EquilibrationMode::Full)
    }

    pub fn demand_enabled(self) -> bool {
        matches!(self, EquilibrationMode::Demand | EquilibrationMode::Full)
    }
}

/// Scenario configuration. Owned by [`crate::simulation::Simulation`],
/// read-only to every component, built with the same setter-chain shape as
/// a scenario-params builder.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub city_size: u32,
    pub vehicle_count: u32,
    pub base_demand: f64,
    pub time_blocks: u64,
    pub min_trip_distance: u32,
    pub max_trip_distance: Option<u32>,
    pub trip_inhomogeneity: f64,
    pub idle_vehicles_moving: bool,
    pub dispatch_method: DispatchMethod,
    pub forward_dispatch: bool,
    /// Maximum remaining taxicab distance from a `P3` vehicle's location to
    /// its current trip's dropoff for it to be forward-dispatch eligible.
    pub forward_dispatch_horizon: u32,
    pub pickup_time: u32,

    pub equilibrate: EquilibrationMode,
    pub equilibration_interval: u32,
    pub price: f64,
    pub platform_commission: f64,
    pub reserved_wage: f64,
    pub wait_cost: f64,
    /// `U_0` in the rider utility formula: the baseline utility a rider gets
    /// independent of price and wait.
    pub base_rider_utility: f64,
    pub demand_elasticity: f64,
    pub min_vehicles: u32,
    pub max_vehicles: Option<u32>,

    pub trailing_window: usize,
    pub results_window: usize,

    pub random_number_seed: Option<u64>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            city_size: 10,
            vehicle_count: 10,
            base_demand: 1.0,
            time_blocks: 1000,
            min_trip_distance: 0,
            max_trip_distance: None,
            trip_inhomogeneity: 0.0,
            idle_vehicles_moving: false,
            dispatch_method: DispatchMethod::ImmediateNearest,
            forward_dispatch: false,
            forward_dispatch_horizon: 5,
            pickup_time: 0,
            equilibrate: EquilibrationMode::Off,
            equilibration_interval: 10,
            price: 1.0,
            platform_commission: 0.0,
            reserved_wage: 0.2,
            wait_cost: 1.0,
            base_rider_utility: 1.0,
            demand_elasticity: 0.0,
            min_vehicles: 0,
            max_vehicles: None,
            trailing_window: 30,
            results_window: 200,
            random_number_seed: None,
        }
    }
}

impl Config {
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.random_number_seed = Some(seed);
        self
    }

    pub fn with_city_size(mut self, city_size: u32) -> Self {
        self.city_size = city_size;
        self
    }

    pub fn with_vehicle_count(mut self, vehicle_count: u32) -> Self {
        self.vehicle_count = vehicle_count;
        self
    }

    pub fn with_base_demand(mut self, base_demand: f64) -> Self {
        self.base_demand = base_demand;
        self
    }

    pub fn with_time_blocks(mut self, time_blocks: u64) -> Self {
        self.time_blocks = time_blocks;
        self
    }

    pub fn with_dispatch_method(mut self, method: DispatchMethod) -> Self {
        self.dispatch_method = method;
        self
    }

    pub fn with_pickup_time(mut self, pickup_time: u32) -> Self {
        self.pickup_time = pickup_time;
        self
    }

    pub fn with_forward_dispatch(mut self, enabled: bool) -> Self {
        self.forward_dispatch = enabled;
        self
    }

    pub fn with_forward_dispatch_horizon(mut self, horizon: u32) -> Self {
        self.forward_dispatch_horizon = horizon;
        self
    }

    pub fn with_equilibration(mut self, mode: EquilibrationMode, interval: u32) -> Self {
        self.equilibrate = mode;
        self.equilibration_interval = interval;
        self
    }

    /// Validate bounds and type constraints. Called once, before the first
    /// block.
    pub fn validate(&self) -> Result<(), SimError> {
        if self.city_size == 0 || self.city_size % 2 != 0 {
            return Err(SimError::ConfigInvalid(format!(
                "city_size must be a positive even integer, got {}",
                self.city_size
            )));
        }
        if self.base_demand < 0.0 {
            return Err(SimError::ConfigInvalid(
                "base_demand must be >= 0".to_string(),
            ));
        }
        if self.time_blocks == 0 {
            return Err(SimError::ConfigInvalid(
                "time_blocks must be >= 1".to_string(),
            ));
        }
        if !(0.0..=1.0).contains(&self.trip_inhomogeneity) {
            return Err(SimError::ConfigInvalid(
                "trip_inhomogeneity must be in [0, 1]".to_string(),
            ));
        }
        if self.pickup_time > 10 {
            return Err(SimError::ConfigInvalid(
                "pickup_time must be in [0, 10]".to_string(),
            ));
        }
        if self.equilibration_interval == 0 {
            return Err(SimError::ConfigInvalid(
                "equilibration_interval must be >= 1".to_string(),
            ));
        }
        if self.trailing_window == 0 || self.results_window == 0 {
            return Err(SimError::ConfigInvalid(
                "trailing_window and results_window must be >= 1".to_string(),
            ));
        }
        if let Some(max_dist) = self.max_trip_distance {
            if max_dist < self.min_trip_distance {
                return Err(SimError::ConfigInvalid(
                    "max_trip_distance must be >= min_trip_distance".to_string(),
                ));
            }
        }
        if let Some(max_vehicles) = self.max_vehicles {
            if max_vehicles < self.min_vehicles {
                return Err(SimError::ConfigInvalid(
                    "max_vehicles must be >= min_vehicles".to_string(),
                ));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn odd_city_size_is_rejected() {
        let cfg = Config {
            city_size: 5,
            ..Config::default()
        };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn pickup_time_above_ten_is_rejected() {
        let cfg = Config {
            pickup_time: 11,
            ..Config::default()
        };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn builder_chains_fields() {
        let cfg = Config::default()
            .with_seed(7)
            .with_city_size(4)
            .with_vehicle_count(2);
        assert_eq!(cfg.random_number_seed, Some(7));
        assert_eq!(cfg.city_size, 4);
        assert_eq!(cfg.vehicle_count, 2);
    }
}
