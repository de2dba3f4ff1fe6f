//! The engine-pushes external interface.
//!
//! `Simulation::step` returns an `Observation` snapshot each block; a
//! caller may feed back `ControlMessage`s, applied only between blocks —
//! configuration is never mutated mid-block. The snapshot/control-message
//! split is adapted from a discrete-event runner to the block-stepped
//! driver here.

use crate::config::DispatchMethod;

/// Everything a front-end needs to render or log one completed block.
#[derive(Debug, Clone, PartialEq)]
pub struct Observation {
    pub block: u64,
    pub vehicle_count: u32,
    pub p1_vehicles: u32,
    pub p2_vehicles: u32,
    pub p3_vehicles: u32,
    pub waiting_trips: u32,
    pub riding_trips: u32,
    pub completed_trips_this_block: u32,
    pub price: f64,

    pub trailing_mean_wait: f64,
    pub trailing_mean_ride: f64,
    pub trailing_mean_fare: f64,

    /// Means over the long results window — what a Sequence-mode report or
    /// other caller wants, as opposed to the `trailing_*` fields used for
    /// live equilibration feedback.
    pub results_mean_wait: f64,
    pub results_mean_ride: f64,
    pub results_mean_fare: f64,
    pub results_trip_count: u32,
    pub results_total_driver_earnings: f64,
    pub results_total_platform_revenue: f64,

    /// `Some` only on a block where equilibration ran, per
    /// `Config::equilibration_interval`.
    pub equilibration: Option<EquilibrationReport>,
}

/// Non-fatal equilibration result for the block it ran on: clamping is
/// reported, not an error.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EquilibrationReport {
    pub vehicle_count: Option<u32>,
    pub price: Option<f64>,
    pub supply_clamped: bool,
    pub demand_clamped: bool,
}

/// A command applied between blocks, never mid-block.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ControlMessage {
    Pause,
    Resume,
    Stop,
    AdjustVehicleCount(i64),
    AdjustBaseDemand(f64),
    SetDispatchMethod(DispatchMethod),
    Reset,
}

/// Run/pause/stop state applied by [`ControlMessage::Pause`] /
/// [`ControlMessage::Resume`] / [`ControlMessage::Stop`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RunState {
    #[default]
    Running,
    Paused,
    Stopped,
}
