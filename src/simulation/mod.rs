//! Dynamic reroute simulation engine
//!
//! Core logic for planning time-optimal routes over a changing road graph,
//! deciding when a reroute is worth taking, and moving a vehicle tick by
//! tick. Runs headlessly; rendering and topology generation live elsewhere.

mod decision;
mod environment;
mod graph;
mod journal;
mod planner;
mod types;
mod vehicle;
mod world;

pub use decision::{
    evaluate_reroute, RerouteOutcome, RerouteRule, RerouteVerdict, IMPROVEMENT_THRESHOLD,
    PENALTY_WEIGHT,
};
pub use environment::EnvironmentModel;
pub use graph::RoadGraph;
pub use journal::{DecisionJournal, JournalEntry, Severity, JOURNAL_CAPACITY};
pub use planner::{plan, plan_with, CostModel, PlannedRoute};
pub use types::{
    Axis, EdgeId, LightState, NodeId, Position, RoadEdge, RoadNode, ENV_TICK_SECS,
    LIGHT_FLIP_PROBABILITY, MIN_SPEED_KMH, NEAR_ARRIVAL_THRESHOLD, PERTURBATION_KMH,
    SLOWDOWN_FACTOR, SLOWDOWN_PROBABILITY, VEHICLE_TICK_SECS,
};
pub use vehicle::{StepOutcome, VehicleState};
pub use world::{ConstraintStatus, Metrics, RunState, SimParams, SimWorld};
