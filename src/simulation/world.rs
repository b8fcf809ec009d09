//! Main simulation world that ties everything together
//!
//! Owns the graph, vehicle state, journal, RNG, and tuning parameters, and
//! exposes the synchronous step functions an external driver calls once per
//! logical frame. All shared mutable state is applied between ticks; nothing
//! here blocks or runs concurrently.

use anyhow::{bail, Result};
use log::{error, info};
use rand::rngs::StdRng;
use rand::SeedableRng;

use super::decision::{evaluate_reroute, RerouteOutcome, RerouteRule};
use super::environment::EnvironmentModel;
use super::graph::RoadGraph;
use super::journal::{DecisionJournal, Severity};
use super::planner::{plan_with, CostModel};
use super::types::{EdgeId, NodeId, ENV_TICK_SECS, VEHICLE_TICK_SECS};
use super::vehicle::{StepOutcome, VehicleState};

/// Lifecycle of a simulation run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    Idle,
    Running,
    Paused,
    Arrived,
    Failed,
}

/// Last outcome of the soft-constraint rule, surfaced in metrics
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConstraintStatus {
    /// No evaluation has happened yet
    Inactive,
    /// Candidate matched the committed route; nothing to decide
    Holding,
    Accepted,
    Rejected,
}

/// Snapshot of run metrics for observers
#[derive(Debug, Clone, Copy)]
pub struct Metrics {
    pub elapsed_minutes: f32,
    pub reroute_count: u32,
    pub distance_km: f32,
    pub constraint_status: ConstraintStatus,
}

/// Tunable simulation parameters
#[derive(Debug, Clone)]
pub struct SimParams {
    pub rule: RerouteRule,
    pub cost: CostModel,
    pub environment: EnvironmentModel,
    pub env_tick_secs: f32,
    pub vehicle_tick_secs: f32,
    pub seed: u64,
}

impl Default for SimParams {
    fn default() -> Self {
        Self {
            rule: RerouteRule::default(),
            cost: CostModel::default(),
            environment: EnvironmentModel::default(),
            env_tick_secs: ENV_TICK_SECS,
            vehicle_tick_secs: VEHICLE_TICK_SECS,
            seed: 0,
        }
    }
}

/// The simulation world
pub struct SimWorld {
    graph: RoadGraph,
    /// Copy of the initially supplied topology, restored on reset
    pristine: RoadGraph,
    vehicle: VehicleState,
    journal: DecisionJournal,
    rng: StdRng,
    params: SimParams,
    start: Option<NodeId>,
    goal: Option<NodeId>,
    run_state: RunState,
    constraint_status: ConstraintStatus,
}

impl SimWorld {
    /// Wrap an externally supplied graph
    pub fn new(graph: RoadGraph, params: SimParams) -> Self {
        let rng = StdRng::seed_from_u64(params.seed);
        Self {
            pristine: graph.clone(),
            graph,
            vehicle: VehicleState::default(),
            journal: DecisionJournal::new(),
            rng,
            params,
            start: None,
            goal: None,
            run_state: RunState::Idle,
            constraint_status: ConstraintStatus::Inactive,
        }
    }

    /// Demo world: a uniform grid with start and goal at opposite corners
    pub fn demo_grid(rows: usize, cols: usize, params: SimParams) -> Result<Self> {
        let graph = RoadGraph::grid(rows, cols, 1.0, 60.0, 50.0);
        let mut world = Self::new(graph, params);
        world.set_start(NodeId(0))?;
        world.set_end(NodeId(rows * cols - 1))?;
        Ok(world)
    }

    pub fn run_state(&self) -> RunState {
        self.run_state
    }

    pub fn graph(&self) -> &RoadGraph {
        &self.graph
    }

    pub fn vehicle(&self) -> &VehicleState {
        &self.vehicle
    }

    pub fn journal(&self) -> &DecisionJournal {
        &self.journal
    }

    /// The committed route, for rendering
    pub fn committed_path(&self) -> &[NodeId] {
        &self.vehicle.path
    }

    pub fn estimated_total_minutes(&self) -> f32 {
        self.vehicle.estimated_total_minutes
    }

    pub fn metrics(&self) -> Metrics {
        Metrics {
            elapsed_minutes: self.vehicle.elapsed_minutes,
            reroute_count: self.vehicle.reroute_count,
            distance_km: self.vehicle.distance_km,
            constraint_status: self.constraint_status,
        }
    }

    /// Set the trip origin; resets the run and replans
    pub fn set_start(&mut self, node: NodeId) -> Result<()> {
        if !self.graph.contains_node(node) {
            bail!("Unknown start node {:?}", node);
        }
        self.start = Some(node);
        self.reset();
        Ok(())
    }

    /// Set the trip destination; resets the run and replans
    pub fn set_end(&mut self, node: NodeId) -> Result<()> {
        if !self.graph.contains_node(node) {
            bail!("Unknown end node {:?}", node);
        }
        self.goal = Some(node);
        self.reset();
        Ok(())
    }

    /// Begin (or resume) the run; plans the initial route if none committed
    pub fn start(&mut self) -> Result<()> {
        match self.run_state {
            RunState::Paused => {
                self.run_state = RunState::Running;
                return Ok(());
            }
            RunState::Running => return Ok(()),
            _ => {}
        }

        let (Some(start), Some(goal)) = (self.start, self.goal) else {
            bail!("Start and end nodes must be set before starting");
        };

        if self.vehicle.path.is_empty() && !self.plan_initial(start, goal) {
            bail!("No route available from {:?} to {:?}", start, goal);
        }

        self.run_state = RunState::Running;
        info!(
            "Run started: {} nodes, estimated {:.1} min",
            self.vehicle.path.len(),
            self.vehicle.estimated_total_minutes
        );
        Ok(())
    }

    /// Stop scheduled ticks from mutating state until start() is called
    pub fn pause(&mut self) {
        if self.run_state == RunState::Running {
            self.run_state = RunState::Paused;
        }
    }

    /// Restore the pristine topology and zero the vehicle state
    pub fn reset(&mut self) {
        self.graph = self.pristine.clone();
        self.vehicle = VehicleState::default();
        self.journal.clear();
        self.rng = StdRng::seed_from_u64(self.params.seed);
        self.run_state = RunState::Idle;
        self.constraint_status = ConstraintStatus::Inactive;

        if let (Some(start), Some(goal)) = (self.start, self.goal) {
            self.plan_initial(start, goal);
        }
    }

    fn plan_initial(&mut self, start: NodeId, goal: NodeId) -> bool {
        match plan_with(&self.graph, start, goal, &self.params.cost) {
            Some(route) => {
                self.journal.push(
                    0.0,
                    Severity::Info,
                    format!(
                        "Route planned: {} nodes, {:.1} min",
                        route.nodes.len(),
                        route.estimated_minutes
                    ),
                );
                self.vehicle = VehicleState::with_route(route.nodes, route.estimated_minutes);
                true
            }
            None => {
                self.journal.push(
                    0.0,
                    Severity::Warning,
                    format!("No route from {:?} to {:?}", start, goal),
                );
                false
            }
        }
    }

    /// One environment tick: perturb the graph, then evaluate a reroute
    pub fn environment_tick(&mut self) {
        if self.run_state != RunState::Running {
            return;
        }

        let now = self.vehicle.elapsed_minutes;
        self.params
            .environment
            .step(&mut self.graph, &mut self.rng, &mut self.journal, now);

        let Some(goal) = self.goal else {
            return;
        };

        let outcome = evaluate_reroute(
            &self.graph,
            &self.params.cost,
            &self.params.rule,
            &mut self.vehicle,
            goal,
        );

        match outcome {
            RerouteOutcome::Accepted(verdict) => {
                self.constraint_status = ConstraintStatus::Accepted;
                info!(
                    "Reroute accepted: saves {:.1} min, net benefit {:.1}",
                    verdict.time_saved, verdict.net_benefit
                );
                self.journal.push(
                    now,
                    Severity::Success,
                    format!(
                        "Rerouted: {:.1} min saved, net benefit {:.1} min",
                        verdict.time_saved, verdict.net_benefit
                    ),
                );
            }
            RerouteOutcome::Rejected(_) => {
                self.constraint_status = ConstraintStatus::Rejected;
            }
            RerouteOutcome::Unchanged => {
                self.constraint_status = ConstraintStatus::Holding;
            }
            RerouteOutcome::Unreachable | RerouteOutcome::Idle => {}
        }
    }

    /// One movement tick for the vehicle
    pub fn vehicle_tick(&mut self) {
        if self.run_state != RunState::Running {
            return;
        }

        match self.vehicle.step(&self.graph, self.params.vehicle_tick_secs) {
            StepOutcome::Advanced | StepOutcome::Waiting => {}
            StepOutcome::Arrived => {
                self.run_state = RunState::Arrived;
                info!(
                    "Arrived after {:.1} min, {} reroutes",
                    self.vehicle.elapsed_minutes, self.vehicle.reroute_count
                );
                self.journal.push(
                    self.vehicle.elapsed_minutes,
                    Severity::Success,
                    format!("Arrived in {:.1} min", self.vehicle.elapsed_minutes),
                );
            }
            StepOutcome::PathBroken { from, to } => {
                self.run_state = RunState::Failed;
                error!("Committed path broken between {:?} and {:?}", from, to);
                self.journal.push(
                    self.vehicle.elapsed_minutes,
                    Severity::Error,
                    format!("Path integrity failure between {:?} and {:?}", from, to),
                );
            }
        }
    }

    /// Force an edge into a degraded state, frozen against perturbation
    pub fn inject_incident(&mut self, edge: EdgeId, forced_speed: f32, reason: &str) -> Result<()> {
        self.graph.mark_incident(edge, forced_speed)?;
        error!("Incident on edge {:?}: {} ({:.0} km/h)", edge, reason, forced_speed);
        self.journal.push(
            self.vehicle.elapsed_minutes,
            Severity::Error,
            format!("Incident on edge {:?}: {}", edge, reason),
        );
        Ok(())
    }

    /// Lift an incident, returning the edge to ambient perturbation
    pub fn clear_incident(&mut self, edge: EdgeId) -> Result<()> {
        self.graph.clear_incident(edge)?;
        self.journal.push(
            self.vehicle.elapsed_minutes,
            Severity::Info,
            format!("Incident cleared on edge {:?}", edge),
        );
        Ok(())
    }

    /// One-line progress summary for headless output
    pub fn summary(&self) -> String {
        let metrics = self.metrics();
        format!(
            "state={:?} elapsed={:.1}min distance={:.2}km reroutes={} est={:.1}min",
            self.run_state,
            metrics.elapsed_minutes,
            metrics.distance_km,
            metrics.reroute_count,
            self.vehicle.estimated_total_minutes
        )
    }
}
