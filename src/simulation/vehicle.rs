//! Vehicle movement along the committed path
//!
//! Advances fractional progress edge by edge on a fixed tick, stopping short
//! of red lights and accruing elapsed time and distance.

use super::graph::RoadGraph;
use super::types::{
    LightState, NodeId, IDLE_WAIT_MINUTES, MOVE_RATE, NEAR_ARRIVAL_THRESHOLD,
};

/// Result of one movement tick
#[derive(Debug, Clone, PartialEq)]
pub enum StepOutcome {
    /// Progressed along the committed path
    Advanced,
    /// Held at a red light near the end of the current edge
    Waiting,
    /// Final path node reached; terminal
    Arrived,
    /// Committed path references an edge the graph no longer has; fatal
    PathBroken { from: NodeId, to: NodeId },
}

/// Mutable vehicle state over a committed path
#[derive(Debug, Clone, Default)]
pub struct VehicleState {
    /// Committed node sequence, start to goal
    pub path: Vec<NodeId>,
    /// Index of the edge currently being traversed (path[i] -> path[i+1])
    pub edge_index: usize,
    /// Fractional progress within the current edge, in [0, 1)
    pub progress: f32,
    pub elapsed_minutes: f32,
    pub distance_km: f32,
    pub reroute_count: u32,
    pub waiting_for_light: bool,
    /// Estimated total minutes for the committed path
    pub estimated_total_minutes: f32,
}

impl VehicleState {
    /// Fresh state over a newly committed path
    pub fn with_route(path: Vec<NodeId>, estimated_minutes: f32) -> Self {
        Self {
            path,
            estimated_total_minutes: estimated_minutes,
            ..Self::default()
        }
    }

    /// The node the vehicle is currently approaching, if any remain
    pub fn upcoming_node(&self) -> Option<NodeId> {
        self.path.get(self.edge_index + 1).copied()
    }

    /// Remaining committed nodes, starting at the upcoming node
    pub fn remaining_suffix(&self) -> &[NodeId] {
        if self.edge_index + 1 >= self.path.len() {
            return &[];
        }
        &self.path[self.edge_index + 1..]
    }

    pub fn arrived(&self) -> bool {
        !self.path.is_empty() && self.edge_index + 1 >= self.path.len()
    }

    /// Advance one movement tick of `tick_secs` against the current graph
    pub fn step(&mut self, graph: &RoadGraph, tick_secs: f32) -> StepOutcome {
        if self.path.len() < 2 || self.arrived() {
            return StepOutcome::Arrived;
        }

        let from = self.path[self.edge_index];
        let to = self.path[self.edge_index + 1];

        let Some(edge_id) = graph.edge_between(from, to) else {
            return StepOutcome::PathBroken { from, to };
        };
        let Some(edge) = graph.edge(edge_id) else {
            return StepOutcome::PathBroken { from, to };
        };

        // Red light short of the node: hold position but keep paying time
        let at_red = graph
            .node(to)
            .map(|node| node.light == LightState::Red)
            .unwrap_or(false);
        if at_red && self.progress > NEAR_ARRIVAL_THRESHOLD {
            self.waiting_for_light = true;
            self.elapsed_minutes += IDLE_WAIT_MINUTES;
            return StepOutcome::Waiting;
        }
        self.waiting_for_light = false;

        let step = edge.current_speed / edge.length_km * MOVE_RATE * tick_secs;
        let covered = step.min(1.0 - self.progress);

        self.progress += step;
        self.elapsed_minutes += MOVE_RATE * tick_secs * 60.0;
        self.distance_km += covered * edge.length_km;

        if self.progress >= 1.0 {
            self.edge_index += 1;
            self.progress = 0.0;
            if self.arrived() {
                return StepOutcome::Arrived;
            }
        }

        StepOutcome::Advanced
    }
}
