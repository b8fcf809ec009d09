//! Soft-constraint reroute decision
//!
//! Converts "any improvement reroutes immediately" into a hysteresis-bounded
//! rule: a candidate route is only adopted when the projected time saving
//! clears a fixed switching penalty AND is a meaningful fraction of the
//! remaining trip. The scalar rule is a pure function so it can be
//! property-tested in isolation.

use super::graph::RoadGraph;
use super::planner::{plan_with, CostModel};
use super::types::NodeId;
use super::vehicle::VehicleState;

/// Default relative-improvement acceptance threshold
pub const IMPROVEMENT_THRESHOLD: f32 = 0.2;

/// Default switching penalty in minutes
pub const PENALTY_WEIGHT: f32 = 1.0;

/// Floor applied to the old remaining-time estimate
const REMAINING_FLOOR: f32 = 1e-3;

/// Operator-tunable acceptance rule
#[derive(Debug, Clone)]
pub struct RerouteRule {
    /// Fixed cost in minutes charged against any route switch
    pub penalty_weight: f32,
    /// Minimum fraction of remaining time a switch must save
    pub improvement_threshold: f32,
}

impl Default for RerouteRule {
    fn default() -> Self {
        Self {
            penalty_weight: PENALTY_WEIGHT,
            improvement_threshold: IMPROVEMENT_THRESHOLD,
        }
    }
}

/// The scalars behind an accept/reject decision
#[derive(Debug, Clone, Copy)]
pub struct RerouteVerdict {
    pub accepted: bool,
    pub time_saved: f32,
    pub net_benefit: f32,
    pub relative_improvement: f32,
}

impl RerouteRule {
    /// Evaluate the rule for the given remaining-time estimates, in minutes
    ///
    /// Accepts iff the saving beats the switching penalty in absolute terms
    /// and exceeds the threshold as a fraction of the old remaining time.
    /// Raising `penalty_weight` can only turn an accept into a reject.
    pub fn evaluate(&self, old_remaining: f32, new_remaining: f32) -> RerouteVerdict {
        let old_remaining = old_remaining.max(REMAINING_FLOOR);
        let time_saved = old_remaining - new_remaining;
        let net_benefit = time_saved - self.penalty_weight;
        let relative_improvement = time_saved / old_remaining;

        RerouteVerdict {
            accepted: net_benefit > 0.0 && relative_improvement > self.improvement_threshold,
            time_saved,
            net_benefit,
            relative_improvement,
        }
    }
}

/// Outcome of one reroute evaluation
#[derive(Debug, Clone)]
pub enum RerouteOutcome {
    /// Vehicle is not in transit; nothing to evaluate
    Idle,
    /// No route currently exists from the vehicle to the goal
    Unreachable,
    /// Candidate equals the remaining committed suffix; no decision needed
    Unchanged,
    Rejected(RerouteVerdict),
    Accepted(RerouteVerdict),
}

/// Re-plan from the vehicle's current node and apply the acceptance rule
///
/// The current node is where the vehicle sits when it is exactly on a node,
/// otherwise the node it is approaching on its committed edge; either way an
/// accepted candidate splices onto the traveled prefix without invalidating
/// the in-progress edge. Mid-edge the candidate omits the remainder of the
/// current edge, a small optimistic bias accepted for simplicity. On
/// acceptance the vehicle's path, estimate, and reroute count are updated;
/// otherwise nothing changes.
pub fn evaluate_reroute(
    graph: &RoadGraph,
    cost: &CostModel,
    rule: &RerouteRule,
    vehicle: &mut VehicleState,
    goal: NodeId,
) -> RerouteOutcome {
    if vehicle.path.len() < 2 || vehicle.arrived() {
        return RerouteOutcome::Idle;
    }

    let anchor_index = if vehicle.progress == 0.0 {
        vehicle.edge_index
    } else {
        vehicle.edge_index + 1
    };
    let Some(&current) = vehicle.path.get(anchor_index) else {
        return RerouteOutcome::Idle;
    };
    if current == goal {
        return RerouteOutcome::Idle;
    }

    let Some(candidate) = plan_with(graph, current, goal, cost) else {
        return RerouteOutcome::Unreachable;
    };

    if candidate.nodes == vehicle.path[anchor_index..] {
        return RerouteOutcome::Unchanged;
    }

    let old_remaining = vehicle.estimated_total_minutes - vehicle.elapsed_minutes;
    let verdict = rule.evaluate(old_remaining, candidate.estimated_minutes);
    if !verdict.accepted {
        return RerouteOutcome::Rejected(verdict);
    }

    let mut path = vehicle.path[..anchor_index].to_vec();
    path.extend_from_slice(&candidate.nodes);
    vehicle.path = path;
    vehicle.reroute_count += 1;
    vehicle.estimated_total_minutes = vehicle.elapsed_minutes + candidate.estimated_minutes;

    RerouteOutcome::Accepted(verdict)
}
