//! Time-aware A* route planner
//!
//! Searches the current graph snapshot for the fastest route, charging extra
//! for red lights at the far node, for axis changes between consecutive
//! edges, and weighting everything by road class. The search is fully
//! deterministic: ties on f-score break on insertion order.

use ordered_float::OrderedFloat;
use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashMap};

use super::graph::RoadGraph;
use super::types::{Axis, EdgeId, LightState, NodeId, RoadEdge};

/// Fixed penalty in minutes for arriving at a red light
pub const RED_LIGHT_PENALTY_MINUTES: f32 = 0.5;

/// Fixed penalty in minutes for changing travel axis between edges
pub const TURN_PENALTY_MINUTES: f32 = 0.25;

/// Speed limit at or above which an edge counts as a highway
pub const HIGHWAY_LIMIT_KMH: f32 = 80.0;

/// Cost multiplier for highway-class edges; ordinary roads use 1.0
pub const HIGHWAY_FACTOR: f32 = 0.8;

/// Free-flow speed assumed by the heuristic, km/h
pub const ASSUMED_FREE_FLOW_KMH: f32 = 100.0;

/// Tunable edge cost model
///
/// The heuristic assumes free-flow speed everywhere, so it can overestimate
/// remaining time on congested graphs and returned routes are not guaranteed
/// optimal. This is a deliberate coarse approximation, kept cheap because the
/// planner runs on every environment tick.
#[derive(Debug, Clone)]
pub struct CostModel {
    pub red_light_penalty: f32,
    pub turn_penalty: f32,
    pub highway_factor: f32,
    pub assumed_free_flow: f32,
}

impl Default for CostModel {
    fn default() -> Self {
        Self {
            red_light_penalty: RED_LIGHT_PENALTY_MINUTES,
            turn_penalty: TURN_PENALTY_MINUTES,
            highway_factor: HIGHWAY_FACTOR,
            assumed_free_flow: ASSUMED_FREE_FLOW_KMH,
        }
    }
}

impl CostModel {
    /// A model with no light, turn, or road-class penalties
    ///
    /// With this model the planner degenerates to plain shortest travel time.
    pub fn unpenalized() -> Self {
        Self {
            red_light_penalty: 0.0,
            turn_penalty: 0.0,
            highway_factor: 1.0,
            assumed_free_flow: ASSUMED_FREE_FLOW_KMH,
        }
    }

    /// Minutes charged for traversing `edge` into `to`, given the axis the
    /// previous edge was traveled along (None at the start node)
    pub fn edge_cost(
        &self,
        graph: &RoadGraph,
        edge: &RoadEdge,
        to: NodeId,
        axis: Axis,
        prev_axis: Option<Axis>,
    ) -> f32 {
        let mut cost = edge.traversal_minutes();

        if let Some(node) = graph.node(to) {
            if node.light == LightState::Red {
                cost += self.red_light_penalty;
            }
        }

        if let Some(prev) = prev_axis {
            if prev != axis {
                cost += self.turn_penalty;
            }
        }

        let class_factor = if edge.speed_limit >= HIGHWAY_LIMIT_KMH {
            self.highway_factor
        } else {
            1.0
        };

        cost * class_factor
    }
}

/// A planned route: node sequence plus its estimated travel time
#[derive(Debug, Clone, PartialEq)]
pub struct PlannedRoute {
    /// Node ids from start to goal inclusive; loop-free
    pub nodes: Vec<NodeId>,
    /// g-score of the goal, in minutes
    pub estimated_minutes: f32,
}

/// Plan with the default cost model
pub fn plan(graph: &RoadGraph, start: NodeId, goal: NodeId) -> Option<PlannedRoute> {
    plan_with(graph, start, goal, &CostModel::default())
}

/// A* over the instantaneous graph snapshot
///
/// Returns `None` when the goal is unreachable; callers treat that as "no
/// improvement available", never as a fatal condition.
pub fn plan_with(
    graph: &RoadGraph,
    start: NodeId,
    goal: NodeId,
    cost: &CostModel,
) -> Option<PlannedRoute> {
    let goal_position = graph.node(goal)?.position;
    graph.node(start)?;

    if start == goal {
        return Some(PlannedRoute {
            nodes: vec![start],
            estimated_minutes: 0.0,
        });
    }

    let heuristic = |node: NodeId| -> f32 {
        let position = match graph.node(node) {
            Some(n) => n.position,
            None => return 0.0,
        };
        position.distance(&goal_position) / cost.assumed_free_flow * 60.0
    };

    // Min-heap on (f, insertion order); the counter makes ties deterministic,
    // first pushed wins.
    let mut open: BinaryHeap<Reverse<(OrderedFloat<f32>, u64, NodeId)>> = BinaryHeap::new();
    let mut g_score: HashMap<NodeId, f32> = HashMap::new();
    let mut came_from: HashMap<NodeId, (NodeId, EdgeId)> = HashMap::new();
    let mut arrival_axis: HashMap<NodeId, Axis> = HashMap::new();
    let mut counter: u64 = 0;

    g_score.insert(start, 0.0);
    open.push(Reverse((OrderedFloat(heuristic(start)), counter, start)));

    while let Some(Reverse((f, _, current))) = open.pop() {
        let current_g = g_score[&current];
        // Stale heap entry from a later improvement
        if f.into_inner() - heuristic(current) > current_g + 1e-6 {
            continue;
        }

        if current == goal {
            return Some(PlannedRoute {
                nodes: reconstruct(&came_from, start, goal),
                estimated_minutes: current_g,
            });
        }

        let prev_axis = arrival_axis.get(&current).copied();

        for (edge_id, neighbor) in graph.edges_at(current) {
            let edge = graph.edge(edge_id)?;
            let axis = match (graph.node(current), graph.node(neighbor)) {
                (Some(a), Some(b)) => Axis::between(&a.position, &b.position),
                _ => continue,
            };

            let tentative = current_g + cost.edge_cost(graph, edge, neighbor, axis, prev_axis);
            let known = g_score.get(&neighbor).copied().unwrap_or(f32::INFINITY);
            if tentative < known {
                g_score.insert(neighbor, tentative);
                came_from.insert(neighbor, (current, edge_id));
                arrival_axis.insert(neighbor, axis);
                counter += 1;
                open.push(Reverse((
                    OrderedFloat(tentative + heuristic(neighbor)),
                    counter,
                    neighbor,
                )));
            }
        }
    }

    None
}

/// Walk predecessor links back to the start, then reverse
fn reconstruct(came_from: &HashMap<NodeId, (NodeId, EdgeId)>, start: NodeId, goal: NodeId) -> Vec<NodeId> {
    let mut nodes = vec![goal];
    let mut current = goal;
    while current != start {
        match came_from.get(&current) {
            Some((prev, _)) => {
                current = *prev;
                nodes.push(current);
            }
            None => break,
        }
    }
    nodes.reverse();
    nodes
}
