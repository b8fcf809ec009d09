//! Planner property and scenario tests

use ordered_float::OrderedFloat;
use petgraph::algo::dijkstra;
use petgraph::graph::UnGraph;
use petgraph::visit::EdgeRef;
use std::collections::HashSet;

use reroute_sim::simulation::{
    plan_with, Axis, CostModel, EdgeId, LightState, NodeId, Position, RoadGraph,
};

/// Diamond graph: two parallel two-edge routes from S to G
///
/// Positions keep every segment horizontal so no turn penalties apply.
fn diamond() -> RoadGraph {
    let mut graph = RoadGraph::new();
    graph.add_node(NodeId(0), Position::new(0.0, 0.0)); // S
    graph.add_node(NodeId(1), Position::new(1.0, 0.0)); // A
    graph.add_node(NodeId(2), Position::new(2.0, 0.0)); // G
    graph.add_node(NodeId(3), Position::new(1.0, 1.0)); // B
    graph.add_edge(EdgeId(0), NodeId(0), NodeId(1), 1.0, 60.0, 50.0).unwrap();
    graph.add_edge(EdgeId(1), NodeId(1), NodeId(2), 1.0, 60.0, 50.0).unwrap();
    graph.add_edge(EdgeId(2), NodeId(0), NodeId(3), 1.0, 60.0, 50.0).unwrap();
    graph.add_edge(EdgeId(3), NodeId(3), NodeId(2), 1.0, 60.0, 50.0).unwrap();
    graph
}

fn axis_changes(graph: &RoadGraph, path: &[NodeId]) -> usize {
    let mut changes = 0;
    let mut prev_axis: Option<Axis> = None;
    for pair in path.windows(2) {
        let a = graph.node(pair[0]).unwrap().position;
        let b = graph.node(pair[1]).unwrap().position;
        let axis = Axis::between(&a, &b);
        if let Some(prev) = prev_axis {
            if prev != axis {
                changes += 1;
            }
        }
        prev_axis = Some(axis);
    }
    changes
}

#[test]
fn test_unpenalized_cost_matches_dijkstra() {
    // Varied but deterministic speeds across a 4x4 grid
    let mut graph = RoadGraph::grid(4, 4, 1.0, 60.0, 50.0);
    for (i, edge_id) in graph.edge_ids().into_iter().enumerate() {
        let speed = 20.0 + ((i * 7) % 30) as f32;
        graph.set_current_speed(edge_id, speed).unwrap();
    }

    // Reference graph with identical minute weights
    let mut reference: UnGraph<NodeId, OrderedFloat<f32>> = UnGraph::new_undirected();
    let indices: Vec<_> = graph
        .node_ids()
        .into_iter()
        .map(|id| reference.add_node(id))
        .collect();
    for edge_id in graph.edge_ids() {
        let edge = graph.edge(edge_id).unwrap();
        let minutes = edge.length_km / edge.current_speed * 60.0;
        reference.add_edge(
            indices[edge.endpoints.0 .0],
            indices[edge.endpoints.1 .0],
            OrderedFloat(minutes),
        );
    }

    let start = NodeId(0);
    let goal = NodeId(15);
    let route = plan_with(&graph, start, goal, &CostModel::unpenalized())
        .expect("grid is connected");

    let costs = dijkstra(&reference, indices[0], Some(indices[15]), |e| *e.weight());
    let reference_cost = costs[&indices[15]].into_inner();

    assert!(
        (route.estimated_minutes - reference_cost).abs() < 1e-3,
        "planner cost {} != dijkstra cost {}",
        route.estimated_minutes,
        reference_cost
    );
}

#[test]
fn test_paths_are_loop_free_and_connected() {
    let mut graph = RoadGraph::grid(5, 5, 1.0, 60.0, 50.0);
    for (i, edge_id) in graph.edge_ids().into_iter().enumerate() {
        graph
            .set_current_speed(edge_id, 15.0 + ((i * 11) % 40) as f32)
            .unwrap();
    }

    let route = plan_with(&graph, NodeId(0), NodeId(24), &CostModel::default())
        .expect("grid is connected");

    let unique: HashSet<_> = route.nodes.iter().collect();
    assert_eq!(unique.len(), route.nodes.len(), "path revisits a node");

    assert_eq!(route.nodes.first(), Some(&NodeId(0)));
    assert_eq!(route.nodes.last(), Some(&NodeId(24)));
    for pair in route.nodes.windows(2) {
        assert!(
            graph.edge_between(pair[0], pair[1]).is_some(),
            "no edge between {:?} and {:?}",
            pair[0],
            pair[1]
        );
    }
}

#[test]
fn test_planner_is_deterministic() {
    let mut graph = RoadGraph::grid(4, 4, 1.0, 60.0, 50.0);
    for (i, edge_id) in graph.edge_ids().into_iter().enumerate() {
        graph
            .set_current_speed(edge_id, 25.0 + ((i * 13) % 25) as f32)
            .unwrap();
    }

    let first = plan_with(&graph, NodeId(0), NodeId(15), &CostModel::default()).unwrap();
    for _ in 0..5 {
        let again = plan_with(&graph, NodeId(0), NodeId(15), &CostModel::default()).unwrap();
        assert_eq!(first.nodes, again.nodes);
        assert_eq!(first.estimated_minutes, again.estimated_minutes);
    }
}

#[test]
fn test_grid_corner_to_corner_is_manhattan_length() {
    let graph = RoadGraph::grid(3, 3, 1.0, 60.0, 50.0);

    let route = plan_with(&graph, NodeId(0), NodeId(8), &CostModel::default())
        .expect("grid is connected");

    // Manhattan distance is 4 edges, so 5 nodes
    assert_eq!(route.nodes.len(), 5);
    // Corner routes minimize turn penalties: exactly one axis change
    assert_eq!(axis_changes(&graph, &route.nodes), 1);
    // 4 edges at 1 km / 50 km/h plus one turn penalty
    let expected = 4.0 * (1.0 / 50.0 * 60.0) + 0.25;
    assert!((route.estimated_minutes - expected).abs() < 1e-3);
}

#[test]
fn test_red_light_steers_route_away() {
    let mut graph = diamond();
    graph.set_light(NodeId(1), LightState::Red).unwrap();

    let route = plan_with(&graph, NodeId(0), NodeId(2), &CostModel::default()).unwrap();
    assert_eq!(route.nodes, vec![NodeId(0), NodeId(3), NodeId(2)]);
}

#[test]
fn test_unreachable_goal_returns_none() {
    let mut graph = RoadGraph::new();
    graph.add_node(NodeId(0), Position::new(0.0, 0.0));
    graph.add_node(NodeId(1), Position::new(1.0, 0.0));

    assert!(plan_with(&graph, NodeId(0), NodeId(1), &CostModel::default()).is_none());
}

#[test]
fn test_start_equals_goal_is_trivial() {
    let graph = diamond();
    let route = plan_with(&graph, NodeId(0), NodeId(0), &CostModel::default()).unwrap();
    assert_eq!(route.nodes, vec![NodeId(0)]);
    assert_eq!(route.estimated_minutes, 0.0);
}

#[test]
fn test_unknown_endpoints_return_none() {
    let graph = diamond();
    assert!(plan_with(&graph, NodeId(99), NodeId(2), &CostModel::default()).is_none());
    assert!(plan_with(&graph, NodeId(0), NodeId(99), &CostModel::default()).is_none());
}
