//! Road graph model for planning and simulation
//!
//! Pure data holder: topology plus the mutable per-edge speeds and per-node
//! light states the environment perturbs. No algorithmic behavior lives here.

use anyhow::{bail, Context, Result};
use petgraph::graph::{NodeIndex, UnGraph};
use petgraph::visit::EdgeRef;
use std::collections::{BTreeMap, HashMap};

use super::types::{EdgeId, LightState, NodeId, Position, RoadEdge, RoadNode};

/// Weighted undirected road graph with stable external ids
///
/// Nodes and edges are kept in `BTreeMap`s so iteration order is stable,
/// which keeps seeded environment runs reproducible.
#[derive(Debug, Clone, Default)]
pub struct RoadGraph {
    /// Adjacency structure; node weights are external ids, edge weights too
    graph: UnGraph<NodeId, EdgeId>,

    /// Maps external node ids to petgraph indices
    node_index: HashMap<NodeId, NodeIndex>,

    /// Node storage, ordered by id
    nodes: BTreeMap<NodeId, RoadNode>,

    /// Edge storage, ordered by id
    edges: BTreeMap<EdgeId, RoadEdge>,
}

impl RoadGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a node; ignored if the id already exists
    pub fn add_node(&mut self, id: NodeId, position: Position) {
        if self.node_index.contains_key(&id) {
            return;
        }
        let index = self.graph.add_node(id);
        self.node_index.insert(id, index);
        self.nodes.insert(id, RoadNode::new(id, position));
    }

    /// Add an undirected edge between two existing nodes
    pub fn add_edge(
        &mut self,
        id: EdgeId,
        a: NodeId,
        b: NodeId,
        length_km: f32,
        speed_limit: f32,
        base_speed: f32,
    ) -> Result<()> {
        let a_index = *self
            .node_index
            .get(&a)
            .with_context(|| format!("Node {:?} not found", a))?;
        let b_index = *self
            .node_index
            .get(&b)
            .with_context(|| format!("Node {:?} not found", b))?;
        if length_km <= 0.0 {
            bail!("Edge {:?} must have positive length", id);
        }

        self.graph.add_edge(a_index, b_index, id);
        self.edges
            .insert(id, RoadEdge::new(id, (a, b), length_km, speed_limit, base_speed));
        Ok(())
    }

    pub fn node(&self, id: NodeId) -> Option<&RoadNode> {
        self.nodes.get(&id)
    }

    pub fn edge(&self, id: EdgeId) -> Option<&RoadEdge> {
        self.edges.get(&id)
    }

    pub fn contains_node(&self, id: NodeId) -> bool {
        self.nodes.contains_key(&id)
    }

    /// Edges incident to `node` together with the neighbor they lead to
    pub fn edges_at(&self, node: NodeId) -> Vec<(EdgeId, NodeId)> {
        let Some(index) = self.node_index.get(&node) else {
            return Vec::new();
        };
        self.graph
            .edges(*index)
            .map(|edge| (*edge.weight(), self.graph[edge.target()]))
            .collect()
    }

    /// The edge connecting two nodes, in either direction
    pub fn edge_between(&self, a: NodeId, b: NodeId) -> Option<EdgeId> {
        let a_index = self.node_index.get(&a)?;
        let b_index = self.node_index.get(&b)?;
        self.graph
            .find_edge(*a_index, *b_index)
            .map(|edge_index| self.graph[edge_index])
    }

    /// Set an edge's live speed, clamped into its legal range
    pub fn set_current_speed(&mut self, id: EdgeId, speed: f32) -> Result<()> {
        let edge = self
            .edges
            .get_mut(&id)
            .with_context(|| format!("Edge {:?} not found", id))?;
        edge.current_speed = edge.clamp_speed(speed);
        Ok(())
    }

    pub fn set_light(&mut self, id: NodeId, light: LightState) -> Result<()> {
        let node = self
            .nodes
            .get_mut(&id)
            .with_context(|| format!("Node {:?} not found", id))?;
        node.light = light;
        Ok(())
    }

    /// Freeze an edge at a forced speed, exempting it from perturbation
    pub fn mark_incident(&mut self, id: EdgeId, forced_speed: f32) -> Result<()> {
        let edge = self
            .edges
            .get_mut(&id)
            .with_context(|| format!("Edge {:?} not found", id))?;
        edge.current_speed = edge.clamp_speed(forced_speed);
        edge.incident = true;
        Ok(())
    }

    /// Lift an incident so the environment may perturb the edge again
    pub fn clear_incident(&mut self, id: EdgeId) -> Result<()> {
        let edge = self
            .edges
            .get_mut(&id)
            .with_context(|| format!("Edge {:?} not found", id))?;
        edge.incident = false;
        Ok(())
    }

    /// Node ids in stable ascending order
    pub fn node_ids(&self) -> Vec<NodeId> {
        self.nodes.keys().copied().collect()
    }

    /// Edge ids in stable ascending order
    pub fn edge_ids(&self) -> Vec<EdgeId> {
        self.edges.keys().copied().collect()
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Build a rows x cols grid with uniform edge parameters
    ///
    /// Scaffolding for the demo binary and tests; production callers supply
    /// their own topology.
    pub fn grid(
        rows: usize,
        cols: usize,
        spacing_km: f32,
        speed_limit: f32,
        base_speed: f32,
    ) -> Self {
        let mut graph = Self::new();

        for row in 0..rows {
            for col in 0..cols {
                let id = NodeId(row * cols + col);
                let position = Position::new(col as f32 * spacing_km, row as f32 * spacing_km);
                graph.add_node(id, position);
            }
        }

        let mut next_edge = 0;
        let mut connect = |graph: &mut RoadGraph, a: NodeId, b: NodeId| {
            // Endpoints were just added, so this cannot fail
            let _ = graph.add_edge(EdgeId(next_edge), a, b, spacing_km, speed_limit, base_speed);
            next_edge += 1;
        };

        for row in 0..rows {
            for col in 0..cols {
                let here = NodeId(row * cols + col);
                if col + 1 < cols {
                    connect(&mut graph, here, NodeId(row * cols + col + 1));
                }
                if row + 1 < rows {
                    connect(&mut graph, here, NodeId((row + 1) * cols + col));
                }
            }
        }

        graph
    }
}
