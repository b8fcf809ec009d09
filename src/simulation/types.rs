//! Core types for the reroute simulation
//!
//! Standalone types shared by the graph model, planner, and vehicle logic.

/// A unique identifier for graph nodes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub usize);

/// A unique identifier for graph edges
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EdgeId(pub usize);

/// Traffic light state at a node
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LightState {
    Green,
    Red,
}

impl LightState {
    /// The opposite light state
    pub fn flipped(self) -> Self {
        match self {
            LightState::Green => LightState::Red,
            LightState::Red => LightState::Green,
        }
    }
}

/// A 2D position, in kilometres
///
/// Used only for the planner's heuristic distance, never for movement physics.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Position {
    pub x: f32,
    pub y: f32,
}

impl Position {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn distance(&self, other: &Position) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }
}

/// Dominant travel axis of an edge, used for turn detection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    Horizontal,
    Vertical,
}

impl Axis {
    /// Classify the segment from `a` to `b` by its dominant direction
    pub fn between(a: &Position, b: &Position) -> Self {
        if (b.x - a.x).abs() >= (b.y - a.y).abs() {
            Axis::Horizontal
        } else {
            Axis::Vertical
        }
    }
}

/// A node in the road graph
#[derive(Debug, Clone)]
pub struct RoadNode {
    pub id: NodeId,
    pub position: Position,
    pub light: LightState,
}

impl RoadNode {
    pub fn new(id: NodeId, position: Position) -> Self {
        Self {
            id,
            position,
            light: LightState::Green,
        }
    }
}

/// An undirected road segment connecting two nodes
#[derive(Debug, Clone)]
pub struct RoadEdge {
    pub id: EdgeId,
    pub endpoints: (NodeId, NodeId),
    /// Segment length in km, always > 0
    pub length_km: f32,
    /// Legal speed ceiling in km/h
    pub speed_limit: f32,
    /// Nominal free-flow speed the environment perturbs around
    pub base_speed: f32,
    /// Live speed, kept within [MIN_SPEED_KMH, speed_limit]
    pub current_speed: f32,
    /// Set by incident injection; frozen against ambient perturbation
    pub incident: bool,
}

impl RoadEdge {
    pub fn new(
        id: EdgeId,
        endpoints: (NodeId, NodeId),
        length_km: f32,
        speed_limit: f32,
        base_speed: f32,
    ) -> Self {
        let mut edge = Self {
            id,
            endpoints,
            length_km: length_km.max(f32::EPSILON),
            speed_limit,
            base_speed,
            current_speed: base_speed,
            incident: false,
        };
        edge.current_speed = edge.clamp_speed(base_speed);
        edge
    }

    /// Clamp a speed into the edge's legal range, rejecting non-finite input
    pub fn clamp_speed(&self, speed: f32) -> f32 {
        if !speed.is_finite() {
            return MIN_SPEED_KMH;
        }
        speed.clamp(MIN_SPEED_KMH, self.speed_limit)
    }

    /// The endpoint opposite `node`, if `node` is an endpoint at all
    pub fn other_endpoint(&self, node: NodeId) -> Option<NodeId> {
        if self.endpoints.0 == node {
            Some(self.endpoints.1)
        } else if self.endpoints.1 == node {
            Some(self.endpoints.0)
        } else {
            None
        }
    }

    /// Minutes to traverse the edge at its current speed
    pub fn traversal_minutes(&self) -> f32 {
        self.length_km / self.current_speed.max(SPEED_EPSILON) * 60.0
    }
}

/// Floor for any stored edge speed, in km/h
pub const MIN_SPEED_KMH: f32 = 5.0;

/// Guard against division by a near-zero speed
pub const SPEED_EPSILON: f32 = 1e-3;

/// Ambient speed noise magnitude per environment tick, in km/h
pub const PERTURBATION_KMH: f32 = 15.0;

/// Chance per environment tick that an edge suffers a severe slowdown
pub const SLOWDOWN_PROBABILITY: f32 = 0.05;

/// Severe slowdowns drop an edge to this fraction of its base speed
pub const SLOWDOWN_FACTOR: f32 = 0.2;

/// Chance per environment tick that a node's light flips
///
/// Kept high so no node can stay red long enough to deadlock the vehicle.
pub const LIGHT_FLIP_PROBABILITY: f32 = 0.3;

/// Fraction of an edge the vehicle must cover before a red light stops it
pub const NEAR_ARRIVAL_THRESHOLD: f32 = 0.85;

/// Converts speed/length into per-tick progress, scaled by tick seconds
pub const MOVE_RATE: f32 = 0.02;

/// Simulated minutes accrued per tick spent idling at a red light
pub const IDLE_WAIT_MINUTES: f32 = 0.05;

/// Default environment tick interval in simulated seconds
pub const ENV_TICK_SECS: f32 = 1.5;

/// Default vehicle movement tick in seconds
pub const VEHICLE_TICK_SECS: f32 = 0.05;
