//! Ambient environment perturbation
//!
//! Each environment tick jitters edge speeds around their base value,
//! occasionally injects an unannounced severe slowdown, and flips traffic
//! lights. Incident-marked edges are left untouched.

use log::warn;
use rand::rngs::StdRng;
use rand::Rng;

use super::graph::RoadGraph;
use super::journal::{DecisionJournal, Severity};
use super::types::{
    LIGHT_FLIP_PROBABILITY, PERTURBATION_KMH, SLOWDOWN_FACTOR, SLOWDOWN_PROBABILITY,
};

/// Tunable parameters for the environment step
#[derive(Debug, Clone)]
pub struct EnvironmentModel {
    /// Symmetric speed noise magnitude around base speed, km/h
    pub perturbation_kmh: f32,
    /// Per-edge chance of a severe slowdown per tick
    pub slowdown_probability: f32,
    /// Severe slowdowns force this fraction of base speed
    pub slowdown_factor: f32,
    /// Per-node chance of a light flip per tick
    pub light_flip_probability: f32,
}

impl Default for EnvironmentModel {
    fn default() -> Self {
        Self {
            perturbation_kmh: PERTURBATION_KMH,
            slowdown_probability: SLOWDOWN_PROBABILITY,
            slowdown_factor: SLOWDOWN_FACTOR,
            light_flip_probability: LIGHT_FLIP_PROBABILITY,
        }
    }
}

impl EnvironmentModel {
    /// An environment that never changes anything; useful in tests
    pub fn still() -> Self {
        Self {
            perturbation_kmh: 0.0,
            slowdown_probability: 0.0,
            slowdown_factor: SLOWDOWN_FACTOR,
            light_flip_probability: 0.0,
        }
    }

    /// Apply one tick of perturbation to the graph
    ///
    /// Iterates edges and nodes in stable id order so a seeded RNG yields
    /// identical runs.
    pub fn step(
        &self,
        graph: &mut RoadGraph,
        rng: &mut StdRng,
        journal: &mut DecisionJournal,
        now_minutes: f32,
    ) {
        for edge_id in graph.edge_ids() {
            let Some(edge) = graph.edge(edge_id) else {
                continue;
            };
            if edge.incident {
                continue;
            }

            let base = edge.base_speed;
            let new_speed = if rng.random_range(0.0..1.0f32) < self.slowdown_probability {
                let slowed = base * self.slowdown_factor;
                warn!(
                    "Severe slowdown on edge {:?}: {:.0} -> {:.0} km/h",
                    edge_id, edge.current_speed, slowed
                );
                journal.push(
                    now_minutes,
                    Severity::Warning,
                    format!("Slow traffic on edge {:?} ({:.0} km/h)", edge_id, slowed),
                );
                slowed
            } else if self.perturbation_kmh > 0.0 {
                base + rng.random_range(-self.perturbation_kmh..=self.perturbation_kmh)
            } else {
                base
            };

            // Edge id came from the graph, so this cannot fail
            let _ = graph.set_current_speed(edge_id, new_speed);
        }

        for node_id in graph.node_ids() {
            if rng.random_range(0.0..1.0f32) < self.light_flip_probability {
                if let Some(node) = graph.node(node_id) {
                    let flipped = node.light.flipped();
                    let _ = graph.set_light(node_id, flipped);
                }
            }
        }
    }
}
