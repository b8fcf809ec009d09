//! Reroute Simulation Library
//!
//! A dynamic path-planning simulation: a vehicle crosses a weighted road
//! graph while the environment shifts edge speeds and traffic lights, and a
//! soft-constraint rule decides when switching routes is actually worth it.

pub mod simulation;
