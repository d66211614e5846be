//! Grid-based discrete placement.
//!
//! Finds a topologically sound arrangement (which rooms touch which and
//! where corridors run) on a rasterized copy of the boundary. Rooms are
//! integer cell blocks; the result seeds the continuous refinement phase.
//!
//! # Key Types
//!
//! - [`DiscreteConfig`]: Grid resolution, iteration budget, scoring weights
//! - [`DiscreteRunner`]: Greedy seeding followed by iterated local search
//! - [`DiscreteResult`]: Best grid and the placed rooms by id
//!
//! # Submodules
//!
//! - [`corridor`]: Corridor painting per [`CorridorRule`](crate::problem::CorridorRule)
//!   and dead-end pruning
//!
//! # References
//!
//! - Lourenço, Martin & Stützle (2003), "Iterated Local Search"
//! - Merrell, Schkufza & Koltun (2010), "Computer-Generated Residential
//!   Building Layouts"

mod config;
pub mod corridor;
mod runner;
mod types;

pub use config::{Acceptance, DiscreteConfig, PlacementWeights};
pub use runner::DiscreteRunner;
pub use types::{DiscreteResult, PlacedRoom};
