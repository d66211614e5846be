//! Evolutionary continuous refinement.
//!
//! Starting from a rough layout (typically the discrete placement), a
//! population of candidate layouts is mutated, pushed apart where rooms
//! collide, scored, and culled each generation. Positions and sizes are
//! continuous; rooms stay axis-aligned rectangles.
//!
//! # Key Types
//!
//! - [`EvolveConfig`]: Population parameters, operator weights, presets
//! - [`FloorplanSolver`]: Step-driven solver over one problem instance
//! - [`Gene`]: One candidate layout with its fitness components
//! - [`FitnessEvaluator`]: Geometric, adjacency and area-deviation scoring
//!
//! # Submodules
//!
//! - [`squish`]: Area-preserving collision resolution with translate fallback
//! - [`mutation`]: Teleport, swap, rotate and reshape operators plus crossover
//!
//! # References
//!
//! - Eiben & Smith (2015), *Introduction to Evolutionary Computing*
//! - Kirkpatrick, Gelatt & Vecchi (1983), "Optimization by Simulated Annealing"

mod config;
mod fitness;
pub mod mutation;
mod population;
mod solver;
pub mod squish;
mod types;

pub use config::{
    AdjacencyModel, AreaDeviation, EvolveConfig, FitnessConfig, FitnessWeights, FreshBloodConfig,
    MutationWeights, Reproduction,
};
pub use fitness::FitnessEvaluator;
pub use population::{GenerationStats, Population};
pub use solver::FloorplanSolver;
pub use types::{FitnessComponents, Gene, RoomRect, RoomState, MIN_DIMENSION};
