//! Architectural floor plan generation.
//!
//! Given a boundary polygon, a list of rooms with target areas and aspect
//! ratio bounds, and weighted adjacency requirements, produces an
//! arrangement of axis-aligned room rectangles in two phases:
//!
//! - **Discrete placement**: Rooms are placed as integer cell blocks on a
//!   rasterized grid by greedy seeding plus iterated local search, with
//!   optional corridor halos. Fixes a sound topology.
//! - **Evolutionary refinement**: A population of continuous layouts is
//!   mutated, pushed apart by area-preserving collision resolution, and
//!   selected against a multi-objective fitness (overlap, containment,
//!   adjacency, area deviation).
//!
//! [`pipeline::plan`] runs both; each phase is also usable on its own.
//!
//! # Example
//!
//! ```
//! use u_floorplan::geometry::Rect;
//! use u_floorplan::pipeline::{plan, PlanConfig};
//! use u_floorplan::problem::{Adjacency, FloorplanProblem, RoomRequest};
//!
//! let problem = FloorplanProblem::new(
//!     Rect::new(0.0, 0.0, 20.0, 30.0).corners().to_vec(),
//!     vec![
//!         RoomRequest::new("living", 180.0),
//!         RoomRequest::new("kitchen", 90.0),
//!         RoomRequest::new("bath", 40.0),
//!     ],
//!     vec![
//!         Adjacency::new("living", "kitchen"),
//!         Adjacency::new("kitchen", "bath"),
//!     ],
//! )
//! .unwrap();
//!
//! let config = PlanConfig::auto_select(problem.rooms().len()).with_seed(42);
//! let result = plan(&problem, &config).unwrap();
//! assert_eq!(result.rooms.len(), 3);
//! ```
//!
//! # Determinism
//!
//! Each solver draws all randomness from one seeded
//! [`SeededRng`](random::SeededRng). With explicit seeds, runs are
//! reproducible bit for bit, including with the `parallel` feature.
//!
//! # Features
//!
//! - `parallel`: fitness evaluation on the rayon pool
//! - `serde`: `Serialize`/`Deserialize` on inputs, configs and outputs

pub mod discrete;
pub mod error;
pub mod evolve;
pub mod geometry;
pub mod grid;
pub mod pipeline;
pub mod problem;
pub mod random;

pub use error::FloorplanError;
