//! Two-phase layout: discrete placement, then evolutionary refinement.
//!
//! The discrete result fixes a topology; its rooms become the first gene of
//! the continuous population. Rooms the grid could not fit start at the
//! boundary centroid, so every gene still carries every room.

use crate::discrete::{DiscreteConfig, DiscreteResult, DiscreteRunner};
use crate::error::FloorplanError;
use crate::evolve::{EvolveConfig, FitnessComponents, FloorplanSolver, RoomRect, RoomState};
use crate::problem::FloorplanProblem;
use tracing::{debug, instrument};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Configuration of both phases.
///
/// # Examples
///
/// ```
/// use u_floorplan::pipeline::PlanConfig;
///
/// let config = PlanConfig::default().with_seed(42);
/// assert_eq!(config.discrete.seed, Some(42));
/// assert_eq!(config.evolve.seed, Some(42));
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PlanConfig {
    pub discrete: DiscreteConfig,
    pub evolve: EvolveConfig,
}

impl PlanConfig {
    /// Default discrete phase with the evolve preset for `room_count` rooms.
    pub fn auto_select(room_count: usize) -> Self {
        Self {
            discrete: DiscreteConfig::default(),
            evolve: EvolveConfig::auto_select(room_count),
        }
    }

    pub fn with_discrete(mut self, discrete: DiscreteConfig) -> Self {
        self.discrete = discrete;
        self
    }

    pub fn with_evolve(mut self, evolve: EvolveConfig) -> Self {
        self.evolve = evolve;
        self
    }

    /// Seeds both phases.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.discrete.seed = Some(seed);
        self.evolve.seed = Some(seed);
        self
    }

    pub fn validate(&self) -> Result<(), String> {
        self.discrete.validate()?;
        self.evolve.validate()
    }
}

/// Outcome of [`plan`].
#[derive(Debug, Clone)]
pub struct PlanResult {
    /// Grid and placements from the discrete phase.
    pub discrete: DiscreteResult,

    /// Refined rooms in problem order.
    pub rooms: Vec<RoomRect>,

    pub fitness: f64,

    pub components: FitnessComponents,

    /// Generations the continuous phase ran.
    pub generations: usize,

    /// Best fitness after seeding and after each generation.
    pub fitness_history: Vec<f64>,
}

/// Starting rectangles for the continuous phase, in problem order.
pub fn initial_rooms(problem: &FloorplanProblem, discrete: &DiscreteResult) -> Vec<RoomState> {
    let centroid = problem.boundary().centroid();
    problem
        .rooms()
        .iter()
        .map(|request| match discrete.rooms.get(&request.id) {
            Some(placed) => placed.to_room_state(&discrete.grid, request),
            None => RoomState::from_request(request, centroid),
        })
        .collect()
}

/// Runs the discrete phase and then the continuous phase to its generation
/// budget.
#[instrument(level = "debug", skip(problem, config), fields(rooms = problem.rooms().len()))]
pub fn plan(problem: &FloorplanProblem, config: &PlanConfig) -> Result<PlanResult, FloorplanError> {
    config.validate().map_err(FloorplanError::InvalidConfig)?;

    let discrete = DiscreteRunner::run(problem, &config.discrete)?;
    let rooms = initial_rooms(problem, &discrete);
    debug!(
        placed = discrete.placed_count(),
        score = discrete.score,
        "discrete phase complete"
    );

    let mut solver = FloorplanSolver::from_problem(problem, rooms, config.evolve.clone())?;
    let generations = solver.simulate(config.evolve.max_generations);
    let best = solver.best();
    debug!(generations, fitness = best.fitness(), "continuous phase complete");

    Ok(PlanResult {
        rooms: best.to_rects(),
        fitness: best.fitness(),
        components: *best.components(),
        generations,
        fitness_history: solver.fitness_history().to_vec(),
        discrete,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{Point, Rect};
    use crate::problem::{Adjacency, CorridorRule, RoomRequest};

    fn problem() -> FloorplanProblem {
        FloorplanProblem::new(
            Rect::new(0.0, 0.0, 20.0, 40.0).corners().to_vec(),
            vec![
                RoomRequest::new("living", 200.0).with_corridor(CorridorRule::OneSide),
                RoomRequest::new("kitchen", 120.0),
                RoomRequest::new("bedroom", 150.0).with_corridor(CorridorRule::TwoSides),
                RoomRequest::new("bath", 60.0).with_target_ratio(1.5),
            ],
            vec![
                Adjacency::new("living", "kitchen").with_weight(2.0),
                Adjacency::new("living", "bedroom"),
                Adjacency::new("bedroom", "bath").with_weight(1.5),
            ],
        )
        .unwrap()
    }

    fn config() -> PlanConfig {
        PlanConfig::default()
            .with_discrete(DiscreteConfig::default().with_max_iterations(30))
            .with_evolve(
                EvolveConfig::fast()
                    .with_population_size(10)
                    .with_max_generations(15)
                    .with_parallel(false),
            )
            .with_seed(42)
    }

    #[test]
    fn test_plan_returns_every_room_in_order() {
        let result = plan(&problem(), &config()).unwrap();
        let ids: Vec<&str> = result.rooms.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["living", "kitchen", "bedroom", "bath"]);
        assert_eq!(result.generations, 15);
        assert_eq!(result.fitness_history.len(), 16);
        assert!(result.fitness.is_finite());
        assert!((1..=4).contains(&result.discrete.placed_count()));
    }

    #[test]
    fn test_plan_is_deterministic() {
        let a = plan(&problem(), &config()).unwrap();
        let b = plan(&problem(), &config()).unwrap();
        assert_eq!(a.rooms, b.rooms);
        assert_eq!(a.fitness_history, b.fitness_history);
    }

    #[test]
    fn test_initial_rooms_use_grid_and_centroid() {
        let p = FloorplanProblem::new(
            Rect::new(0.0, 0.0, 10.0, 10.0).corners().to_vec(),
            vec![RoomRequest::new("small", 16.0), RoomRequest::new("huge", 500.0)],
            vec![],
        )
        .unwrap();
        let discrete = DiscreteRunner::run(&p, &DiscreteConfig::default().with_seed(1)).unwrap();
        let rooms = initial_rooms(&p, &discrete);

        assert_eq!(rooms.len(), 2);
        let small = &discrete.rooms["small"];
        assert_eq!(rooms[0].rect(), small.world_rect(&discrete.grid));

        assert!(!discrete.rooms.contains_key("huge"));
        let c = rooms[1].center();
        assert!(c.distance(&Point::new(5.0, 5.0)) < 1e-9);
        assert!((rooms[1].area() - 500.0).abs() < 1e-6);
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let bad = config().with_evolve(EvolveConfig::default().with_population_size(0));
        assert!(matches!(
            plan(&problem(), &bad),
            Err(FloorplanError::InvalidConfig(_))
        ));
    }
}
