//! Step-driven continuous layout solver.

use super::config::EvolveConfig;
use super::fitness::FitnessEvaluator;
use super::population::{GenerationStats, Population};
use super::types::{Gene, RoomRect, RoomState};
use crate::error::FloorplanError;
use crate::geometry::{Boundary, Point, Rect};
use crate::problem::{
    check_unique_ids, dimensions_for, resolve_edges, Adjacency, FloorplanProblem,
};
use tracing::{debug, instrument};

/// Evolutionary floor plan solver.
///
/// The caller drives progress: each [`step`](Self::step) advances exactly
/// one generation, and `simulate(n)` is the same as `n` calls to `step`.
///
/// # Examples
///
/// ```
/// use u_floorplan::evolve::{EvolveConfig, FloorplanSolver, RoomState};
/// use u_floorplan::geometry::Rect;
/// use u_floorplan::problem::AspectBound;
///
/// let boundary = Rect::new(0.0, 0.0, 30.0, 30.0).corners().to_vec();
/// let rooms = vec![
///     RoomState::new("living", Rect::new(2.0, 2.0, 10.0, 8.0), 80.0, AspectBound::target(2.0)),
///     RoomState::new("kitchen", Rect::new(6.0, 4.0, 6.0, 6.0), 36.0, AspectBound::target(2.0)),
/// ];
/// let config = EvolveConfig::fast().with_seed(42);
///
/// let mut solver = FloorplanSolver::new(rooms, boundary, &[], config).unwrap();
/// solver.simulate(20);
/// assert_eq!(solver.state().len(), 2);
/// assert_eq!(solver.generation(), 20);
/// ```
#[derive(Debug, Clone)]
pub struct FloorplanSolver {
    evaluator: FitnessEvaluator,
    population: Population,
    history: Vec<f64>,
}

impl FloorplanSolver {
    /// Validates the inputs and seeds a scored population.
    ///
    /// Rooms with a non-positive or non-finite size are given the
    /// midpoint-ratio rectangle of their target area; rooms with a
    /// non-finite position are centered on the boundary centroid.
    #[instrument(
        level = "debug",
        skip(rooms, boundary, adjacencies, config),
        fields(rooms = rooms.len(), edges = adjacencies.len())
    )]
    pub fn new(
        rooms: Vec<RoomState>,
        boundary: Vec<Point>,
        adjacencies: &[Adjacency],
        config: EvolveConfig,
    ) -> Result<Self, FloorplanError> {
        config.validate().map_err(FloorplanError::InvalidConfig)?;
        let boundary = Boundary::new(boundary)?;
        if rooms.is_empty() {
            return Err(FloorplanError::NoRooms);
        }

        let mut rooms = rooms;
        for room in &mut rooms {
            validate_room(room)?;
            normalize_room(room, &boundary);
        }
        let ids: Vec<&str> = rooms.iter().map(|r| r.id.as_str()).collect();
        check_unique_ids(&ids)?;
        let edges = resolve_edges(&ids, adjacencies)?;

        let evaluator = FitnessEvaluator::new(boundary, edges, config.fitness);
        let population = Population::new(Gene::new(rooms), config, &evaluator);
        let history = vec![population.best_fitness()];
        debug!(best = history[0], "population seeded");

        Ok(Self {
            evaluator,
            population,
            history,
        })
    }

    /// Builds a solver over a validated problem's boundary and adjacencies.
    ///
    /// `rooms` supplies the starting rectangles, typically from the
    /// discrete phase.
    pub fn from_problem(
        problem: &FloorplanProblem,
        rooms: Vec<RoomState>,
        config: EvolveConfig,
    ) -> Result<Self, FloorplanError> {
        Self::new(
            rooms,
            problem.boundary().points().to_vec(),
            problem.adjacencies(),
            config,
        )
    }

    /// Advances one generation.
    ///
    /// Returns `None` without doing anything once `max_generations` is reached.
    pub fn step(&mut self) -> Option<GenerationStats> {
        if self.is_finished() {
            return None;
        }
        let stats = self.population.evolve(&self.evaluator);
        self.history.push(stats.best);
        Some(stats)
    }

    /// Runs up to `n` generations, stopping early at `max_generations`.
    ///
    /// Returns the number of generations executed.
    pub fn simulate(&mut self, n: usize) -> usize {
        let mut done = 0;
        while done < n && self.step().is_some() {
            done += 1;
        }
        done
    }

    /// The best layout's rooms, in input order.
    pub fn state(&self) -> Vec<RoomRect> {
        self.population.best().to_rects()
    }

    /// True when the best fitness is below `threshold` or the population has
    /// stagnated (`worst - best < threshold`).
    pub fn has_converged(&self, threshold: f64) -> bool {
        let best = self.best_fitness();
        best < threshold || (self.worst_fitness() - best) < threshold
    }

    /// Best fitness under its force-directed name; there is no velocity.
    pub fn kinetic_energy(&self) -> f64 {
        self.best_fitness()
    }

    pub fn is_finished(&self) -> bool {
        self.population.generation() >= self.population.config().max_generations
    }

    pub fn best(&self) -> &Gene {
        self.population.best()
    }

    pub fn best_fitness(&self) -> f64 {
        self.population.best_fitness()
    }

    pub fn worst_fitness(&self) -> f64 {
        self.population.worst_fitness()
    }

    pub fn generation(&self) -> usize {
        self.population.generation()
    }

    /// Best fitness after seeding and after each generation.
    pub fn fitness_history(&self) -> &[f64] {
        &self.history
    }

    pub fn population(&self) -> &Population {
        &self.population
    }

    pub fn evaluator(&self) -> &FitnessEvaluator {
        &self.evaluator
    }
}

fn validate_room(room: &RoomState) -> Result<(), FloorplanError> {
    if !room.target_area.is_finite() || room.target_area <= 0.0 {
        return Err(FloorplanError::InvalidTargetArea {
            id: room.id.clone(),
            area: room.target_area,
        });
    }
    if !room.aspect.is_valid() {
        return Err(FloorplanError::InvalidAspectBound {
            id: room.id.clone(),
            min: room.aspect.min,
            max: room.aspect.max,
        });
    }
    Ok(())
}

fn normalize_room(room: &mut RoomState, boundary: &Boundary) {
    let sized = room.width.is_finite()
        && room.height.is_finite()
        && room.width > 0.0
        && room.height > 0.0;
    let placed = room.x.is_finite() && room.y.is_finite();
    if sized && placed {
        return;
    }
    let center = if placed && room.width.is_finite() && room.height.is_finite() {
        room.center()
    } else {
        boundary.centroid()
    };
    let (w, h) = if sized {
        (room.width, room.height)
    } else {
        dimensions_for(room.target_area, room.aspect.midpoint())
    };
    room.set_rect(Rect::from_center(center, w, h));
}
