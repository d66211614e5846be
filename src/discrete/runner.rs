//! Greedy seeding and iterated local search on the placement grid.

use super::config::{Acceptance, DiscreteConfig};
use super::corridor::{paint_corridor, prune_dead_ends};
use super::types::{DiscreteResult, PlacedRoom};
use crate::error::FloorplanError;
use crate::geometry::Point;
use crate::grid::{Cell, Grid};
use crate::problem::{dimensions_for, FloorplanProblem};
use crate::random::SeededRng;
use rand::seq::SliceRandom;
use rand::Rng;
use std::cmp::Reverse;
use tracing::{debug, instrument};

/// Score reward per placed room in the global layout score.
const PLACED_ROOM_REWARD: f64 = 100.0;

/// Grid plus per-room placement; cloned whole for snapshots.
#[derive(Debug, Clone)]
struct Layout {
    grid: Grid,
    placed: Vec<Option<PlacedRoom>>,
}

impl Layout {
    fn placed_count(&self) -> usize {
        self.placed.iter().filter(|p| p.is_some()).count()
    }

    fn remove(&mut self, index: usize) {
        if let Some(room) = self.placed[index].take() {
            self.grid
                .fill_block(room.x, room.y, room.width, room.height, Cell::Empty);
        }
    }
}

/// Executes the discrete placement solver.
///
/// # Algorithm
///
/// 1. Rasterize the boundary into a grid of `grid_resolution` cells.
/// 2. Place rooms greedily, most-connected first, at the fitting origin
///    with the best compactness/adjacency score; paint corridors.
/// 3. Repeat `max_iterations` times: remove a random `mutation_rate`
///    fraction of placed rooms, re-place every unplaced room, keep the
///    result only if the acceptance rule allows it.
/// 4. Prune dead-end corridors.
///
/// # Usage
///
/// ```ignore
/// let result = DiscreteRunner::run(&problem, &DiscreteConfig::default().with_seed(42))?;
/// for (id, room) in &result.rooms {
///     println!("{id}: {}x{} at ({}, {})", room.width, room.height, room.x, room.y);
/// }
/// ```
pub struct DiscreteRunner;

impl DiscreteRunner {
    /// Runs discrete placement.
    #[instrument(
        level = "debug",
        skip(problem, config),
        fields(rooms = problem.rooms().len(), max_iterations = config.max_iterations)
    )]
    pub fn run(
        problem: &FloorplanProblem,
        config: &DiscreteConfig,
    ) -> Result<DiscreteResult, FloorplanError> {
        config.validate().map_err(FloorplanError::InvalidConfig)?;

        let mut rng = SeededRng::from_optional_seed(config.seed);
        let order = placement_order(problem);

        let mut layout = Layout {
            grid: Grid::for_boundary(problem.boundary(), config.grid_resolution),
            placed: vec![None; problem.rooms().len()],
        };

        // 1. Greedy seeding
        for &index in &order {
            place_room(problem, config, &mut layout, index, &mut rng);
        }

        let mut current_score = global_score(problem, config, &layout);
        let mut best = layout.clone();
        let mut best_score = current_score;
        let mut score_history = Vec::with_capacity(config.max_iterations + 1);
        score_history.push(best_score);

        // 2. Iterated local search
        let mut accepted = 0usize;
        for iteration in 0..config.max_iterations {
            let snapshot = layout.clone();

            let mut placed: Vec<usize> = (0..layout.placed.len())
                .filter(|&i| layout.placed[i].is_some())
                .collect();
            let remove_count =
                ((config.mutation_rate * placed.len() as f64).ceil() as usize).min(placed.len());
            placed.shuffle(&mut rng);
            for &index in &placed[..remove_count] {
                layout.remove(index);
            }

            for &index in &order {
                if layout.placed[index].is_none() {
                    place_room(problem, config, &mut layout, index, &mut rng);
                }
            }

            let score = global_score(problem, config, &layout);
            let accept = match config.acceptance {
                Acceptance::Strict => score > current_score,
                Acceptance::Metropolis {
                    initial_temperature,
                } => {
                    let progress = iteration as f64 / config.max_iterations as f64;
                    let temperature = initial_temperature * (1.0 - progress);
                    let probability = if temperature > 0.0 {
                        ((score - current_score) / temperature).exp()
                    } else {
                        0.0
                    };
                    score > current_score || rng.random_range(0.0..1.0) < probability
                }
            };

            if accept {
                current_score = score;
                accepted += 1;
                if score > best_score {
                    debug!(iteration, score, placed = layout.placed_count(), "improved layout");
                    best = layout.clone();
                    best_score = score;
                }
            } else {
                layout = snapshot;
            }

            score_history.push(best_score);
        }

        // 3. Dead-end pruning on the working and the best grid
        let working_is_best = best.grid == layout.grid;
        prune_dead_ends(&mut layout.grid);
        if working_is_best {
            best.grid = layout.grid;
        } else {
            prune_dead_ends(&mut best.grid);
        }
        let score = global_score(problem, config, &best);

        debug!(
            placed = best.placed_count(),
            total = problem.rooms().len(),
            score,
            accepted,
            "discrete placement finished"
        );

        Ok(DiscreteResult {
            grid: best.grid,
            rooms: best
                .placed
                .into_iter()
                .flatten()
                .map(|room| (room.id.clone(), room))
                .collect(),
            score,
            iterations: config.max_iterations,
            accepted,
            score_history,
        })
    }
}

/// Room indices sorted by adjacency degree (descending), halls first among
/// equals, then input order.
fn placement_order(problem: &FloorplanProblem) -> Vec<usize> {
    let mut order: Vec<usize> = (0..problem.rooms().len()).collect();
    order.sort_by_key(|&i| (Reverse(problem.degree(i)), !problem.rooms()[i].is_hall));
    order
}

/// Integer cell dimensions for a room, with the aspect ratio drawn from its bound.
fn cell_dimensions<R: Rng>(
    problem: &FloorplanProblem,
    index: usize,
    resolution: f64,
    rng: &mut R,
) -> (usize, usize) {
    let request = &problem.rooms()[index];
    let cells = request.target_area / (resolution * resolution);
    let ratio = request.aspect.sample(rng);
    let (w, _) = dimensions_for(cells, ratio);
    let width = (w.round() as usize).max(1);
    let height = ((cells / width as f64).round() as usize).max(1);
    (width, height)
}

/// Places one room at its best-scoring fitting origin. Returns `false` when
/// no origin fits, leaving the room unplaced.
fn place_room<R: Rng>(
    problem: &FloorplanProblem,
    config: &DiscreteConfig,
    layout: &mut Layout,
    index: usize,
    rng: &mut R,
) -> bool {
    let (w, h) = cell_dimensions(problem, index, layout.grid.resolution(), rng);
    let grid = &layout.grid;
    if w > grid.width() || h > grid.height() {
        return false;
    }

    let mut best: Option<(f64, usize, usize)> = None;
    for y in 0..=grid.height() - h {
        for x in 0..=grid.width() - w {
            if !grid.is_block_empty(x, y, w, h) {
                continue;
            }
            let center = Point::new(x as f64 + w as f64 / 2.0, y as f64 + h as f64 / 2.0);
            let score = compactness(grid, x, y, w, h) as f64 * config.weights.compactness
                - neighbor_distance(problem, &layout.placed, index, center)
                    * config.weights.adjacency;
            if best.map_or(true, |(s, _, _)| score > s) {
                best = Some((score, x, y));
            }
        }
    }

    let Some((_, x, y)) = best else {
        return false;
    };

    let request = &problem.rooms()[index];
    let room_index = index as u32 + 1;
    layout.grid.fill_block(x, y, w, h, Cell::Room(room_index));
    paint_corridor(&mut layout.grid, request.corridor_rule, x, y, w, h);
    layout.placed[index] = Some(PlacedRoom {
        id: request.id.clone(),
        x,
        y,
        width: w,
        height: h,
        room_index,
    });
    true
}

/// Occupied cells touching the block's perimeter (corners excluded).
fn compactness(grid: &Grid, x: usize, y: usize, w: usize, h: usize) -> usize {
    let (x, y, w, h) = (x as i64, y as i64, w as i64, h as i64);
    let occupied = |cx: i64, cy: i64| grid.get(cx, cy).is_some_and(Cell::is_occupied);

    let horizontal = (x..x + w)
        .filter(|&cx| occupied(cx, y - 1))
        .count()
        + (x..x + w).filter(|&cx| occupied(cx, y + h)).count();
    let vertical = (y..y + h)
        .filter(|&cy| occupied(x - 1, cy))
        .count()
        + (y..y + h).filter(|&cy| occupied(x + w, cy)).count();
    horizontal + vertical
}

/// Mean weighted center distance from `center` to the placed adjacency
/// neighbors of room `index`. Unplaced neighbors are ignored; no placed
/// neighbor yields 0.
fn neighbor_distance(
    problem: &FloorplanProblem,
    placed: &[Option<PlacedRoom>],
    index: usize,
    center: Point,
) -> f64 {
    let mut sum = 0.0;
    let mut count = 0usize;
    for edge in problem.edges() {
        let other = if edge.a == index {
            edge.b
        } else if edge.b == index {
            edge.a
        } else {
            continue;
        };
        if let Some(room) = &placed[other] {
            sum += edge.weight * center.distance(&room.center());
            count += 1;
        }
    }
    if count == 0 {
        0.0
    } else {
        sum / count as f64
    }
}

/// `100 * placed - sum(weighted distance over satisfied edges) - corridor penalty`.
fn global_score(problem: &FloorplanProblem, config: &DiscreteConfig, layout: &Layout) -> f64 {
    let placed = layout.placed_count() as f64;
    let distance: f64 = problem
        .edges()
        .iter()
        .filter_map(|edge| match (&layout.placed[edge.a], &layout.placed[edge.b]) {
            (Some(a), Some(b)) => Some(edge.weight * a.center().distance(&b.center())),
            _ => None,
        })
        .sum();
    let corridor_penalty = if config.weights.corridor > 0.0 {
        config.weights.corridor * layout.grid.count(Cell::Corridor) as f64
    } else {
        0.0
    };
    PLACED_ROOM_REWARD * placed - distance - corridor_penalty
}
