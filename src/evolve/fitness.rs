//! Multi-objective fitness evaluation.
//!
//! Three independent, non-negative components are combined into one
//! scalar (lower is better):
//!
//! - **Geometric**: pairwise room overlap plus weighted out-of-boundary area
//! - **Adjacency**: center distance or shared-wall deficit per
//!   [`AdjacencyModel`]
//! - **Area deviation**: actual versus target room area

use super::config::{AdjacencyModel, AreaDeviation, FitnessConfig};
use super::types::{FitnessComponents, Gene, RoomState};
use crate::geometry::Boundary;
use crate::problem::Edge;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Scores genes against a fixed boundary and adjacency graph.
#[derive(Debug, Clone)]
pub struct FitnessEvaluator {
    boundary: Boundary,
    edges: Vec<Edge>,
    config: FitnessConfig,
}

impl FitnessEvaluator {
    pub fn new(boundary: Boundary, edges: Vec<Edge>, config: FitnessConfig) -> Self {
        Self {
            boundary,
            edges,
            config,
        }
    }

    pub fn boundary(&self) -> &Boundary {
        &self.boundary
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn config(&self) -> &FitnessConfig {
        &self.config
    }

    /// Computes every fitness component for a room list.
    pub fn components(&self, rooms: &[RoomState]) -> FitnessComponents {
        let overlap = self.overlap(rooms);
        let out_of_bounds: f64 = rooms
            .iter()
            .map(|r| self.boundary.outside_area(&r.rect()))
            .sum();
        FitnessComponents {
            overlap,
            out_of_bounds,
            geometric: overlap + self.config.out_of_bounds_factor * out_of_bounds,
            adjacency: self.adjacency(rooms),
            area_deviation: self.area_deviation(rooms),
        }
    }

    /// Weighted sum of the components.
    pub fn combine(&self, c: &FitnessComponents) -> f64 {
        let w = self.config.weights;
        let (geo_scale, adj_scale) = match self.config.adjacency_model {
            AdjacencyModel::CenterDistance { balance } => (1.0 - balance, balance),
            AdjacencyModel::SharedWall { .. } => (1.0, 1.0),
        };
        let total = w.geometric * geo_scale * c.geometric
            + w.adjacency * adj_scale * c.adjacency
            + w.area * c.area_deviation;
        if total.is_finite() {
            total
        } else {
            f64::MAX
        }
    }

    /// Scores `gene` and stores the result on it. Returns the fitness.
    pub fn evaluate(&self, gene: &mut Gene) -> f64 {
        let components = self.components(gene.rooms());
        let fitness = self.combine(&components);
        gene.set_fitness(fitness, components);
        fitness
    }

    /// Scores every gene in `genes`.
    ///
    /// With the `parallel` feature and `parallel == true`, genes are scored
    /// on the rayon pool. Evaluation is pure, so results are identical.
    pub fn evaluate_all(&self, genes: &mut [Gene], parallel: bool) {
        #[cfg(feature = "parallel")]
        if parallel {
            genes.par_iter_mut().for_each(|gene| {
                self.evaluate(gene);
            });
            return;
        }
        #[cfg(not(feature = "parallel"))]
        let _ = parallel;

        for gene in genes.iter_mut() {
            self.evaluate(gene);
        }
    }

    fn overlap(&self, rooms: &[RoomState]) -> f64 {
        let mut sum = 0.0;
        for i in 0..rooms.len() {
            let ri = rooms[i].rect();
            for other in &rooms[i + 1..] {
                let area = ri.intersection_area(&other.rect());
                if area <= 0.0 {
                    continue;
                }
                sum += match self.config.overlap_exponent {
                    Some(e) => area.powf(e),
                    None => area,
                };
            }
        }
        sum
    }

    fn adjacency(&self, rooms: &[RoomState]) -> f64 {
        let mut sum = 0.0;
        for edge in &self.edges {
            let (Some(a), Some(b)) = (rooms.get(edge.a), rooms.get(edge.b)) else {
                continue;
            };
            let (ra, rb) = (a.rect(), b.rect());
            sum += edge.weight
                * match self.config.adjacency_model {
                    AdjacencyModel::CenterDistance { .. } => ra.center().distance(&rb.center()),
                    AdjacencyModel::SharedWall {
                        target_length,
                        tolerance,
                    } => {
                        let contact = ra.shared_wall_length(&rb, tolerance);
                        if contact > 0.0 {
                            (target_length - contact).max(0.0).powi(2)
                        } else {
                            target_length.powi(2)
                                + target_length.max(1.0) * (1.0 + ra.separation(&rb))
                        }
                    }
                };
        }
        sum
    }

    fn area_deviation(&self, rooms: &[RoomState]) -> f64 {
        rooms
            .iter()
            .map(|r| {
                let d = (r.area() - r.target_area).abs();
                match self.config.area_deviation {
                    AreaDeviation::Absolute => d,
                    AreaDeviation::Squared => d * d,
                }
            })
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{Point, Rect};
    use crate::problem::AspectBound;

    fn room(id: &str, x: f64, y: f64, w: f64, h: f64) -> RoomState {
        RoomState::new(id, Rect::new(x, y, w, h), w * h, AspectBound::target(3.0))
    }

    fn evaluator(edges: Vec<Edge>, config: FitnessConfig) -> FitnessEvaluator {
        FitnessEvaluator::new(Boundary::rectangle(100.0, 100.0).unwrap(), edges, config)
    }

    fn edge(a: usize, b: usize) -> Edge {
        Edge { a, b, weight: 1.0 }
    }

    #[test]
    fn test_perfect_single_room_scores_zero() {
        let eval = evaluator(vec![], FitnessConfig::default());
        let mut gene = Gene::new(vec![room("a", 10.0, 10.0, 5.0, 4.0)]);
        assert_eq!(eval.evaluate(&mut gene), 0.0);
        assert!(gene.is_evaluated());
    }

    #[test]
    fn test_overlap_and_exponent() {
        let rooms = vec![room("a", 0.0, 0.0, 10.0, 10.0), room("b", 5.0, 0.0, 10.0, 10.0)];
        let eval = evaluator(vec![], FitnessConfig::default());
        assert!((eval.components(&rooms).overlap - 50.0).abs() < 1e-9);

        let squared = evaluator(
            vec![],
            FitnessConfig {
                overlap_exponent: Some(2.0),
                ..FitnessConfig::default()
            },
        );
        assert!((squared.components(&rooms).overlap - 2500.0).abs() < 1e-6);
    }

    #[test]
    fn test_out_of_bounds_is_weighted() {
        let eval = evaluator(vec![], FitnessConfig::default());
        let rooms = vec![room("a", -10.0, 0.0, 20.0, 10.0)];
        let c = eval.components(&rooms);
        assert!((c.out_of_bounds - 100.0).abs() < 1e-9);
        assert!((c.geometric - 10_000.0).abs() < 1e-6);
    }

    #[test]
    fn test_area_deviation_modes() {
        let mut r = room("a", 0.0, 0.0, 10.0, 10.0);
        r.target_area = 90.0;
        let abs = evaluator(vec![], FitnessConfig::default());
        assert!((abs.components(&[r.clone()]).area_deviation - 10.0).abs() < 1e-9);

        let sq = evaluator(
            vec![],
            FitnessConfig {
                area_deviation: AreaDeviation::Squared,
                ..FitnessConfig::default()
            },
        );
        assert!((sq.components(&[r]).area_deviation - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_shared_wall_touching_beats_apart() {
        let eval = evaluator(vec![edge(0, 1)], FitnessConfig::default());
        let touching_long = vec![room("a", 0.0, 0.0, 10.0, 10.0), room("b", 10.0, 0.0, 10.0, 10.0)];
        let touching_short = vec![room("a", 0.0, 0.0, 10.0, 10.0), room("b", 10.0, 9.0, 10.0, 10.0)];
        let corner_only = vec![room("a", 0.0, 0.0, 10.0, 10.0), room("b", 10.0, 10.0, 10.0, 10.0)];
        let far = vec![room("a", 0.0, 0.0, 10.0, 10.0), room("b", 40.0, 0.0, 10.0, 10.0)];

        let long = eval.components(&touching_long).adjacency;
        let short = eval.components(&touching_short).adjacency;
        let corner = eval.components(&corner_only).adjacency;
        let apart = eval.components(&far).adjacency;

        assert_eq!(long, 0.0);
        assert!((short - 1.0).abs() < 1e-9, "deficit 2 - 1 squared");
        assert!(corner > short);
        assert!(apart > corner);
    }

    #[test]
    fn test_center_distance_balance() {
        let rooms = vec![room("a", 0.0, 0.0, 10.0, 10.0), room("b", 25.0, 0.0, 10.0, 10.0)];
        let geometry_only = evaluator(
            vec![edge(0, 1)],
            FitnessConfig {
                adjacency_model: AdjacencyModel::CenterDistance { balance: 0.0 },
                ..FitnessConfig::default()
            },
        );
        let topology_only = evaluator(
            vec![edge(0, 1)],
            FitnessConfig {
                adjacency_model: AdjacencyModel::CenterDistance { balance: 1.0 },
                ..FitnessConfig::default()
            },
        );
        let c = geometry_only.components(&rooms);
        assert!((c.adjacency - 25.0).abs() < 1e-9);
        assert_eq!(geometry_only.combine(&c), 0.0);
        assert!((topology_only.combine(&c) - 25.0).abs() < 1e-9);
    }

    #[test]
    fn test_repeated_edges_add_up() {
        let eval = evaluator(vec![edge(0, 1), edge(1, 0)], FitnessConfig::default());
        let far = vec![room("a", 0.0, 0.0, 10.0, 10.0), room("b", 40.0, 0.0, 10.0, 10.0)];
        let single = evaluator(vec![edge(0, 1)], FitnessConfig::default());
        assert!(
            (eval.components(&far).adjacency - 2.0 * single.components(&far).adjacency).abs()
                < 1e-9
        );
    }

    #[test]
    fn test_out_of_range_edge_is_ignored() {
        let eval = evaluator(vec![edge(0, 5)], FitnessConfig::default());
        assert_eq!(eval.components(&[room("a", 0.0, 0.0, 5.0, 5.0)]).adjacency, 0.0);
    }

    #[test]
    fn test_degenerate_room_stays_finite() {
        let eval = evaluator(vec![edge(0, 1)], FitnessConfig::default());
        let mut gene = Gene::new(vec![
            room("a", 0.0, 0.0, 0.0, 0.0),
            RoomState::from_request(
                &crate::problem::RoomRequest::new("b", 4.0),
                Point::new(0.0, 0.0),
            ),
        ]);
        let f = eval.evaluate(&mut gene);
        assert!(f.is_finite());
    }

    #[test]
    fn test_evaluate_all_matches_single() {
        let eval = evaluator(vec![edge(0, 1)], FitnessConfig::default());
        let gene = Gene::new(vec![room("a", 0.0, 0.0, 10.0, 10.0), room("b", 5.0, 5.0, 10.0, 10.0)]);
        let mut genes = vec![gene.clone(), gene.clone()];
        eval.evaluate_all(&mut genes, true);
        let mut single = gene;
        let expected = eval.evaluate(&mut single);
        assert!(genes.iter().all(|g| g.fitness() == expected));
    }
}
