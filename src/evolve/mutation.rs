//! Variation operators on genes.
//!
//! # Mutation Operators
//!
//! - [`teleport`]: Move one room to a random interior point, optionally
//!   re-rolling its aspect ratio
//! - [`swap`]: Cyclically exchange the centers of 2–4 rooms
//! - [`rotate`]: Rotate every room center around the layout centroid by an
//!   angle in [25°, 335°] ([`rotate_by`] for a fixed angle)
//! - [`reshape`]: Re-roll one room's aspect ratio around its center
//!
//! # Recombination
//!
//! - [`crossover`]: Per-room uniform choice of position and shape from two
//!   parents
//!
//! All operators keep the room count and ids of the gene unchanged and
//! invalidate its fitness when they touch it.

use super::config::MutationWeights;
use super::types::{Gene, RoomState};
use crate::geometry::{Boundary, Point, MIN_DISTANCE};
use crate::problem::dimensions_for;
use crate::random::weighted_index;
use rand::seq::SliceRandom;
use rand::Rng;

/// Smallest and largest rotation applied by [`rotate`], in degrees.
const ROTATION_RANGE: (f64, f64) = (25.0, 335.0);

/// Most rooms taking part in one [`swap`].
const MAX_SWAP_ROOMS: usize = 4;

/// Mutation operator, in [`MutationWeights::as_array`] order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    Teleport,
    Swap,
    Rotate,
    Reshape,
}

impl Operator {
    const ALL: [Operator; 4] = [
        Operator::Teleport,
        Operator::Swap,
        Operator::Rotate,
        Operator::Reshape,
    ];

    /// Draws an operator proportionally to `weights`.
    ///
    /// Returns `None` when every weight is zero.
    pub fn pick<R: Rng>(weights: &MutationWeights, rng: &mut R) -> Option<Self> {
        weighted_index(&weights.as_array(), rng).map(|i| Self::ALL[i])
    }
}

/// Applies `count` weighted-random mutations to `gene`.
///
/// Returns the number of mutations that changed the gene. All-zero weights
/// apply nothing.
pub fn mutate<R: Rng>(
    gene: &mut Gene,
    weights: &MutationWeights,
    count: usize,
    boundary: &Boundary,
    reroll_probability: f64,
    rng: &mut R,
) -> usize {
    let mut applied = 0;
    for _ in 0..count {
        let Some(op) = Operator::pick(weights, rng) else {
            break;
        };
        let changed = match op {
            Operator::Teleport => teleport(gene, boundary, reroll_probability, rng),
            Operator::Swap => swap(gene, rng),
            Operator::Rotate => rotate(gene, rng),
            Operator::Reshape => reshape(gene, rng),
        };
        if changed {
            applied += 1;
        }
    }
    if applied > 0 {
        gene.invalidate();
    }
    applied
}

fn reroll_shape<R: Rng>(room: &mut RoomState, rng: &mut R) {
    let ratio = room.aspect.sample(rng);
    let (w, h) = dimensions_for(room.area(), ratio);
    room.resize_centered(w, h);
}

/// Moves one random room to a uniformly random point inside the boundary.
pub fn teleport<R: Rng>(
    gene: &mut Gene,
    boundary: &Boundary,
    reroll_probability: f64,
    rng: &mut R,
) -> bool {
    let n = gene.rooms().len();
    if n == 0 {
        return false;
    }
    let idx = rng.random_range(0..n);
    let target = boundary.random_interior_point(rng);
    let reroll = rng.random_bool(reroll_probability.clamp(0.0, 1.0));

    let room = &mut gene.rooms_mut()[idx];
    room.set_center(target);
    if reroll {
        reroll_shape(room, rng);
    }
    true
}

/// Cyclically exchanges the centers of 2–4 distinct rooms.
pub fn swap<R: Rng>(gene: &mut Gene, rng: &mut R) -> bool {
    let n = gene.rooms().len();
    if n < 2 {
        return false;
    }
    let k = rng.random_range(2..=n.min(MAX_SWAP_ROOMS));
    let mut order: Vec<usize> = (0..n).collect();
    order.shuffle(rng);
    order.truncate(k);

    let rooms = gene.rooms_mut();
    let centers: Vec<Point> = order.iter().map(|&i| rooms[i].center()).collect();
    for (slot, &i) in order.iter().enumerate() {
        rooms[i].set_center(centers[(slot + 1) % k]);
    }
    true
}

/// Rotates every room center around the gene's centroid by a random angle
/// in [25°, 335°].
pub fn rotate<R: Rng>(gene: &mut Gene, rng: &mut R) -> bool {
    if gene.rooms().is_empty() {
        return false;
    }
    let degrees = rng.random_range(ROTATION_RANGE.0..ROTATION_RANGE.1);
    rotate_by(gene, degrees);
    true
}

/// Rotates every room center around the gene's centroid by `degrees`.
///
/// Width and height are exchanged when the angle is closer to 90° or 270°
/// than to 0° or 180°, provided the flipped ratio stays in the room's bound.
/// Rooms sitting on the centroid keep their position.
pub fn rotate_by(gene: &mut Gene, degrees: f64) {
    if gene.rooms().is_empty() {
        return;
    }
    let pivot = gene.centroid();
    let (sin, cos) = degrees.to_radians().sin_cos();
    let quarter_turn = ((degrees % 180.0) - 90.0).abs() < 45.0;

    for room in gene.rooms_mut() {
        let c = room.center();
        let (dx, dy) = (c.x - pivot.x, c.y - pivot.y);
        if dx.abs() > MIN_DISTANCE || dy.abs() > MIN_DISTANCE {
            room.set_center(Point::new(
                pivot.x + dx * cos - dy * sin,
                pivot.y + dx * sin + dy * cos,
            ));
        }
        if quarter_turn && room.aspect.contains(room.height / room.width) {
            let (w, h) = (room.width, room.height);
            room.resize_centered(h, w);
        }
    }
    gene.invalidate();
}

/// Re-rolls one random room's aspect ratio, keeping its area and center.
pub fn reshape<R: Rng>(gene: &mut Gene, rng: &mut R) -> bool {
    let n = gene.rooms().len();
    if n == 0 {
        return false;
    }
    let idx = rng.random_range(0..n);
    reroll_shape(&mut gene.rooms_mut()[idx], rng);
    true
}

/// Scatters every room to a random interior point with a random ratio at
/// its target area.
pub fn randomize<R: Rng>(gene: &mut Gene, boundary: &Boundary, rng: &mut R) {
    for room in gene.rooms_mut() {
        let center = boundary.random_interior_point(rng);
        let (w, h) = dimensions_for(room.target_area, room.aspect.sample(rng));
        room.width = w;
        room.height = h;
        room.set_center(center);
    }
    gene.invalidate();
}

/// Builds a child taking each room's position and shape independently from
/// either parent.
///
/// Both parents must hold the same rooms in the same order; the child has
/// the room list of `a`.
pub fn crossover<R: Rng>(a: &Gene, b: &Gene, rng: &mut R) -> Gene {
    let rooms = a
        .rooms()
        .iter()
        .zip(b.rooms())
        .map(|(ra, rb)| {
            let center = if rng.random_bool(0.5) {
                ra.center()
            } else {
                rb.center()
            };
            let (w, h) = if rng.random_bool(0.5) {
                (ra.width, ra.height)
            } else {
                (rb.width, rb.height)
            };
            let mut room = ra.clone();
            room.width = w;
            room.height = h;
            room.set_center(center);
            room
        })
        .collect();
    Gene::new(rooms)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Rect;
    use crate::problem::AspectBound;
    use crate::random::SeededRng;
    use proptest::prelude::*;

    fn room(id: &str, x: f64, y: f64, w: f64, h: f64) -> RoomState {
        RoomState::new(id, Rect::new(x, y, w, h), w * h, AspectBound::target(3.0))
    }

    fn gene() -> Gene {
        Gene::new(vec![
            room("a", 0.0, 0.0, 4.0, 4.0),
            room("b", 10.0, 0.0, 6.0, 3.0),
            room("c", 0.0, 10.0, 3.0, 5.0),
            room("d", 10.0, 10.0, 4.0, 2.0),
            room("e", 20.0, 20.0, 2.0, 2.0),
        ])
    }

    fn center_keys(g: &Gene) -> Vec<(i64, i64)> {
        g.rooms()
            .iter()
            .map(|r| {
                let c = r.center();
                ((c.x * 1e6).round() as i64, (c.y * 1e6).round() as i64)
            })
            .collect()
    }

    fn ids(g: &Gene) -> Vec<String> {
        g.rooms().iter().map(|r| r.id.clone()).collect()
    }

    fn boundary() -> Boundary {
        Boundary::rectangle(50.0, 50.0).unwrap()
    }

    #[test]
    fn test_zero_weights_apply_nothing() {
        let mut g = gene();
        let before = g.clone();
        let mut rng = SeededRng::new(42);
        let applied = mutate(&mut g, &MutationWeights::none(), 3, &boundary(), 0.5, &mut rng);
        assert_eq!(applied, 0);
        assert_eq!(g, before);
    }

    #[test]
    fn test_single_operator_selection() {
        let weights = MutationWeights {
            swap: 1.0,
            ..MutationWeights::none()
        };
        let mut rng = SeededRng::new(1);
        for _ in 0..20 {
            assert_eq!(Operator::pick(&weights, &mut rng), Some(Operator::Swap));
        }
    }

    #[test]
    fn test_teleport_moves_inside_and_keeps_area() {
        let mut g = gene();
        let mut rng = SeededRng::new(3);
        let b = boundary();
        for _ in 0..20 {
            teleport(&mut g, &b, 1.0, &mut rng);
        }
        for (r, orig) in g.rooms().iter().zip(gene().rooms()) {
            assert!((r.area() - orig.area()).abs() < 1e-9);
        }
        assert_eq!(ids(&g), ids(&gene()));
    }

    #[test]
    fn test_swap_permutes_centers() {
        let mut g = gene();
        let mut rng = SeededRng::new(5);
        assert!(swap(&mut g, &mut rng));

        let mut before = center_keys(&gene());
        let mut after = center_keys(&g);
        assert_ne!(before, after);
        before.sort();
        after.sort();
        assert_eq!(before, after);
    }

    #[test]
    fn test_swap_needs_two_rooms() {
        let mut g = Gene::new(vec![room("a", 0.0, 0.0, 1.0, 1.0)]);
        assert!(!swap(&mut g, &mut SeededRng::new(0)));
    }

    #[test]
    fn test_rotate_keeps_distances_to_centroid() {
        let mut g = gene();
        let pivot = g.centroid();
        let radii: Vec<f64> = g.rooms().iter().map(|r| r.center().distance(&pivot)).collect();
        rotate(&mut g, &mut SeededRng::new(11));
        for (r, d) in g.rooms().iter().zip(radii) {
            assert!((r.center().distance(&pivot) - d).abs() < 1e-9);
        }
    }

    #[test]
    fn test_quarter_turn_exchanges_dimensions() {
        for degrees in [90.0, 270.0] {
            let mut g = gene();
            rotate_by(&mut g, degrees);
            for (r, orig) in g.rooms().iter().zip(gene().rooms()) {
                assert_eq!((r.width, r.height), (orig.height, orig.width));
                assert!((r.area() - orig.area()).abs() < 1e-9);
            }
        }
    }

    #[test]
    fn test_shallow_turn_keeps_dimensions() {
        for degrees in [30.0, 200.0, 330.0] {
            let mut g = gene();
            rotate_by(&mut g, degrees);
            for (r, orig) in g.rooms().iter().zip(gene().rooms()) {
                assert_eq!((r.width, r.height), (orig.width, orig.height));
            }
        }
    }

    #[test]
    fn test_quarter_turn_respects_aspect_bound() {
        let wide_only = RoomState::new(
            "wide",
            Rect::new(0.0, 0.0, 6.0, 3.0),
            18.0,
            AspectBound::range(1.5, 3.0),
        );
        let mut g = Gene::new(vec![wide_only, room("free", 10.0, 10.0, 6.0, 3.0)]);
        rotate_by(&mut g, 100.0);
        assert_eq!((g.rooms()[0].width, g.rooms()[0].height), (6.0, 3.0));
        assert_eq!((g.rooms()[1].width, g.rooms()[1].height), (3.0, 6.0));
    }

    #[test]
    fn test_reshape_keeps_center_and_bound() {
        let mut g = gene();
        let mut rng = SeededRng::new(8);
        for _ in 0..30 {
            reshape(&mut g, &mut rng);
        }
        for (r, orig) in g.rooms().iter().zip(gene().rooms()) {
            assert!((r.center().x - orig.center().x).abs() < 1e-9);
            assert!((r.area() - orig.area()).abs() < 1e-9);
            assert!(r.aspect.contains(r.ratio()));
        }
    }

    #[test]
    fn test_crossover_takes_from_parents() {
        let a = gene();
        let mut b = gene();
        mutate(&mut b, &MutationWeights::default(), 5, &boundary(), 0.5, &mut SeededRng::new(2));
        let child = crossover(&a, &b, &mut SeededRng::new(9));
        assert_eq!(ids(&child), ids(&a));
        for ((c, ra), rb) in child.rooms().iter().zip(a.rooms()).zip(b.rooms()) {
            let shape = (c.width, c.height);
            assert!(shape == (ra.width, ra.height) || shape == (rb.width, rb.height));
        }
        assert!(!child.is_evaluated());
    }

    #[test]
    fn test_randomize_hits_target_area() {
        let mut g = gene();
        randomize(&mut g, &boundary(), &mut SeededRng::new(4));
        for r in g.rooms() {
            assert!((r.area() - r.target_area).abs() < 1e-6);
        }
    }

    proptest! {
        #[test]
        fn prop_mutate_preserves_ids_and_finiteness(seed in any::<u64>(), count in 0usize..6) {
            let mut g = gene();
            let mut rng = SeededRng::new(seed);
            mutate(&mut g, &MutationWeights::default(), count, &boundary(), 0.5, &mut rng);
            prop_assert_eq!(ids(&g), ids(&gene()));
            prop_assert!(g.rooms().iter().all(|r| r.is_finite()));
        }

        #[test]
        fn prop_mutated_clone_leaves_parent(seed in any::<u64>()) {
            let parent = gene();
            let mut child = parent.clone();
            mutate(&mut child, &MutationWeights::default(), 3, &boundary(), 1.0, &mut SeededRng::new(seed));
            prop_assert_eq!(parent, gene());
        }
    }
}
