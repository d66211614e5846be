//! Candidate layouts ("genes") for the continuous refinement phase.

use crate::geometry::{Point, Rect};
use crate::problem::{dimensions_for, AspectBound, RoomRequest};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Smallest width or height a room may take; guards divisions.
pub const MIN_DIMENSION: f64 = 1e-3;

/// One room inside a gene: a continuous rectangle plus its targets.
///
/// `(x, y)` is the minimum corner.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RoomState {
    pub id: String,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub target_area: f64,
    pub aspect: AspectBound,
}

impl RoomState {
    pub fn new(id: impl Into<String>, rect: Rect, target_area: f64, aspect: AspectBound) -> Self {
        Self {
            id: id.into(),
            x: rect.x,
            y: rect.y,
            width: rect.width,
            height: rect.height,
            target_area,
            aspect,
        }
    }

    /// A room at the geometric-midpoint ratio of its bound, centered on `center`.
    pub fn from_request(request: &RoomRequest, center: Point) -> Self {
        let (w, h) = dimensions_for(request.target_area, request.aspect.midpoint());
        Self::new(
            request.id.clone(),
            Rect::from_center(center, w, h),
            request.target_area,
            request.aspect,
        )
    }

    pub fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, self.height)
    }

    pub fn set_rect(&mut self, rect: Rect) {
        self.x = rect.x;
        self.y = rect.y;
        self.width = rect.width;
        self.height = rect.height;
    }

    pub fn center(&self) -> Point {
        self.rect().center()
    }

    /// Moves the room so its center is `center`, keeping its size.
    pub fn set_center(&mut self, center: Point) {
        self.x = center.x - self.width / 2.0;
        self.y = center.y - self.height / 2.0;
    }

    /// Resizes to `width x height` around the current center.
    pub fn resize_centered(&mut self, width: f64, height: f64) {
        let center = self.center();
        self.width = width.max(MIN_DIMENSION);
        self.height = height.max(MIN_DIMENSION);
        self.set_center(center);
    }

    pub fn area(&self) -> f64 {
        self.width * self.height
    }

    /// `width / height`, with the height floored at [`MIN_DIMENSION`].
    pub fn ratio(&self) -> f64 {
        self.width / self.height.max(MIN_DIMENSION)
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.width.is_finite() && self.height.is_finite()
    }
}

/// Output rectangle of the continuous phase.
///
/// `vx`/`vy` are always zero: the evolutionary engine has no velocity.
/// They are kept so consumers written against force-directed layouts keep
/// working.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RoomRect {
    pub id: String,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub vx: f64,
    pub vy: f64,
}

impl From<&RoomState> for RoomRect {
    fn from(room: &RoomState) -> Self {
        Self {
            id: room.id.clone(),
            x: room.x,
            y: room.y,
            width: room.width,
            height: room.height,
            vx: 0.0,
            vy: 0.0,
        }
    }
}

/// Individual fitness terms of a gene, kept for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct FitnessComponents {
    /// Sum of pairwise overlap (after the optional exponent).
    pub overlap: f64,
    /// Room area lying outside the boundary polygon.
    pub out_of_bounds: f64,
    /// `overlap + out_of_bounds_factor * out_of_bounds`.
    pub geometric: f64,
    /// Adjacency penalty under the configured model.
    pub adjacency: f64,
    /// Deviation of actual from target room areas.
    pub area_deviation: f64,
}

/// A complete candidate layout: one [`RoomState`] per input room, in input
/// order, plus its fitness. Lower fitness is better; `f64::INFINITY` marks
/// an unevaluated gene.
///
/// Cloning deep-copies the room list, so mutating a clone never touches
/// its parent.
#[derive(Debug, Clone, PartialEq)]
pub struct Gene {
    rooms: Vec<RoomState>,
    fitness: f64,
    components: FitnessComponents,
}

impl Gene {
    pub fn new(rooms: Vec<RoomState>) -> Self {
        Self {
            rooms,
            fitness: f64::INFINITY,
            components: FitnessComponents::default(),
        }
    }

    pub fn rooms(&self) -> &[RoomState] {
        &self.rooms
    }

    pub(crate) fn rooms_mut(&mut self) -> &mut [RoomState] {
        &mut self.rooms
    }

    pub fn fitness(&self) -> f64 {
        self.fitness
    }

    pub fn components(&self) -> &FitnessComponents {
        &self.components
    }

    pub fn is_evaluated(&self) -> bool {
        self.fitness.is_finite()
    }

    pub(crate) fn set_fitness(&mut self, fitness: f64, components: FitnessComponents) {
        self.fitness = fitness;
        self.components = components;
    }

    /// Marks the gene as unevaluated after its rooms changed.
    pub(crate) fn invalidate(&mut self) {
        self.fitness = f64::INFINITY;
    }

    /// Mean of the room centers.
    pub fn centroid(&self) -> Point {
        if self.rooms.is_empty() {
            return Point::default();
        }
        let n = self.rooms.len() as f64;
        let (sx, sy) = self.rooms.iter().fold((0.0, 0.0), |(sx, sy), r| {
            let c = r.center();
            (sx + c.x, sy + c.y)
        });
        Point::new(sx / n, sy / n)
    }

    /// Read-only output copy of the rooms.
    pub fn to_rects(&self) -> Vec<RoomRect> {
        self.rooms.iter().map(RoomRect::from).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn room(id: &str, x: f64, y: f64, w: f64, h: f64) -> RoomState {
        RoomState::new(id, Rect::new(x, y, w, h), w * h, AspectBound::target(2.0))
    }

    #[test]
    fn test_clone_is_deep() {
        let parent = Gene::new(vec![room("a", 0.0, 0.0, 4.0, 4.0)]);
        let mut child = parent.clone();
        child.rooms_mut()[0].x = 50.0;
        assert_eq!(parent.rooms()[0].x, 0.0);
        assert_eq!(child.rooms()[0].x, 50.0);
    }

    #[test]
    fn test_new_gene_is_unevaluated() {
        let gene = Gene::new(vec![room("a", 0.0, 0.0, 1.0, 1.0)]);
        assert!(gene.fitness().is_infinite());
        assert!(!gene.is_evaluated());
    }

    #[test]
    fn test_from_request_uses_midpoint_ratio() {
        let request = RoomRequest::new("a", 50.0).with_aspect_range(2.0, 8.0);
        let state = RoomState::from_request(&request, Point::new(10.0, 10.0));
        assert!((state.area() - 50.0).abs() < 1e-9);
        assert!((state.ratio() - 4.0).abs() < 1e-9);
        let c = state.center();
        assert!((c.x - 10.0).abs() < 1e-9 && (c.y - 10.0).abs() < 1e-9);
    }

    #[test]
    fn test_resize_keeps_center() {
        let mut r = room("a", 0.0, 0.0, 4.0, 2.0);
        r.resize_centered(2.0, 4.0);
        assert_eq!((r.x, r.y), (1.0, -1.0));
        r.resize_centered(0.0, 1.0);
        assert!(r.width >= MIN_DIMENSION);
    }

    #[test]
    fn test_centroid_and_output() {
        let gene = Gene::new(vec![
            room("a", 0.0, 0.0, 2.0, 2.0),
            room("b", 4.0, 0.0, 2.0, 2.0),
        ]);
        let c = gene.centroid();
        assert!((c.x - 3.0).abs() < 1e-12 && (c.y - 1.0).abs() < 1e-12);

        let rects = gene.to_rects();
        assert_eq!(rects[1].id, "b");
        assert_eq!((rects[1].vx, rects[1].vy), (0.0, 0.0));
    }
}
