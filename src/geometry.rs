//! Geometry provider.
//!
//! Stateless polygon helpers over plain [`Point`] slices: bounding box,
//! centroid, area, containment and intersection delegate to `geo`
//! (`BoundingRect`, `Centroid`, `Area`, `Contains`, `BooleanOps`); the
//! closest boundary point is a direct segment projection.
//!
//! Rooms are always axis-aligned rectangles, so [`Rect`] carries exact
//! closed-form versions of the hot-path queries (pairwise overlap, shared
//! wall length). [`Boundary`] caches everything derived from the boundary
//! polygon so the optimizers never rebuild clipping geometry per call.

use crate::error::FloorplanError;
use crate::random::uniform;
use geo::{Area, BooleanOps, BoundingRect, Centroid, Contains, Coord, LineString, Polygon};
use rand::Rng;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Relative tolerance used by [`contains`].
const CONTAINMENT_RATIO: f64 = 0.99;

/// Distances below this are treated as zero.
pub const MIN_DISTANCE: f64 = 1e-6;

/// Attempts made by [`Boundary::random_interior_point`] before falling back
/// to the centroid.
const INTERIOR_SAMPLE_ATTEMPTS: usize = 32;

/// A 2D point.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to `other`.
    pub fn distance(&self, other: &Point) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

impl From<(f64, f64)> for Point {
    fn from((x, y): (f64, f64)) -> Self {
        Self { x, y }
    }
}

/// Axis-aligned rectangle anchored at its minimum corner.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Builds a rectangle of the given size centered on `center`.
    pub fn from_center(center: Point, width: f64, height: f64) -> Self {
        Self::new(
            center.x - width / 2.0,
            center.y - height / 2.0,
            width,
            height,
        )
    }

    pub fn max_x(&self) -> f64 {
        self.x + self.width
    }

    pub fn max_y(&self) -> f64 {
        self.y + self.height
    }

    pub fn center(&self) -> Point {
        Point::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    pub fn area(&self) -> f64 {
        self.width * self.height
    }

    /// Corner points in counter-clockwise order.
    pub fn corners(&self) -> [Point; 4] {
        [
            Point::new(self.x, self.y),
            Point::new(self.max_x(), self.y),
            Point::new(self.max_x(), self.max_y()),
            Point::new(self.x, self.max_y()),
        ]
    }

    /// Overlap extents along x and y. Either is `<= 0` when the rectangles
    /// do not overlap.
    pub fn overlap_extents(&self, other: &Rect) -> (f64, f64) {
        (
            interval_overlap(self.x, self.max_x(), other.x, other.max_x()),
            interval_overlap(self.y, self.max_y(), other.y, other.max_y()),
        )
    }

    /// Exact intersection area of two axis-aligned rectangles.
    pub fn intersection_area(&self, other: &Rect) -> f64 {
        let (dx, dy) = self.overlap_extents(other);
        if dx <= 0.0 || dy <= 0.0 {
            0.0
        } else {
            dx * dy
        }
    }

    /// Gap between the two rectangles (0 when touching or overlapping).
    pub fn separation(&self, other: &Rect) -> f64 {
        let dx = (self.x - other.max_x()).max(other.x - self.max_x()).max(0.0);
        let dy = (self.y - other.max_y()).max(other.y - self.max_y()).max(0.0);
        dx.hypot(dy)
    }

    /// Length of collinear edge contact between two rectangles.
    ///
    /// Edges count as collinear when they are within `tolerance` of each
    /// other. Overlapping rectangles share no wall.
    pub fn shared_wall_length(&self, other: &Rect, tolerance: f64) -> f64 {
        let vertical_contact = (self.max_x() - other.x).abs() <= tolerance
            || (other.max_x() - self.x).abs() <= tolerance;
        let horizontal_contact = (self.max_y() - other.y).abs() <= tolerance
            || (other.max_y() - self.y).abs() <= tolerance;

        let mut length: f64 = 0.0;
        if vertical_contact {
            length = length.max(interval_overlap(
                self.y,
                self.max_y(),
                other.y,
                other.max_y(),
            ));
        }
        if horizontal_contact {
            length = length.max(interval_overlap(
                self.x,
                self.max_x(),
                other.x,
                other.max_x(),
            ));
        }
        length.max(0.0)
    }

    /// Whether `other` lies fully inside this rectangle, allowing `tolerance`.
    pub fn contains_rect(&self, other: &Rect, tolerance: f64) -> bool {
        other.x >= self.x - tolerance
            && other.y >= self.y - tolerance
            && other.max_x() <= self.max_x() + tolerance
            && other.max_y() <= self.max_y() + tolerance
    }
}

fn interval_overlap(a0: f64, a1: f64, b0: f64, b1: f64) -> f64 {
    a1.min(b1) - a0.max(b0)
}

/// Axis-aligned bounding box of a point set, or `None` when empty.
pub fn aabb(points: &[Point]) -> Option<Rect> {
    let bb = LineString::new(to_coords(points)).bounding_rect()?;
    Some(Rect::new(bb.min().x, bb.min().y, bb.width(), bb.height()))
}

/// Unsigned polygon area.
pub fn area(points: &[Point]) -> f64 {
    if points.len() < 3 {
        return 0.0;
    }
    to_geo(points).unsigned_area()
}

/// Area centroid of a polygon.
///
/// Degenerate polygons (zero area) fall back to the vertex mean; an empty
/// slice yields the origin.
pub fn centroid(points: &[Point]) -> Point {
    if points.is_empty() {
        return Point::default();
    }
    if area(points) >= 1e-12 {
        if let Some(c) = to_geo(points).centroid() {
            return Point::new(c.x(), c.y());
        }
    }
    let n = points.len() as f64;
    let (sx, sy) = points
        .iter()
        .fold((0.0, 0.0), |(sx, sy), p| (sx + p.x, sy + p.y));
    Point::new(sx / n, sy / n)
}

/// Whether `point` lies strictly inside `polygon`.
pub fn point_in_polygon(point: Point, polygon: &[Point]) -> bool {
    polygon.len() >= 3 && to_geo(polygon).contains(&Coord::from(point))
}

/// Closest point on the polygon outline to `point`.
///
/// Returns `point` unchanged for an empty polygon.
pub fn closest_point_on_boundary(point: Point, polygon: &[Point]) -> Point {
    let mut best = point;
    let mut best_dist = f64::INFINITY;
    for i in 0..polygon.len() {
        let a = polygon[i];
        let b = polygon[(i + 1) % polygon.len()];
        let (abx, aby) = (b.x - a.x, b.y - a.y);
        let len_sq = abx * abx + aby * aby;
        let t = if len_sq < 1e-18 {
            0.0
        } else {
            (((point.x - a.x) * abx + (point.y - a.y) * aby) / len_sq).clamp(0.0, 1.0)
        };
        let candidate = Point::new(a.x + t * abx, a.y + t * aby);
        let d = candidate.distance(&point);
        if d < best_dist {
            best_dist = d;
            best = candidate;
        }
    }
    best
}

impl From<Point> for Coord<f64> {
    fn from(p: Point) -> Self {
        Coord { x: p.x, y: p.y }
    }
}

fn to_coords(points: &[Point]) -> Vec<Coord<f64>> {
    points.iter().map(|&p| Coord::from(p)).collect()
}

fn to_geo(points: &[Point]) -> Polygon<f64> {
    Polygon::new(LineString::new(to_coords(points)), vec![])
}

/// Exact intersection area of two simple polygons.
pub fn intersection_area(a: &[Point], b: &[Point]) -> f64 {
    if a.len() < 3 || b.len() < 3 {
        return 0.0;
    }
    match (aabb(a), aabb(b)) {
        (Some(ba), Some(bb)) if ba.intersection_area(&bb) > 0.0 => {}
        _ => return 0.0,
    }
    to_geo(a).intersection(&to_geo(b)).unsigned_area()
}

/// Whether `outer` contains `inner`, tolerating floating-point slack
/// (more than 99% of `inner`'s area lies inside `outer`).
pub fn contains(outer: &[Point], inner: &[Point]) -> bool {
    let inner_area = area(inner);
    if inner_area <= 0.0 {
        return inner.first().is_some_and(|p| point_in_polygon(*p, outer));
    }
    intersection_area(outer, inner) / inner_area > CONTAINMENT_RATIO
}

/// A validated boundary polygon with cached derived geometry.
#[derive(Debug, Clone)]
pub struct Boundary {
    points: Vec<Point>,
    polygon: Polygon<f64>,
    bounds: Rect,
    area: f64,
    centroid: Point,
    is_box: bool,
}

impl Boundary {
    /// Validates and caches a boundary polygon.
    pub fn new(points: Vec<Point>) -> Result<Self, FloorplanError> {
        if points.len() < 3 {
            return Err(FloorplanError::EmptyBoundary);
        }
        let bounds = aabb(&points).ok_or(FloorplanError::EmptyBoundary)?;
        let poly_area = area(&points);
        if !poly_area.is_finite() || poly_area <= 1e-9 {
            return Err(FloorplanError::DegenerateBoundary { area: poly_area });
        }
        let is_box = (poly_area - bounds.area()).abs() <= bounds.area() * 1e-9;
        Ok(Self {
            polygon: to_geo(&points),
            centroid: centroid(&points),
            points,
            bounds,
            area: poly_area,
            is_box,
        })
    }

    /// Convenience constructor for an axis-aligned rectangular boundary.
    pub fn rectangle(width: f64, height: f64) -> Result<Self, FloorplanError> {
        Self::new(Rect::new(0.0, 0.0, width, height).corners().to_vec())
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    pub fn aabb(&self) -> Rect {
        self.bounds
    }

    pub fn area(&self) -> f64 {
        self.area
    }

    pub fn centroid(&self) -> Point {
        self.centroid
    }

    pub fn contains_point(&self, point: Point) -> bool {
        self.polygon.contains(&Coord::from(point))
    }

    /// Area of `rect` lying inside the boundary polygon.
    pub fn inside_area(&self, rect: &Rect) -> f64 {
        if self.is_box {
            return rect.intersection_area(&self.bounds);
        }
        if rect.intersection_area(&self.bounds) <= 0.0 {
            return 0.0;
        }
        let room = to_geo(&rect.corners());
        self.polygon.intersection(&room).unsigned_area()
    }

    /// Area of `rect` lying outside the boundary polygon.
    pub fn outside_area(&self, rect: &Rect) -> f64 {
        (rect.area() - self.inside_area(rect)).max(0.0)
    }

    /// Uniformly samples a point inside the polygon by rejection from its
    /// bounding box, falling back to the centroid.
    pub fn random_interior_point<R: Rng>(&self, rng: &mut R) -> Point {
        for _ in 0..INTERIOR_SAMPLE_ATTEMPTS {
            let p = Point::new(
                uniform(rng, self.bounds.x, self.bounds.max_x()),
                uniform(rng, self.bounds.y, self.bounds.max_y()),
            );
            if self.contains_point(p) {
                return p;
            }
        }
        self.centroid
    }

    /// Clamps `rect` into the boundary's bounding box (axis clamp, not
    /// polygon-exact). Rooms larger than the box are pinned to its minimum.
    pub fn clamp_rect(&self, rect: &mut Rect) {
        let b = self.bounds;
        rect.x = rect.x.min(b.max_x() - rect.width).max(b.x);
        rect.y = rect.y.min(b.max_y() - rect.height).max(b.y);
    }
}
