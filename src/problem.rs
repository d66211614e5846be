//! Problem inputs: room requests, adjacency requirements, boundary.
//!
//! [`FloorplanProblem`] validates the raw inputs once and resolves
//! adjacency ids to room indices so the solvers work on plain indices.

use crate::error::FloorplanError;
use crate::geometry::{Boundary, Point};
use crate::random::uniform;
use rand::Rng;
use std::collections::{HashMap, HashSet};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Allowed range of `width / height` for a room.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct AspectBound {
    pub min: f64,
    pub max: f64,
}

impl AspectBound {
    /// Explicit `[min, max]` ratio range.
    pub fn range(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// Symmetric range `[1/ratio, ratio]` around square.
    pub fn target(ratio: f64) -> Self {
        let r = if ratio < 1.0 { 1.0 / ratio } else { ratio };
        Self { min: 1.0 / r, max: r }
    }

    pub fn is_valid(&self) -> bool {
        self.min.is_finite() && self.max.is_finite() && self.min > 0.0 && self.min <= self.max
    }

    /// Whether `ratio` lies in the bound, with a small relative slack.
    pub fn contains(&self, ratio: f64) -> bool {
        const SLACK: f64 = 1e-9;
        ratio >= self.min * (1.0 - SLACK) && ratio <= self.max * (1.0 + SLACK)
    }

    /// Draws a ratio uniformly from the bound.
    pub fn sample<R: Rng>(&self, rng: &mut R) -> f64 {
        uniform(rng, self.min, self.max)
    }

    /// Geometric midpoint of the bound.
    pub fn midpoint(&self) -> f64 {
        (self.min * self.max).sqrt()
    }
}

impl Default for AspectBound {
    fn default() -> Self {
        Self::target(2.0)
    }
}

/// Width and height for a rectangle of `area` with `width / height == ratio`.
pub fn dimensions_for(area: f64, ratio: f64) -> (f64, f64) {
    let width = (area * ratio).sqrt();
    (width, area / width)
}

/// Which sides of a placed room receive generated corridor cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum CorridorRule {
    #[default]
    None,
    /// One-cell strip along the bottom edge.
    OneSide,
    /// Bottom strip plus right strip (L-shape).
    TwoSides,
    /// One-cell halo on all four sides.
    AllSides,
}

/// A room to be placed.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RoomRequest {
    pub id: String,
    pub target_area: f64,
    pub aspect: AspectBound,
    pub corridor_rule: CorridorRule,
    pub is_hall: bool,
}

impl RoomRequest {
    /// Creates a request with the default aspect bound `[0.5, 2.0]`.
    pub fn new(id: impl Into<String>, target_area: f64) -> Self {
        Self {
            id: id.into(),
            target_area,
            aspect: AspectBound::default(),
            corridor_rule: CorridorRule::None,
            is_hall: false,
        }
    }

    pub fn with_aspect_range(mut self, min: f64, max: f64) -> Self {
        self.aspect = AspectBound::range(min, max);
        self
    }

    pub fn with_target_ratio(mut self, ratio: f64) -> Self {
        self.aspect = AspectBound::target(ratio);
        self
    }

    pub fn with_corridor(mut self, rule: CorridorRule) -> Self {
        self.corridor_rule = rule;
        self
    }

    pub fn as_hall(mut self) -> Self {
        self.is_hall = true;
        self
    }

    fn validate(&self) -> Result<(), FloorplanError> {
        if !self.target_area.is_finite() || self.target_area <= 0.0 {
            return Err(FloorplanError::InvalidTargetArea {
                id: self.id.clone(),
                area: self.target_area,
            });
        }
        if !self.aspect.is_valid() {
            return Err(FloorplanError::InvalidAspectBound {
                id: self.id.clone(),
                min: self.aspect.min,
                max: self.aspect.max,
            });
        }
        Ok(())
    }
}

/// Desired closeness between two rooms. Repeated pairs add up.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Adjacency {
    pub a: String,
    pub b: String,
    pub weight: f64,
}

impl Adjacency {
    pub fn new(a: impl Into<String>, b: impl Into<String>) -> Self {
        Self {
            a: a.into(),
            b: b.into(),
            weight: 1.0,
        }
    }

    pub fn with_weight(mut self, weight: f64) -> Self {
        self.weight = weight;
        self
    }
}

/// An adjacency edge with ids resolved to room indices.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Edge {
    pub a: usize,
    pub b: usize,
    pub weight: f64,
}

/// Resolves adjacency ids against `ids` (room order).
///
/// Unknown ids are rejected. Self-loops carry no information and are dropped.
pub fn resolve_edges<S: AsRef<str>>(
    ids: &[S],
    adjacencies: &[Adjacency],
) -> Result<Vec<Edge>, FloorplanError> {
    let index: HashMap<&str, usize> = ids
        .iter()
        .enumerate()
        .map(|(i, id)| (id.as_ref(), i))
        .collect();

    let mut edges = Vec::with_capacity(adjacencies.len());
    for adj in adjacencies {
        let a = *index
            .get(adj.a.as_str())
            .ok_or_else(|| FloorplanError::unknown_room(&adj.a))?;
        let b = *index
            .get(adj.b.as_str())
            .ok_or_else(|| FloorplanError::unknown_room(&adj.b))?;
        if !adj.weight.is_finite() || adj.weight <= 0.0 {
            return Err(FloorplanError::InvalidConfig(format!(
                "adjacency weight must be positive, got {} for ({}, {})",
                adj.weight, adj.a, adj.b
            )));
        }
        if a != b {
            edges.push(Edge {
                a,
                b,
                weight: adj.weight,
            });
        }
    }
    Ok(edges)
}

/// Checks that ids are unique.
pub(crate) fn check_unique_ids<S: AsRef<str>>(ids: &[S]) -> Result<(), FloorplanError> {
    let mut seen = HashSet::with_capacity(ids.len());
    for id in ids {
        if !seen.insert(id.as_ref()) {
            return Err(FloorplanError::duplicate_room(id.as_ref()));
        }
    }
    Ok(())
}

/// A validated floor plan problem.
#[derive(Debug, Clone)]
pub struct FloorplanProblem {
    boundary: Boundary,
    rooms: Vec<RoomRequest>,
    adjacencies: Vec<Adjacency>,
    edges: Vec<Edge>,
}

impl FloorplanProblem {
    /// Validates inputs and resolves adjacency ids.
    pub fn new(
        boundary: Vec<Point>,
        rooms: Vec<RoomRequest>,
        adjacencies: Vec<Adjacency>,
    ) -> Result<Self, FloorplanError> {
        let boundary = Boundary::new(boundary)?;
        if rooms.is_empty() {
            return Err(FloorplanError::NoRooms);
        }
        for room in &rooms {
            room.validate()?;
        }
        let ids: Vec<&str> = rooms.iter().map(|r| r.id.as_str()).collect();
        check_unique_ids(&ids)?;
        let edges = resolve_edges(&ids, &adjacencies)?;

        Ok(Self {
            boundary,
            rooms,
            adjacencies,
            edges,
        })
    }

    pub fn boundary(&self) -> &Boundary {
        &self.boundary
    }

    pub fn rooms(&self) -> &[RoomRequest] {
        &self.rooms
    }

    pub fn adjacencies(&self) -> &[Adjacency] {
        &self.adjacencies
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    /// Number of adjacency edges touching room `index`.
    pub fn degree(&self, index: usize) -> usize {
        self.edges
            .iter()
            .filter(|e| e.a == index || e.b == index)
            .count()
    }

    /// Sum of target areas over all rooms.
    pub fn total_target_area(&self) -> f64 {
        self.rooms.iter().map(|r| r.target_area).sum()
    }
}
