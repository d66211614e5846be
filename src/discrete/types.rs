//! Discrete placement results.

use crate::evolve::RoomState;
use crate::geometry::{Point, Rect};
use crate::grid::Grid;
use crate::problem::RoomRequest;
use std::collections::BTreeMap;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A room placed on the grid, in cell units.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PlacedRoom {
    pub id: String,
    pub x: usize,
    pub y: usize,
    pub width: usize,
    pub height: usize,
    /// 1-based index matching the room's grid cells.
    pub room_index: u32,
}

impl PlacedRoom {
    /// Center in cell coordinates.
    pub fn center(&self) -> Point {
        Point::new(
            self.x as f64 + self.width as f64 / 2.0,
            self.y as f64 + self.height as f64 / 2.0,
        )
    }

    /// Area in cells.
    pub fn cell_count(&self) -> usize {
        self.width * self.height
    }

    /// World-space rectangle on `grid`.
    pub fn world_rect(&self, grid: &Grid) -> Rect {
        grid.block_rect(self.x, self.y, self.width, self.height)
    }

    /// Continuous starting state for this room: its world rectangle with
    /// the request's target area and aspect bound.
    pub fn to_room_state(&self, grid: &Grid, request: &RoomRequest) -> RoomState {
        RoomState::new(
            request.id.clone(),
            self.world_rect(grid),
            request.target_area,
            request.aspect,
        )
    }
}

/// Result of a discrete placement run.
#[derive(Debug, Clone)]
pub struct DiscreteResult {
    /// Best grid found, after dead-end pruning.
    pub grid: Grid,

    /// Placed rooms keyed by id. Rooms that never fit are absent.
    pub rooms: BTreeMap<String, PlacedRoom>,

    /// Global score of the returned layout (higher is better).
    pub score: f64,

    /// Local-search iterations executed.
    pub iterations: usize,

    /// Number of perturbed layouts that were accepted.
    pub accepted: usize,

    /// Best score after greedy seeding and after each iteration.
    pub score_history: Vec<f64>,
}

impl DiscreteResult {
    /// Number of placed rooms.
    pub fn placed_count(&self) -> usize {
        self.rooms.len()
    }

    /// Ids from `ids` that were not placed, in input order.
    pub fn unplaced<'a, S: AsRef<str>>(&self, ids: &'a [S]) -> Vec<&'a str> {
        ids.iter()
            .map(|id| id.as_ref())
            .filter(|id| !self.rooms.contains_key(*id))
            .collect()
    }
}
