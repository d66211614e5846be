//! Rasterized placement grid.
//!
//! A row-major buffer of [`Cell`]s covering the boundary's bounding box at
//! a fixed resolution (length units per cell). Cells whose centers fall
//! outside the boundary polygon are marked [`Cell::OutOfBounds`].

use crate::geometry::{Boundary, Point, Rect};

/// Content of one grid cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Cell {
    Empty,
    Corridor,
    OutOfBounds,
    /// 1-based room index.
    Room(u32),
}

impl Cell {
    pub const EMPTY_TAG: i32 = 0;
    pub const CORRIDOR_TAG: i32 = -1;
    pub const OUT_OF_BOUNDS_TAG: i32 = -2;

    /// Integer tag: 0 empty, -1 corridor, -2 out of bounds, room index >= 1.
    pub fn tag(self) -> i32 {
        match self {
            Cell::Empty => Self::EMPTY_TAG,
            Cell::Corridor => Self::CORRIDOR_TAG,
            Cell::OutOfBounds => Self::OUT_OF_BOUNDS_TAG,
            Cell::Room(index) => index as i32,
        }
    }

    /// Inverse of [`tag`](Self::tag). Unknown negative tags map to out-of-bounds.
    pub fn from_tag(tag: i32) -> Self {
        match tag {
            Self::EMPTY_TAG => Cell::Empty,
            Self::CORRIDOR_TAG => Cell::Corridor,
            t if t > 0 => Cell::Room(t as u32),
            _ => Cell::OutOfBounds,
        }
    }

    /// Rooms and corridors count as occupied; empty and exterior cells do not.
    pub fn is_occupied(self) -> bool {
        matches!(self, Cell::Corridor | Cell::Room(_))
    }
}

/// 2D cell buffer over the boundary's bounding box.
#[derive(Debug, Clone, PartialEq)]
pub struct Grid {
    width: usize,
    height: usize,
    origin: Point,
    resolution: f64,
    cells: Vec<Cell>,
}

impl Grid {
    /// Creates an all-empty grid.
    pub fn new(width: usize, height: usize, origin: Point, resolution: f64) -> Self {
        Self {
            width,
            height,
            origin,
            resolution,
            cells: vec![Cell::Empty; width * height],
        }
    }

    /// Creates a grid covering `boundary` and rasterizes it.
    ///
    /// Dimensions are `ceil(extent / resolution)`, at least one cell.
    pub fn for_boundary(boundary: &Boundary, resolution: f64) -> Self {
        let bounds = boundary.aabb();
        let width = ((bounds.width / resolution).ceil() as usize).max(1);
        let height = ((bounds.height / resolution).ceil() as usize).max(1);
        let mut grid = Self::new(width, height, Point::new(bounds.x, bounds.y), resolution);
        grid.rasterize(boundary);
        grid
    }

    /// Marks every cell whose center lies outside `boundary` as out of bounds.
    pub fn rasterize(&mut self, boundary: &Boundary) {
        for y in 0..self.height {
            for x in 0..self.width {
                if !boundary.contains_point(self.cell_center(x, y)) {
                    self.cells[y * self.width + x] = Cell::OutOfBounds;
                }
            }
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn origin(&self) -> Point {
        self.origin
    }

    pub fn resolution(&self) -> f64 {
        self.resolution
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Cell at `(x, y)`, or `None` outside the grid.
    pub fn get(&self, x: i64, y: i64) -> Option<Cell> {
        if x < 0 || y < 0 || x as usize >= self.width || y as usize >= self.height {
            return None;
        }
        Some(self.cells[y as usize * self.width + x as usize])
    }

    /// Sets a cell; writes outside the grid are ignored.
    pub fn set(&mut self, x: i64, y: i64, cell: Cell) {
        if x < 0 || y < 0 || x as usize >= self.width || y as usize >= self.height {
            return;
        }
        self.cells[y as usize * self.width + x as usize] = cell;
    }

    /// Whether every cell of the `w x h` block at `(x, y)` is empty.
    pub fn is_block_empty(&self, x: usize, y: usize, w: usize, h: usize) -> bool {
        if x + w > self.width || y + h > self.height {
            return false;
        }
        (y..y + h).all(|row| {
            self.cells[row * self.width + x..row * self.width + x + w]
                .iter()
                .all(|&c| c == Cell::Empty)
        })
    }

    /// Fills the `w x h` block at `(x, y)`, clipped to the grid.
    pub fn fill_block(&mut self, x: usize, y: usize, w: usize, h: usize, cell: Cell) {
        for row in y..(y + h).min(self.height) {
            for col in x..(x + w).min(self.width) {
                self.cells[row * self.width + col] = cell;
            }
        }
    }

    /// Replaces every occurrence of `from` with `to`.
    pub fn replace_all(&mut self, from: Cell, to: Cell) {
        for c in self.cells.iter_mut().filter(|c| **c == from) {
            *c = to;
        }
    }

    /// Number of occupied 4-neighbors of `(x, y)`.
    pub fn occupied_neighbors(&self, x: i64, y: i64) -> usize {
        const OFFSETS: [(i64, i64); 4] = [(0, -1), (0, 1), (-1, 0), (1, 0)];
        OFFSETS
            .iter()
            .filter(|&&(dx, dy)| self.get(x + dx, y + dy).is_some_and(Cell::is_occupied))
            .count()
    }

    /// Number of cells equal to `cell`.
    pub fn count(&self, cell: Cell) -> usize {
        self.cells.iter().filter(|&&c| c == cell).count()
    }

    /// World-space center of cell `(x, y)`.
    pub fn cell_center(&self, x: usize, y: usize) -> Point {
        Point::new(
            self.origin.x + (x as f64 + 0.5) * self.resolution,
            self.origin.y + (y as f64 + 0.5) * self.resolution,
        )
    }

    /// World-space rectangle of a `w x h` block at `(x, y)`.
    pub fn block_rect(&self, x: usize, y: usize, w: usize, h: usize) -> Rect {
        Rect::new(
            self.origin.x + x as f64 * self.resolution,
            self.origin.y + y as f64 * self.resolution,
            w as f64 * self.resolution,
            h as f64 * self.resolution,
        )
    }

    /// Row-major integer tag view of the grid.
    pub fn to_tags(&self) -> Vec<i32> {
        self.cells.iter().map(|c| c.tag()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tag_round_trip() {
        for cell in [Cell::Empty, Cell::Corridor, Cell::OutOfBounds, Cell::Room(7)] {
            assert_eq!(Cell::from_tag(cell.tag()), cell);
        }
        assert_eq!(Cell::Room(3).tag(), 3);
        assert_eq!(Cell::Corridor.tag(), -1);
        assert_eq!(Cell::OutOfBounds.tag(), -2);
    }

    #[test]
    fn test_for_boundary_dimensions_use_ceiling() {
        let b = Boundary::rectangle(10.5, 4.0).unwrap();
        let grid = Grid::for_boundary(&b, 2.0);
        assert_eq!((grid.width(), grid.height()), (6, 2));
    }

    #[test]
    fn test_rasterize_marks_exterior() {
        let l_shape = Boundary::new(vec![
            Point::new(0.0, 0.0),
            Point::new(4.0, 0.0),
            Point::new(4.0, 2.0),
            Point::new(2.0, 2.0),
            Point::new(2.0, 4.0),
            Point::new(0.0, 4.0),
        ])
        .unwrap();
        let grid = Grid::for_boundary(&l_shape, 1.0);
        assert_eq!(grid.count(Cell::OutOfBounds), 4);
        assert_eq!(grid.get(3, 3), Some(Cell::OutOfBounds));
        assert_eq!(grid.get(0, 0), Some(Cell::Empty));
    }

    #[test]
    fn test_block_queries() {
        let mut grid = Grid::new(5, 5, Point::default(), 1.0);
        assert!(grid.is_block_empty(0, 0, 5, 5));
        assert!(!grid.is_block_empty(3, 3, 3, 1), "block past the edge");
        grid.fill_block(1, 1, 2, 2, Cell::Room(1));
        assert!(!grid.is_block_empty(0, 0, 2, 2));
        assert!(grid.is_block_empty(3, 0, 2, 5));
        assert_eq!(grid.count(Cell::Room(1)), 4);
        grid.replace_all(Cell::Room(1), Cell::Empty);
        assert_eq!(grid.count(Cell::Empty), 25);
    }

    #[test]
    fn test_occupied_neighbors() {
        let mut grid = Grid::new(3, 3, Point::default(), 1.0);
        grid.set(1, 0, Cell::Room(1));
        grid.set(0, 1, Cell::Corridor);
        grid.set(2, 1, Cell::OutOfBounds);
        assert_eq!(grid.occupied_neighbors(1, 1), 2);
        assert_eq!(grid.occupied_neighbors(0, 0), 2);
    }

    #[test]
    fn test_out_of_range_access() {
        let mut grid = Grid::new(2, 2, Point::default(), 1.0);
        assert_eq!(grid.get(-1, 0), None);
        assert_eq!(grid.get(2, 0), None);
        grid.set(5, 5, Cell::Corridor);
        assert_eq!(grid.count(Cell::Corridor), 0);
    }

    #[test]
    fn test_clone_is_independent() {
        let grid = Grid::new(2, 2, Point::default(), 1.0);
        let mut copy = grid.clone();
        copy.set(0, 0, Cell::Room(1));
        assert_eq!(grid.get(0, 0), Some(Cell::Empty));
        assert_eq!(copy.to_tags(), vec![1, 0, 0, 0]);
    }
}
