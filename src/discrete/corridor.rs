//! Corridor synthesis and dead-end pruning.

use crate::grid::{Cell, Grid};
use crate::problem::CorridorRule;

/// Paints corridor cells next to a `w x h` room at `(x, y)`.
///
/// Only empty cells are painted; rooms, other corridors and exterior cells
/// are skipped silently. Returns the number of cells painted.
///
/// - `OneSide`: strip below the room.
/// - `TwoSides`: strip below plus strip on the right, meeting at the
///   bottom-right corner.
/// - `AllSides`: one-cell halo. Top and bottom rows include the corners,
///   left and right columns do not.
pub fn paint_corridor(
    grid: &mut Grid,
    rule: CorridorRule,
    x: usize,
    y: usize,
    w: usize,
    h: usize,
) -> usize {
    let (x, y, w, h) = (x as i64, y as i64, w as i64, h as i64);
    let mut cells: Vec<(i64, i64)> = Vec::new();

    match rule {
        CorridorRule::None => {}
        CorridorRule::OneSide => {
            cells.extend((x..x + w).map(|cx| (cx, y + h)));
        }
        CorridorRule::TwoSides => {
            cells.extend((x..x + w).map(|cx| (cx, y + h)));
            cells.extend((y..=y + h).map(|cy| (x + w, cy)));
        }
        CorridorRule::AllSides => {
            cells.extend((x - 1..=x + w).map(|cx| (cx, y - 1)));
            cells.extend((x - 1..=x + w).map(|cx| (cx, y + h)));
            cells.extend((y..y + h).map(|cy| (x - 1, cy)));
            cells.extend((y..y + h).map(|cy| (x + w, cy)));
        }
    }

    let mut painted = 0;
    for (cx, cy) in cells {
        if grid.get(cx, cy) == Some(Cell::Empty) {
            grid.set(cx, cy, Cell::Corridor);
            painted += 1;
        }
    }
    painted
}

/// Clears corridor cells with at most one occupied 4-neighbor, repeating
/// until a full pass changes nothing. Returns the number of cells cleared.
pub fn prune_dead_ends(grid: &mut Grid) -> usize {
    let mut cleared = 0;
    loop {
        let mut changed = false;
        for y in 0..grid.height() as i64 {
            for x in 0..grid.width() as i64 {
                if grid.get(x, y) == Some(Cell::Corridor) && grid.occupied_neighbors(x, y) <= 1 {
                    grid.set(x, y, Cell::Empty);
                    cleared += 1;
                    changed = true;
                }
            }
        }
        if !changed {
            break;
        }
    }
    tracing::trace!(cleared, "pruned dead-end corridors");
    cleared
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Point;

    fn grid_with_room(x: usize, y: usize, w: usize, h: usize) -> Grid {
        let mut grid = Grid::new(8, 8, Point::default(), 1.0);
        grid.fill_block(x, y, w, h, Cell::Room(1));
        grid
    }

    #[test]
    fn test_none_paints_nothing() {
        let mut grid = grid_with_room(2, 2, 2, 2);
        assert_eq!(paint_corridor(&mut grid, CorridorRule::None, 2, 2, 2, 2), 0);
        assert_eq!(grid.count(Cell::Corridor), 0);
    }

    #[test]
    fn test_one_side_strip_below() {
        let mut grid = grid_with_room(2, 2, 3, 2);
        assert_eq!(paint_corridor(&mut grid, CorridorRule::OneSide, 2, 2, 3, 2), 3);
        for x in 2..5 {
            assert_eq!(grid.get(x, 4), Some(Cell::Corridor));
        }
    }

    #[test]
    fn test_two_sides_l_shape() {
        let mut grid = grid_with_room(2, 2, 3, 2);
        // 3 below + 3 on the right (rows 2, 3 and the shared corner row 4)
        assert_eq!(paint_corridor(&mut grid, CorridorRule::TwoSides, 2, 2, 3, 2), 6);
        assert_eq!(grid.get(5, 4), Some(Cell::Corridor));
        assert_eq!(grid.get(5, 2), Some(Cell::Corridor));
        assert_eq!(grid.get(1, 2), Some(Cell::Empty));
    }

    #[test]
    fn test_all_sides_halo_counts_corners_once() {
        let mut grid = grid_with_room(2, 2, 3, 2);
        // (3 + 2) * 2 rows + 2 * 2 columns
        assert_eq!(paint_corridor(&mut grid, CorridorRule::AllSides, 2, 2, 3, 2), 14);
        assert_eq!(grid.get(1, 1), Some(Cell::Corridor));
        assert_eq!(grid.get(5, 4), Some(Cell::Corridor));
    }

    #[test]
    fn test_corridor_never_overwrites() {
        let mut grid = grid_with_room(2, 2, 2, 2);
        grid.fill_block(2, 4, 2, 1, Cell::Room(2));
        grid.set(0, 0, Cell::OutOfBounds);
        let painted = paint_corridor(&mut grid, CorridorRule::OneSide, 2, 2, 2, 2);
        assert_eq!(painted, 0);
        assert_eq!(grid.count(Cell::Room(2)), 2);
    }

    #[test]
    fn test_all_sides_clipped_at_edge() {
        let mut grid = grid_with_room(0, 0, 2, 2);
        // only the bottom row (x = -1..=2 clipped to 0..=2) and the right column survive
        assert_eq!(paint_corridor(&mut grid, CorridorRule::AllSides, 0, 0, 2, 2), 5);
    }

    #[test]
    fn test_prune_removes_dangling_strip() {
        let mut grid = Grid::new(6, 3, Point::default(), 1.0);
        for x in 0..6 {
            grid.set(x, 1, Cell::Corridor);
        }
        let cleared = prune_dead_ends(&mut grid);
        assert_eq!(cleared, 6);
        assert_eq!(grid.count(Cell::Corridor), 0);
    }

    #[test]
    fn test_prune_keeps_connecting_corridor() {
        let mut grid = Grid::new(5, 1, Point::default(), 1.0);
        grid.set(0, 0, Cell::Room(1));
        grid.set(1, 0, Cell::Corridor);
        grid.set(2, 0, Cell::Corridor);
        grid.set(3, 0, Cell::Corridor);
        grid.set(4, 0, Cell::Room(2));
        assert_eq!(prune_dead_ends(&mut grid), 0);
        assert_eq!(grid.count(Cell::Corridor), 3);
    }

    #[test]
    fn test_pruned_corridors_have_two_neighbors() {
        let mut grid = grid_with_room(2, 2, 3, 2);
        paint_corridor(&mut grid, CorridorRule::AllSides, 2, 2, 3, 2);
        prune_dead_ends(&mut grid);
        for y in 0..8 {
            for x in 0..8 {
                if grid.get(x, y) == Some(Cell::Corridor) {
                    assert!(grid.occupied_neighbors(x, y) >= 2);
                }
            }
        }
    }
}
