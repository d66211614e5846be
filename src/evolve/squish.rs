//! Collision resolution ("squish").
//!
//! Each overlapping pair is pushed apart along the axis with the smaller
//! overlap extent. Both rooms first try to give up `overlap / 2 + margin`
//! of their extent on that axis while growing the other axis to keep their
//! target area; if either would leave its aspect-ratio bound, the pair is
//! translated apart instead with dimensions untouched.
//!
//! Resolution is local and order-dependent: separating one pair can create
//! overlap with a pair handled earlier in the same pass. Several passes
//! reduce the residue; fitness has the final word on layout quality.

use super::types::{RoomState, MIN_DIMENSION};
use crate::geometry::{Boundary, Rect};

/// Overlaps below this area are ignored.
pub const MIN_OVERLAP_AREA: f64 = 0.01;

/// Axis along which a pair is separated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
}

/// How a pair was resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    /// Both rooms were reshaped, preserving their target areas.
    Reshaped,
    /// Both rooms were moved apart without changing size.
    Translated,
}

/// Counts of resolved pairs over one [`apply_squish_collisions`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SquishReport {
    pub reshaped: usize,
    pub translated: usize,
    pub passes: usize,
}

impl SquishReport {
    pub fn resolved(&self) -> usize {
        self.reshaped + self.translated
    }
}

fn extent(rect: &Rect, axis: Axis) -> f64 {
    match axis {
        Axis::X => rect.width,
        Axis::Y => rect.height,
    }
}

fn center_on(rect: &Rect, axis: Axis) -> f64 {
    let c = rect.center();
    match axis {
        Axis::X => c.x,
        Axis::Y => c.y,
    }
}

/// Shrinks `room` by `shrink` along `axis`, keeping the edge on side
/// `keep_min` fixed and growing the other axis to hit the target area.
/// Returns `None` if the result would leave the aspect bound.
fn reshaped(room: &RoomState, axis: Axis, shrink: f64, keep_min: bool) -> Option<Rect> {
    let rect = room.rect();
    let along = extent(&rect, axis) - shrink;
    if along < MIN_DIMENSION {
        return None;
    }
    let across = room.target_area / along;
    let (width, height) = match axis {
        Axis::X => (along, across),
        Axis::Y => (across, along),
    };
    if !room.aspect.contains(width / height) {
        return None;
    }

    let center = rect.center();
    let mut out = Rect::from_center(center, width, height);
    match (axis, keep_min) {
        (Axis::X, true) => out.x = rect.x,
        (Axis::X, false) => out.x = rect.max_x() - width,
        (Axis::Y, true) => out.y = rect.y,
        (Axis::Y, false) => out.y = rect.max_y() - height,
    }
    Some(out)
}

fn translated(room: &RoomState, axis: Axis, delta: f64) -> Rect {
    let mut rect = room.rect();
    match axis {
        Axis::X => rect.x += delta,
        Axis::Y => rect.y += delta,
    }
    rect
}

/// Resolves one pair. Returns `None` when the pair does not overlap by at
/// least [`MIN_OVERLAP_AREA`].
pub fn resolve_pair(a: &mut RoomState, b: &mut RoomState, margin: f64) -> Option<Resolution> {
    let (ra, rb) = (a.rect(), b.rect());
    let (ox, oy) = ra.overlap_extents(&rb);
    if ox <= 0.0 || oy <= 0.0 || ra.intersection_area(&rb) < MIN_OVERLAP_AREA {
        return None;
    }

    let (axis, overlap) = if ox <= oy { (Axis::X, ox) } else { (Axis::Y, oy) };
    let shift = overlap / 2.0 + margin;

    // The room with the lower center moves toward -axis; ties favor `a`.
    let a_is_low = center_on(&ra, axis) <= center_on(&rb, axis);
    let (low, high) = if a_is_low { (a, b) } else { (b, a) };

    if let (Some(low_rect), Some(high_rect)) = (
        reshaped(low, axis, shift, true),
        reshaped(high, axis, shift, false),
    ) {
        low.set_rect(low_rect);
        high.set_rect(high_rect);
        return Some(Resolution::Reshaped);
    }

    let low_rect = translated(low, axis, -shift);
    let high_rect = translated(high, axis, shift);
    low.set_rect(low_rect);
    high.set_rect(high_rect);
    Some(Resolution::Translated)
}

/// Resolves pairwise overlaps for up to `passes` passes, then clamps every
/// room into the boundary's bounding box.
///
/// Stops early once a pass finds nothing to resolve.
pub fn apply_squish_collisions(
    rooms: &mut [RoomState],
    boundary: &Boundary,
    passes: usize,
    margin: f64,
) -> SquishReport {
    let mut report = SquishReport::default();
    for _ in 0..passes {
        report.passes += 1;
        let mut resolved_any = false;
        for i in 0..rooms.len() {
            for j in (i + 1)..rooms.len() {
                let (head, tail) = rooms.split_at_mut(j);
                match resolve_pair(&mut head[i], &mut tail[0], margin) {
                    Some(Resolution::Reshaped) => report.reshaped += 1,
                    Some(Resolution::Translated) => report.translated += 1,
                    None => continue,
                }
                resolved_any = true;
            }
        }
        if !resolved_any {
            break;
        }
    }

    for room in rooms.iter_mut() {
        let mut rect = room.rect();
        boundary.clamp_rect(&mut rect);
        room.set_rect(rect);
    }
    report
}
