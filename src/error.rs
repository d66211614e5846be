//! Input validation errors.
//!
//! The optimization algorithms themselves never fail: rooms that cannot be
//! placed are omitted and collision resolution falls back to translation.
//! Errors are reported only when a problem or solver is constructed from
//! malformed input.

/// Error returned when a floor plan problem or solver cannot be built.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum FloorplanError {
    #[error("EmptyBoundary: boundary polygon needs at least 3 vertices")]
    EmptyBoundary,

    #[error("DegenerateBoundary: boundary polygon has no usable area. area={area}")]
    DegenerateBoundary { area: f64 },

    #[error("NoRooms: at least one room is required")]
    NoRooms,

    #[error("DuplicateRoom: room id is used more than once. id={id}")]
    DuplicateRoom { id: String },

    #[error("InvalidTargetArea: target area must be positive and finite. id={id}, area={area}")]
    InvalidTargetArea { id: String, area: f64 },

    #[error("InvalidAspectBound: aspect bound must satisfy 0 < min <= max. id={id}, min={min}, max={max}")]
    InvalidAspectBound { id: String, min: f64, max: f64 },

    #[error("UnknownRoom: adjacency references a room that does not exist. id={id}")]
    UnknownRoom { id: String },

    #[error("InvalidConfig: {0}")]
    InvalidConfig(String),
}

impl FloorplanError {
    pub(crate) fn duplicate_room(id: &str) -> Self {
        Self::DuplicateRoom { id: id.to_string() }
    }

    pub(crate) fn unknown_room(id: &str) -> Self {
        Self::UnknownRoom { id: id.to_string() }
    }
}
