//! Area access errors.
//!
//! Coordinate configuration errors, occupancy accounting faults and area
//! transition failures.

use crate::error::{ErrorSeverity, GameError};
use crate::state::TileCoord;

/// Errors raised by the coordinate converter and area construction.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum CoordError {
    /// A layer was addressed by a name the area does not define.
    #[error("layer '{name}' not found")]
    LayerNotFound { name: String },

    /// Two layers share a name.
    #[error("layer '{name}' defined more than once")]
    DuplicateLayer { name: String },

    /// Two layers share a depth, which would make depth→layer ambiguous.
    #[error("layer depth {depth} defined more than once")]
    DuplicateDepth { depth: f64 },

    /// The grid or its tiles have a zero extent.
    #[error("area grid {width}x{height} with {tile_width}x{tile_height} px tiles is empty")]
    EmptyGrid {
        width: u32,
        height: u32,
        tile_width: u32,
        tile_height: u32,
    },

    /// The area defines no layers.
    #[error("area defines no layers")]
    NoLayers,

    /// A tile coordinate lies outside the area grid.
    #[error("tile {0} is out of area bounds")]
    OutOfBounds(TileCoord),
}

impl GameError for CoordError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Validation
    }

    fn error_code(&self) -> &'static str {
        use CoordError::*;
        match self {
            LayerNotFound { .. } => "COORD_LAYER_NOT_FOUND",
            DuplicateLayer { .. } => "COORD_DUPLICATE_LAYER",
            DuplicateDepth { .. } => "COORD_DUPLICATE_DEPTH",
            EmptyGrid { .. } => "COORD_EMPTY_GRID",
            NoLayers => "COORD_NO_LAYERS",
            OutOfBounds(_) => "COORD_OUT_OF_BOUNDS",
        }
    }
}

/// Occupancy accounting faults. Any of these means an enter/leave pair was
/// broken somewhere else.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum OccupancyError {
    #[error("leave() on tile {tile} whose occupancy is already zero")]
    Underflow { tile: TileCoord },

    #[error("occupancy change on tile {tile} outside the area")]
    NoSuchTile { tile: TileCoord },
}

impl GameError for OccupancyError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Internal
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::Underflow { .. } => "OCCUPANCY_UNDERFLOW",
            Self::NoSuchTile { .. } => "OCCUPANCY_NO_SUCH_TILE",
        }
    }
}

/// Failures while resolving the target of an exit.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum TransitionError {
    /// No area with this name is known to the host.
    #[error("area '{area}' not found")]
    AreaNotFound { area: String },

    /// The area exists but could not be loaded.
    #[error("area '{area}' failed to load: {reason}")]
    AreaLoad { area: String, reason: String },
}

impl TransitionError {
    pub fn area(&self) -> &str {
        match self {
            Self::AreaNotFound { area } | Self::AreaLoad { area, .. } => area,
        }
    }
}

impl GameError for TransitionError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Recoverable
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::AreaNotFound { .. } => "TRANSITION_AREA_NOT_FOUND",
            Self::AreaLoad { .. } => "TRANSITION_AREA_LOAD",
        }
    }
}
