//! Entity movement and tile transitions for tile-based 2D worlds.
//!
//! `tile-core` decides whether an actor may step onto a tile, moves it there
//! over time, keeps per-tile occupancy counts consistent, picks the animation
//! phase for its facing and motion, and drives exit transitions between
//! areas, rolling a move back when the target area cannot be resolved.
//!
//! The crate is single-threaded and performs no I/O. Loading areas, playing
//! sounds and switching the focused area are host concerns reached through
//! [`env::WorldHost`]; [`entity::Entity`] receives them per call in a
//! [`env::MoveContext`].
pub mod config;
pub mod entity;
pub mod env;
pub mod error;
pub mod script;
pub mod sound;
pub mod state;

#[cfg(test)]
mod test_support;

pub use config::{ConfigError, EngineConfig, MoveMode};
pub use entity::{
    Entity, FrameId, HeldDirections, InputPolicy, MoveError, Npc, Phase, PhaseTable, Player,
    Repeat, SingleStep,
};
pub use env::{
    Area, AreaDimensions, CoordError, Exit, ExitKind, FocusRequest, Geometry, Layer, MoveContext,
    MoveEvent, OccupancyError, Tile, TileFlags, TileType, TransitionError, WorldHost,
};
pub use error::{ErrorContext, ErrorSeverity, GameError};
pub use script::{Script, ScriptError, ScriptRef, Scripts, Trigger, TriggerContext};
pub use sound::{SoundId, SoundTable};
pub use state::{EntityId, Facing, PixelCoord, TileCoord, TileDimensions, VirtCoord};
