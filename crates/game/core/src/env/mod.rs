//! Areas, tiles and the capabilities the movement core needs from its host.
//!
//! Areas expose tile walkability, exits and occupancy through [`Area`] and
//! the coordinate converter [`Geometry`]. Everything outside the core (audio,
//! loading other areas, world-level move observers) is reached through the
//! [`WorldHost`] trait, and every movement call receives its collaborators
//! explicitly in a [`MoveContext`] instead of through global state.
mod area;
mod error;
mod geometry;
mod tile;

use std::time::Duration;

pub use area::Area;
pub use error::{CoordError, OccupancyError, TransitionError};
pub use geometry::{AreaDimensions, Geometry, Layer};
pub use tile::{Exit, ExitKind, Tile, TileFlags, TileType};

use crate::config::EngineConfig;
use crate::sound::SoundId;
use crate::state::{EntityId, Facing, TileCoord, VirtCoord};

/// Request to move world focus to an exit's target.
#[derive(Clone, Debug, PartialEq)]
pub struct FocusRequest {
    pub entity: EntityId,
    pub area: String,
    pub coord: VirtCoord,
}

/// One committed tile-to-tile move, as reported to world-level observers.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MoveEvent {
    pub entity: EntityId,
    pub from: TileCoord,
    pub to: TileCoord,
    pub facing: Facing,
}

/// Capabilities the host world provides to moving entities.
pub trait WorldHost {
    /// Fire-and-forget sound playback.
    fn play_sound(&mut self, entity: EntityId, sound: &SoundId);

    /// Resolves `request.area` (loading it if needed) and schedules focus on
    /// `request.coord`. An error makes the mover roll back.
    fn request_focus(&mut self, request: FocusRequest) -> Result<(), TransitionError>;

    /// Generic pre-move trigger, fired after the source tile's exit trigger.
    fn pre_move(&mut self, _event: &MoveEvent) {}

    /// Generic post-move trigger, fired after the destination's enter trigger.
    fn post_move(&mut self, _event: &MoveEvent) {}
}

/// Everything a movement operation may touch, passed explicitly per call.
pub struct MoveContext<'a> {
    /// Simulation time, used to start animation phases.
    pub now: Duration,
    pub config: &'a EngineConfig,
    /// The area the entity currently lives in.
    pub area: &'a mut Area,
    pub host: &'a mut dyn WorldHost,
}

impl<'a> MoveContext<'a> {
    pub fn new(
        now: Duration,
        config: &'a EngineConfig,
        area: &'a mut Area,
        host: &'a mut dyn WorldHost,
    ) -> Self {
        Self {
            now,
            config,
            area,
            host,
        }
    }
}
