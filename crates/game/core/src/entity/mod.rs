//! The movement state machine.
//!
//! An [`Entity`] owns its position, facing, animation phase and at most one
//! in-flight tile-to-tile move. It is parameterised by an [`InputPolicy`]:
//! [`Npc`] actors take single steps, while a [`Player`] keeps a queue of held
//! directions and re-arms movement on arrival.
//!
//! Occupancy is tracked through a single *claim*: the tile whose counter
//! includes this entity. Every path that claims a tile releases the previous
//! claim in the same call, so enter/leave stay paired through commits,
//! rollbacks, teleports and destruction.
mod input;
mod movement;
mod phase;
mod transition;

use std::time::Duration;

pub use input::{HeldDirections, InputPolicy, SingleStep};
pub use phase::{FrameId, Phase, PhaseTable, Repeat};

use crate::config::{self, ConfigError, EngineConfig};
use crate::env::{Area, OccupancyError, TileFlags};
use crate::error::{ErrorContext, ErrorSeverity, GameError};
use crate::script::{ScriptRef, Scripts, Trigger};
use crate::sound::SoundTable;
use crate::state::{EntityId, Facing, PixelCoord, TileCoord, VirtCoord};
use phase::ActivePhase;

/// Non-player actor.
pub type Npc = Entity<SingleStep>;

/// Player-controlled actor with held-key movement.
pub type Player = Entity<HeldDirections>;

/// Errors returned by direct placement calls.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum MoveError {
    #[error("entity {entity} is in the middle of a move")]
    InFlight { entity: EntityId },

    #[error("entity {entity} still claims a tile in area '{area}'")]
    ForeignClaim {
        entity: EntityId,
        area: String,
        context: ErrorContext,
    },
}

impl GameError for MoveError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::InFlight { .. } => ErrorSeverity::Recoverable,
            Self::ForeignClaim { .. } => ErrorSeverity::Internal,
        }
    }

    fn context(&self) -> Option<&ErrorContext> {
        match self {
            Self::InFlight { .. } => None,
            Self::ForeignClaim { context, .. } => Some(context),
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::InFlight { .. } => "MOVE_IN_FLIGHT",
            Self::ForeignClaim { .. } => "MOVE_FOREIGN_CLAIM",
        }
    }
}

/// Tile whose occupancy counter includes this entity.
#[derive(Clone, Debug, PartialEq, Eq)]
struct Claim {
    area: String,
    tile: TileCoord,
}

/// Ephemeral record of one committed move. Lives only while the entity is
/// moving and is consumed exactly once by arrival processing.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct MoveTransaction {
    pub(crate) from: PixelCoord,
    pub(crate) from_tile: TileCoord,
    pub(crate) from_claim: Option<TileCoord>,
    pub(crate) from_facing: Facing,
    pub(crate) to: PixelCoord,
    pub(crate) to_tile: TileCoord,
    pub(crate) facing: Facing,
    pub(crate) traveled: f64,
}

#[derive(Debug)]
pub struct Entity<P = SingleStep> {
    id: EntityId,
    position: PixelCoord,
    facing: Facing,
    motion: Option<MoveTransaction>,
    claim: Option<Claim>,
    exemptions: TileFlags,
    speed_multiplier: f64,
    phases: PhaseTable,
    phase: ActivePhase,
    sounds: SoundTable,
    scripts: Scripts,
    redraw: bool,
    policy: P,
}

impl<P: InputPolicy> Entity<P> {
    pub fn new(id: EntityId, policy: P) -> Self {
        Self {
            id,
            position: PixelCoord::default(),
            facing: Facing::default(),
            motion: None,
            claim: None,
            exemptions: TileFlags::empty(),
            speed_multiplier: 1.0,
            phases: PhaseTable::new(),
            phase: ActivePhase {
                name: EngineConfig::STANCE_PHASE.to_owned(),
                started_at: Duration::ZERO,
            },
            sounds: SoundTable::new(),
            scripts: Scripts::new(),
            redraw: true,
            policy,
        }
    }

    pub fn with_phases(mut self, phases: PhaseTable) -> Self {
        self.phases = phases;
        let idle = self.facing.name().to_owned();
        self.set_phase(&idle, self.phase.started_at);
        self
    }

    pub fn with_sounds(mut self, sounds: SoundTable) -> Self {
        self.sounds = sounds;
        self
    }

    /// # Errors
    ///
    /// Rejects a multiplier that is not positive and finite.
    pub fn with_speed_multiplier(mut self, multiplier: f64) -> Result<Self, ConfigError> {
        self.set_speed_multiplier(multiplier)?;
        Ok(self)
    }

    pub fn with_exemptions(mut self, exemptions: TileFlags) -> Self {
        self.exemptions = exemptions;
        self
    }

    // ===== queries =====

    pub fn id(&self) -> EntityId {
        self.id
    }

    pub fn policy(&self) -> &P {
        &self.policy
    }

    pub fn facing(&self) -> Facing {
        self.facing
    }

    /// True while a committed move is in flight.
    pub fn is_moving(&self) -> bool {
        self.motion.is_some()
    }

    /// Continuous position: pixels in x/y, virtual depth in z.
    pub fn pixel_coords(&self) -> PixelCoord {
        self.position
    }

    /// Physical tile containing the current position.
    pub fn tile_coords(&self, area: &Area) -> TileCoord {
        area.geometry().pixel_to_phys(self.position)
    }

    /// Tile counted as occupied by this entity, if it is inside an area.
    pub fn occupied_tile(&self) -> Option<TileCoord> {
        self.claim.as_ref().map(|claim| claim.tile)
    }

    /// Area holding this entity's occupancy claim.
    pub fn claimed_area(&self) -> Option<&str> {
        self.claim.as_ref().map(|claim| claim.area.as_str())
    }

    pub fn speed_multiplier(&self) -> f64 {
        self.speed_multiplier
    }

    /// # Errors
    ///
    /// Rejects a multiplier that is not positive and finite; the current one
    /// is kept.
    pub fn set_speed_multiplier(&mut self, multiplier: f64) -> Result<(), ConfigError> {
        self.speed_multiplier = config::positive("speed_multiplier", multiplier)?;
        Ok(())
    }

    /// Walkability flags this entity may ignore.
    pub fn exemptions(&self) -> TileFlags {
        self.exemptions
    }

    /// Scoped read/modify access to the exemption mask.
    pub fn with_exemptions_mut<R>(&mut self, f: impl FnOnce(&mut TileFlags) -> R) -> R {
        let result = f(&mut self.exemptions);
        tracing::debug!(entity = %self.id, exemptions = ?self.exemptions, "exemptions updated");
        result
    }

    pub fn needs_redraw(&self) -> bool {
        self.redraw
    }

    pub fn mark_drawn(&mut self) {
        self.redraw = false;
    }

    pub fn phases(&self) -> &PhaseTable {
        &self.phases
    }

    pub fn sounds(&self) -> &SoundTable {
        &self.sounds
    }

    /// Name of the active animation phase, e.g. `"moving-left"`.
    pub fn current_phase_name(&self) -> &str {
        &self.phase.name
    }

    /// Frame of the active phase to draw at `now`.
    pub fn current_frame(&self, now: Duration) -> Option<FrameId> {
        self.phases
            .get(&self.phase.name)
            .and_then(|phase| phase.frame_at(now.saturating_sub(self.phase.started_at)))
    }

    // ===== phases =====

    /// Switches to `name`, restarting its cycle at `now`.
    ///
    /// Unknown names fall back to the stance phase; without a stance phase the
    /// current phase stays. Returns true if the active phase changed.
    pub fn set_phase(&mut self, name: &str, now: Duration) -> bool {
        if self.phase.name == name {
            return false;
        }
        if self.phases.contains(name) {
            self.start_phase(name, now);
            return true;
        }

        let stance = EngineConfig::STANCE_PHASE;
        if self.phases.contains(stance) {
            tracing::warn!(entity = %self.id, phase = name, "phase not found, using stance");
            if self.phase.name == stance {
                return false;
            }
            self.start_phase(stance, now);
            return true;
        }

        tracing::warn!(
            entity = %self.id,
            phase = name,
            current = %self.phase.name,
            "phase not found and no stance phase; keeping current phase"
        );
        false
    }

    fn start_phase(&mut self, name: &str, now: Duration) {
        self.phase = ActivePhase {
            name: name.to_owned(),
            started_at: now,
        };
        self.redraw = true;
    }

    pub(crate) fn set_idle_phase(&mut self, now: Duration) {
        let name = self.facing.name();
        self.set_phase(name, now);
    }

    pub(crate) fn set_moving_phase(&mut self, now: Duration) {
        let name = format!("moving-{}", self.facing.name());
        self.set_phase(&name, now);
    }

    /// Turns toward `delta` without moving. Ignored mid-move.
    pub fn face(&mut self, delta: Facing, now: Duration) -> bool {
        if self.is_moving() {
            return false;
        }
        self.facing = delta;
        self.set_idle_phase(now);
        self.redraw = true;
        true
    }

    // ===== scripts =====

    /// Registers a script under a trigger name (`on_tick`, `on_turn`,
    /// `on_tile_entry`, `on_tile_exit`, `on_delete`). Returns false for an
    /// unrecognised name.
    pub fn set_script(&mut self, trigger: &str, script: ScriptRef) -> bool {
        match self.scripts.set_by_name(trigger, script) {
            Ok(_) => true,
            Err(err) => {
                tracing::warn!(entity = %self.id, error = %err, "script not registered");
                false
            }
        }
    }

    pub fn set_trigger(&mut self, trigger: Trigger, script: ScriptRef) {
        self.scripts.set(trigger, script);
    }

    pub fn clear_trigger(&mut self, trigger: Trigger) -> Option<ScriptRef> {
        self.scripts.clear(trigger)
    }

    pub(crate) fn fire(&self, trigger: Trigger, area: &str, tile: TileCoord) {
        self.scripts.fire(trigger, self.id, area, tile);
    }

    /// Turn-mode trigger point.
    pub fn turn(&mut self, area: &Area) {
        let tile = self.tile_coords(area);
        self.fire(Trigger::OnTurn, area.name(), tile);
    }

    // ===== placement =====

    /// Places the entity on a physical tile, moving its occupancy claim.
    ///
    /// # Errors
    ///
    /// Fails if a move is in flight or the entity still claims a tile in
    /// another area.
    pub fn set_tile_coords(&mut self, area: &mut Area, coord: TileCoord) -> Result<(), MoveError> {
        let position = area.geometry().phys_to_pixel(coord);
        self.place(area, position, coord)
    }

    /// Places the entity at a virtual coordinate, keeping fractional depth.
    ///
    /// # Errors
    ///
    /// Same as [`Entity::set_tile_coords`].
    pub fn set_virt_coords(&mut self, area: &mut Area, coord: VirtCoord) -> Result<(), MoveError> {
        let geometry = area.geometry();
        let position = geometry.virt_to_pixel(coord);
        let tile = geometry.virt_to_phys(coord);
        self.place(area, position, tile)
    }

    /// # Errors
    ///
    /// Same as [`Entity::set_tile_coords`].
    pub fn set_pixel_coords(&mut self, area: &mut Area, coord: PixelCoord) -> Result<(), MoveError> {
        let tile = area.geometry().pixel_to_phys(coord);
        self.place(area, coord, tile)
    }

    /// Nudges the position by a pixel delta, re-resolving the claim if the
    /// containing tile changed.
    ///
    /// # Errors
    ///
    /// Same as [`Entity::set_tile_coords`].
    pub fn move_by_pixel(&mut self, area: &mut Area, delta: PixelCoord) -> Result<(), MoveError> {
        let target = PixelCoord::new(
            self.position.x + delta.x,
            self.position.y + delta.y,
            self.position.z + delta.z,
        );
        self.set_pixel_coords(area, target)
    }

    fn place(&mut self, area: &mut Area, position: PixelCoord, tile: TileCoord) -> Result<(), MoveError> {
        if self.is_moving() {
            return Err(MoveError::InFlight { entity: self.id });
        }
        if let Some(claim) = &self.claim {
            if claim.area != area.name() {
                return Err(MoveError::ForeignClaim {
                    entity: self.id,
                    area: claim.area.clone(),
                    context: ErrorContext::new()
                        .with_entity(self.id)
                        .with_tile(claim.tile)
                        .with_message("detach from the old area first"),
                });
            }
        }

        self.position = position;
        self.transfer_claim(area, Some(tile));
        self.redraw = true;
        Ok(())
    }

    /// Releases the occupancy claim and drops any in-flight move. Used when
    /// the entity leaves `area` for another one.
    pub fn detach(&mut self, area: &mut Area) {
        if self.motion.take().is_some() {
            tracing::debug!(entity = %self.id, "in-flight move dropped on detach");
        }
        self.transfer_claim(area, None);
    }

    /// Fires `on_delete` and releases the occupancy claim.
    pub fn destroy(mut self, area: &mut Area) {
        let tile = self.tile_coords(area);
        self.fire(Trigger::OnDelete, area.name(), tile);
        self.detach(area);
        tracing::debug!(entity = %self.id, area = area.name(), "entity destroyed");
    }

    /// Moves the occupancy claim to `to` (or nowhere). Leaving the old tile
    /// and entering the new one happen together; out-of-area targets are not
    /// claimed.
    pub(crate) fn transfer_claim(&mut self, area: &mut Area, to: Option<TileCoord>) {
        let to = to.filter(|tile| area.contains(*tile));
        if let (Some(claim), Some(tile)) = (&self.claim, to) {
            if claim.area == area.name() && claim.tile == tile {
                return;
            }
        }

        if let Some(claim) = self.claim.take() {
            if claim.area != area.name() {
                tracing::error!(
                    entity = %self.id,
                    claimed = %claim.area,
                    area = area.name(),
                    tile = %claim.tile,
                    "occupancy claim belongs to another area"
                );
                debug_assert!(false, "claim on {} belongs to '{}'", claim.tile, claim.area);
            } else if let Err(err) = area.leave(claim.tile) {
                self.occupancy_fault(err);
            }
        }

        if let Some(tile) = to {
            match area.enter(tile) {
                Ok(()) => {
                    self.claim = Some(Claim {
                        area: area.name().to_owned(),
                        tile,
                    });
                }
                Err(err) => self.occupancy_fault(err),
            }
        }
    }

    fn occupancy_fault(&self, err: OccupancyError) {
        tracing::error!(
            entity = %self.id,
            error = %err,
            code = err.error_code(),
            "occupancy accounting fault"
        );
        debug_assert!(false, "occupancy accounting fault: {err}");
    }
}
