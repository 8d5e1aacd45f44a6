//! The world: loaded areas, the entities living in them and the focus.
//!
//! Only the focused area is simulated. Each update takes that area out of the
//! registry, runs the player and the area's NPCs against it through a
//! [`MoveContext`], puts it back, and then applies any area transfers the
//! transition handler requested during the update.

use std::collections::HashMap;
use std::time::Duration;

use tile_core::{
    Area, EngineConfig, EntityId, Facing, FocusRequest, HeldDirections, MoveContext, MoveEvent,
    Npc, Player, SingleStep, SoundId, TileCoord, TransitionError, VirtCoord, WorldHost,
};

use crate::areas::{AreaRegistry, AreaSource};
use crate::audio::{AudioSink, NullAudio};
use crate::config::RuntimeConfig;
use crate::error::{Result, RuntimeError};

pub struct World {
    config: EngineConfig,
    areas: AreaRegistry,
    player: Player,
    npcs: HashMap<String, Vec<Npc>>,
    focus: Option<String>,
    clock: Duration,
    next_id: EntityId,
    audio: Box<dyn AudioSink>,
    transfers: Vec<FocusRequest>,
}

impl World {
    pub fn new(config: EngineConfig, source: impl AreaSource + 'static) -> Self {
        Self {
            config,
            areas: AreaRegistry::new(source),
            player: Player::new(EntityId::PLAYER, HeldDirections::new()),
            npcs: HashMap::new(),
            focus: None,
            clock: Duration::ZERO,
            next_id: EntityId::PLAYER.next(),
            audio: Box::new(NullAudio),
            transfers: Vec::new(),
        }
    }

    /// Builds a world and focuses the configured start area.
    pub fn from_config(config: &RuntimeConfig, source: impl AreaSource + 'static) -> Result<Self> {
        config.engine.validate()?;
        let mut world = Self::new(config.engine.clone(), source);
        world.focus(&config.start_area, config.start_coord)?;
        Ok(world)
    }

    /// Replaces the player, e.g. to install phases and sounds.
    ///
    /// In a focused world the new player takes the old one's place, and the
    /// old player's tile claim is released.
    ///
    /// # Errors
    ///
    /// Fails if the new player is mid-move or already claims a tile
    /// elsewhere; the world is left unchanged.
    pub fn with_player(mut self, mut player: Player) -> Result<Self> {
        if let Some(name) = self.focus.clone() {
            let area = self
                .areas
                .get_mut(&name)
                .ok_or(RuntimeError::AreaNotLoaded { area: name })?;
            player.set_pixel_coords(area, self.player.pixel_coords())?;
            self.player.detach(area);
        }
        self.player = player;
        Ok(self)
    }

    pub fn with_audio(mut self, audio: impl AudioSink + 'static) -> Self {
        self.audio = Box::new(audio);
        self
    }

    // ===== queries =====

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn clock(&self) -> Duration {
        self.clock
    }

    pub fn player(&self) -> &Player {
        &self.player
    }

    pub fn focus_name(&self) -> Option<&str> {
        self.focus.as_deref()
    }

    pub fn focused_area(&self) -> Option<&Area> {
        self.focus.as_deref().and_then(|name| self.areas.get(name))
    }

    pub fn area(&self, name: &str) -> Option<&Area> {
        self.areas.get(name)
    }

    pub fn npcs_in(&self, area: &str) -> &[Npc] {
        self.npcs.get(area).map(Vec::as_slice).unwrap_or_default()
    }

    pub fn npc(&self, id: EntityId) -> Option<&Npc> {
        self.npcs.values().flatten().find(|npc| npc.id() == id)
    }

    /// Player's physical tile in the focused area.
    pub fn player_tile(&self) -> Option<TileCoord> {
        self.focused_area().map(|area| self.player.tile_coords(area))
    }

    // ===== focus =====

    /// Loads `area` if needed and places the player at `coord` in it.
    ///
    /// # Errors
    ///
    /// Fails if the area cannot be resolved; the previous focus is kept.
    pub fn focus(&mut self, area: &str, coord: VirtCoord) -> Result<()> {
        self.areas.ensure_loaded(area)?;

        let previous = self.focus.clone();
        if let Some(old) = previous.as_deref().filter(|old| *old != area) {
            if let Some(old_area) = self.areas.get_mut(old) {
                self.player.detach(old_area);
            }
        }

        let target = self
            .areas
            .get_mut(area)
            .ok_or_else(|| RuntimeError::AreaNotLoaded {
                area: area.to_owned(),
            })?;
        self.player.set_virt_coords(target, coord)?;
        self.focus = Some(area.to_owned());
        tracing::info!(area, x = coord.x, y = coord.y, z = coord.z, "focus changed");
        Ok(())
    }

    // ===== simulation =====

    /// Advances the clock by `dt` and updates every entity of the focused
    /// area.
    pub fn tick(&mut self, dt: Duration) -> Result<()> {
        self.clock += dt;
        self.drive(|player, npcs, ctx| {
            player.tick(ctx, dt);
            for npc in npcs.iter_mut() {
                npc.tick(ctx, dt);
            }
        })?;
        Ok(())
    }

    /// Turn-mode trigger point: fires `on_turn` for every entity of the
    /// focused area.
    pub fn turn(&mut self) -> Result<()> {
        self.drive(|player, npcs, ctx| {
            player.turn(ctx.area);
            for npc in npcs.iter_mut() {
                npc.turn(ctx.area);
            }
        })?;
        Ok(())
    }

    /// Key-down for the player. Returns true if a move was committed.
    pub fn press(&mut self, delta: Facing) -> Result<bool> {
        self.drive(|player, _, ctx| player.press(ctx, delta))
    }

    /// Key-up for the player.
    pub fn release(&mut self, delta: Facing) -> Result<bool> {
        self.drive(|player, _, ctx| player.release(ctx, delta))
    }

    /// Turns the player in place.
    pub fn face(&mut self, delta: Facing) -> bool {
        self.player.face(delta, self.clock)
    }

    /// Scripted single step for an NPC of the focused area.
    pub fn move_npc(&mut self, id: EntityId, delta: Facing) -> Result<bool> {
        self.drive(|_, npcs, ctx| {
            npcs.iter_mut()
                .find(|npc| npc.id() == id)
                .map(|npc| npc.move_by_tile(ctx, delta))
                .ok_or(RuntimeError::NpcNotFound { entity: id })
        })?
    }

    /// Creates an NPC on `coord` in `area`, loading the area if needed.
    /// `configure` customises the fresh entity (phases, sounds, scripts).
    pub fn spawn_npc(
        &mut self,
        area: &str,
        coord: TileCoord,
        configure: impl FnOnce(Npc) -> Npc,
    ) -> Result<EntityId> {
        self.areas.ensure_loaded(area)?;
        let target = self
            .areas
            .get_mut(area)
            .ok_or_else(|| RuntimeError::AreaNotLoaded {
                area: area.to_owned(),
            })?;

        let id = self.next_id;
        let mut npc = configure(Npc::new(id, SingleStep));
        npc.set_tile_coords(target, coord)?;
        self.next_id = id.next();
        self.npcs.entry(area.to_owned()).or_default().push(npc);
        tracing::debug!(entity = %id, area, %coord, "npc spawned");
        Ok(id)
    }

    /// Destroys an NPC, firing its `on_delete` script and freeing its tile.
    pub fn despawn_npc(&mut self, id: EntityId) -> Result<()> {
        let (area_name, index) = self
            .npcs
            .iter()
            .find_map(|(name, npcs)| {
                npcs.iter()
                    .position(|npc| npc.id() == id)
                    .map(|index| (name.clone(), index))
            })
            .ok_or(RuntimeError::NpcNotFound { entity: id })?;

        let area = self
            .areas
            .get_mut(&area_name)
            .ok_or_else(|| RuntimeError::AreaNotLoaded {
                area: area_name.clone(),
            })?;
        let npc = match self.npcs.get_mut(&area_name) {
            Some(npcs) => npcs.remove(index),
            None => return Err(RuntimeError::NpcNotFound { entity: id }),
        };
        npc.destroy(area);
        Ok(())
    }

    /// Runs `f` against the focused area, then applies requested transfers.
    fn drive<R>(
        &mut self,
        f: impl FnOnce(&mut Player, &mut Vec<Npc>, &mut MoveContext<'_>) -> R,
    ) -> Result<R> {
        let name = self.focus.clone().ok_or(RuntimeError::NoFocus)?;
        let mut area = self
            .areas
            .take(&name)
            .ok_or_else(|| RuntimeError::AreaNotLoaded { area: name.clone() })?;

        let npcs = self.npcs.entry(name.clone()).or_default();
        let result = {
            let mut host = RuntimeHost {
                areas: &mut self.areas,
                current: &name,
                audio: self.audio.as_mut(),
                transfers: &mut self.transfers,
            };
            let mut ctx = MoveContext::new(self.clock, &self.config, &mut area, &mut host);
            f(&mut self.player, npcs, &mut ctx)
        };
        self.areas.restore(area);

        self.apply_transfers(&name)?;
        Ok(result)
    }

    fn apply_transfers(&mut self, from: &str) -> Result<()> {
        for request in std::mem::take(&mut self.transfers) {
            if request.entity.is_player() {
                self.focus(&request.area, request.coord)?;
            } else {
                self.relocate_npc(from, request)?;
            }
        }
        Ok(())
    }

    fn relocate_npc(&mut self, from: &str, request: FocusRequest) -> Result<()> {
        let Some(npcs) = self.npcs.get_mut(from) else {
            return Err(RuntimeError::NpcNotFound {
                entity: request.entity,
            });
        };
        let Some(index) = npcs.iter().position(|npc| npc.id() == request.entity) else {
            return Err(RuntimeError::NpcNotFound {
                entity: request.entity,
            });
        };

        if from == request.area {
            let area = self
                .areas
                .get_mut(from)
                .ok_or_else(|| RuntimeError::AreaNotLoaded {
                    area: from.to_owned(),
                })?;
            npcs[index].set_virt_coords(area, request.coord)?;
            return Ok(());
        }

        let mut npc = npcs.remove(index);
        if let Some(old) = self.areas.get_mut(from) {
            npc.detach(old);
        }
        let target = self
            .areas
            .get_mut(&request.area)
            .ok_or_else(|| RuntimeError::AreaNotLoaded {
                area: request.area.clone(),
            })?;
        npc.set_virt_coords(target, request.coord)?;
        tracing::debug!(entity = %request.entity, from, to = %request.area, "npc changed area");
        self.npcs.entry(request.area).or_default().push(npc);
        Ok(())
    }
}

/// [`WorldHost`] handed to entities while the focused area is checked out.
struct RuntimeHost<'a> {
    areas: &'a mut AreaRegistry,
    current: &'a str,
    audio: &'a mut dyn AudioSink,
    transfers: &'a mut Vec<FocusRequest>,
}

impl WorldHost for RuntimeHost<'_> {
    fn play_sound(&mut self, entity: EntityId, sound: &SoundId) {
        self.audio.play(entity, sound);
    }

    fn request_focus(&mut self, request: FocusRequest) -> std::result::Result<(), TransitionError> {
        if request.area != self.current {
            self.areas.ensure_loaded(&request.area)?;
        }
        self.transfers.push(request);
        Ok(())
    }

    fn post_move(&mut self, event: &MoveEvent) {
        tracing::trace!(entity = %event.entity, from = %event.from, to = %event.to, "post-move");
    }
}
