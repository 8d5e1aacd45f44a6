//! Tile-to-tile movement: walkability checks, move commit, per-tick travel
//! and arrival processing.
//!
//! Trigger order for one move is fixed: tile exit, pre-move, commit, tile
//! entry, post-move, then the transition handler.

use std::time::Duration;

use crate::config::{EngineConfig, MoveMode};
use crate::env::{Area, ExitKind, MoveContext, MoveEvent, Tile, TileFlags};
use crate::script::{Trigger, TriggerContext};
use crate::state::{Facing, PixelCoord, TileCoord};

use super::transition::TransitionOutcome;
use super::{Entity, HeldDirections, InputPolicy, MoveTransaction};

impl<P: InputPolicy> Entity<P> {
    /// Attempts a one-tile move toward `delta`. Returns true if the move was
    /// committed.
    ///
    /// Ignored while a move is in flight or for a zero delta. A blocked move
    /// still turns the entity toward `delta`.
    pub fn move_by_tile(&mut self, ctx: &mut MoveContext<'_>, delta: Facing) -> bool {
        if self.is_moving() || delta.is_stance() {
            return false;
        }

        let previous = self.facing;
        self.facing = delta;
        self.redraw = true;

        let from = self.tile_coords(ctx.area);
        let to = self.move_dest(ctx.area, from, delta);
        if !self.can_move_between(ctx.area, from, to, delta) {
            self.set_idle_phase(ctx.now);
            tracing::debug!(entity = %self.id, %from, %to, "move blocked");
            return false;
        }

        self.commit(ctx, from, to, previous);
        true
    }

    /// Whether a move toward `delta` from the current tile would be permitted.
    pub fn can_move(&self, area: &Area, delta: Facing) -> bool {
        if delta.is_stance() {
            return false;
        }
        let from = self.tile_coords(area);
        let to = self.move_dest(area, from, delta);
        self.can_move_between(area, from, to, delta)
    }

    /// Walkability query for an explicit target tile. The direction used for
    /// departure exits is the sign of the planar offset.
    pub fn can_move_to(&self, area: &Area, to: TileCoord) -> bool {
        let from = self.tile_coords(area);
        let delta = Facing::new(to.x - from.x, to.y - from.y);
        self.can_move_between(area, from, to, delta)
    }

    /// Destination of a step. The current tile's directional layermod, if
    /// any, redirects the step onto the layer at that depth.
    pub(crate) fn move_dest(&self, area: &Area, from: TileCoord, delta: Facing) -> TileCoord {
        let mut to = from.offset(delta.x(), delta.y());
        let layermod = ExitKind::from_facing(delta)
            .and_then(|kind| area.tile(from).and_then(|tile| tile.layermod(kind)));
        if let Some(depth) = layermod {
            to.z = area.geometry().layer_at(depth);
        }
        to
    }

    fn can_move_between(&self, area: &Area, from: TileCoord, to: TileCoord, delta: Facing) -> bool {
        let exempt = self.exemptions;
        let source = area.tile(from);
        let dest = area.tile(to);

        let departure = ExitKind::from_facing(delta)
            .and_then(|kind| source.filter(|tile| tile.exit(kind).is_some()));
        let arrival = dest.filter(|tile| tile.exit(ExitKind::Normal).is_some());

        if departure.is_some() || arrival.is_some() {
            let exit_nowalk = TileFlags::NOWALK_EXIT.difference(exempt);
            if [departure, arrival].into_iter().flatten().any(|tile| tile.has_flag(exit_nowalk)) {
                return false;
            }
            return !dest.is_some_and(Tile::is_occupied);
        }

        match dest {
            Some(tile) => {
                let mask = self.policy.walk_mask().difference(exempt);
                !tile.has_flag(mask) && !tile.is_occupied()
            }
            None => exempt.contains(TileFlags::NOWALK_AREA_BOUND),
        }
    }

    fn commit(&mut self, ctx: &mut MoveContext<'_>, from: TileCoord, to: TileCoord, previous: Facing) {
        self.fire(Trigger::OnTileExit, ctx.area.name(), from);
        self.fire_tile_script(ctx.area, from, Trigger::OnTileExit);

        let event = MoveEvent {
            entity: self.id,
            from,
            to,
            facing: self.facing,
        };
        ctx.host.pre_move(&event);

        let target = ctx.area.geometry().phys_to_pixel(to);
        let depth = if to.z == from.z {
            self.position.z
        } else {
            target.z
        };
        self.motion = Some(MoveTransaction {
            from: self.position,
            from_tile: from,
            from_claim: self.occupied_tile(),
            from_facing: previous,
            to: PixelCoord::new(target.x, target.y, depth),
            to_tile: to,
            facing: self.facing,
            traveled: 0.0,
        });
        self.transfer_claim(ctx.area, Some(to));
        self.set_moving_phase(ctx.now);

        if self.policy.plays_step_sound() {
            if let Some(sound) = self.sounds.get(EngineConfig::STEP_SOUND) {
                ctx.host.play_sound(self.id, sound);
            }
        }
        tracing::debug!(entity = %self.id, %from, %to, "move committed");

        if ctx.config.move_mode == MoveMode::Turn {
            self.snap_to_destination();
            self.arrive(ctx);
        }
    }

    /// Per-frame update: fires `on_tick`, then advances an in-flight move in
    /// `Tile` mode.
    pub fn tick(&mut self, ctx: &mut MoveContext<'_>, dt: Duration) {
        let tile = self.tile_coords(ctx.area);
        self.fire(Trigger::OnTick, ctx.area.name(), tile);

        if ctx.config.move_mode == MoveMode::Tile && self.is_moving() {
            let millis = dt.as_nanos() as f64 / 1_000_000.0;
            self.advance(ctx, millis);
        }
    }

    /// Moves toward the destination for `millis` of simulated time. Time left
    /// over after an arrival that re-armed movement carries into the next
    /// step. Returns the distance covered.
    ///
    /// A non-positive speed cannot come from validated configuration; if it
    /// does, the move completes at once instead of staying in flight.
    pub(crate) fn advance(&mut self, ctx: &mut MoveContext<'_>, millis: f64) -> f64 {
        let mut millis = millis;
        let mut covered = 0.0;
        while millis > 0.0 {
            let Some(motion) = self.motion.as_mut() else {
                break;
            };
            let tile_width = ctx.area.geometry().tile_dimensions().width;
            let speed = ctx.config.pixel_speed(self.speed_multiplier, tile_width);
            let remaining = self.position.planar_distance(motion.to);

            if speed.is_nan() || speed <= 0.0 {
                tracing::warn!(entity = %self.id, speed, "non-positive speed, completing move");
                motion.traveled += remaining;
                self.snap_to_destination();
                self.arrive(ctx);
                return covered + remaining;
            }

            let budget = speed * millis;
            if remaining > budget {
                let share = budget / remaining;
                self.position.x += (motion.to.x - self.position.x) * share;
                self.position.y += (motion.to.y - self.position.y) * share;
                motion.traveled += budget;
                self.redraw = true;
                return covered + budget;
            }

            motion.traveled += remaining;
            self.snap_to_destination();
            self.arrive(ctx);
            covered += remaining;
            millis -= remaining / speed;
        }
        covered
    }

    fn snap_to_destination(&mut self) {
        if let Some(motion) = &self.motion {
            self.position = motion.to;
            self.redraw = true;
        }
    }

    /// Arrival processing. Consumes the move transaction, so a second call
    /// for the same move does nothing.
    pub(crate) fn arrive(&mut self, ctx: &mut MoveContext<'_>) {
        let Some(motion) = self.motion.take() else {
            return;
        };

        let layermod = ctx
            .area
            .tile(motion.to_tile)
            .and_then(|tile| tile.layermod(ExitKind::Normal));
        if let Some(depth) = layermod {
            self.position.z = depth;
            let resolved = ctx.area.geometry().pixel_to_phys(self.position);
            self.transfer_claim(ctx.area, Some(resolved));
        }

        let keep_moving = ctx.config.move_mode == MoveMode::Tile && self.policy.still_moving();
        if !keep_moving {
            self.set_idle_phase(ctx.now);
        }

        let tile = self.tile_coords(ctx.area);
        self.fire(Trigger::OnTileEntry, ctx.area.name(), tile);
        self.fire_tile_script(ctx.area, tile, Trigger::OnTileEntry);
        ctx.host.post_move(&MoveEvent {
            entity: self.id,
            from: motion.from_tile,
            to: tile,
            facing: motion.facing,
        });
        tracing::debug!(
            entity = %self.id,
            from = %motion.from_tile,
            to = %tile,
            traveled = motion.traveled,
            "move arrived"
        );

        match self.run_transition(ctx, &motion) {
            TransitionOutcome::Stay if keep_moving => {
                let rearmed = self
                    .policy
                    .next_direction()
                    .is_some_and(|next| self.move_by_tile(ctx, next));
                if !rearmed {
                    self.set_idle_phase(ctx.now);
                }
            }
            TransitionOutcome::Focus if keep_moving => self.set_idle_phase(ctx.now),
            TransitionOutcome::Stay | TransitionOutcome::Focus | TransitionOutcome::RolledBack => {}
        }
    }

    fn fire_tile_script(&self, area: &Area, tile: TileCoord, trigger: Trigger) {
        let script = area.tile(tile).and_then(|cell| match trigger {
            Trigger::OnTileEntry => cell.enter_script(),
            Trigger::OnTileExit => cell.leave_script(),
            _ => None,
        });
        if let Some(script) = script {
            script.run(&TriggerContext {
                trigger,
                entity: self.id,
                area: area.name(),
                tile,
            });
        }
    }
}

impl Entity<HeldDirections> {
    /// Key-down: `delta` becomes the most recent held direction and a move
    /// toward it is attempted. Returns true if a move was committed.
    /// A zero delta is not a direction and is ignored.
    pub fn press(&mut self, ctx: &mut MoveContext<'_>, delta: Facing) -> bool {
        if delta.is_stance() {
            return false;
        }
        self.policy.press(delta);
        self.move_by_tile(ctx, delta)
    }

    /// Key-up: resumes toward the most recent direction still held, or stops.
    /// Returns false if `delta` was not held.
    pub fn release(&mut self, ctx: &mut MoveContext<'_>, delta: Facing) -> bool {
        if !self.policy.release(delta) {
            return false;
        }
        if self.is_moving() {
            return true;
        }
        let resumed = self
            .policy
            .current()
            .is_some_and(|next| self.move_by_tile(ctx, next));
        if !resumed {
            self.set_idle_phase(ctx.now);
        }
        true
    }

    /// True while any direction is held.
    pub fn still_moving(&self) -> bool {
        self.policy.still_moving()
    }

    /// Forgets every held direction, e.g. when input focus is lost.
    pub fn release_all(&mut self) {
        self.policy.clear();
    }
}
