//! Input policies that specialise the movement state machine.
//!
//! [`SingleStep`] actors move one tile per `move_by_tile` call.
//! [`HeldDirections`] keeps a small stack of held directional keys so a
//! player keeps walking across tile boundaries while a key stays down.

use arrayvec::ArrayVec;

use crate::config::EngineConfig;
use crate::env::TileFlags;
use crate::state::Facing;

/// Capability interface implemented by every entity variant.
pub trait InputPolicy {
    /// Nowalk flags that apply to this class of actor.
    fn walk_mask(&self) -> TileFlags;

    /// True while input asks for motion to continue past the current step.
    fn still_moving(&self) -> bool {
        false
    }

    /// Direction to re-arm with after an arrival while `still_moving`.
    fn next_direction(&self) -> Option<Facing> {
        None
    }

    /// Whether committing a move plays the entity's `step` sound.
    fn plays_step_sound(&self) -> bool {
        false
    }
}

/// Generic mobile actor: each move is requested explicitly.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SingleStep;

impl InputPolicy for SingleStep {
    fn walk_mask(&self) -> TileFlags {
        TileFlags::NOWALK | TileFlags::NOWALK_NPC
    }
}

/// Ordered set of currently held directions; the most recent press wins.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HeldDirections {
    held: ArrayVec<Facing, { EngineConfig::MAX_HELD_DIRECTIONS }>,
}

impl HeldDirections {
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks `facing` as held and most recent. A full stack drops its oldest
    /// entry. Stance is not a direction and is never held.
    pub fn press(&mut self, facing: Facing) {
        if facing.is_stance() {
            return;
        }
        self.remove(facing);
        if self.held.is_full() {
            self.held.remove(0);
        }
        self.held.push(facing);
    }

    /// Releases `facing`; returns false if it was not held.
    pub fn release(&mut self, facing: Facing) -> bool {
        self.remove(facing)
    }

    pub fn current(&self) -> Option<Facing> {
        self.held.last().copied()
    }

    pub fn is_empty(&self) -> bool {
        self.held.is_empty()
    }

    pub fn clear(&mut self) {
        self.held.clear();
    }

    fn remove(&mut self, facing: Facing) -> bool {
        match self.held.iter().position(|held| *held == facing) {
            Some(index) => {
                self.held.remove(index);
                true
            }
            None => false,
        }
    }
}

impl InputPolicy for HeldDirections {
    fn walk_mask(&self) -> TileFlags {
        TileFlags::NOWALK | TileFlags::NOWALK_PLAYER
    }

    fn still_moving(&self) -> bool {
        !self.held.is_empty()
    }

    fn next_direction(&self) -> Option<Facing> {
        self.current()
    }

    fn plays_step_sound(&self) -> bool {
        true
    }
}
