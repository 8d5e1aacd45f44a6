//! Exit handling after arrival.
//!
//! An arrival looks for an exit on the destination tile's `Normal` slot and,
//! for moves that stayed on one layer, on the source tile's slot for the
//! direction of travel. A matching exit asks the host to focus its target;
//! if the target cannot be resolved the move is undone.

use crate::env::{Area, Exit, ExitKind, FocusRequest, MoveContext};
use crate::error::GameError;

use super::{Entity, InputPolicy, MoveTransaction};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum TransitionOutcome {
    /// No exit matched.
    Stay,
    /// The host accepted a focus change.
    Focus,
    /// The exit target failed to resolve and the move was undone.
    RolledBack,
}

impl<P: InputPolicy> Entity<P> {
    pub(crate) fn run_transition(
        &mut self,
        ctx: &mut MoveContext<'_>,
        motion: &MoveTransaction,
    ) -> TransitionOutcome {
        let Some(exit) = transition_exit(ctx.area, motion) else {
            return TransitionOutcome::Stay;
        };

        let request = FocusRequest {
            entity: self.id,
            area: exit.area,
            coord: exit.coord,
        };
        let target = request.area.clone();
        match ctx.host.request_focus(request) {
            Ok(()) => {
                tracing::debug!(entity = %self.id, area = %target, "exit taken");
                TransitionOutcome::Focus
            }
            Err(err) => {
                tracing::error!(
                    entity = %self.id,
                    area = err.area(),
                    code = err.error_code(),
                    error = %err,
                    "exit target unavailable; rolling back move"
                );
                self.roll_back(ctx, motion);
                TransitionOutcome::RolledBack
            }
        }
    }

    /// Undoes a committed move: position, facing and the occupancy claim
    /// return to their pre-move values.
    fn roll_back(&mut self, ctx: &mut MoveContext<'_>, motion: &MoveTransaction) {
        self.motion = None;
        self.position = motion.from;
        self.facing = motion.from_facing;
        self.transfer_claim(ctx.area, motion.from_claim);
        self.set_idle_phase(ctx.now);
        self.redraw = true;
    }
}

fn transition_exit(area: &Area, motion: &MoveTransaction) -> Option<Exit> {
    if let Some(exit) = area
        .tile(motion.to_tile)
        .and_then(|tile| tile.exit(ExitKind::Normal))
    {
        return Some(exit.clone());
    }
    if motion.from_tile.z != motion.to_tile.z {
        return None;
    }
    area.tile(motion.from_tile)
        .and_then(|tile| tile.exit_at(motion.facing))
        .cloned()
}
