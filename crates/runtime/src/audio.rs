//! Sound output seam. The core only asks for a sound by id; playing it is up
//! to whatever sink the host installs.
use tile_core::{EntityId, SoundId};

pub trait AudioSink {
    fn play(&mut self, entity: EntityId, sound: &SoundId);
}

/// Drops every sound, logging it at trace level.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullAudio;

impl AudioSink for NullAudio {
    fn play(&mut self, entity: EntityId, sound: &SoundId) {
        tracing::trace!(%entity, %sound, "sound dropped");
    }
}
