//! Per-entity sound tables.
//!
//! Playback is a host concern; the core only resolves a symbolic name such as
//! `"step"` to the [`SoundId`] the host should play.

use std::collections::HashMap;
use std::fmt;

/// Host-defined identifier of a loaded sound sample.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SoundId(pub String);

impl SoundId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }
}

impl fmt::Display for SoundId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SoundTable {
    sounds: HashMap<String, SoundId>,
}

impl SoundTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, name: impl Into<String>, sound: SoundId) -> Self {
        self.insert(name, sound);
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, sound: SoundId) -> Option<SoundId> {
        self.sounds.insert(name.into(), sound)
    }

    pub fn get(&self, name: &str) -> Option<&SoundId> {
        self.sounds.get(name)
    }

    pub fn len(&self) -> usize {
        self.sounds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sounds.is_empty()
    }
}
