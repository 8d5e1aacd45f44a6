use std::collections::HashMap;
use std::time::Duration;

/// Renderer-defined index of one drawable frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FrameId(pub u32);

/// How many times a phase's frame sequence plays.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Repeat {
    #[default]
    Forever,
    /// Plays `n` cycles, then holds the last frame.
    Times(u32),
}

/// A named, possibly animated, drawable state such as `"moving-left"`.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Phase {
    frames: Vec<FrameId>,
    frame_time: Duration,
    repeat: Repeat,
}

impl Phase {
    /// Single-frame phase.
    pub fn still(frame: FrameId) -> Self {
        Self {
            frames: vec![frame],
            frame_time: Duration::ZERO,
            repeat: Repeat::Forever,
        }
    }

    pub fn animated(frames: Vec<FrameId>, frame_time: Duration, repeat: Repeat) -> Self {
        Self {
            frames,
            frame_time,
            repeat,
        }
    }

    pub fn frames(&self) -> &[FrameId] {
        &self.frames
    }

    /// Frame to draw `elapsed` after the phase started.
    pub fn frame_at(&self, elapsed: Duration) -> Option<FrameId> {
        let len = self.frames.len();
        if len <= 1 || self.frame_time.is_zero() {
            return self.frames.first().copied();
        }
        let step = (elapsed.as_nanos() / self.frame_time.as_nanos()) as usize;
        let index = match self.repeat {
            Repeat::Forever => step % len,
            Repeat::Times(cycles) => {
                let total = len.saturating_mul(cycles as usize);
                if step >= total {
                    len - 1
                } else {
                    step % len
                }
            }
        };
        self.frames.get(index).copied()
    }
}

/// Per-entity mapping from phase name to [`Phase`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PhaseTable {
    phases: HashMap<String, Phase>,
}

impl PhaseTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, name: impl Into<String>, phase: Phase) -> Self {
        self.insert(name, phase);
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, phase: Phase) -> Option<Phase> {
        self.phases.insert(name.into(), phase)
    }

    pub fn get(&self, name: &str) -> Option<&Phase> {
        self.phases.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.phases.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.phases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.phases.is_empty()
    }
}

/// The phase an entity is showing and when it started.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct ActivePhase {
    pub(crate) name: String,
    pub(crate) started_at: Duration,
}
