//! Fixtures shared by the unit tests.

use std::collections::HashSet;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::entity::{FrameId, Phase, PhaseTable, Repeat};
use crate::env::{Area, FocusRequest, Geometry, MoveEvent, TransitionError, WorldHost};
use crate::sound::SoundId;
use crate::state::{EntityId, Facing, TileDimensions};

/// Single-layer area of 32x32 tiles.
pub(crate) fn flat_area(name: &str, width: u32, height: u32) -> Area {
    Area::new(name, Geometry::flat(width, height, TileDimensions::default()))
}

/// Idle and moving phases for all nine facings.
pub(crate) fn full_phases() -> PhaseTable {
    let mut table = PhaseTable::new();
    let mut frame = 0;
    let facings = (-1..=1).flat_map(|y| (-1..=1).map(move |x| Facing::new(x, y)));
    for name in facings.map(Facing::name) {
        table.insert(name, Phase::still(FrameId(frame)));
        table.insert(
            format!("moving-{name}"),
            Phase::animated(
                vec![FrameId(frame + 1), FrameId(frame + 2)],
                Duration::from_millis(100),
                Repeat::Forever,
            ),
        );
        frame += 3;
    }
    table
}

/// Host that records every side effect and fails focus requests for chosen
/// areas.
#[derive(Debug, Default)]
pub(crate) struct RecordingHost {
    pub(crate) sounds: Vec<(EntityId, SoundId)>,
    pub(crate) focus_requests: Vec<FocusRequest>,
    pub(crate) pre_moves: Vec<MoveEvent>,
    pub(crate) post_moves: Vec<MoveEvent>,
    failing: HashSet<String>,
    log: Option<Arc<Mutex<Vec<String>>>>,
}

impl RecordingHost {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Also appends `pre-move` / `post-move` to a shared trigger log.
    pub(crate) fn with_log(log: Arc<Mutex<Vec<String>>>) -> Self {
        Self {
            log: Some(log),
            ..Self::default()
        }
    }

    pub(crate) fn failing_on(mut self, area: &str) -> Self {
        self.failing.insert(area.to_owned());
        self
    }

    fn note(&self, label: &str) {
        if let Some(log) = &self.log {
            log.lock().unwrap().push(label.to_owned());
        }
    }
}

impl WorldHost for RecordingHost {
    fn play_sound(&mut self, entity: EntityId, sound: &SoundId) {
        self.sounds.push((entity, sound.clone()));
    }

    fn request_focus(&mut self, request: FocusRequest) -> Result<(), TransitionError> {
        let area = request.area.clone();
        self.focus_requests.push(request);
        if self.failing.contains(&area) {
            return Err(TransitionError::AreaLoad {
                area,
                reason: "missing map file".to_owned(),
            });
        }
        Ok(())
    }

    fn pre_move(&mut self, event: &MoveEvent) {
        self.note("pre-move");
        self.pre_moves.push(*event);
    }

    fn post_move(&mut self, event: &MoveEvent) {
        self.note("post-move");
        self.post_moves.push(*event);
    }
}
