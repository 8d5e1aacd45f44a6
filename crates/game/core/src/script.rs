//! Script trigger points.
//!
//! The core never executes scripts itself. It only decides *when* a trigger
//! fires and hands the registered [`Script`] a [`TriggerContext`] describing
//! the acting entity, its area and its tile. Any scripting engine can sit
//! behind the trait.

use std::fmt;
use std::sync::Arc;

use strum::{EnumCount, IntoEnumIterator};

use crate::error::{ErrorContext, ErrorSeverity, GameError};
use crate::state::{EntityId, TileCoord};

/// Named points at which an entity's scripts run.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
    strum::EnumCount,
    strum::EnumIter,
)]
#[strum(serialize_all = "snake_case")]
pub enum Trigger {
    OnTick,
    OnTurn,
    OnTileEntry,
    OnTileExit,
    OnDelete,
}

impl Trigger {
    const fn slot(self) -> usize {
        self as usize
    }
}

/// Arguments passed to a script when its trigger fires.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TriggerContext<'a> {
    pub trigger: Trigger,
    pub entity: EntityId,
    pub area: &'a str,
    pub tile: TileCoord,
}

/// Opaque script capability invoked synchronously at trigger points.
pub trait Script: Send + Sync {
    fn run(&self, ctx: &TriggerContext<'_>);
}

impl<F> Script for F
where
    F: Fn(&TriggerContext<'_>) + Send + Sync,
{
    fn run(&self, ctx: &TriggerContext<'_>) {
        self(ctx)
    }
}

/// Shared handle to a registered script.
#[derive(Clone)]
pub struct ScriptRef(Arc<dyn Script>);

impl ScriptRef {
    pub fn new<S>(script: S) -> Self
    where
        S: Script + 'static,
    {
        Self(Arc::new(script))
    }

    /// Wraps a closure. Prefer this over [`ScriptRef::new`] for closures so the
    /// argument lifetime is inferred from the `Fn` bound.
    pub fn from_fn<F>(f: F) -> Self
    where
        F: Fn(&TriggerContext<'_>) + Send + Sync + 'static,
    {
        Self(Arc::new(f))
    }

    pub fn run(&self, ctx: &TriggerContext<'_>) {
        self.0.run(ctx)
    }
}

impl fmt::Debug for ScriptRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ScriptRef(..)")
    }
}

/// Errors raised while registering scripts.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ScriptError {
    #[error("unknown script trigger '{name}'")]
    UnknownTrigger {
        name: String,
        context: ErrorContext,
    },
}

impl GameError for ScriptError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Validation
    }

    fn context(&self) -> Option<&ErrorContext> {
        match self {
            Self::UnknownTrigger { context, .. } => Some(context),
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::UnknownTrigger { .. } => "SCRIPT_UNKNOWN_TRIGGER",
        }
    }
}

/// One optional script per [`Trigger`].
#[derive(Clone, Debug, Default)]
pub struct Scripts {
    slots: [Option<ScriptRef>; Trigger::COUNT],
}

impl Scripts {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `script` for `trigger`, replacing any previous one.
    pub fn set(&mut self, trigger: Trigger, script: ScriptRef) {
        self.slots[trigger.slot()] = Some(script);
    }

    /// Registers `script` under a trigger name such as `"on_tile_entry"`.
    ///
    /// # Errors
    ///
    /// Returns [`ScriptError::UnknownTrigger`] if `name` is not a trigger.
    pub fn set_by_name(&mut self, name: &str, script: ScriptRef) -> Result<Trigger, ScriptError> {
        let trigger = name
            .parse::<Trigger>()
            .map_err(|_| ScriptError::UnknownTrigger {
                name: name.to_owned(),
                context: ErrorContext::new().with_message("trigger names are snake_case"),
            })?;
        self.set(trigger, script);
        Ok(trigger)
    }

    pub fn clear(&mut self, trigger: Trigger) -> Option<ScriptRef> {
        self.slots[trigger.slot()].take()
    }

    pub fn get(&self, trigger: Trigger) -> Option<&ScriptRef> {
        self.slots[trigger.slot()].as_ref()
    }

    /// Triggers that currently have a script.
    pub fn registered(&self) -> impl Iterator<Item = Trigger> + '_ {
        Trigger::iter().filter(|trigger| self.get(*trigger).is_some())
    }

    /// Runs the script registered for `trigger`, if any.
    pub fn fire(&self, trigger: Trigger, entity: EntityId, area: &str, tile: TileCoord) {
        if let Some(script) = self.get(trigger) {
            tracing::trace!(%entity, %trigger, area, %tile, "running script");
            script.run(&TriggerContext {
                trigger,
                entity,
                area,
                tile,
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[test]
    fn trigger_names_are_snake_case() {
        assert_eq!("on_tile_entry".parse::<Trigger>().unwrap(), Trigger::OnTileEntry);
        assert_eq!(Trigger::OnDelete.as_ref(), "on_delete");
        assert!("onTick".parse::<Trigger>().is_err());
    }

    #[test]
    fn unknown_trigger_name_is_rejected() {
        let mut scripts = Scripts::new();
        let err = scripts
            .set_by_name("on_jump", ScriptRef::from_fn(|_| {}))
            .unwrap_err();

        assert_eq!(err.severity(), ErrorSeverity::Validation);
        assert_eq!(err.error_code(), "SCRIPT_UNKNOWN_TRIGGER");
        assert_eq!(scripts.registered().count(), 0);
    }

    #[test]
    fn fire_passes_entity_area_and_tile() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let mut scripts = Scripts::new();
        scripts
            .set_by_name(
                "on_turn",
                ScriptRef::from_fn(move |ctx| {
                    sink.lock()
                        .unwrap()
                        .push((ctx.trigger, ctx.entity, ctx.area.to_owned(), ctx.tile));
                }),
            )
            .unwrap();

        scripts.fire(Trigger::OnTurn, EntityId(4), "field", TileCoord::new(1, 2, 0));
        scripts.fire(Trigger::OnTick, EntityId(4), "field", TileCoord::new(1, 2, 0));

        let seen = seen.lock().unwrap();
        assert_eq!(
            *seen,
            vec![(
                Trigger::OnTurn,
                EntityId(4),
                "field".to_owned(),
                TileCoord::new(1, 2, 0)
            )]
        );
    }
}
