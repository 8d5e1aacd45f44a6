//! Error type surfaced by the runtime API.
//!
//! Wraps core failures (area resolution, placement, coordinates, movement
//! parameters) and adds the
//! runtime's own bookkeeping errors.
use thiserror::Error;
use tile_core::{
    ConfigError, CoordError, EntityId, ErrorSeverity, GameError, MoveError, TransitionError,
};

pub type Result<T> = std::result::Result<T, RuntimeError>;

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error(transparent)]
    Transition(#[from] TransitionError),

    #[error(transparent)]
    Placement(#[from] MoveError),

    #[error(transparent)]
    Coord(#[from] CoordError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("area '{area}' is not loaded")]
    AreaNotLoaded { area: String },

    #[error("no area has focus")]
    NoFocus,

    #[error("npc {entity} not found")]
    NpcNotFound { entity: EntityId },

    #[error("invalid log directive '{directive}'")]
    LogDirective {
        directive: String,
        #[source]
        source: tracing_subscriber::filter::ParseError,
    },

    #[error("failed to install tracing subscriber: {reason}")]
    LoggingInit { reason: String },
}

impl GameError for RuntimeError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::Transition(err) => err.severity(),
            Self::Placement(err) => err.severity(),
            Self::Coord(err) => err.severity(),
            Self::Config(err) => err.severity(),
            Self::AreaNotLoaded { .. } | Self::NoFocus => ErrorSeverity::Internal,
            Self::NpcNotFound { .. } | Self::LogDirective { .. } => ErrorSeverity::Validation,
            Self::LoggingInit { .. } => ErrorSeverity::Recoverable,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::Transition(err) => err.error_code(),
            Self::Placement(err) => err.error_code(),
            Self::Coord(err) => err.error_code(),
            Self::Config(err) => err.error_code(),
            Self::AreaNotLoaded { .. } => "RUNTIME_AREA_NOT_LOADED",
            Self::NoFocus => "RUNTIME_NO_FOCUS",
            Self::NpcNotFound { .. } => "RUNTIME_NPC_NOT_FOUND",
            Self::LogDirective { .. } => "RUNTIME_LOG_DIRECTIVE",
            Self::LoggingInit { .. } => "RUNTIME_LOGGING_INIT",
        }
    }
}
