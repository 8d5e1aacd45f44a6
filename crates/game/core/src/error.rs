//! Common error infrastructure for tile-core.
//!
//! Domain-specific errors (e.g. [`crate::env::CoordError`],
//! [`crate::env::TransitionError`]) live next to the code that produces them.
//! They all implement [`GameError`] so hosts can classify failures uniformly:
//!
//! - **Configuration errors** (unknown layer or trigger names) are
//!   [`ErrorSeverity::Validation`] and are reported back to the caller.
//! - **Transition failures** (an exit target area that fails to load) are
//!   [`ErrorSeverity::Recoverable`]; the movement state machine rolls back.
//! - **Invariant violations** (occupancy underflow) are
//!   [`ErrorSeverity::Internal`] and assert in debug builds.

use crate::state::{EntityId, TileCoord};

/// Severity level of an error, used for categorization and recovery strategies.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ErrorSeverity {
    /// Recoverable error - handled locally, the simulation continues unchanged.
    ///
    /// Examples: exit target area failed to load
    Recoverable,

    /// Validation error - invalid input, should not retry without changes.
    ///
    /// Examples: unknown layer name, unknown script trigger
    Validation,

    /// Internal error - the occupancy accounting contract was violated elsewhere.
    ///
    /// Examples: `leave()` on a tile whose count is already zero
    Internal,

    /// Fatal error - state corrupted, cannot continue.
    Fatal,
}

impl ErrorSeverity {
    /// Returns a human-readable description of this severity level.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Recoverable => "recoverable",
            Self::Validation => "validation",
            Self::Internal => "internal",
            Self::Fatal => "fatal",
        }
    }

    /// Returns true if this error is potentially recoverable.
    pub const fn is_recoverable(&self) -> bool {
        matches!(self, Self::Recoverable)
    }

    /// Returns true if this error indicates an internal bug.
    pub const fn is_internal(&self) -> bool {
        matches!(self, Self::Internal | Self::Fatal)
    }
}

/// Contextual information attached to errors for debugging and diagnostics.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ErrorContext {
    /// Entity that triggered the error (if applicable).
    pub entity: Option<EntityId>,

    /// Physical tile where the error occurred (if applicable).
    pub tile: Option<TileCoord>,

    /// Optional static message providing additional context.
    pub message: Option<&'static str>,
}

impl ErrorContext {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entity: None,
            tile: None,
            message: None,
        }
    }

    /// Attaches an entity to this context (builder pattern).
    #[must_use]
    pub const fn with_entity(mut self, entity: EntityId) -> Self {
        self.entity = Some(entity);
        self
    }

    /// Attaches a tile to this context (builder pattern).
    #[must_use]
    pub const fn with_tile(mut self, tile: TileCoord) -> Self {
        self.tile = Some(tile);
        self
    }

    /// Attaches a static message to this context (builder pattern).
    #[must_use]
    pub const fn with_message(mut self, message: &'static str) -> Self {
        self.message = Some(message);
        self
    }
}

/// Common trait for all tile-core errors.
///
/// # Implementation Guidelines
///
/// - Use `#[derive(thiserror::Error)]` for Display/Error impl
/// - Include `ErrorContext` in variants that need debugging info
/// - Classify severity based on recoverability, not impact
pub trait GameError: core::fmt::Display + core::fmt::Debug {
    /// Returns the severity level of this error.
    fn severity(&self) -> ErrorSeverity;

    /// Returns the context information for this error, if available.
    fn context(&self) -> Option<&ErrorContext> {
        None
    }

    /// Returns a static string identifier for this error variant.
    fn error_code(&self) -> &'static str {
        core::any::type_name::<Self>()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn severity_classification() {
        assert!(ErrorSeverity::Recoverable.is_recoverable());
        assert!(!ErrorSeverity::Validation.is_recoverable());
        assert!(ErrorSeverity::Internal.is_internal());
        assert!(ErrorSeverity::Fatal.is_internal());
        assert!(!ErrorSeverity::Validation.is_internal());
        assert_eq!(ErrorSeverity::Internal.as_str(), "internal");
    }

    #[test]
    fn context_builder_attaches_fields() {
        let context = ErrorContext::new()
            .with_entity(EntityId(3))
            .with_tile(TileCoord::new(1, 2, 0))
            .with_message("occupancy underflow");

        assert_eq!(context.entity, Some(EntityId(3)));
        assert_eq!(context.tile, Some(TileCoord::new(1, 2, 0)));
        assert_eq!(context.message, Some("occupancy underflow"));
    }
}
