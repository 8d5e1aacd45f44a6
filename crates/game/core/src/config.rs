use crate::error::{ErrorSeverity, GameError};

/// Engine configuration constants and tunable movement parameters.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct EngineConfig {
    /// How committed moves travel: instantly per turn, or continuously per tick.
    pub move_mode: MoveMode,
    /// Entity speed in tiles per reference time unit, before per-entity multipliers.
    pub base_speed: f64,
    /// Length of the reference time unit in milliseconds.
    pub reference_time_ms: f64,
}

impl EngineConfig {
    // ===== compile-time constants =====
    /// Upper bound on simultaneously held directions in a player's input queue.
    pub const MAX_HELD_DIRECTIONS: usize = 8;
    /// Phase used when a requested phase is missing, and for a zero facing.
    pub const STANCE_PHASE: &'static str = "stance";
    /// Sound played when a move is committed.
    pub const STEP_SOUND: &'static str = "step";

    // ===== runtime-tunable defaults =====
    pub const DEFAULT_BASE_SPEED: f64 = 4.0;
    pub const DEFAULT_REFERENCE_TIME_MS: f64 = 1000.0;

    pub fn new() -> Self {
        Self {
            move_mode: MoveMode::default(),
            base_speed: Self::DEFAULT_BASE_SPEED,
            reference_time_ms: Self::DEFAULT_REFERENCE_TIME_MS,
        }
    }

    pub fn with_move_mode(mut self, move_mode: MoveMode) -> Self {
        self.move_mode = move_mode;
        self
    }

    pub fn with_base_speed(mut self, base_speed: f64) -> Self {
        self.base_speed = base_speed;
        self
    }

    /// Checks that every speed parameter is positive and finite. A zero speed
    /// would leave committed moves in flight forever.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::NonPositive`] naming the first bad field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        positive("base_speed", self.base_speed)?;
        positive("reference_time_ms", self.reference_time_ms).map(|_| ())
    }

    /// Pixels per millisecond for an entity with the given multiplier on
    /// tiles `tile_width` pixels wide.
    pub fn pixel_speed(&self, speed_multiplier: f64, tile_width: u32) -> f64 {
        if self.reference_time_ms <= 0.0 {
            return 0.0;
        }
        self.base_speed * speed_multiplier * f64::from(tile_width) / self.reference_time_ms
    }
}

/// Returns `value` if it is a usable speed factor.
pub(crate) fn positive(field: &'static str, value: f64) -> Result<f64, ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(ConfigError::NonPositive { field, value })
    }
}

/// Invalid movement parameters.
#[derive(Clone, Copy, Debug, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error("{field} must be positive and finite, got {value}")]
    NonPositive { field: &'static str, value: f64 },
}

impl GameError for ConfigError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Validation
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::NonPositive { .. } => "CONFIG_NON_POSITIVE",
        }
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Movement timing model.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
)]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum MoveMode {
    /// Travel is instantaneous; arrival runs inside `move_by_tile`.
    Turn,
    /// Travel advances continuously in `tick` until the destination is reached.
    #[default]
    Tile,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pixel_speed_scales_with_tile_width_and_multiplier() {
        let config = EngineConfig::new().with_base_speed(2.0);
        // 2 tiles/s * 1.5 * 32 px / 1000 ms
        assert!((config.pixel_speed(1.5, 32) - 0.096).abs() < 1e-12);
    }

    #[test]
    fn pixel_speed_is_zero_without_reference_unit() {
        let config = EngineConfig {
            reference_time_ms: 0.0,
            ..EngineConfig::new()
        };
        assert_eq!(config.pixel_speed(1.0, 32), 0.0);
    }

    #[test]
    fn validate_rejects_non_positive_speeds() {
        assert_eq!(EngineConfig::new().validate(), Ok(()));

        let stalled = EngineConfig::new().with_base_speed(0.0);
        assert_eq!(
            stalled.validate(),
            Err(ConfigError::NonPositive {
                field: "base_speed",
                value: 0.0
            })
        );

        let negative_unit = EngineConfig {
            reference_time_ms: -5.0,
            ..EngineConfig::new()
        };
        assert!(matches!(
            negative_unit.validate(),
            Err(ConfigError::NonPositive {
                field: "reference_time_ms",
                ..
            })
        ));
        assert!(EngineConfig::new().with_base_speed(f64::NAN).validate().is_err());
    }

    #[test]
    fn move_mode_parses_case_insensitively() {
        assert_eq!("TURN".parse::<MoveMode>().unwrap(), MoveMode::Turn);
        assert_eq!(MoveMode::Tile.to_string(), "tile");
    }
}
