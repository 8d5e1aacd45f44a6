//! Runtime configuration and its TOML loader.

use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::{Deserialize, Serialize};
use tile_core::{EngineConfig, VirtCoord};

use crate::areas::{LoadResult, read_file};

/// Everything needed to start a [`crate::World`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuntimeConfig {
    /// Movement parameters passed to every entity update.
    pub engine: EngineConfig,
    /// Area focused at startup.
    pub start_area: String,
    /// Where the player appears in `start_area`.
    pub start_coord: VirtCoord,
    /// Default tracing directive, combined with `RUST_LOG`.
    pub log_filter: String,
    /// Directory holding `<area>.ron` files.
    pub area_dir: PathBuf,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            engine: EngineConfig::default(),
            start_area: "start".to_owned(),
            start_coord: VirtCoord::new(0, 0, 0.0),
            log_filter: "info".to_owned(),
            area_dir: PathBuf::from("areas"),
        }
    }
}

/// Loader for runtime configuration from TOML files.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load config data from a TOML file. Missing keys keep their defaults.
    pub fn load(path: &Path) -> LoadResult<RuntimeConfig> {
        let content = read_file(path)?;
        Self::parse(&content)
    }

    /// Parse and validate config data.
    pub fn parse(content: &str) -> LoadResult<RuntimeConfig> {
        let config: RuntimeConfig = toml::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse config TOML: {}", e))?;
        config.engine.validate().context("invalid [engine] table")?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tile_core::{ConfigError, MoveMode};

    #[test]
    fn empty_document_yields_defaults() {
        let config = ConfigLoader::parse("").unwrap();
        assert_eq!(config, RuntimeConfig::default());
    }

    #[test]
    fn nested_engine_table_overrides_fields() {
        let config = ConfigLoader::parse(
            r#"
            start_area = "village"
            start_coord = { x = 3, y = 4, z = 0.0 }

            [engine]
            move_mode = "turn"
            base_speed = 2.5
            "#,
        )
        .unwrap();

        assert_eq!(config.start_area, "village");
        assert_eq!(config.start_coord, VirtCoord::new(3, 4, 0.0));
        assert_eq!(config.engine.move_mode, MoveMode::Turn);
        assert_eq!(config.engine.base_speed, 2.5);
        assert_eq!(
            config.engine.reference_time_ms,
            EngineConfig::DEFAULT_REFERENCE_TIME_MS
        );
        assert_eq!(config.log_filter, "info");
    }

    #[test]
    fn malformed_toml_is_an_error() {
        let err = ConfigLoader::parse("start_area = [").unwrap_err();
        assert!(err.to_string().contains("Failed to parse config TOML"));
    }

    #[test]
    fn non_positive_speeds_are_rejected() {
        for table in [
            "[engine]\nbase_speed = 0.0",
            "[engine]\nbase_speed = -2.0",
            "[engine]\nreference_time_ms = 0.0",
        ] {
            let err = ConfigLoader::parse(table).unwrap_err();
            assert!(err.to_string().contains("invalid [engine] table"), "{table}");
            assert!(
                matches!(err.downcast_ref::<ConfigError>(), Some(ConfigError::NonPositive { .. })),
                "{table}"
            );
        }
    }
}
