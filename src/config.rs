use std::path::Path;

use crate::error::ConfigError;
use crate::game::GameSettings;

/// Terminal front-end settings.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct UiConfig {
    /// Pause between replayed explosion steps, in milliseconds.
    pub step_delay_ms: u64,
    /// Seconds before an idle turn is skipped; 0 disables the timer.
    pub turn_time_limit_secs: u64,
}

impl Default for UiConfig {
    fn default() -> Self {
        UiConfig {
            step_delay_ms: 200,
            turn_time_limit_secs: 20,
        }
    }
}

/// Top-level application configuration, loadable from TOML.
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub game: GameSettings,
    pub ui: UiConfig,
}

impl AppConfig {
    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::FileRead {
            path: path.to_path_buf(),
            source: e,
        })?;
        let config: AppConfig = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file, falling back to defaults if the file
    /// does not exist.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            Self::load(path)
        } else {
            log::warn!("config file '{}' not found, using defaults", path.display());
            Ok(Self::default())
        }
    }

    /// Validate configuration values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.game.rows < 2 {
            return Err(ConfigError::Validation("game.rows must be >= 2".into()));
        }
        if self.game.cols < 2 {
            return Err(ConfigError::Validation("game.cols must be >= 2".into()));
        }
        if self.game.max_players == 0 {
            return Err(ConfigError::Validation(
                "game.max_players must be >= 1".into(),
            ));
        }
        if self.game.explosion_cap_factor == 0 {
            return Err(ConfigError::Validation(
                "game.explosion_cap_factor must be >= 1".into(),
            ));
        }
        Ok(())
    }

    /// Generate a TOML string with all default values (useful for creating
    /// example config files).
    pub fn default_toml() -> String {
        toml::to_string_pretty(&AppConfig::default()).expect("default config serializes")
    }
}
