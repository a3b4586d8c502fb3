//! Editor configuration.
//!
//! Sections mirror the kernel subsystems they tune. Every section has
//! defaults so a partial file (or no file at all) yields a usable config.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use infokit_core::EventBusConfig;

use crate::error::{ConfigError, SettingsResult};

const CONFIG_DIR: &str = "infokit";
const CONFIG_FILE: &str = "config.toml";

/// Undo/redo history settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HistorySettings {
    /// Maximum number of undo units kept; the oldest are evicted first
    pub max_depth: usize,
}

impl Default for HistorySettings {
    fn default() -> Self {
        Self { max_depth: 50 }
    }
}

/// Pointer gesture settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InteractionSettings {
    /// Pointer travel (screen pixels) that turns a press into a drag
    pub drag_threshold_px: f64,
    /// A gesture lock older than this is reclaimed by the next request
    pub gesture_timeout_ms: u64,
}

impl InteractionSettings {
    pub fn gesture_timeout(&self) -> Duration {
        Duration::from_millis(self.gesture_timeout_ms)
    }
}

impl Default for InteractionSettings {
    fn default() -> Self {
        Self {
            drag_threshold_px: 3.0,
            gesture_timeout_ms: 10_000,
        }
    }
}

/// Event bus settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EventSettings {
    /// Capacity of the async broadcast channel
    pub channel_capacity: usize,
    /// Whether published events are kept for inspection
    pub enable_history: bool,
    /// Maximum number of retained events
    pub max_history_size: usize,
    /// Retention window for history, in seconds
    pub history_retention_secs: u64,
}

impl EventSettings {
    /// Builds the bus configuration described by these settings.
    pub fn to_bus_config(&self) -> EventBusConfig {
        EventBusConfig {
            channel_capacity: self.channel_capacity,
            enable_history: self.enable_history,
            max_history_size: self.max_history_size,
            history_retention: Duration::from_secs(self.history_retention_secs),
        }
    }
}

impl Default for EventSettings {
    fn default() -> Self {
        Self {
            channel_capacity: 1024,
            enable_history: false,
            max_history_size: 1000,
            history_retention_secs: 300,
        }
    }
}

/// Complete editor configuration
///
/// Aggregates all settings sections and provides file I/O operations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct EditorConfig {
    /// History settings
    pub history: HistorySettings,
    /// Interaction settings
    pub interaction: InteractionSettings,
    /// Event bus settings
    pub events: EventSettings,
}

impl EditorConfig {
    /// Create new config with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Default config location (`<config dir>/infokit/config.toml`)
    pub fn default_path() -> SettingsResult<PathBuf> {
        let dir = dirs::config_dir().ok_or_else(|| {
            ConfigError::UnsupportedPlatform("no user configuration directory".to_string())
        })?;
        Ok(dir.join(CONFIG_DIR).join(CONFIG_FILE))
    }

    /// Load config from file (JSON or TOML)
    pub fn load_from_file(path: &Path) -> SettingsResult<Self> {
        let content = std::fs::read_to_string(path)?;

        let config: Self = match Format::of(path)? {
            Format::Json => serde_json::from_str(&content)?,
            Format::Toml => toml::from_str(&content)?,
        };

        config.validate()?;
        tracing::debug!("Loaded editor config from {}", path.display());
        Ok(config)
    }

    /// Load from `path`, falling back to defaults when the file is missing
    pub fn load_or_default(path: &Path) -> SettingsResult<Self> {
        if path.exists() {
            Self::load_from_file(path)
        } else {
            tracing::info!("No config at {}, using defaults", path.display());
            Ok(Self::default())
        }
    }

    /// Save config to file (JSON or TOML)
    pub fn save_to_file(&self, path: &Path) -> SettingsResult<()> {
        self.validate()?;

        let content = match Format::of(path)? {
            Format::Json => serde_json::to_string_pretty(self)?,
            Format::Toml => toml::to_string_pretty(self)?,
        };

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.history.max_depth == 0 {
            return Err(out_of_range("history.max_depth", self.history.max_depth));
        }

        if !(self.interaction.drag_threshold_px >= 0.0
            && self.interaction.drag_threshold_px.is_finite())
        {
            return Err(out_of_range(
                "interaction.drag_threshold_px",
                self.interaction.drag_threshold_px,
            ));
        }

        if self.interaction.gesture_timeout_ms == 0 {
            return Err(out_of_range(
                "interaction.gesture_timeout_ms",
                self.interaction.gesture_timeout_ms,
            ));
        }

        if self.events.channel_capacity == 0 {
            return Err(out_of_range(
                "events.channel_capacity",
                self.events.channel_capacity,
            ));
        }

        Ok(())
    }
}

fn out_of_range(key: &str, value: impl ToString) -> ConfigError {
    ConfigError::ValueOutOfRange {
        key: key.to_string(),
        value: value.to_string(),
    }
}

enum Format {
    Json,
    Toml,
}

impl Format {
    fn of(path: &Path) -> Result<Self, ConfigError> {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => Ok(Format::Json),
            Some("toml") => Ok(Format::Toml),
            other => Err(ConfigError::UnsupportedFormat(
                other.unwrap_or("<none>").to_string(),
            )),
        }
    }
}
