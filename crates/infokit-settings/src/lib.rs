//! Infokit Settings Crate
//!
//! Handles editor configuration: loading, saving and validation.

pub mod config;
pub mod error;

pub use config::{EditorConfig, EventSettings, HistorySettings, InteractionSettings};
pub use error::{ConfigError, SettingsError, SettingsResult};
