//! GCodeView Settings Crate
//!
//! Handles parser and level-of-detail configuration, presets, and persistence.

pub mod config;

pub use config::{default_config_path, Config, LodSettings, ParserSettings, Preset};
