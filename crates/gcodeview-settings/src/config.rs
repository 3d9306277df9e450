//! Configuration for GCodeView
//!
//! Provides configuration file handling, presets, and validation.
//! Supports JSON and TOML file formats stored in platform-specific directories.
//!
//! Configuration is organized into logical sections:
//! - Parser settings (arc tessellation detail, segment bounds, spacing)
//! - LOD settings (point budget, small-feature preservation)

use gcodeview_core::constants::{
    AGGRESSIVE_SMALL_FEATURE_THRESHOLD, DEFAULT_ARC_DETAIL, DEFAULT_MAX_ARC_SEGMENTS,
    DEFAULT_MIN_ARC_SEGMENTS, DEFAULT_MIN_SEGMENT_SPACING, DEFAULT_POINT_BUDGET,
    DEFAULT_SMALL_FEATURE_THRESHOLD, HIGH_ARC_DETAIL, HIGH_DETAIL_MIN_SEGMENT_SPACING,
};
use gcodeview_core::{Result, SettingsError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::debug;

/// Arc tessellation settings consumed by the toolpath parser
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParserSettings {
    /// Multiplier on arc point density (1.0 = standard, 4.0 = high detail)
    pub arc_detail_multiplier: f32,
    /// Upper bound on segments emitted for one arc
    pub max_arc_segments: u32,
    /// Lower bound on segments emitted for one arc
    pub min_arc_segments: u32,
    /// Arc points closer than this to the previous point are skipped (large radii only)
    pub min_segment_spacing: f32,
    /// Interpolate the out-of-plane axis through an arc instead of holding it
    pub helical_interpolation: bool,
}

impl Default for ParserSettings {
    fn default() -> Self {
        Self {
            arc_detail_multiplier: DEFAULT_ARC_DETAIL,
            max_arc_segments: DEFAULT_MAX_ARC_SEGMENTS,
            min_arc_segments: DEFAULT_MIN_ARC_SEGMENTS,
            min_segment_spacing: DEFAULT_MIN_SEGMENT_SPACING,
            helical_interpolation: false,
        }
    }
}

impl ParserSettings {
    /// High-detail arcs: 4x density, doubled segment cap, tighter spacing
    pub fn high_detail() -> Self {
        Self {
            arc_detail_multiplier: HIGH_ARC_DETAIL,
            max_arc_segments: DEFAULT_MAX_ARC_SEGMENTS * 2,
            min_segment_spacing: HIGH_DETAIL_MIN_SEGMENT_SPACING,
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.arc_detail_multiplier.is_finite() && self.arc_detail_multiplier > 0.0) {
            return Err(
                SettingsError::invalid("parser.arc_detail_multiplier", "must be > 0").into(),
            );
        }
        if self.min_arc_segments == 0 {
            return Err(SettingsError::invalid("parser.min_arc_segments", "must be > 0").into());
        }
        if self.max_arc_segments < self.min_arc_segments {
            return Err(SettingsError::invalid(
                "parser.max_arc_segments",
                format!(
                    "must be >= min_arc_segments ({})",
                    self.min_arc_segments
                ),
            )
            .into());
        }
        if !(self.min_segment_spacing.is_finite() && self.min_segment_spacing >= 0.0) {
            return Err(
                SettingsError::invalid("parser.min_segment_spacing", "must be >= 0").into(),
            );
        }
        Ok(())
    }
}

/// Level-of-detail settings consumed by the rendering side
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LodSettings {
    /// Apply LOD reduction at all
    pub enabled: bool,
    /// Total rendered points allowed before reduction (0 = unlimited)
    pub point_budget: usize,
    /// Decimate small features (tabs, slots, corners) more gently
    pub preserve_small_features: bool,
    /// Bounding-box area and dimension threshold for small features
    pub small_feature_threshold: f32,
}

impl Default for LodSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            point_budget: DEFAULT_POINT_BUDGET,
            preserve_small_features: true,
            small_feature_threshold: DEFAULT_SMALL_FEATURE_THRESHOLD,
        }
    }
}

impl LodSettings {
    /// Aggressive reduction: half the budget, larger small-feature threshold
    pub fn aggressive() -> Self {
        Self {
            point_budget: DEFAULT_POINT_BUDGET / 2,
            small_feature_threshold: AGGRESSIVE_SMALL_FEATURE_THRESHOLD,
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.small_feature_threshold.is_finite() && self.small_feature_threshold > 0.0) {
            return Err(
                SettingsError::invalid("lod.small_feature_threshold", "must be > 0").into(),
            );
        }
        Ok(())
    }
}

/// Named configuration presets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Preset {
    /// Default parser and LOD settings
    #[default]
    Standard,
    /// Dense arcs for inspecting fine features
    HighDetail,
    /// Strong reduction for very large files
    Aggressive,
}

impl fmt::Display for Preset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Standard => write!(f, "standard"),
            Self::HighDetail => write!(f, "high-detail"),
            Self::Aggressive => write!(f, "aggressive"),
        }
    }
}

impl FromStr for Preset {
    type Err = SettingsError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().replace('_', "-").as_str() {
            "standard" | "default" => Ok(Self::Standard),
            "high-detail" | "high" => Ok(Self::HighDetail),
            "aggressive" => Ok(Self::Aggressive),
            _ => Err(SettingsError::UnknownPreset(s.to_string())),
        }
    }
}

/// Complete configuration
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Arc tessellation settings
    pub parser: ParserSettings,
    /// Level-of-detail settings
    pub lod: LodSettings,
}

impl Config {
    /// Create new config with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the configuration for a preset
    pub fn from_preset(preset: Preset) -> Self {
        match preset {
            Preset::Standard => Self::default(),
            Preset::HighDetail => Self {
                parser: ParserSettings::high_detail(),
                lod: LodSettings::default(),
            },
            Preset::Aggressive => Self {
                parser: ParserSettings::default(),
                lod: LodSettings::aggressive(),
            },
        }
    }

    /// Load config from file (JSON or TOML)
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;

        let config: Self = match ConfigFormat::from_path(path)? {
            ConfigFormat::Json => serde_json::from_str(&content)?,
            ConfigFormat::Toml => toml::from_str(&content)?,
        };

        config.validate()?;
        debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Save config to file (JSON or TOML)
    pub fn save_to_file(&self, path: &Path) -> Result<()> {
        self.validate()?;

        let content = match ConfigFormat::from_path(path)? {
            ConfigFormat::Json => serde_json::to_string_pretty(self)?,
            ConfigFormat::Toml => toml::to_string_pretty(self)?,
        };

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        std::fs::write(path, content)?;
        debug!("Saved config to {}", path.display());
        Ok(())
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        self.parser.validate()?;
        self.lod.validate()?;
        Ok(())
    }
}

#[derive(Debug, Clone, Copy)]
enum ConfigFormat {
    Json,
    Toml,
}

impl ConfigFormat {
    fn from_path(path: &Path) -> Result<Self> {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => Ok(Self::Json),
            Some("toml") => Ok(Self::Toml),
            other => Err(SettingsError::UnsupportedFormat(other.unwrap_or("").to_string()).into()),
        }
    }
}

/// Default location of the user config file (`<config_dir>/gcodeview/config.toml`)
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("gcodeview").join("config.toml"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.parser.max_arc_segments, 300);
        assert_eq!(config.parser.arc_detail_multiplier, 1.0);
        assert_eq!(config.lod.small_feature_threshold, 5.0);
    }

    #[test]
    fn test_high_detail_preset() {
        let config = Config::from_preset(Preset::HighDetail);
        assert_eq!(config.parser.arc_detail_multiplier, 4.0);
        assert_eq!(config.parser.max_arc_segments, 600);
        assert!(config.parser.min_segment_spacing < DEFAULT_MIN_SEGMENT_SPACING);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_aggressive_preset() {
        let config = Config::from_preset(Preset::Aggressive);
        assert_eq!(config.lod.small_feature_threshold, 20.0);
        assert!(config.lod.point_budget < DEFAULT_POINT_BUDGET);
    }

    #[test]
    fn test_preset_from_str() {
        assert_eq!("high-detail".parse::<Preset>().unwrap(), Preset::HighDetail);
        assert_eq!("HIGH_DETAIL".parse::<Preset>().unwrap(), Preset::HighDetail);
        assert_eq!("standard".parse::<Preset>().unwrap(), Preset::Standard);
        assert!(matches!(
            "ultra".parse::<Preset>(),
            Err(SettingsError::UnknownPreset(_))
        ));
    }

    #[test]
    fn test_validate_rejects_bad_segment_bounds() {
        let mut config = Config::default();
        config.parser.max_arc_segments = 2;
        config.parser.min_arc_segments = 8;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.parser.min_arc_segments = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_bad_multiplier_and_threshold() {
        let mut config = Config::default();
        config.parser.arc_detail_multiplier = 0.0;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.lod.small_feature_threshold = -1.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config: Config = toml::from_str("[lod]\npoint_budget = 1000\n").unwrap();
        assert_eq!(config.lod.point_budget, 1000);
        assert!(config.lod.enabled);
        assert_eq!(config.parser, ParserSettings::default());
    }
}
