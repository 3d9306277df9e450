//! Error handling for GCodeView
//!
//! The toolpath interpreter itself never fails: malformed input degrades to
//! fewer waypoints. Errors only arise at the edges of the system:
//! - Settings errors (validation, presets, file formats)
//! - I/O and (de)serialization errors while loading or saving configuration
//!
//! All error types use `thiserror` for ergonomic error handling.

use thiserror::Error;

/// Settings error type
///
/// Represents invalid configuration values and unsupported configuration sources.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SettingsError {
    /// A configuration value is out of its valid range
    #[error("Invalid setting '{key}': {reason}")]
    InvalidValue {
        /// The setting key, e.g. `parser.max_arc_segments`.
        key: String,
        /// Why the value was rejected.
        reason: String,
    },

    /// The configuration file extension is not `.json` or `.toml`
    #[error("Unsupported config format: {0}")]
    UnsupportedFormat(String),

    /// A preset name did not match any known preset
    #[error("Unknown preset: {0}")]
    UnknownPreset(String),
}

impl SettingsError {
    /// Shorthand for [`SettingsError::InvalidValue`].
    pub fn invalid(key: impl Into<String>, reason: impl Into<String>) -> Self {
        SettingsError::InvalidValue {
            key: key.into(),
            reason: reason.into(),
        }
    }
}

/// Main error type for GCodeView
///
/// A unified error type that can represent any error from all layers.
/// This is the primary error type used in public APIs.
#[derive(Error, Debug)]
pub enum Error {
    /// Settings error
    #[error(transparent)]
    Settings(#[from] SettingsError),

    /// Standard I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML deserialization error
    #[error("TOML error: {0}")]
    TomlDe(#[from] toml::de::Error),

    /// TOML serialization error
    #[error("TOML error: {0}")]
    TomlSer(#[from] toml::ser::Error),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create an error from a string message
    pub fn other(msg: impl Into<String>) -> Self {
        Error::Other(msg.into())
    }

    /// Check if this is a settings error
    pub fn is_settings_error(&self) -> bool {
        matches!(self, Error::Settings(_))
    }

    /// Check if this error came from reading or writing a file
    pub fn is_io_error(&self) -> bool {
        matches!(self, Error::Io(_))
    }
}

/// Result type using Error
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_settings_error_display() {
        let err = SettingsError::invalid("parser.max_arc_segments", "must be >= min_arc_segments");
        assert_eq!(
            err.to_string(),
            "Invalid setting 'parser.max_arc_segments': must be >= min_arc_segments"
        );

        let err = SettingsError::UnsupportedFormat("yaml".to_string());
        assert_eq!(err.to_string(), "Unsupported config format: yaml");

        let err = SettingsError::UnknownPreset("ultra".to_string());
        assert_eq!(err.to_string(), "Unknown preset: ultra");
    }

    #[test]
    fn test_error_conversion() {
        let err: Error = SettingsError::UnknownPreset("x".to_string()).into();
        assert!(err.is_settings_error());
        assert_eq!(err.to_string(), "Unknown preset: x");

        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: Error = io_err.into();
        assert!(err.is_io_error());
        assert!(!err.is_settings_error());
    }

    #[test]
    fn test_other() {
        let err = Error::other("could not interpret file");
        assert_eq!(err.to_string(), "could not interpret file");
    }
}
