//! Error types for AMF Inspect.
//!
//! Materializing and expanding trees never fails; these errors only appear
//! at the edges, when loading settings or when a typed object cannot list
//! its fields.

use std::path::PathBuf;

/// Result type alias for settings operations.
pub type SettingsResult<T> = std::result::Result<T, SettingsError>;

/// A typed object failed to list its fields.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Cannot read fields of '{type_name}': {message}")]
pub struct DescribeError {
    /// Type of the object that failed.
    pub type_name: String,
    /// What went wrong.
    pub message: String,
}

impl DescribeError {
    /// Create a describe error.
    pub fn new(type_name: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            message: message.into(),
        }
    }
}

/// Errors that can occur while loading inspector settings.
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    /// File I/O error.
    #[error("Failed to read settings '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// TOML syntax or shape error.
    #[error("Invalid TOML settings: {0}")]
    Toml(#[from] toml::de::Error),

    /// Settings could not be written as TOML.
    #[error("Cannot serialize settings as TOML: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    /// JSON syntax or shape error.
    #[error("Invalid JSON settings: {0}")]
    Json(#[from] serde_json::Error),

    /// A setting parsed but holds an unusable value.
    #[error("Invalid value for setting '{setting}': {message}")]
    InvalidValue { setting: String, message: String },
}

impl SettingsError {
    /// Create an I/O error.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Create a value error.
    pub fn invalid_value(setting: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidValue {
            setting: setting.into(),
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_describe_error_display() {
        let err = DescribeError::new("Widget", "getter panicked");
        assert_eq!(err.to_string(), "Cannot read fields of 'Widget': getter panicked");
    }

    #[test]
    fn test_settings_error_display() {
        let err = SettingsError::invalid_value("max_depth", "must be at least 1");
        assert!(matches!(err, SettingsError::InvalidValue { .. }));
        assert_eq!(
            err.to_string(),
            "Invalid value for setting 'max_depth': must be at least 1"
        );
    }
}
