//! Inspector settings.
//!
//! There is a single tunable, `max_depth`, the deepest tree level whose
//! children may still be materialized. Settings can be built in code or
//! loaded from TOML or JSON:
//!
//! ```
//! use amf_inspect::settings::InspectorSettings;
//!
//! let settings = InspectorSettings::from_toml_str("max_depth = 6").unwrap();
//! assert_eq!(settings.max_depth, 6);
//! ```

use std::fs;
use std::path::Path;

use amf_inspect_core::logging::targets;
use serde::{Deserialize, Serialize};

use crate::error::{SettingsError, SettingsResult};

/// Default value of [`InspectorSettings::max_depth`].
pub const DEFAULT_MAX_DEPTH: usize = 10;

/// Settings for tree materialization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct InspectorSettings {
    /// Expansion is refused for nodes deeper than this.
    pub max_depth: usize,
}

impl Default for InspectorSettings {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl InspectorSettings {
    /// Settings with a custom depth limit.
    pub fn with_max_depth(max_depth: usize) -> Self {
        Self { max_depth }
    }

    /// Parses settings from a TOML document. Missing keys take their defaults.
    pub fn from_toml_str(content: &str) -> SettingsResult<Self> {
        let settings: Self = toml::from_str(content)?;
        settings.validate()
    }

    /// Parses settings from a JSON document. Missing keys take their defaults.
    pub fn from_json_str(content: &str) -> SettingsResult<Self> {
        let settings: Self = serde_json::from_str(content)?;
        settings.validate()
    }

    /// Loads settings from a file, picking the format by extension
    /// (`.json` is JSON, anything else is TOML).
    pub fn load(path: impl AsRef<Path>) -> SettingsResult<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| SettingsError::io(path, e))?;
        let is_json = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
        let settings = if is_json {
            Self::from_json_str(&content)?
        } else {
            Self::from_toml_str(&content)?
        };
        tracing::debug!(
            target: targets::SETTINGS,
            path = %path.display(),
            max_depth = settings.max_depth,
            "loaded settings"
        );
        Ok(settings)
    }

    /// Serializes the settings as TOML.
    pub fn to_toml_string(&self) -> SettingsResult<String> {
        Ok(toml::to_string(self)?)
    }

    fn validate(self) -> SettingsResult<Self> {
        if self.max_depth == 0 {
            return Err(SettingsError::invalid_value(
                "max_depth",
                "must be at least 1",
            ));
        }
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_max_depth() {
        assert_eq!(InspectorSettings::default().max_depth, 10);
    }

    #[test]
    fn test_toml_missing_key_uses_default() {
        let settings = InspectorSettings::from_toml_str("").unwrap();
        assert_eq!(settings, InspectorSettings::default());
    }

    #[test]
    fn test_toml_ignores_unknown_keys() {
        let settings = InspectorSettings::from_toml_str("max_depth = 3\ntheme = \"dark\"").unwrap();
        assert_eq!(settings.max_depth, 3);
    }

    #[test]
    fn test_json() {
        let settings = InspectorSettings::from_json_str(r#"{"max_depth": 4}"#).unwrap();
        assert_eq!(settings.max_depth, 4);
    }

    #[test]
    fn test_zero_depth_rejected() {
        let err = InspectorSettings::from_toml_str("max_depth = 0").unwrap_err();
        assert!(matches!(err, SettingsError::InvalidValue { .. }));
    }

    #[test]
    fn test_wrong_type_rejected() {
        let err = InspectorSettings::from_toml_str("max_depth = \"deep\"").unwrap_err();
        assert!(matches!(err, SettingsError::Toml(_)));

        let err = InspectorSettings::from_json_str(r#"{"max_depth": -1}"#).unwrap_err();
        assert!(matches!(err, SettingsError::Json(_)));
    }

    #[test]
    fn test_load_from_files() {
        let dir = tempfile::tempdir().unwrap();

        let toml_path = dir.path().join("inspector.toml");
        fs::File::create(&toml_path)
            .unwrap()
            .write_all(b"max_depth = 7\n")
            .unwrap();
        assert_eq!(InspectorSettings::load(&toml_path).unwrap().max_depth, 7);

        let json_path = dir.path().join("inspector.JSON");
        fs::write(&json_path, r#"{"max_depth": 2}"#).unwrap();
        assert_eq!(InspectorSettings::load(&json_path).unwrap().max_depth, 2);
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = InspectorSettings::load(dir.path().join("absent.toml")).unwrap_err();
        assert!(matches!(err, SettingsError::Io { .. }));
    }

    #[test]
    fn test_toml_round_trip() {
        let settings = InspectorSettings::with_max_depth(12);
        let parsed = InspectorSettings::from_toml_str(&settings.to_toml_string().unwrap()).unwrap();
        assert_eq!(parsed, settings);
    }
}
