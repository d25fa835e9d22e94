//! Detector configuration.
//!
//! Provides TOML-based configuration with an XDG-compliant default path and
//! environment variable overrides. Every option has a default, so partial
//! files (or no file at all) are valid.

use crate::error::{ConfigError, ConfigResult};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Options recognised by the response-validity detector.
///
/// Loaded from `~/.config/fetchguard/detector.toml` (or platform equivalent)
/// when present. The detector only ever borrows this value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
#[allow(clippy::struct_excessive_bools)]
pub struct DetectorConfig {
    /// Minimum body length in bytes (0 disables the lower bound)
    pub min_content_length: usize,
    /// Maximum body length in bytes (unbounded when unset)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_content_length: Option<usize>,
    /// Substring expected in the `content-type` header (empty disables)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expected_content_type: Option<String>,
    /// Literal strings that must all appear in the body
    pub required_markers: Vec<String>,
    /// Minimum number of repeated items (products, posts, ...) expected
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_item_count: Option<usize>,
    /// Check for unloaded lazy-load placeholders
    pub check_lazy_loading: bool,
    /// Check for unresolved pagination and infinite scroll
    pub check_pagination: bool,
    /// Check for no-script fallback content
    pub check_noscript: bool,
    /// Check JSON-LD structured data completeness
    pub check_structured_data: bool,
    /// Enable the JS-rendering checks (framework shells, density, hydration data)
    pub check_js_rendering: bool,
    /// Minimum visible-text to total-size ratio before a page looks JS-rendered
    pub min_text_ratio: f64,
    /// Named patterns with minimum match counts, evaluated in order
    pub expected_patterns: Vec<ExpectedPattern>,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            min_content_length: 500,
            max_content_length: None,
            expected_content_type: Some("text/html".to_string()),
            required_markers: Vec::new(),
            min_item_count: None,
            check_lazy_loading: true,
            check_pagination: true,
            check_noscript: true,
            check_structured_data: true,
            check_js_rendering: false,
            min_text_ratio: 0.05,
            expected_patterns: Vec::new(),
        }
    }
}

/// A named regular expression that must match a minimum number of times.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpectedPattern {
    /// Label used in diagnostics (e.g. "prices")
    pub name: String,
    /// Regular expression, matched case-insensitively
    pub pattern: String,
    /// Minimum number of matches
    #[serde(default = "default_min_count")]
    pub min_count: usize,
}

impl ExpectedPattern {
    /// Create a named pattern.
    #[must_use]
    pub fn new(name: impl Into<String>, pattern: impl Into<String>, min_count: usize) -> Self {
        Self {
            name: name.into(),
            pattern: pattern.into(),
            min_count,
        }
    }
}

fn default_min_count() -> usize {
    1
}

impl DetectorConfig {
    /// Parse configuration from a TOML string.
    pub fn from_toml_str(contents: &str) -> ConfigResult<Self> {
        Ok(toml::from_str(contents)?)
    }

    /// Load configuration from a specific file.
    ///
    /// # Errors
    /// Returns [`ConfigError::NotFound`] if the file does not exist.
    pub fn load_from(path: &Path) -> ConfigResult<Self> {
        if !path.exists() {
            return Err(ConfigError::NotFound {
                path: path.display().to_string(),
            });
        }

        tracing::debug!("Loading detector config from {}", path.display());
        let contents = fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    /// Load configuration from the default path, falling back to defaults if not found.
    pub fn load() -> ConfigResult<Self> {
        let config_path = Self::config_path()?;

        if config_path.exists() {
            Self::load_from(&config_path)
        } else {
            tracing::debug!("Detector config not found, using defaults");
            Ok(Self::default())
        }
    }

    /// Load configuration from the default path, then apply environment overrides.
    pub fn load_with_env() -> ConfigResult<Self> {
        let mut config = Self::load()?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Apply overrides from the process environment.
    ///
    /// Supports the following environment variables:
    /// - `FETCHGUARD_MIN_CONTENT_LENGTH`
    /// - `FETCHGUARD_MAX_CONTENT_LENGTH`
    /// - `FETCHGUARD_EXPECTED_CONTENT_TYPE` (empty disables the check)
    /// - `FETCHGUARD_CHECK_JS_RENDERING` (true/false)
    /// - `FETCHGUARD_MIN_TEXT_RATIO`
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides_from(|key| std::env::var(key).ok());
    }

    /// Apply overrides using an arbitrary variable lookup.
    ///
    /// Values that fail to parse are ignored with a warning.
    pub fn apply_overrides_from<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(val) = lookup("FETCHGUARD_MIN_CONTENT_LENGTH") {
            match val.parse() {
                Ok(min) => {
                    self.min_content_length = min;
                    tracing::debug!("Override min_content_length from env: {}", min);
                }
                Err(_) => tracing::warn!("Ignoring invalid FETCHGUARD_MIN_CONTENT_LENGTH: {val}"),
            }
        }

        if let Some(val) = lookup("FETCHGUARD_MAX_CONTENT_LENGTH") {
            match val.parse() {
                Ok(max) => {
                    self.max_content_length = Some(max);
                    tracing::debug!("Override max_content_length from env: {}", max);
                }
                Err(_) => tracing::warn!("Ignoring invalid FETCHGUARD_MAX_CONTENT_LENGTH: {val}"),
            }
        }

        if let Some(val) = lookup("FETCHGUARD_EXPECTED_CONTENT_TYPE") {
            tracing::debug!("Override expected_content_type from env: {:?}", val);
            self.expected_content_type = if val.is_empty() { None } else { Some(val) };
        }

        if let Some(val) = lookup("FETCHGUARD_CHECK_JS_RENDERING") {
            match val.parse() {
                Ok(enabled) => {
                    self.check_js_rendering = enabled;
                    tracing::debug!("Override check_js_rendering from env: {}", enabled);
                }
                Err(_) => tracing::warn!("Ignoring invalid FETCHGUARD_CHECK_JS_RENDERING: {val}"),
            }
        }

        if let Some(val) = lookup("FETCHGUARD_MIN_TEXT_RATIO") {
            match val.parse() {
                Ok(ratio) => {
                    self.min_text_ratio = ratio;
                    tracing::debug!("Override min_text_ratio from env: {}", ratio);
                }
                Err(_) => tracing::warn!("Ignoring invalid FETCHGUARD_MIN_TEXT_RATIO: {val}"),
            }
        }
    }

    /// Save configuration to a file, creating parent directories as needed.
    pub fn save_to(&self, path: &Path) -> ConfigResult<()> {
        let config_dir = path.parent().ok_or_else(|| ConfigError::InvalidValue {
            field: "config_path".to_string(),
            reason: "no parent directory".to_string(),
        })?;

        fs::create_dir_all(config_dir)?;
        tracing::debug!("Saving detector config to {}", path.display());

        fs::write(path, self.to_toml_string()?)?;
        Ok(())
    }

    /// Render the configuration as pretty TOML.
    pub fn to_toml_string(&self) -> ConfigResult<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Get the path to the default configuration file.
    ///
    /// Uses XDG base directories: `~/.config/fetchguard/detector.toml`
    pub fn config_path() -> ConfigResult<PathBuf> {
        let dirs = ProjectDirs::from("com", "fetchguard", "fetchguard")
            .ok_or(ConfigError::NoConfigDir)?;
        Ok(dirs.config_dir().join("detector.toml"))
    }

    /// Expected content type, treating an empty string as disabled.
    #[must_use]
    pub fn expected_content_type(&self) -> Option<&str> {
        self.expected_content_type
            .as_deref()
            .filter(|value| !value.is_empty())
    }

    /// Minimum item count, treating 0 as disabled.
    #[must_use]
    pub fn min_item_count(&self) -> Option<usize> {
        self.min_item_count.filter(|count| *count > 0)
    }

    /// Validate value ranges and cross-field constraints.
    pub fn validate(&self) -> ConfigResult<()> {
        if let Some(max) = self.max_content_length {
            if max < self.min_content_length {
                return Err(ConfigError::InvalidValue {
                    field: "max_content_length".to_string(),
                    reason: format!(
                        "must be at least min_content_length ({}), got {max}",
                        self.min_content_length
                    ),
                });
            }
        }

        if !(0.0..=1.0).contains(&self.min_text_ratio) {
            return Err(ConfigError::InvalidValue {
                field: "min_text_ratio".to_string(),
                reason: format!("must be between 0 and 1, got {}", self.min_text_ratio),
            });
        }

        if let Some(pattern) = self.expected_patterns.iter().find(|p| p.name.trim().is_empty()) {
            return Err(ConfigError::InvalidValue {
                field: "expected_patterns".to_string(),
                reason: format!("pattern '{}' has an empty name", pattern.pattern),
            });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = DetectorConfig::default();
        assert_eq!(config.min_content_length, 500);
        assert_eq!(config.max_content_length, None);
        assert_eq!(config.expected_content_type(), Some("text/html"));
        assert!(config.required_markers.is_empty());
        assert!(config.check_lazy_loading);
        assert!(config.check_pagination);
        assert!(!config.check_js_rendering);
        assert!((config.min_text_ratio - 0.05).abs() < f64::EPSILON);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_config() {
        let toml_str = r#"
min_content_length = 1000
check_js_rendering = true
required_markers = ["<html", "</html>"]

[[expected_patterns]]
name = "prices"
pattern = '\$\d+\.\d{2}'
min_count = 20

[[expected_patterns]]
name = "ratings"
pattern = '\d+\.\d+\s*stars?'
"#;

        let config = DetectorConfig::from_toml_str(toml_str).expect("parse partial config");
        assert_eq!(config.min_content_length, 1000);
        assert!(config.check_js_rendering);
        assert_eq!(config.required_markers.len(), 2);
        assert_eq!(config.expected_patterns.len(), 2);
        assert_eq!(config.expected_patterns[0].name, "prices");
        assert_eq!(config.expected_patterns[0].min_count, 20);
        assert_eq!(config.expected_patterns[1].min_count, 1);
        // These should be defaults
        assert_eq!(config.expected_content_type(), Some("text/html"));
        assert!(config.check_pagination);
    }

    #[test]
    fn test_empty_content_type_disables_check() {
        let config = DetectorConfig::from_toml_str(r#"expected_content_type = """#)
            .expect("parse config");
        assert_eq!(config.expected_content_type(), None);
    }

    #[test]
    fn test_zero_item_count_disables_check() {
        let config = DetectorConfig {
            min_item_count: Some(0),
            ..DetectorConfig::default()
        };
        assert_eq!(config.min_item_count(), None);
    }

    #[test]
    fn test_config_save_load() {
        let tmp = TempDir::new().expect("create temp dir");
        let config_path = tmp.path().join("nested").join("detector.toml");

        let config = DetectorConfig {
            min_content_length: 2000,
            max_content_length: Some(5_000_000),
            check_js_rendering: true,
            required_markers: vec!["price".to_string(), "cart".to_string()],
            expected_patterns: vec![ExpectedPattern::new("prices", r"\$\d+\.\d{2}", 24)],
            ..DetectorConfig::default()
        };

        config.save_to(&config_path).expect("save config");
        let loaded = DetectorConfig::load_from(&config_path).expect("load config");

        assert_eq!(loaded, config);
    }

    #[test]
    fn test_load_missing_file() {
        let tmp = TempDir::new().expect("create temp dir");
        let result = DetectorConfig::load_from(&tmp.path().join("missing.toml"));
        assert!(matches!(result, Err(ConfigError::NotFound { .. })));
    }

    #[test]
    fn test_env_overrides() {
        let vars: HashMap<&str, &str> = [
            ("FETCHGUARD_MIN_CONTENT_LENGTH", "100"),
            ("FETCHGUARD_MAX_CONTENT_LENGTH", "9000"),
            ("FETCHGUARD_EXPECTED_CONTENT_TYPE", ""),
            ("FETCHGUARD_CHECK_JS_RENDERING", "true"),
            ("FETCHGUARD_MIN_TEXT_RATIO", "0.1"),
        ]
        .into_iter()
        .collect();

        let mut config = DetectorConfig::default();
        config.apply_overrides_from(|key| vars.get(key).map(|v| (*v).to_string()));

        assert_eq!(config.min_content_length, 100);
        assert_eq!(config.max_content_length, Some(9000));
        assert_eq!(config.expected_content_type(), None);
        assert!(config.check_js_rendering);
        assert!((config.min_text_ratio - 0.1).abs() < f64::EPSILON);
    }

    #[test]
    fn test_invalid_env_override_ignored() {
        let mut config = DetectorConfig::default();
        config.apply_overrides_from(|key| {
            (key == "FETCHGUARD_MIN_CONTENT_LENGTH").then(|| "lots".to_string())
        });
        assert_eq!(config.min_content_length, 500);
    }

    #[test]
    fn test_validate_rejects_inverted_bounds() {
        let config = DetectorConfig {
            min_content_length: 1000,
            max_content_length: Some(10),
            ..DetectorConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidValue { ref field, .. }) if field == "max_content_length"
        ));
    }

    #[test]
    fn test_validate_rejects_ratio_out_of_range() {
        let config = DetectorConfig {
            min_text_ratio: 1.5,
            ..DetectorConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_unnamed_pattern() {
        let config = DetectorConfig {
            expected_patterns: vec![ExpectedPattern::new(" ", r"\d+", 1)],
            ..DetectorConfig::default()
        };
        assert!(config.validate().is_err());
    }
}
