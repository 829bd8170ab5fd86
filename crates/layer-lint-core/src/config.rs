//! Configuration types for layer-lint.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;

/// Top-level configuration.
///
/// The rule registry itself is fixed; configuration only overrides the scan
/// root and gates individual rules off by name.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Scan-level settings.
    #[serde(default)]
    pub scan: ScanConfig,

    /// Per-rule toggles keyed by rule name.
    #[serde(default)]
    pub rules: HashMap<String, RuleToggle>,
}

impl Config {
    /// Creates a new default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &std::path::Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        Self::parse(&content)
    }

    /// Parses configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML is invalid.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::Parse {
            message: e.to_string(),
        })
    }

    /// Checks if a rule is enabled. Unknown rules default to enabled.
    #[must_use]
    pub fn is_rule_enabled(&self, rule_name: &str) -> bool {
        self.rules
            .get(rule_name)
            .map_or(true, |t| t.enabled.unwrap_or(true))
    }
}

/// Scan-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScanConfig {
    /// Base directory the registry's relative roots resolve against.
    #[serde(default)]
    pub root: Option<PathBuf>,
}

/// Per-rule toggle.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RuleToggle {
    /// Whether the rule runs; `None` means enabled.
    #[serde(default)]
    pub enabled: Option<bool>,
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// IO error reading a config file.
    #[error("failed to read config file {path}: {source}")]
    Io {
        /// Path that failed to read.
        path: PathBuf,
        /// Underlying IO error.
        source: std::io::Error,
    },

    /// Parse error in a config file.
    #[error("failed to parse config: {message}")]
    Parse {
        /// Parse error message.
        message: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_enables_everything() {
        let config = Config::default();
        assert!(config.is_rule_enabled("solver-no-checker"));
        assert!(config.scan.root.is_none());
    }

    #[test]
    fn parse_scan_root_and_rule_toggle() {
        let toml = r#"
[scan]
root = "../compiler"

[rules.source-file-budget]
enabled = false
"#;
        let config = Config::parse(toml).unwrap();
        assert_eq!(config.scan.root, Some(PathBuf::from("../compiler")));
        assert!(!config.is_rule_enabled("source-file-budget"));
        assert!(config.is_rule_enabled("solver-no-checker"));
    }

    #[test]
    fn invalid_toml_is_a_parse_error() {
        let err = Config::parse("[scan\nroot = ").unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }
}
