//! Configuration file resolution with global fallback.
//!
//! Priority order:
//!
//! 1. `--config` flag (explicit path)
//! 2. `{base}/layer-lint.toml` or `.layer-lint.toml`
//! 3. `~/.layer-lint/config.toml` (global fallback)
//! 4. No config found → defaults

use std::path::{Path, PathBuf};

/// Where the configuration was found.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    /// Explicitly specified via `--config` flag.
    Explicit(PathBuf),
    /// Found next to the scan base.
    Project(PathBuf),
    /// Loaded from the global config directory.
    Global(PathBuf),
    /// No config found; defaults will be used.
    Default,
}

impl ConfigSource {
    /// Returns the resolved path, if any.
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::Explicit(p) | Self::Project(p) | Self::Global(p) => Some(p),
            Self::Default => None,
        }
    }

    /// Returns `true` if the config came from the global directory.
    #[must_use]
    pub fn is_global(&self) -> bool {
        matches!(self, Self::Global(_))
    }
}

/// Base-level config file names, checked in order.
const PROJECT_CONFIG_NAMES: &[&str] = &["layer-lint.toml", ".layer-lint.toml"];

/// Config file name within the global config directory.
const GLOBAL_CONFIG_NAME: &str = "config.toml";

/// Resolves the configuration file path. See module docs for the order.
#[must_use]
pub fn resolve(base: &Path, explicit: Option<&Path>) -> ConfigSource {
    resolve_inner(base, explicit, global_config_dir())
}

/// Testable core: takes the global dir as a parameter to avoid env races.
fn resolve_inner(base: &Path, explicit: Option<&Path>, global_dir: Option<PathBuf>) -> ConfigSource {
    if let Some(p) = explicit {
        return ConfigSource::Explicit(p.to_path_buf());
    }

    for name in PROJECT_CONFIG_NAMES {
        let candidate = base.join(name);
        if candidate.exists() {
            tracing::debug!("found project config: {}", candidate.display());
            return ConfigSource::Project(candidate);
        }
    }

    if let Some(dir) = global_dir {
        let candidate = dir.join(GLOBAL_CONFIG_NAME);
        if candidate.exists() {
            tracing::debug!("found global config: {}", candidate.display());
            return ConfigSource::Global(candidate);
        }
    }

    ConfigSource::Default
}

/// Returns the global config directory.
///
/// Resolution: `$LAYER_LINT_CONFIG_DIR` > `~/.layer-lint/`. The env var
/// override supports tests and custom CI setups.
#[must_use]
pub fn global_config_dir() -> Option<PathBuf> {
    if let Ok(dir) = std::env::var("LAYER_LINT_CONFIG_DIR") {
        return Some(PathBuf::from(dir));
    }
    home::home_dir().map(|h| h.join(".layer-lint"))
}
