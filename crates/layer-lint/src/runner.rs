//! `cargo test` embedding for the governance scan.

use layer_lint_core::{Config, Scanner};
use layer_lint_rules::default_rules;
use std::path::{Path, PathBuf};

/// Config file names to search for, in priority order.
const CONFIG_CANDIDATES: &[&str] = &["layer-lint.toml", ".layer-lint.toml"];

/// Runs the governance scan as part of `cargo test`.
///
/// The scan base is the workspace root discovered from
/// `CARGO_MANIFEST_DIR`; configuration is read from `layer-lint.toml` or
/// `.layer-lint.toml` next to it.
///
/// # Panics
///
/// Panics with the rendered text report when the verdict fails, or with a
/// diagnostic message when the scan itself cannot run.
pub fn enforce() {
    let root = find_project_root();
    let config = load_config(&root);

    let scanner = Scanner::builder()
        .base(&root)
        .config(config)
        .rules(default_rules())
        .build()
        .unwrap_or_else(|e| panic!("layer-lint: failed to build scanner: {e}"));

    let verdict = scanner
        .scan()
        .unwrap_or_else(|e| panic!("layer-lint: scan failed: {e}"));

    if !verdict.passed() {
        panic!("\n=== layer-lint ===\n{}", verdict.render_text());
    }
}

/// Loads the config file next to `root`, defaulting when absent.
fn load_config(root: &Path) -> Config {
    for candidate in CONFIG_CANDIDATES {
        let path = root.join(candidate);
        if path.exists() {
            return Config::from_file(&path)
                .unwrap_or_else(|e| panic!("layer-lint: {e}"));
        }
    }
    Config::default()
}

/// Checks whether a `Cargo.toml` defines a `[workspace]` section by parsing
/// as TOML, avoiding false positives from comments or strings.
fn has_workspace_section(cargo_toml: &Path) -> bool {
    let Ok(content) = std::fs::read_to_string(cargo_toml) else {
        return false;
    };
    let Ok(table) = content.parse::<toml::Table>() else {
        return false;
    };
    table.contains_key("workspace")
}

/// Finds the project root from `CARGO_MANIFEST_DIR`.
///
/// The manifest dir may be a workspace member; walk up to the workspace
/// root so the registry's relative roots resolve against the whole tree.
fn find_project_root() -> PathBuf {
    if let Ok(manifest_dir) = std::env::var("CARGO_MANIFEST_DIR") {
        let manifest_path = PathBuf::from(&manifest_dir);

        let mut candidate = manifest_path.as_path();
        loop {
            let cargo_toml = candidate.join("Cargo.toml");
            if cargo_toml.exists() && has_workspace_section(&cargo_toml) {
                return candidate.to_path_buf();
            }
            match candidate.parent() {
                Some(parent) => candidate = parent,
                None => break,
            }
        }

        return manifest_path;
    }

    std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn workspace_section_detected_by_parsing() {
        let tmp = TempDir::new().unwrap();
        let manifest = tmp.path().join("Cargo.toml");
        fs::write(&manifest, "[workspace]\nmembers = []\n").unwrap();
        assert!(has_workspace_section(&manifest));
    }

    #[test]
    fn workspace_in_comment_does_not_count() {
        let tmp = TempDir::new().unwrap();
        let manifest = tmp.path().join("Cargo.toml");
        fs::write(&manifest, "# [workspace]\n[package]\nname = \"x\"\nversion = \"0.1.0\"\n")
            .unwrap();
        assert!(!has_workspace_section(&manifest));
    }

    #[test]
    fn missing_manifest_is_not_a_workspace() {
        let tmp = TempDir::new().unwrap();
        assert!(!has_workspace_section(&tmp.path().join("Cargo.toml")));
    }

    #[test]
    fn load_config_defaults_when_absent() {
        let tmp = TempDir::new().unwrap();
        let config = load_config(tmp.path());
        assert!(config.is_rule_enabled("solver-no-checker"));
    }

    #[test]
    fn load_config_reads_candidate_file() {
        let tmp = TempDir::new().unwrap();
        fs::write(
            tmp.path().join("layer-lint.toml"),
            "[rules.source-file-budget]\nenabled = false\n",
        )
        .unwrap();
        let config = load_config(tmp.path());
        assert!(!config.is_rule_enabled("source-file-budget"));
    }
}
