//! Check command implementation.

use anyhow::{Context, Result};
use layer_lint_core::{Config, Scanner, Verdict};
use layer_lint_rules::default_rules;
use std::path::Path;

use crate::config_resolver;

/// Runs the check command.
///
/// Persists the verdict before printing it, so an unwritable `--out` path
/// aborts the run instead of leaving a report that looks authoritative.
pub fn run(path: &Path, json: bool, out: Option<&Path>, config: Option<&Path>) -> Result<()> {
    let source = config_resolver::resolve(path, config);
    let config = match source.path() {
        None => Config::default(),
        Some(p) => {
            if source.is_global() {
                tracing::info!("using global config: {}", p.display());
            }
            Config::from_file(p)
                .with_context(|| format!("failed to load config: {}", p.display()))?
        }
    };

    let scanner = Scanner::builder()
        .base(path)
        .config(config)
        .rules(default_rules())
        .build()
        .context("failed to build scanner")?;

    tracing::info!(
        "checking {} with {} rules",
        scanner.base().display(),
        scanner.rule_count()
    );

    let verdict = scanner.scan().context("scan failed")?;

    if let Some(out_path) = out {
        persist(&verdict, out_path)?;
    }

    super::output::print(&verdict, json)?;

    if !verdict.passed() {
        std::process::exit(1);
    }

    Ok(())
}

/// Writes the JSON verdict to `path`, creating parent directories.
fn persist(verdict: &Verdict, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("failed to create {}", parent.display()))?;
        }
    }
    let json = verdict.to_json().context("failed to serialize verdict")?;
    std::fs::write(path, json)
        .with_context(|| format!("failed to write verdict to {}", path.display()))?;
    tracing::info!("verdict written to {}", path.display());
    Ok(())
}
