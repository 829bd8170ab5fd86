//! Scan orchestration: evaluates an ordered rule registry against a corpus
//! and aggregates the results into a [`Verdict`].

use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, info};

use crate::config::Config;
use crate::corpus;
use crate::rules::{BoundaryRule, ContentRule, LineLimitRule, ManifestRule};
use crate::verdict::{FailureGroup, ScanHit, Verdict};

/// Unexpected faults that abort a scan.
///
/// Expected conditions (missing rule roots, unreadable files) never surface
/// here; they contribute zero hits so a partial scan can never masquerade
/// as a clean pass.
#[derive(Debug, Error)]
pub enum ScanError {
    /// IO error establishing the scan base.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Directory traversal failure.
    #[error("directory traversal failed: {0}")]
    Walk(#[from] walkdir::Error),
}

/// Builder for configuring a [`Scanner`].
#[derive(Default)]
pub struct ScannerBuilder {
    base: Option<PathBuf>,
    rules: Vec<BoundaryRule>,
    config: Option<Config>,
}

impl ScannerBuilder {
    /// Creates a new builder with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the directory the registry's relative roots resolve against.
    #[must_use]
    pub fn base(mut self, path: impl Into<PathBuf>) -> Self {
        self.base = Some(path.into());
        self
    }

    /// Appends one rule to the registry.
    #[must_use]
    pub fn rule(mut self, rule: BoundaryRule) -> Self {
        self.rules.push(rule);
        self
    }

    /// Appends rules, preserving their order.
    #[must_use]
    pub fn rules<I: IntoIterator<Item = BoundaryRule>>(mut self, rules: I) -> Self {
        self.rules.extend(rules);
        self
    }

    /// Sets the configuration.
    #[must_use]
    pub fn config(mut self, config: Config) -> Self {
        self.config = Some(config);
        self
    }

    /// Builds the scanner.
    ///
    /// The base defaults to the config's scan root, then to the current
    /// directory; a relative base is resolved against the current directory.
    ///
    /// # Errors
    ///
    /// Returns an error if the current directory cannot be determined.
    pub fn build(self) -> Result<Scanner, ScanError> {
        let config = self.config.unwrap_or_default();
        let base = self
            .base
            .or_else(|| config.scan.root.clone())
            .unwrap_or_else(|| PathBuf::from("."));

        let base = if base.is_absolute() {
            base
        } else {
            std::env::current_dir()?.join(base)
        };

        Ok(Scanner {
            base,
            rules: self.rules,
            config,
        })
    }
}

/// Evaluates an ordered, immutable rule registry against one corpus.
///
/// Use [`Scanner::builder()`] to construct an instance. Each rule's
/// evaluation is independent; the verdict reports groups in registry order.
pub struct Scanner {
    base: PathBuf,
    rules: Vec<BoundaryRule>,
    config: Config,
}

impl Scanner {
    /// Creates a new builder for configuring a scanner.
    #[must_use]
    pub fn builder() -> ScannerBuilder {
        ScannerBuilder::new()
    }

    /// Returns the resolved scan base.
    #[must_use]
    pub fn base(&self) -> &Path {
        &self.base
    }

    /// Returns the number of registered rules.
    #[must_use]
    pub fn rule_count(&self) -> usize {
        self.rules.len()
    }

    /// Runs every enabled rule in registry order and aggregates the verdict.
    ///
    /// # Errors
    ///
    /// Returns an error only for unexpected faults; rule violations are
    /// ordinary data reported through the verdict's `failed` status.
    pub fn scan(&self) -> Result<Verdict, ScanError> {
        info!(
            "scanning {} with {} rules",
            self.base.display(),
            self.rules.len()
        );

        let mut groups = Vec::with_capacity(self.rules.len());
        for rule in &self.rules {
            if !self.config.is_rule_enabled(rule.name()) {
                debug!("skipping disabled rule: {}", rule.name());
                continue;
            }
            let hits = rule.evaluate(&self.base)?;
            debug!("rule {} produced {} hit(s)", rule.name(), hits.len());
            groups.push(FailureGroup {
                name: rule.name().to_string(),
                hits,
            });
        }

        let verdict = Verdict::from_groups(groups);
        info!(
            "scan complete: {} ({} hits)",
            verdict.status, verdict.total_hits
        );
        Ok(verdict)
    }
}

/// Evaluates a content rule: one hit per matching line of each eligible
/// source file under the rule's root.
pub(crate) fn evaluate_content(
    rule: &ContentRule,
    base: &Path,
) -> Result<Vec<ScanHit>, ScanError> {
    let root = base.join(&rule.root);
    if !root.is_dir() {
        debug!("rule {}: root {} absent", rule.name, root.display());
        return Ok(Vec::new());
    }

    let mut hits = Vec::new();
    for file in corpus::files_with_extension(&root, "rs")? {
        let relative = relative_to(&file, base);
        if rule.exclusions.excludes(&relative) {
            continue;
        }
        let Some(text) = corpus::read_lossy(&file) else {
            continue;
        };
        for (idx, line) in text.lines().enumerate() {
            if rule.exclusions.skip_line_comments && line.trim_start().starts_with("//") {
                continue;
            }
            if rule.matcher.matches(line) {
                hits.push(ScanHit::new(relative.clone(), idx + 1));
            }
        }
    }
    Ok(hits)
}

/// Evaluates a manifest rule against the raw text of one fixed file.
pub(crate) fn evaluate_manifest(rule: &ManifestRule, base: &Path) -> Vec<ScanHit> {
    let path = base.join(&rule.manifest);
    if !path.is_file() {
        debug!("rule {}: manifest {} absent", rule.name, path.display());
        return Vec::new();
    }
    let Some(text) = corpus::read_lossy(&path) else {
        return Vec::new();
    };

    let relative = relative_to(&path, base);
    text.lines()
        .enumerate()
        .filter(|(_, line)| rule.matcher.matches(line))
        .map(|(idx, _)| ScanHit::new(relative.clone(), idx + 1))
        .collect()
}

/// Evaluates a line-limit rule: one hit per file strictly over the ceiling,
/// annotated with the actual count and the limit.
pub(crate) fn evaluate_line_limit(
    rule: &LineLimitRule,
    base: &Path,
) -> Result<Vec<ScanHit>, ScanError> {
    let root = base.join(&rule.root);
    if !root.is_dir() {
        debug!("rule {}: root {} absent", rule.name, root.display());
        return Ok(Vec::new());
    }

    let mut hits = Vec::new();
    for file in corpus::files_with_extension(&root, "rs")? {
        let Some(text) = corpus::read_lossy(&file) else {
            continue;
        };
        let count = text.lines().count();
        if count > rule.max_lines {
            hits.push(ScanHit::annotated(
                relative_to(&file, base),
                count,
                format!("lines (limit {})", rule.max_lines),
            ));
        }
    }
    Ok(hits)
}

fn relative_to(path: &Path, base: &Path) -> PathBuf {
    path.strip_prefix(base)
        .map_or_else(|_| path.to_path_buf(), Path::to_path_buf)
}
