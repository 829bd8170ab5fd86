//! Rule descriptors.
//!
//! The four rule kinds form a closed set behind one `evaluate` capability,
//! so the scanner never branches on a rule's internals. Descriptors are
//! plain immutable data; the registry passed to [`crate::Scanner`] is an
//! explicit ordered `Vec<BoundaryRule>`, never module-level state.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use crate::engine::{self, ScanError};
use crate::quarantine;
use crate::verdict::ScanHit;

/// A per-line substring matcher.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Matcher {
    /// The line must contain this substring.
    Contains(String),
    /// The line must contain at least one of these substrings.
    ContainsAny(Vec<String>),
}

impl Matcher {
    /// Whether `line` satisfies the matcher.
    #[must_use]
    pub fn matches(&self, line: &str) -> bool {
        match self {
            Self::Contains(needle) => line.contains(needle),
            Self::ContainsAny(needles) => needles.iter().any(|n| line.contains(n)),
        }
    }
}

/// Per-rule file exclusions, applied before any pattern evaluation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExclusionPolicy {
    /// Directory names: a file is skipped when any path segment matches.
    pub dirs: BTreeSet<String>,
    /// Exact relative paths (relative to the scan base) skipped outright.
    pub files: BTreeSet<PathBuf>,
    /// Skip lines whose left-trimmed text begins with `//`.
    ///
    /// A deliberately narrow single-line heuristic: trailing same-line
    /// comments and block comments still match. The quarantine scanner is
    /// the only consumer of the full projection.
    pub skip_line_comments: bool,
}

impl ExclusionPolicy {
    /// Policy with no exclusions and no comment awareness.
    #[must_use]
    pub fn none() -> Self {
        Self::default()
    }

    /// Whether `relative` (relative to the scan base) is excluded.
    #[must_use]
    pub fn excludes(&self, relative: &Path) -> bool {
        let in_excluded_dir = relative.components().any(|c| {
            matches!(c, std::path::Component::Normal(s)
                if s.to_str().is_some_and(|s| self.dirs.contains(s)))
        });
        in_excluded_dir || self.files.contains(relative)
    }
}

/// Forbidden-pattern rule over source files beneath a root directory.
#[derive(Debug, Clone)]
pub struct ContentRule {
    /// Rule name, unique within a registry.
    pub name: String,
    /// Root directory, relative to the scan base.
    pub root: PathBuf,
    /// Pattern evaluated per physical line.
    pub matcher: Matcher,
    /// Exclusions applied before reading a file.
    pub exclusions: ExclusionPolicy,
}

/// Forbidden-pattern rule over one dependency manifest's raw text.
#[derive(Debug, Clone)]
pub struct ManifestRule {
    /// Rule name, unique within a registry.
    pub name: String,
    /// Manifest path, relative to the scan base.
    pub manifest: PathBuf,
    /// Pattern evaluated per physical line, with no comment awareness.
    pub matcher: Matcher,
}

/// Physical line-count ceiling for source files beneath a root directory.
#[derive(Debug, Clone)]
pub struct LineLimitRule {
    /// Rule name, unique within a registry.
    pub name: String,
    /// Root directory, relative to the scan base.
    pub root: PathBuf,
    /// A file hits when its line count strictly exceeds this.
    pub max_lines: usize,
}

/// Restricts construction of a sensitive type to approved files, following
/// local renames of the type through import and type aliases.
#[derive(Debug, Clone)]
pub struct QuarantineRule {
    /// Rule name, unique within a registry.
    pub name: String,
    /// Root directory, relative to the scan base.
    pub root: PathBuf,
    /// Canonical name of the quarantined type.
    pub type_name: String,
    /// Method whose call sites constitute construction (e.g. `intern`).
    pub sink: String,
    /// Path suffixes of the approved construction sites.
    pub exempt_suffixes: Vec<String>,
    /// Files under a path segment with this name are exempt.
    pub test_segment: String,
}

/// The closed set of rule kinds a registry can hold.
#[derive(Debug, Clone)]
pub enum BoundaryRule {
    /// Pattern rule over source files.
    Content(ContentRule),
    /// Pattern rule over a single manifest file.
    Manifest(ManifestRule),
    /// Line-count ceiling.
    LineLimit(LineLimitRule),
    /// Sensitive-type construction quarantine.
    Quarantine(QuarantineRule),
}

impl BoundaryRule {
    /// The rule's name.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Content(r) => &r.name,
            Self::Manifest(r) => &r.name,
            Self::LineLimit(r) => &r.name,
            Self::Quarantine(r) => &r.name,
        }
    }

    /// Short label for the rule kind, used by `list-rules`.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Content(_) => "content",
            Self::Manifest(_) => "manifest",
            Self::LineLimit(_) => "line-limit",
            Self::Quarantine(_) => "quarantine",
        }
    }

    /// Evaluates the rule against the corpus under `base`.
    ///
    /// # Errors
    ///
    /// Returns [`ScanError`] only for unexpected faults (traversal errors);
    /// missing roots and unreadable files contribute zero hits instead.
    pub fn evaluate(&self, base: &Path) -> Result<Vec<ScanHit>, ScanError> {
        match self {
            Self::Content(r) => engine::evaluate_content(r, base),
            Self::Manifest(r) => Ok(engine::evaluate_manifest(r, base)),
            Self::LineLimit(r) => engine::evaluate_line_limit(r, base),
            Self::Quarantine(r) => quarantine::evaluate(r, base),
        }
    }
}
