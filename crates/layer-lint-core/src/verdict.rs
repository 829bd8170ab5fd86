//! Verdict types: scan hits, failure groups, and the aggregated pass/fail
//! report consumed by downstream tooling.
//!
//! The JSON shape emitted here is a contract: `status`, `total_hits`, and
//! `failures` with `{name, hits: [string]}` entries, each hit rendered as
//! `"<relative-path>:<line>"` (line-limit hits append their annotation).

use serde::{Serialize, Serializer};
use std::path::PathBuf;

/// Hits beyond this count are elided per group in the human-readable form.
const RENDERED_HITS_CAP: usize = 200;

/// One pattern match: a relative path and the 1-based line in the original
/// file, with an optional trailing annotation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanHit {
    /// Path relative to the scan base.
    pub path: PathBuf,
    /// 1-based line number, counted against the untransformed file.
    pub line: usize,
    /// Extra text appended after the line number (e.g. a line-count note).
    pub annotation: Option<String>,
}

impl ScanHit {
    /// Creates a hit without an annotation.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>, line: usize) -> Self {
        Self {
            path: path.into(),
            line,
            annotation: None,
        }
    }

    /// Creates a hit carrying an annotation.
    #[must_use]
    pub fn annotated(path: impl Into<PathBuf>, line: usize, annotation: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            line,
            annotation: Some(annotation.into()),
        }
    }
}

impl std::fmt::Display for ScanHit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.path.display(), self.line)?;
        if let Some(note) = &self.annotation {
            write!(f, " {note}")?;
        }
        Ok(())
    }
}

impl Serialize for ScanHit {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// All hits produced by one rule, in that rule's reporting order.
#[derive(Debug, Clone, Serialize)]
pub struct FailureGroup {
    /// Name of the rule that produced the hits.
    pub name: String,
    /// Ordered, duplicate-free hits.
    pub hits: Vec<ScanHit>,
}

/// Overall scan outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    /// No rule produced a hit.
    Passed,
    /// At least one rule produced a hit.
    Failed,
}

impl std::fmt::Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Passed => write!(f, "passed"),
            Self::Failed => write!(f, "failed"),
        }
    }
}

/// The aggregated result of one scan invocation.
#[derive(Debug, Clone, Serialize)]
pub struct Verdict {
    /// `Failed` iff any rule produced a hit.
    pub status: Status,
    /// Sum of all group sizes.
    pub total_hits: usize,
    /// Non-empty rule results in registry order.
    pub failures: Vec<FailureGroup>,
}

impl Verdict {
    /// Builds a verdict from per-rule results, dropping empty groups and
    /// preserving registry order.
    #[must_use]
    pub fn from_groups(groups: Vec<FailureGroup>) -> Self {
        let failures: Vec<FailureGroup> = groups.into_iter().filter(|g| !g.hits.is_empty()).collect();
        let total_hits = failures.iter().map(|g| g.hits.len()).sum();
        let status = if total_hits > 0 {
            Status::Failed
        } else {
            Status::Passed
        };
        Self {
            status,
            total_hits,
            failures,
        }
    }

    /// True when no rule produced a hit.
    #[must_use]
    pub fn passed(&self) -> bool {
        self.status == Status::Passed
    }

    /// Renders the machine-readable form.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    /// Renders the human-readable listing, capping each group at 200 hits
    /// with an elision note for the remainder.
    #[must_use]
    pub fn render_text(&self) -> String {
        use std::fmt::Write;

        let mut out = String::new();
        for group in &self.failures {
            let _ = writeln!(out, "{} ({} hit(s)):", group.name, group.hits.len());
            for hit in group.hits.iter().take(RENDERED_HITS_CAP) {
                let _ = writeln!(out, "  {hit}");
            }
            if group.hits.len() > RENDERED_HITS_CAP {
                let _ = writeln!(
                    out,
                    "  ... and {} more",
                    group.hits.len() - RENDERED_HITS_CAP
                );
            }
            let _ = writeln!(out);
        }
        let _ = writeln!(out, "{}: {} hit(s) total", self.status, self.total_hits);
        out
    }
}
