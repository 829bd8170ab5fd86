//! # layer-lint-rules
//!
//! The built-in governance registry for the layered compiler workspace
//! layer-lint watches over.
//!
//! The governed codebase is mid-extraction: legacy modules live under
//! `src/<module>` (parser, binder, solver, checker, emitter, lsp) while
//! extracted crates live under `crates/<member>`. Content rules bind to the
//! module roots, manifest rules to the extracted members' manifests. Rules
//! bound to paths that do not exist yet contribute nothing, so the registry
//! holds across partially-extracted checkouts.
//!
//! ## Registry
//!
//! | Kind | Name | Enforces |
//! |------|------|----------|
//! | content | `parser-no-upper-layers` | parser imports no downstream module |
//! | content | `binder-no-checker` | binder is checker-free |
//! | content | `solver-no-checker` | solver is checker-free |
//! | content | `emitter-no-checker-state` | emitter stays off checker state |
//! | content | `no-lsp-outside-lsp` | lsp is a leaf consumer |
//! | manifest | `solver-manifest-no-checker` | extracted solver crate layering |
//! | manifest | `parser-manifest-no-solver` | extracted parser crate layering |
//! | line-limit | `source-file-budget` | file size ceiling under `src` |
//! | quarantine | `type-key-quarantine` | `TypeKey` built only by the interner |

#![forbid(unsafe_code)]
#![warn(missing_docs)]

use std::path::PathBuf;

use layer_lint_core::{
    BoundaryRule, ContentRule, ExclusionPolicy, LineLimitRule, ManifestRule, Matcher,
    QuarantineRule,
};

/// Maximum physical lines for a source file under `src`.
pub const SOURCE_FILE_LINE_LIMIT: usize = 3000;

/// The canonical name of the quarantined type.
pub const QUARANTINED_TYPE: &str = "TypeKey";

/// The construction sink whose call sites the quarantine matches.
pub const QUARANTINE_SINK: &str = "intern";

/// Files approved to construct the quarantined type directly: the solver's
/// interner and its normalization passes.
pub const APPROVED_CONSTRUCTION_SITES: &[&str] = &[
    "solver/db.rs",
    "solver/intern_intersection.rs",
    "solver/intern_normalize.rs",
    "solver/intern_template.rs",
];

fn comment_aware(dirs: &[&str], files: &[&str]) -> ExclusionPolicy {
    ExclusionPolicy {
        dirs: dirs.iter().map(ToString::to_string).collect(),
        files: files.iter().map(PathBuf::from).collect(),
        skip_line_comments: true,
    }
}

fn content(name: &str, root: &str, needles: &[&str], exclusions: ExclusionPolicy) -> BoundaryRule {
    let matcher = if needles.len() == 1 {
        Matcher::Contains(needles[0].to_string())
    } else {
        Matcher::ContainsAny(needles.iter().map(ToString::to_string).collect())
    };
    BoundaryRule::Content(ContentRule {
        name: name.to_string(),
        root: root.into(),
        matcher,
        exclusions,
    })
}

fn manifest(name: &str, path: &str, needle: &str) -> BoundaryRule {
    BoundaryRule::Manifest(ManifestRule {
        name: name.to_string(),
        manifest: path.into(),
        matcher: Matcher::Contains(needle.to_string()),
    })
}

/// Builds the fixed registry, in reporting order: content rules, manifest
/// rules, line-limit rules, then the quarantine.
#[must_use]
pub fn default_rules() -> Vec<BoundaryRule> {
    vec![
        content(
            "parser-no-upper-layers",
            "src/parser",
            &[
                "crate::solver",
                "crate::checker",
                "crate::emitter",
                "crate::lsp",
            ],
            comment_aware(&["tests"], &[]),
        ),
        content(
            "binder-no-checker",
            "src/binder",
            &["crate::checker"],
            comment_aware(&["tests"], &[]),
        ),
        content(
            "solver-no-checker",
            "src/solver",
            &["crate::checker"],
            // compat.rs bridges legacy checker callers during extraction.
            comment_aware(&["tests"], &["src/solver/compat.rs"]),
        ),
        content(
            "emitter-no-checker-state",
            "src/emitter",
            &["crate::checker::state"],
            comment_aware(&["tests"], &[]),
        ),
        content(
            "no-lsp-outside-lsp",
            "src",
            &["crate::lsp"],
            comment_aware(&["lsp", "tests", "bin"], &[]),
        ),
        manifest(
            "solver-manifest-no-checker",
            "crates/solver/Cargo.toml",
            "checker",
        ),
        manifest(
            "parser-manifest-no-solver",
            "crates/parser/Cargo.toml",
            "solver",
        ),
        BoundaryRule::LineLimit(LineLimitRule {
            name: "source-file-budget".to_string(),
            root: "src".into(),
            max_lines: SOURCE_FILE_LINE_LIMIT,
        }),
        BoundaryRule::Quarantine(QuarantineRule {
            name: "type-key-quarantine".to_string(),
            root: "src".into(),
            type_name: QUARANTINED_TYPE.to_string(),
            sink: QUARANTINE_SINK.to_string(),
            exempt_suffixes: APPROVED_CONSTRUCTION_SITES
                .iter()
                .map(ToString::to_string)
                .collect(),
            test_segment: "tests".to_string(),
        }),
    ]
}
