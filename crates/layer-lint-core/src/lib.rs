//! # layer-lint-core
//!
//! Core engine for pattern-based module-boundary governance.
//!
//! This crate provides the pieces the `layer-lint` tool is built from:
//!
//! - [`project`] for comment/string-blanked, line-preserving projections
//! - [`BoundaryRule`] descriptors (content, manifest, line-limit,
//!   quarantine) behind one `evaluate` capability
//! - [`Scanner`] for running an ordered registry against a corpus
//! - [`Verdict`] for the aggregated pass/fail report
//!
//! ## Example
//!
//! ```ignore
//! use layer_lint_core::Scanner;
//!
//! let scanner = Scanner::builder()
//!     .base("./compiler")
//!     .rules(layer_lint_rules::default_rules())
//!     .build()?;
//!
//! let verdict = scanner.scan()?;
//! println!("{}", verdict.render_text());
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod config;
mod corpus;
mod engine;
mod projection;
mod quarantine;
mod rules;
mod verdict;

pub use config::{Config, ConfigError, RuleToggle, ScanConfig};
pub use corpus::{files_with_extension, read_lossy, SKIPPED_DIRS};
pub use engine::{ScanError, Scanner, ScannerBuilder};
pub use projection::{line_at_offset, project};
pub use rules::{
    BoundaryRule, ContentRule, ExclusionPolicy, LineLimitRule, ManifestRule, Matcher,
    QuarantineRule,
};
pub use verdict::{FailureGroup, ScanHit, Status, Verdict};
