//! # layer-lint
//!
//! Pattern-based module-boundary governance for layered codebases.
//!
//! This is the facade crate re-exporting the core engine and the built-in
//! governance registry.
//!
//! ## Quick Start: `cargo test` Integration
//!
//! ```toml
//! [dev-dependencies]
//! layer-lint = "0.2"
//! ```
//!
//! ```rust,ignore
//! // tests/boundaries.rs
//! #[test]
//! fn module_boundaries_hold() {
//!     layer_lint::enforce();
//! }
//! ```
//!
//! This runs the governance scan as part of `cargo test` and panics with the
//! rendered report when the verdict fails. Configure via `layer-lint.toml`.
//!
//! ## Programmatic Usage
//!
//! ```rust,ignore
//! use layer_lint::{Scanner, rules};
//!
//! let scanner = Scanner::builder()
//!     .base("./compiler")
//!     .rules(rules::default_rules())
//!     .build()?;
//!
//! let verdict = scanner.scan()?;
//! ```

#![forbid(unsafe_code)]

pub use layer_lint_core::*;

/// The built-in governance registry.
pub mod rules {
    pub use layer_lint_rules::*;
}

mod runner;

pub use runner::enforce;
