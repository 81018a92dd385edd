//! **Semantic OpenAPI contract diffing and breaking-change detection.**
//!
//! `oas-tools` compares two revisions of an OpenAPI contract structurally
//! rather than textually: both documents are parsed into a normalized model,
//! reduced to a typed diff tree, and optionally run through a catalog of
//! backward-compatibility rules that classify each change as informational,
//! a warning, or an error.
//!
//! ## Core Concepts & Modules
//!
//! - **[`model`]**: The normalized document model. JSON and YAML documents
//!   deserialize into the same types; `$ref` objects stay unresolved and are
//!   looked up on demand, which lets self-referential schema graphs be
//!   traversed with an explicit cycle bound.
//! - **[`diff`]**: The structural diff engine. [`diff::get_diff`] produces a
//!   [`diff::Diff`] tree whose nodes exist only where something changed; an
//!   empty tree means the revisions are semantically identical under the
//!   chosen configuration.
//! - **[`checker`]**: The rule framework. Rules walk the diff tree and emit
//!   leveled [`checker::Change`] findings; ignore files suppress findings
//!   that were agreed with consumers.
//! - **[`reports`]**: Text, JSON, and YAML renderings of findings and of the
//!   raw diff tree.
//!
//! ## Getting Started
//!
//! ```no_run
//! use std::path::Path;
//! use oas_tools::checker::{check_backward_compatibility, CheckConfig};
//! use oas_tools::diff::{get_diff, DiffConfig, OperationsSources};
//! use oas_tools::parsers::parse_spec;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let base = parse_spec(Path::new("base.yaml"))?;
//!     let revision = parse_spec(Path::new("revision.yaml"))?;
//!
//!     let diff = get_diff(&DiffConfig::new(), &base, &revision)?;
//!     let changes = check_backward_compatibility(
//!         &diff,
//!         &OperationsSources::single("base.yaml"),
//!         &CheckConfig::default(),
//!     );
//!
//!     for change in &changes {
//!         println!("{}: {} {} {}", change.level, change.operation, change.path, change.text);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Command-Line Interface (CLI)
//!
//! This documentation is for the library crate. The `oas-tools` binary
//! exposes the same functionality as the `changelog`, `breaking`, and `diff`
//! subcommands; see the project README.

// Lint to discourage unwrap() in production code - prefer explicit error handling
#![warn(clippy::unwrap_used)]
#![allow(
    // Doc completeness: # Errors sections are aspirational for this many fallible fns
    clippy::missing_errors_doc,
    // Diff structs legitimately mirror the many facets of a schema object
    clippy::struct_field_names,
    // Variable names like `base`/`rev` are clear in context
    clippy::similar_names
)]

pub mod checker;
pub mod cli;
pub mod diff;
pub mod error;
pub mod model;
pub mod parsers;
pub mod reports;

// Re-export main types for convenience
pub use checker::{
    check_backward_compatibility, check_backward_compatibility_until_level, Change, Changes,
    CheckConfig, Lang, Level, Localizer,
};
pub use diff::{composed_diffs, get_diff, Diff, DiffConfig, OperationsSources, PairDiff};
pub use error::{OasDiffError, Result};
pub use model::Spec;
pub use parsers::{parse_spec, parse_spec_str};
pub use reports::{render_changelog, render_composed_diff, render_diff, ReportFormat};
