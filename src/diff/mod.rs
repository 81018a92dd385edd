//! Structural diff engine.
//!
//! Compares two OpenAPI documents into a typed diff tree. The tree is built
//! once by [`get_diff`] and is read-only afterwards; the checker framework
//! walks it but never mutates it.
//!
//! Layering, leaves first:
//! - [`primitives`]: scalar and named-collection diff building blocks
//! - [`schema`]: recursive, cycle-bounded type-schema comparison
//! - per-element composers (header, parameter, response, ...)
//! - [`paths`]: document-level assembly into the root [`Diff`]
//! - [`composed`]: many file pairs matched by glob correspondence

mod composed;
mod config;
mod header;
mod link;
mod media_type;
mod parameter;
mod paths;
mod primitives;
mod request_body;
mod response;
mod schema;
mod security;
mod server;

pub use composed::{composed_diffs, expand_glob, PairDiff};
pub use config::{DiffConfig, EXCLUDE_ELEMENTS};
pub use header::HeaderDiff;
pub use link::LinkDiff;
pub use media_type::MediaTypeDiff;
pub use parameter::{ParameterDiff, ParametersDiff};
pub use paths::{
    get_diff, Diff, OperationDiff, OperationMeta, OperationsDiff, OperationsSources, PathItemDiff,
    PathsDiff,
};
pub use primitives::{MapDiff, StringsDiff, ValueDiff, ValuesDiff};
pub use request_body::RequestBodyDiff;
pub use response::ResponseDiff;
pub use schema::{SchemaDiff, SubschemasDiff};
pub use security::SecuritySchemeDiff;
pub use server::ServerDiff;

use crate::model::Spec;

/// Shared state threaded through every composer: the two documents (for
/// `$ref` resolution) and the immutable comparison configuration.
#[derive(Clone, Copy)]
pub(crate) struct DiffContext<'a> {
    pub config: &'a DiffConfig,
    pub base: &'a Spec,
    pub rev: &'a Spec,
}

impl<'a> DiffContext<'a> {
    pub(crate) fn new(config: &'a DiffConfig, base: &'a Spec, rev: &'a Spec) -> Self {
        Self { config, base, rev }
    }
}
