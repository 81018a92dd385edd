//! CLI command handlers.
//!
//! This module provides testable command handlers that are invoked by
//! main.rs. Each handler implements the business logic for one subcommand
//! and returns the desired process exit code; main.rs owns flag parsing and
//! the actual `exit()` call.

mod breaking;
mod changelog;
mod diff;

pub use breaking::run_breaking;
pub use changelog::run_changelog;
pub use diff::run_diff;

use crate::checker::{check_backward_compatibility_until_level, ignore, Changes, CheckConfig, Level};
use crate::diff::{composed_diffs, get_diff, DiffConfig, OperationsSources};
use crate::error::Result;
use crate::parsers::parse_spec;
use std::path::{Path, PathBuf};

/// Process exit codes shared by all subcommands.
pub mod exit_codes {
    /// Comparison ran and nothing crossed the failure threshold
    pub const SUCCESS: i32 = 0;
    /// Findings at or above the failure threshold
    pub const FINDINGS: i32 = 1;
    /// Could not compare: bad flags, unreadable or invalid documents
    pub const USAGE: i32 = 2;
}

/// What to compare: two files, or two glob-matched sets in composed mode.
#[derive(Debug)]
pub struct CompareRequest<'a> {
    pub base: &'a str,
    pub revision: &'a str,
    pub composed: bool,
    pub diff_config: &'a DiffConfig,
}

/// Ignore files applied after checking, one per suppressible level.
#[derive(Debug, Default)]
pub struct IgnoreFiles {
    pub warn: Option<PathBuf>,
    pub err: Option<PathBuf>,
}

/// Run the checker over the requested comparison, merging findings across
/// file pairs in composed mode.
pub(crate) fn collect_changes(
    request: &CompareRequest,
    check_config: &CheckConfig,
    floor: Level,
) -> Result<Changes> {
    if request.composed {
        let pairs = composed_diffs(request.diff_config, request.base, request.revision)?;
        let mut all = Changes::default();
        for pair in pairs {
            all.extend(check_backward_compatibility_until_level(
                &pair.diff,
                &pair.sources,
                check_config,
                floor,
            ));
        }
        Ok(all)
    } else {
        let base = parse_spec(Path::new(request.base))?;
        let rev = parse_spec(Path::new(request.revision))?;
        let diff = get_diff(request.diff_config, &base, &rev)?;
        let sources = OperationsSources::single(request.base);
        Ok(check_backward_compatibility_until_level(
            &diff,
            &sources,
            check_config,
            floor,
        ))
    }
}

pub(crate) fn apply_ignores(changes: &mut Changes, ignores: &IgnoreFiles) -> Result<()> {
    if let Some(path) = &ignores.warn {
        ignore::process_ignored(changes, Level::Warn, path)?;
    }
    if let Some(path) = &ignores.err {
        ignore::process_ignored(changes, Level::Err, path)?;
    }
    Ok(())
}
