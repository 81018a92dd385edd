//! Changelog command handler.
//!
//! Reports every detected change, informational ones included. By default
//! the command always exits 0; `--fail-on` turns it into a gate.

use super::{apply_ignores, collect_changes, exit_codes, CompareRequest, IgnoreFiles};
use crate::checker::{CheckConfig, Level};
use crate::error::Result;
use crate::reports::{render_changelog, ReportFormat};

pub fn run_changelog(
    request: &CompareRequest,
    check_config: &CheckConfig,
    format: ReportFormat,
    fail_on: Option<Level>,
    ignores: &IgnoreFiles,
) -> Result<i32> {
    let mut changes = collect_changes(request, check_config, Level::Info)?;
    apply_ignores(&mut changes, ignores)?;

    println!(
        "{}",
        render_changelog(&changes, format, &check_config.localizer)?
    );

    Ok(match fail_on {
        Some(level) if changes.has_level_or_higher(level) => exit_codes::FINDINGS,
        _ => exit_codes::SUCCESS,
    })
}
