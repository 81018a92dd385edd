//! Breaking-changes command handler.
//!
//! Same machinery as the changelog, restricted to warnings and errors, and
//! failing by default when errors survive the ignore files.

use super::{apply_ignores, collect_changes, exit_codes, CompareRequest, IgnoreFiles};
use crate::checker::{CheckConfig, Level};
use crate::error::Result;
use crate::reports::{render_changelog, ReportFormat};

pub fn run_breaking(
    request: &CompareRequest,
    check_config: &CheckConfig,
    format: ReportFormat,
    fail_on: Level,
    ignores: &IgnoreFiles,
) -> Result<i32> {
    let mut changes = collect_changes(request, check_config, Level::Warn)?;
    apply_ignores(&mut changes, ignores)?;

    println!(
        "{}",
        render_changelog(&changes, format, &check_config.localizer)?
    );

    Ok(if changes.has_level_or_higher(fail_on) {
        exit_codes::FINDINGS
    } else {
        exit_codes::SUCCESS
    })
}
