//! Raw diff command handler.
//!
//! Emits the structured diff tree itself, without running any rules.

use super::{exit_codes, CompareRequest};
use crate::diff::{composed_diffs, get_diff};
use crate::error::Result;
use crate::parsers::parse_spec;
use crate::reports::{render_composed_diff, render_diff, ReportFormat};
use std::path::Path;

pub fn run_diff(request: &CompareRequest, format: ReportFormat, fail_on_diff: bool) -> Result<i32> {
    let has_changes = if request.composed {
        let pairs = composed_diffs(request.diff_config, request.base, request.revision)?;
        println!("{}", render_composed_diff(&pairs, format)?);
        pairs.iter().any(|pair| !pair.diff.is_empty())
    } else {
        let base = parse_spec(Path::new(request.base))?;
        let rev = parse_spec(Path::new(request.revision))?;
        let diff = get_diff(request.diff_config, &base, &rev)?;
        println!("{}", render_diff(&diff, format)?);
        !diff.is_empty()
    };

    Ok(if fail_on_diff && has_changes {
        exit_codes::FINDINGS
    } else {
        exit_codes::SUCCESS
    })
}
