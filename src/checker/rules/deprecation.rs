//! Rules for the deprecation and sunset lifecycle.
//!
//! A newly deprecated operation announces its removal date via the
//! `x-sunset` extension. The required grace period depends on the declared
//! `x-stability-level`: pre-stable operations may sunset sooner.

use chrono::{NaiveDate, Utc};
use crate::checker::{modified_operations, Change, CheckConfig};
use crate::diff::{Diff, OperationDiff, OperationsSources};

fn newly_deprecated(op: &OperationDiff) -> bool {
    op.deprecated
        .as_ref()
        .is_some_and(|d| d.to == serde_json::Value::Bool(true))
}

fn grace_days(config: &CheckConfig, stability: Option<&str>) -> i64 {
    match stability {
        Some("draft" | "alpha" | "beta") => config.deprecation_days_beta,
        _ => config.deprecation_days_stable,
    }
}

pub(crate) fn sunset_date_too_small(
    diff: &Diff,
    sources: &OperationsSources,
    config: &CheckConfig,
) -> Vec<Change> {
    let today = Utc::now().date_naive();
    let mut changes = Vec::new();
    for (path, method, op) in modified_operations(diff) {
        if !newly_deprecated(op) {
            continue;
        }
        let meta = &op.revision_meta;
        let Some(sunset) = meta.sunset.as_deref() else {
            continue;
        };
        let days = grace_days(config, meta.stability.as_deref());
        // An unparseable sunset date gives clients no usable notice, so it
        // counts as too small as well.
        let too_small = match NaiveDate::parse_from_str(sunset, "%Y-%m-%d") {
            Ok(date) => date < today + chrono::Duration::days(days),
            Err(_) => true,
        };
        if too_small {
            changes.push(Change::api(
                "api-sunset-date-too-small",
                config,
                &[sunset, &days.to_string()],
                path,
                method,
                meta.operation_id.as_deref(),
                sources,
            ));
        }
    }
    changes
}

pub(crate) fn deprecated_without_sunset(
    diff: &Diff,
    sources: &OperationsSources,
    config: &CheckConfig,
) -> Vec<Change> {
    let mut changes = Vec::new();
    for (path, method, op) in modified_operations(diff) {
        if newly_deprecated(op) && op.revision_meta.sunset.is_none() {
            changes.push(Change::api(
                "api-deprecated-without-sunset",
                config,
                &[],
                path,
                method,
                op.revision_meta.operation_id.as_deref(),
                sources,
            ));
        }
    }
    changes
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grace_period_by_stability() {
        let config = CheckConfig::default();
        assert_eq!(grace_days(&config, Some("beta")), 31);
        assert_eq!(grace_days(&config, Some("alpha")), 31);
        assert_eq!(grace_days(&config, Some("stable")), 180);
        assert_eq!(grace_days(&config, None), 180);
    }
}
