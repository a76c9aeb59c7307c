use std::collections::BTreeSet;

use chrono::Datelike;
use gridmend_types::{Eligibility, InterpolationLimits, MeterRecord, STEP_SECONDS};

use crate::error::GridmendError;
use crate::series::sorted_valid;

const DAY_SECONDS: f64 = 86_400.0;

/// Advisory pre-check for gap-filling interpolation.
///
/// Runs the same checks the repair engine re-runs internally, so a caller
/// can disable a repair control up front. The gate is advisory only; the
/// repair engine remains authoritative and will refuse on its own.
#[must_use]
pub fn check_interpolation_eligibility(
    records: &[MeterRecord],
    limits: &InterpolationLimits,
) -> Eligibility {
    if records.is_empty() {
        return Eligibility::rejected("no data to analyze");
    }
    let sorted = sorted_valid(records);
    match ensure_eligible(&sorted, limits) {
        Ok(()) => Eligibility::met(),
        Err(err) => Eligibility::rejected(reason_of(&err)),
    }
}

fn reason_of(err: &GridmendError) -> String {
    match err {
        GridmendError::Ineligible { reason } => reason.clone(),
        // Multi-year and data errors carry their full display form.
        other => other.to_string(),
    }
}

/// Authoritative gate over the sorted valid-timestamp subset.
///
/// Checks short-circuit on the first failure, in this order: non-empty
/// valid data, single calendar year, minimum density, maximum generation
/// volume, maximum adjacent gap, month coverage for long spans.
pub(crate) fn ensure_eligible(
    sorted: &[&MeterRecord],
    limits: &InterpolationLimits,
) -> Result<(), GridmendError> {
    let Some((first, last)) = span_of(sorted) else {
        return Err(GridmendError::ineligible("no records with a valid timestamp"));
    };

    // A multi-year set disables interpolation unconditionally; the 15-minute
    // grid walk is not meaningful across year boundaries for annual data.
    let years: BTreeSet<i32> = sorted
        .iter()
        .filter_map(|r| r.timestamp.instant())
        .map(|ts| ts.year())
        .collect();
    if years.len() > 1 {
        return Err(GridmendError::MultiYear {
            years: years.into_iter().collect(),
        });
    }

    let span_seconds = (last - first).num_seconds().max(0);
    #[allow(clippy::cast_precision_loss)]
    let span_days = span_seconds as f64 / DAY_SECONDS;
    let expected_in_span = (span_seconds / STEP_SECONDS) as usize + 1;
    let current = sorted.len();

    #[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let min_required = limits
        .min_record_floor
        .max((expected_in_span as f64 * limits.min_density).floor() as usize);
    if current < min_required {
        return Err(GridmendError::ineligible(format!(
            "insufficient data density ({current}/{min_required} records over {} days)",
            span_days.round()
        )));
    }

    let to_generate = expected_in_span.saturating_sub(current);
    if to_generate > limits.max_generated {
        return Err(GridmendError::ineligible(format!(
            "too many records to generate ({to_generate}, maximum {})",
            limits.max_generated
        )));
    }

    let max_gap_seconds = limits.max_gap_days * 86_400;
    for pair in sorted.windows(2) {
        let (Some(a), Some(b)) = (pair[0].timestamp.instant(), pair[1].timestamp.instant()) else {
            continue;
        };
        let gap = (b - a).num_seconds();
        if gap > max_gap_seconds {
            #[allow(clippy::cast_precision_loss)]
            let gap_days = (gap as f64 / DAY_SECONDS).round();
            return Err(GridmendError::ineligible(format!(
                "gap between records too large ({gap_days} days, maximum {} days)",
                limits.max_gap_days
            )));
        }
    }

    #[allow(clippy::cast_precision_loss)]
    if span_days > limits.long_span_days as f64 {
        let months: BTreeSet<u32> = sorted
            .iter()
            .filter_map(|r| r.timestamp.instant())
            .map(|ts| ts.month())
            .collect();
        if months.len() < limits.min_months {
            return Err(GridmendError::ineligible(format!(
                "data covers only {} months (minimum {})",
                months.len(),
                limits.min_months
            )));
        }
    }

    Ok(())
}

fn span_of(
    sorted: &[&MeterRecord],
) -> Option<(chrono::DateTime<chrono::Utc>, chrono::DateTime<chrono::Utc>)> {
    let first = sorted.first()?.timestamp.instant()?;
    let last = sorted.last()?.timestamp.instant()?;
    Some((first, last))
}
