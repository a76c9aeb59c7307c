use std::collections::{BTreeMap, HashSet};

use chrono::{DateTime, Utc};
use gridmend_types::{
    DEFAULT_UNIT, MeterRecord, RepairConfig, RepairOptions, RepairOutcome, RepairStats, Timestamp,
    step,
};

use crate::eligibility::ensure_eligible;
use crate::error::GridmendError;
use crate::series::{sort_by_time, sorted_valid};
use crate::stats::{STDDEV_EPSILON, mean_stddev, numeric_values, round2};

/// Volume above which gap filling logs a warning before synthesizing.
const LARGE_SYNTHESIS: u64 = 1_000;

/// Apply the selected repair stages to a record-set snapshot.
///
/// Stage order is fixed: duplicate removal, then outlier correction, then
/// gap filling, each operating on the output of the previous stage. The
/// first two stages only count their effects and cannot fail; gap filling
/// re-runs the full eligibility gate and aborts the entire call on any
/// precondition failure, leaving the caller's snapshot untouched (the input
/// is never mutated).
///
/// # Errors
/// Returns [`GridmendError::MultiYear`] when gap filling is requested on a
/// set spanning several calendar years, and [`GridmendError::Ineligible`]
/// when any other gate check trips. No partial repair is committed.
pub fn repair(
    records: &[MeterRecord],
    options: &RepairOptions,
    config: &RepairConfig,
) -> Result<RepairOutcome, GridmendError> {
    let mut working: Vec<MeterRecord> = records.to_vec();
    let mut stats = RepairStats::default();

    if options.fix_duplicate {
        working = remove_duplicates(working, &mut stats);
    }
    if options.fix_extreme {
        fix_extremes(&mut working, config.outlier_sigma, &mut stats);
    }
    if options.fix_missing {
        working = fill_gaps(&working, config, &mut stats)?;
    }

    let invalid_count = working.iter().filter(|r| !r.timestamp.is_valid()).count() as u64;
    if invalid_count > 0 {
        stats.invalid_timestamps_found = Some(invalid_count);
    }

    let message = compose_message(options, &stats);
    tracing::debug!(
        missing_repaired = stats.missing_repaired,
        duplicates_removed = stats.duplicates_removed,
        extremes_fixed = stats.extremes_fixed,
        "repair complete"
    );

    Ok(RepairOutcome {
        records: working,
        stats,
        message,
    })
}

/// Stable time sort, then first occurrence wins per exact timestamp.
/// Invalid-timestamp records pass through untouched.
fn remove_duplicates(mut records: Vec<MeterRecord>, stats: &mut RepairStats) -> Vec<MeterRecord> {
    sort_by_time(&mut records);
    let mut seen: HashSet<DateTime<Utc>> = HashSet::with_capacity(records.len());
    let mut kept = Vec::with_capacity(records.len());
    for record in records {
        match record.timestamp.instant() {
            Some(instant) if !seen.insert(instant) => stats.duplicates_removed += 1,
            _ => kept.push(record),
        }
    }
    kept
}

/// Replace values beyond `sigma` population standard deviations with the
/// mean, rounded to two decimals. Statistics come from the current
/// valid-timestamp numeric values; degenerate statistics make this a no-op.
fn fix_extremes(records: &mut [MeterRecord], sigma: f64, stats: &mut RepairStats) {
    let valid = sorted_valid(records);
    let values = numeric_values(&valid);
    drop(valid);

    let Some((mean, stddev)) = mean_stddev(&values) else {
        tracing::debug!("outlier repair skipped: not enough numeric values");
        return;
    };
    if stddev <= STDDEV_EPSILON {
        tracing::debug!(stddev, "outlier repair skipped: degenerate standard deviation");
        return;
    }

    let threshold = sigma * stddev;
    let replacement = round2(mean);
    for record in records.iter_mut() {
        if let Some(v) = record.numeric_value() {
            if (v - mean).abs() > threshold {
                record.value = Some(replacement);
                stats.extremes_fixed += 1;
            }
        }
    }
}

/// Walk the fixed 15-minute grid between the first and last valid instants,
/// keeping exact matches and synthesizing everything else.
fn fill_gaps(
    records: &[MeterRecord],
    config: &RepairConfig,
    stats: &mut RepairStats,
) -> Result<Vec<MeterRecord>, GridmendError> {
    let sorted = sorted_valid(records);
    ensure_eligible(&sorted, &config.limits)?;

    // ensure_eligible guarantees a non-empty sorted subset.
    let first = sorted[0]
        .timestamp
        .instant()
        .ok_or_else(|| GridmendError::data("valid-timestamp record lost its instant"))?;
    let last = sorted[sorted.len() - 1]
        .timestamp
        .instant()
        .ok_or_else(|| GridmendError::data("valid-timestamp record lost its instant"))?;

    // First in sort order wins when duplicates share a slot.
    let mut existing: BTreeMap<DateTime<Utc>, &MeterRecord> = BTreeMap::new();
    for record in &sorted {
        if let Some(instant) = record.timestamp.instant() {
            existing.entry(instant).or_insert(record);
        }
    }

    let anchors: Vec<(DateTime<Utc>, f64)> = sorted
        .iter()
        .filter_map(|r| Some((r.timestamp.instant()?, r.numeric_value()?)))
        .collect();
    #[allow(clippy::cast_precision_loss)]
    let global_mean = (!anchors.is_empty())
        .then(|| anchors.iter().map(|(_, v)| v).sum::<f64>() / anchors.len() as f64);

    let unit = sorted
        .first()
        .map(|r| r.unit.trim())
        .filter(|u| !u.is_empty())
        .unwrap_or(DEFAULT_UNIT)
        .to_string();
    let mut next_id = records.iter().map(|r| r.id).max().unwrap_or(0) + 1;

    let expected = ((last - first).num_seconds() / step().num_seconds()) as u64 + 1;
    let to_generate = expected.saturating_sub(sorted.len() as u64);
    if to_generate > LARGE_SYNTHESIS {
        tracing::warn!(to_generate, "gap filling will synthesize a large number of records");
    }

    let mut filled: Vec<MeterRecord> = Vec::with_capacity(expected as usize);
    let mut slot = first;
    while slot <= last {
        if let Some(record) = existing.get(&slot) {
            filled.push((*record).clone());
        } else {
            let value = interpolate_at(slot, &anchors, global_mean).map(round2);
            filled.push(MeterRecord {
                id: next_id,
                timestamp: Timestamp::Utc(slot),
                value,
                unit: unit.clone(),
            });
            next_id += 1;
            stats.missing_repaired += 1;
        }
        slot += step();
    }

    // Structurally invalid records ride along unchanged, after the grid.
    filled.extend(
        records
            .iter()
            .filter(|r| !r.timestamp.is_valid())
            .cloned(),
    );
    sort_by_time(&mut filled);
    Ok(filled)
}

/// Linear interpolation between the nearest earlier and later numeric
/// records; one-sided hold when only one neighbor exists; global mean when
/// neither does.
fn interpolate_at(
    slot: DateTime<Utc>,
    anchors: &[(DateTime<Utc>, f64)],
    global_mean: Option<f64>,
) -> Option<f64> {
    let idx = anchors.partition_point(|(ts, _)| *ts < slot);
    let before = idx.checked_sub(1).and_then(|i| anchors.get(i));
    let after = anchors[idx..].iter().find(|(ts, _)| *ts > slot);

    #[allow(clippy::cast_precision_loss)]
    match (before, after) {
        (Some((t0, v0)), Some((t1, v1))) if t1 > t0 => {
            let ratio = (slot - *t0).num_seconds() as f64 / (*t1 - *t0).num_seconds() as f64;
            Some(*v0 + ratio * (*v1 - *v0))
        }
        (Some((_, v)), _) | (_, Some((_, v))) => Some(*v),
        (None, None) => global_mean,
    }
}

fn compose_message(options: &RepairOptions, stats: &RepairStats) -> String {
    let mut parts: Vec<String> = Vec::new();
    if options.fix_missing && stats.missing_repaired > 0 {
        parts.push(format!("filled {} missing records", stats.missing_repaired));
    }
    if options.fix_duplicate && stats.duplicates_removed > 0 {
        parts.push(format!(
            "removed {} duplicate records",
            stats.duplicates_removed
        ));
    }
    if options.fix_extreme && stats.extremes_fixed > 0 {
        parts.push(format!("fixed {} extreme values", stats.extremes_fixed));
    }
    if parts.is_empty() {
        "No repair performed.".into()
    } else {
        format!("Repair complete: {}.", parts.join(", "))
    }
}
