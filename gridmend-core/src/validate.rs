use std::collections::{BTreeSet, HashSet};

use chrono::{DateTime, Datelike, Utc};
use gridmend_types::{
    FIXED_ANNUAL_RECORDS, GridPolicy, MeterRecord, STEP_SECONDS, ValidationConfig,
    ValidationReport, ValidationStats,
};

use crate::series::{format_readable, sorted_valid};
use crate::stats::{STDDEV_EPSILON, mean_stddev, numeric_values};

/// Record-set validator.
///
/// Parameterized by [`ValidationConfig`], which unifies the two grid-sizing
/// variants (span-derived and fixed-annual) behind one policy switch.
#[derive(Debug, Clone, Default)]
pub struct Validator {
    config: ValidationConfig,
}

impl Validator {
    /// Create a validator with the given config.
    #[must_use]
    pub const fn new(config: ValidationConfig) -> Self {
        Self { config }
    }

    /// Validate one record-set snapshot.
    ///
    /// Deterministic and side-effect free: the same snapshot always yields
    /// an identical report, and the report is created fresh on every call.
    /// An empty set is reported as valid ("nothing to validate" is not a
    /// defect); a set with no parseable timestamp short-circuits with a
    /// single critical finding, since no other check has a time axis to
    /// work with.
    #[must_use]
    pub fn validate(&self, records: &[MeterRecord]) -> ValidationReport {
        if records.is_empty() {
            return ValidationReport {
                valid: true,
                messages: vec!["no records to validate".into()],
                stats: ValidationStats::default(),
            };
        }

        let total = records.len() as u64;
        let sorted = sorted_valid(records);
        let valid_count = sorted.len() as u64;
        let invalid_count = total - valid_count;

        if sorted.is_empty() {
            return ValidationReport {
                valid: false,
                messages: vec![format!(
                    "found {invalid_count} records with an invalid timestamp; no valid data to analyze"
                )],
                stats: ValidationStats {
                    total_records: total,
                    invalid_timestamps: invalid_count,
                    ..ValidationStats::default()
                },
            };
        }

        // Safe: sorted is non-empty and every entry carries a valid instant.
        let first = sorted[0].timestamp.instant().unwrap_or_default();
        let last = sorted[sorted.len() - 1].timestamp.instant().unwrap_or_default();

        let expected = match self.config.grid_policy {
            GridPolicy::DynamicSpan => {
                let span = (last - first).num_seconds().max(0);
                (span / STEP_SECONDS) as u64 + 1
            }
            GridPolicy::FixedAnnual => FIXED_ANNUAL_RECORDS,
        };
        let missing = expected.saturating_sub(valid_count);

        let mut seen: HashSet<DateTime<Utc>> = HashSet::with_capacity(sorted.len());
        let mut duplicates: u64 = 0;
        for record in &sorted {
            if let Some(instant) = record.timestamp.instant() {
                if !seen.insert(instant) {
                    duplicates += 1;
                }
            }
        }

        let values = numeric_values(&sorted);
        let extremes = match mean_stddev(&values) {
            Some((mean, stddev)) if stddev > STDDEV_EPSILON => {
                let threshold = self.config.outlier_sigma * stddev;
                values.iter().filter(|v| (*v - mean).abs() > threshold).count() as u64
            }
            // Degenerate statistics: skipped, reported as zero.
            _ => 0,
        };

        let missing_values = sorted
            .iter()
            .filter(|r| r.numeric_value().is_none())
            .count() as u64;

        let years: BTreeSet<i32> = sorted
            .iter()
            .filter_map(|r| r.timestamp.instant())
            .map(|ts| ts.year())
            .collect();
        let different_years = if years.len() > 1 { years.len() as u64 } else { 0 };
        let years: Vec<i32> = years.into_iter().collect();

        let valid = missing == 0
            && duplicates == 0
            && extremes == 0
            && missing_values == 0
            && invalid_count == 0;

        let mut messages = Vec::with_capacity(6);
        messages.push(if invalid_count > 0 {
            format!("found {invalid_count} records with an invalid timestamp")
        } else {
            "all timestamps are valid".into()
        });
        messages.push(self.coverage_message(expected, missing, &sorted));
        messages.push(if duplicates > 0 {
            format!("detected {duplicates} duplicate timestamps")
        } else {
            "no duplicate timestamps".into()
        });
        messages.push(if extremes > 0 {
            format!(
                "detected {extremes} extreme values (beyond {}\u{3c3})",
                self.config.outlier_sigma
            )
        } else {
            "no extreme values".into()
        });
        messages.push(if missing_values > 0 {
            format!("found {missing_values} records with a missing value")
        } else {
            "every record has a value".into()
        });
        if different_years > 0 {
            let listed: Vec<String> = years.iter().map(ToString::to_string).collect();
            messages.push(format!("records span multiple years: {}", listed.join(", ")));
        }

        tracing::debug!(
            total,
            valid,
            missing,
            duplicates,
            extremes,
            missing_values,
            invalid_timestamps = invalid_count,
            "validation complete"
        );

        ValidationReport {
            valid,
            messages,
            stats: ValidationStats {
                total_records: total,
                valid_timestamps: valid_count,
                invalid_timestamps: invalid_count,
                expected_records: expected,
                missing_records: missing,
                duplicate_values: duplicates,
                invalid_values: missing_values,
                extreme_values: extremes,
                missing_values,
                different_years,
                years,
                structural_errors: None,
            },
        }
    }

    fn coverage_message(&self, expected: u64, missing: u64, sorted: &[&MeterRecord]) -> String {
        match self.config.grid_policy {
            GridPolicy::DynamicSpan => {
                if missing > 0 {
                    let first = sorted.first().map(|r| &r.timestamp);
                    let last = sorted.last().map(|r| &r.timestamp);
                    format!(
                        "expected {expected} records between {} and {} at 15-minute intervals, {missing} missing",
                        first.map_or_else(|| "?".into(), format_readable),
                        last.map_or_else(|| "?".into(), format_readable),
                    )
                } else {
                    "record count matches the 15-minute grid".into()
                }
            }
            GridPolicy::FixedAnnual => {
                if missing > 0 {
                    format!("expected {expected} records for a full year, {missing} missing")
                } else {
                    "record count matches a full year of 15-minute intervals".into()
                }
            }
        }
    }
}

/// Validate with the default (dynamic-span) configuration.
#[must_use]
pub fn validate(records: &[MeterRecord]) -> ValidationReport {
    Validator::default().validate(records)
}
