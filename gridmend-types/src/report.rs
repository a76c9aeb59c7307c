//! Structured results produced by validation, eligibility checking, and repair.

use crate::record::MeterRecord;
use serde::{Deserialize, Serialize};

/// Counters computed by a single validation pass.
///
/// A report is created fresh on every call and never mutated in place, so
/// re-validating the same snapshot yields an identical value.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ValidationStats {
    /// Records in the input set, valid or not.
    pub total_records: u64,
    /// Records whose timestamp parsed to an absolute instant.
    pub valid_timestamps: u64,
    /// Records with an unparseable or absent timestamp.
    pub invalid_timestamps: u64,
    /// Grid slots the configured policy expects.
    pub expected_records: u64,
    /// `max(0, expected - valid_timestamps)`.
    pub missing_records: u64,
    /// Records whose timestamp equals an earlier record's timestamp exactly.
    pub duplicate_values: u64,
    /// Records with a non-numeric value (alias of `missing_values`, kept for
    /// report consumers that distinguish the two).
    pub invalid_values: u64,
    /// Numeric values farther than the configured sigma from the mean.
    pub extreme_values: u64,
    /// Records with an absent or NaN value.
    pub missing_values: u64,
    /// Number of distinct calendar years when more than one, else 0.
    pub different_years: u64,
    /// Sorted distinct UTC calendar years present among valid timestamps.
    pub years: Vec<i32>,
    /// Dataset-level shape problems; `None` when the check did not apply.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub structural_errors: Option<u64>,
}

/// Outcome of validating one record-set snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationReport {
    /// True when every problem counter is zero. A multi-year span alone does
    /// not clear this flag; it only disables gap-filling.
    pub valid: bool,
    /// One human-readable finding per check, in check order.
    pub messages: Vec<String>,
    /// The raw counters behind `messages`.
    pub stats: ValidationStats,
}

/// Per-stage effect counters for one repair invocation.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RepairStats {
    /// Records synthesized by gap filling.
    pub missing_repaired: u64,
    /// Records dropped by duplicate removal.
    pub duplicates_removed: u64,
    /// Values replaced by outlier correction.
    pub extremes_fixed: u64,
    /// Invalid-timestamp records that passed through untouched, when any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub invalid_timestamps_found: Option<u64>,
}

/// Result of a successful repair call.
///
/// Failure is the `Err` arm of the repair `Result`; there is no separate
/// success flag.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RepairOutcome {
    /// The repaired record-set snapshot.
    pub records: Vec<MeterRecord>,
    /// What each stage changed.
    pub stats: RepairStats,
    /// Consolidated human-readable summary.
    pub message: String,
}

/// Advisory answer to "may gap-filling interpolation run on this set?".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Eligibility {
    /// Whether every gate check passed.
    pub can_interpolate: bool,
    /// The first failed check, or a confirmation that all passed.
    pub reason: String,
}

impl Eligibility {
    /// All checks passed.
    #[must_use]
    pub fn met() -> Self {
        Self {
            can_interpolate: true,
            reason: "requirements met".into(),
        }
    }

    /// A check failed for the given reason.
    #[must_use]
    pub fn rejected(reason: impl Into<String>) -> Self {
        Self {
            can_interpolate: false,
            reason: reason.into(),
        }
    }
}
