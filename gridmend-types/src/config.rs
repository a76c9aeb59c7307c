//! Configuration for the validator, eligibility gate, and repair engine.

use chrono::TimeDelta;
use serde::{Deserialize, Serialize};

/// Fixed sampling step of the expected grid, in seconds (15 minutes).
pub const STEP_SECONDS: i64 = 15 * 60;

/// Expected record count for one full calendar year at 15-minute sampling.
pub const FIXED_ANNUAL_RECORDS: u64 = 4 * 24 * 365;

/// Default outlier threshold, in population standard deviations.
pub const DEFAULT_OUTLIER_SIGMA: f64 = 3.0;

/// The fixed sampling step as a [`TimeDelta`].
#[must_use]
pub fn step() -> TimeDelta {
    TimeDelta::seconds(STEP_SECONDS)
}

/// How the validator derives the expected grid size.
///
/// The dynamic policy suits data whose span is only known from the records
/// themselves; the fixed-annual policy suits freshly parsed files that are
/// supposed to cover exactly one calendar year.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GridPolicy {
    /// `floor((last - first) / step) + 1` from the observed valid-timestamp span.
    #[default]
    DynamicSpan,
    /// A fixed year's worth of slots ([`FIXED_ANNUAL_RECORDS`]).
    FixedAnnual,
}

/// Tunables for [`crate::ValidationReport`] computation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ValidationConfig {
    /// Expected-grid sizing policy.
    pub grid_policy: GridPolicy,
    /// Outlier threshold in population standard deviations.
    pub outlier_sigma: f64,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            grid_policy: GridPolicy::default(),
            outlier_sigma: DEFAULT_OUTLIER_SIGMA,
        }
    }
}

/// Safety limits consulted before gap-filling interpolation.
///
/// Defaults reproduce the thresholds observed in production; all of them are
/// caller-tunable.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct InterpolationLimits {
    /// Absolute minimum number of valid-timestamp records.
    pub min_record_floor: usize,
    /// Minimum fraction of the expected in-span grid that must be present.
    pub min_density: f64,
    /// Hard cap on the number of records a single repair may synthesize.
    pub max_generated: usize,
    /// Largest tolerated gap between adjacent records, in days.
    pub max_gap_days: i64,
    /// Span beyond which month coverage is checked, in days.
    pub long_span_days: i64,
    /// Minimum distinct months-of-year required for long spans.
    pub min_months: usize,
}

impl Default for InterpolationLimits {
    fn default() -> Self {
        Self {
            min_record_floor: 100,
            min_density: 0.10,
            max_generated: 8_000,
            max_gap_days: 7,
            long_span_days: 180,
            min_months: 6,
        }
    }
}

/// Which repair stages to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RepairOptions {
    /// Synthesize records for empty 15-minute grid slots.
    pub fix_missing: bool,
    /// Drop records that duplicate an earlier record's timestamp.
    pub fix_duplicate: bool,
    /// Replace statistical outliers with the dataset mean.
    pub fix_extreme: bool,
}

/// Tunables for the repair engine.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RepairConfig {
    /// Outlier threshold in population standard deviations.
    pub outlier_sigma: f64,
    /// Gap-filling safety limits.
    pub limits: InterpolationLimits,
}

impl Default for RepairConfig {
    fn default() -> Self {
        Self {
            outlier_sigma: DEFAULT_OUTLIER_SIGMA,
            limits: InterpolationLimits::default(),
        }
    }
}
