//! Record, report, and configuration primitives shared across the gridmend workspace.
#![warn(missing_docs)]

mod config;
mod record;
mod report;

pub use config::{
    DEFAULT_OUTLIER_SIGMA, FIXED_ANNUAL_RECORDS, GridPolicy, InterpolationLimits, RepairConfig,
    RepairOptions, STEP_SECONDS, ValidationConfig, step,
};
pub use record::{DEFAULT_UNIT, MeterRecord, RawRecord, RawTimestamp, Timestamp};
pub use report::{Eligibility, RepairOutcome, RepairStats, ValidationReport, ValidationStats};
