//! gridmend-core
//!
//! Validation, outlier-detection, and gap-repair engine for fixed-interval
//! energy-meter time series.
//!
//! - `normalize`: convert heterogeneous date representations into UTC instants.
//! - `series`: sorted/partitioned/filtered views over a record set.
//! - `validate`: coverage, duplicate, outlier, and year-span statistics
//!   against an expected 15-minute grid.
//! - `eligibility`: safety gate consulted before gap-filling interpolation.
//! - `repair`: duplicate removal, outlier correction, and grid-filling
//!   interpolation.
//!
//! Every operation is a deterministic pure function of its input snapshot:
//! the engine never retains state between calls, and the caller owns the
//! "current" record set. Bad data is reported through structured results,
//! never through panics.
#![warn(missing_docs)]

/// Unified error type for the gridmend workspace.
pub mod error;
/// Safety checks run before any gap-filling repair is attempted.
pub mod eligibility;
/// Timestamp normalization strategies.
pub mod normalize;
/// Duplicate removal, outlier correction, and grid-filling interpolation.
pub mod repair;
/// Ordered, partitioned, and filtered views over record sets.
pub mod series;
/// Population statistics shared by the validator and the repair engine.
pub mod stats;
/// Record-set validation against the expected sampling grid.
pub mod validate;

pub use eligibility::check_interpolation_eligibility;
pub use error::GridmendError;
pub use normalize::{normalize_record, normalize_records, normalize_timestamp};
pub use repair::repair;
pub use series::{
    RecordFilter, filter_records, format_readable, partition_temporal, sort_by_time, sorted_valid,
};
pub use validate::{Validator, validate};

pub use gridmend_types::{
    DEFAULT_UNIT, Eligibility, GridPolicy, InterpolationLimits, MeterRecord, RawRecord,
    RawTimestamp, RepairConfig, RepairOptions, RepairOutcome, RepairStats, Timestamp,
    ValidationConfig, ValidationReport, ValidationStats,
};
