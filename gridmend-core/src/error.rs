use thiserror::Error;

/// Unified error type for the gridmend workspace.
///
/// Per-record parse failures are not errors (the normalizer signals them by
/// returning `None` and the record stays in the set as structurally
/// invalid); errors are reserved for preconditions that abort a whole
/// operation, currently only the gap-filling stage of a repair.
#[derive(Debug, Error)]
pub enum GridmendError {
    /// Issues with the supplied data that prevent an operation from running.
    #[error("data issue: {0}")]
    Data(String),

    /// Gap filling refused because records span more than one calendar year.
    #[error("cannot interpolate across multiple years: {}", format_years(.years))]
    MultiYear {
        /// Sorted distinct UTC calendar years found in the set.
        years: Vec<i32>,
    },

    /// An interpolation eligibility check failed.
    #[error("interpolation rejected: {reason}")]
    Ineligible {
        /// Which check tripped, with its observed numbers.
        reason: String,
    },
}

impl GridmendError {
    /// Helper: build an `Ineligible` error from a gate-check reason.
    pub fn ineligible(reason: impl Into<String>) -> Self {
        Self::Ineligible {
            reason: reason.into(),
        }
    }

    /// Helper: build a `Data` error.
    pub fn data(msg: impl Into<String>) -> Self {
        Self::Data(msg.into())
    }
}

fn format_years(years: &[i32]) -> String {
    years
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}
