use chrono::Datelike;
use gridmend_types::{MeterRecord, Timestamp};
use serde::{Deserialize, Serialize};

/// Stable ascending sort on the parsed instant.
///
/// Records with an unparseable timestamp sort after all valid-timestamp
/// records; within either group the original relative order is preserved.
pub fn sort_by_time(records: &mut [MeterRecord]) {
    records.sort_by_key(|r| {
        let instant = r.timestamp.instant();
        (instant.is_none(), instant)
    });
}

/// Split a record set into valid-timestamp and invalid-timestamp views.
#[must_use]
pub fn partition_temporal(records: &[MeterRecord]) -> (Vec<&MeterRecord>, Vec<&MeterRecord>) {
    records.iter().partition(|r| r.timestamp.is_valid())
}

/// The valid-timestamp subset, sorted ascending. Every temporal computation
/// in the validator, gate, and repair engine starts from this view.
#[must_use]
pub fn sorted_valid(records: &[MeterRecord]) -> Vec<&MeterRecord> {
    let mut valid: Vec<&MeterRecord> = records
        .iter()
        .filter(|r| r.timestamp.is_valid())
        .collect();
    valid.sort_by_key(|r| r.timestamp.instant());
    valid
}

/// Human-readable `DD.MM.YYYY HH:MM:SS` rendering of a timestamp, in UTC.
/// Invalid timestamps render as `"invalid date"`.
#[must_use]
pub fn format_readable(ts: &Timestamp) -> String {
    ts.instant().map_or_else(
        || "invalid date".to_string(),
        |instant| instant.format("%d.%m.%Y %H:%M:%S").to_string(),
    )
}

/// Filter criteria for browsing a record set.
///
/// Criteria combine with AND; an unset criterion matches everything. The
/// text search is case-insensitive over the human-readable timestamp and
/// the value.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RecordFilter {
    /// Calendar month (1-12) the timestamp must fall in.
    pub month: Option<u32>,
    /// Day of month (1-31) the timestamp must fall on.
    pub day: Option<u32>,
    /// Free-text needle.
    pub search: Option<String>,
}

impl RecordFilter {
    /// Whether a record passes every set criterion.
    ///
    /// Month and day criteria require a valid timestamp; records with an
    /// invalid timestamp only pass when neither is set.
    #[must_use]
    pub fn matches(&self, record: &MeterRecord) -> bool {
        if self.month.is_some() || self.day.is_some() {
            let Some(instant) = record.timestamp.instant() else {
                return false;
            };
            if self.month.is_some_and(|m| instant.month() != m) {
                return false;
            }
            if self.day.is_some_and(|d| instant.day() != d) {
                return false;
            }
        }
        match self.search.as_deref().map(str::trim) {
            None | Some("") => true,
            Some(needle) => {
                let needle = needle.to_lowercase();
                let ts_text = format_readable(&record.timestamp).to_lowercase();
                let value_text = record
                    .value
                    .map(|v| v.to_string())
                    .unwrap_or_default()
                    .to_lowercase();
                ts_text.contains(&needle) || value_text.contains(&needle)
            }
        }
    }
}

/// Borrowed view of the records passing a filter; the underlying set is
/// never mutated.
#[must_use]
pub fn filter_records<'a>(records: &'a [MeterRecord], filter: &RecordFilter) -> Vec<&'a MeterRecord> {
    records.iter().filter(|r| filter.matches(r)).collect()
}
