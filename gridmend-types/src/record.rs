//! Meter reading records and their timestamp representations.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::de::Deserializer;
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};

/// Unit assigned to synthesized or unit-less records.
pub const DEFAULT_UNIT: &str = "kWh";

/// Heterogeneous timestamp value as handed over by a file-format adapter.
///
/// Adapters do not interpret timestamps; they forward whatever shape the
/// source file carried and leave normalization to the core.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawTimestamp {
    /// A textual date in one of several known layouts.
    Text(String),
    /// A spreadsheet epoch-day serial (whole days plus day fraction).
    Serial(f64),
    /// An already-resolved absolute instant.
    Instant(DateTime<Utc>),
    /// The source cell/field was empty.
    Missing,
}

/// A reading exactly as produced by a file-format adapter, prior to
/// normalization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawRecord {
    /// Timestamp in whatever shape the source provided.
    pub timestamp: RawTimestamp,
    /// Measured value; `None` when the field was empty or non-numeric.
    pub value: Option<f64>,
    /// Measurement unit, if the source carried one.
    pub unit: Option<String>,
}

/// Canonical per-record time: either a parsed UTC instant or the original
/// text that failed every parsing strategy.
///
/// Records with an [`Timestamp::Invalid`] timestamp are *structurally
/// invalid*: they are excluded from every temporal computation but stay in
/// the record set so exports reproduce the source faithfully.
#[derive(Debug, Clone, PartialEq)]
pub enum Timestamp {
    /// A normalized absolute instant.
    Utc(DateTime<Utc>),
    /// Unparseable source representation, retained verbatim.
    Invalid(String),
}

impl Timestamp {
    /// The parsed instant, if this timestamp is valid.
    #[must_use]
    pub const fn instant(&self) -> Option<DateTime<Utc>> {
        match self {
            Self::Utc(ts) => Some(*ts),
            Self::Invalid(_) => None,
        }
    }

    /// Whether the timestamp parsed to an absolute instant.
    #[must_use]
    pub const fn is_valid(&self) -> bool {
        matches!(self, Self::Utc(_))
    }

    /// Canonical ISO-8601 UTC string (millisecond precision, `Z` suffix),
    /// or `None` for invalid timestamps.
    #[must_use]
    pub fn canonical(&self) -> Option<String> {
        self.instant()
            .map(|ts| ts.to_rfc3339_opts(SecondsFormat::Millis, true))
    }
}

impl From<DateTime<Utc>> for Timestamp {
    fn from(ts: DateTime<Utc>) -> Self {
        Self::Utc(ts)
    }
}

// On the wire a timestamp is always a single string: the canonical ISO-8601
// form when valid, the retained source text otherwise.
impl Serialize for Timestamp {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Utc(ts) => {
                serializer.serialize_str(&ts.to_rfc3339_opts(SecondsFormat::Millis, true))
            }
            Self::Invalid(raw) => serializer.serialize_str(raw),
        }
    }
}

impl<'de> Deserialize<'de> for Timestamp {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(DateTime::parse_from_rfc3339(&raw).map_or_else(
            |_| Self::Invalid(raw),
            |ts| Self::Utc(ts.with_timezone(&Utc)),
        ))
    }
}

/// A normalized meter reading.
///
/// `id` uniqueness is advisory: repairs may renumber. A `value` of `None`
/// marks a missing measurement; NaN inputs are normalized to `None` by the
/// core before any statistics run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeterRecord {
    /// Record identifier, unique within a set but not necessarily contiguous.
    pub id: u64,
    /// Canonical timestamp, or the retained unparseable source text.
    pub timestamp: Timestamp,
    /// Measured value; `None` when missing.
    pub value: Option<f64>,
    /// Measurement unit (e.g. `"kWh"`).
    pub unit: String,
}

impl MeterRecord {
    /// Convenience constructor for a record with a valid timestamp.
    #[must_use]
    pub fn new(id: u64, ts: DateTime<Utc>, value: Option<f64>, unit: impl Into<String>) -> Self {
        Self {
            id,
            timestamp: Timestamp::Utc(ts),
            value,
            unit: unit.into(),
        }
    }

    /// The measured value, with NaN treated as absent.
    #[must_use]
    pub fn numeric_value(&self) -> Option<f64> {
        self.value.filter(|v| v.is_finite())
    }
}
