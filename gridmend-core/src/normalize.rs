use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, TimeDelta, TimeZone, Utc};
use gridmend_types::{DEFAULT_UNIT, MeterRecord, RawRecord, RawTimestamp, Timestamp};

const DAY_SECONDS: f64 = 86_400.0;

/// Spreadsheet serials are day counts from 1899-12-30 (the convention keeps
/// the historical leap-year-1900 offset out of modern dates).
const SERIAL_EPOCH: (i32, u32, u32) = (1899, 12, 30);

/// Upper bound of the accepted serial range, roughly year 9999.
const SERIAL_MAX: f64 = 2_958_466.0;

/// Candidate text parsers, tried in order; the first match wins.
///
/// Each entry is a pure `&str -> Option<DateTime<Utc>>`. New layouts extend
/// this list rather than growing any single parser.
const TEXT_STRATEGIES: &[fn(&str) -> Option<DateTime<Utc>>] = &[
    parse_rfc,
    parse_dotted_dmy,
    parse_iso_like,
    parse_slashed_ymd,
    parse_slashed_mdy,
];

/// Convert a heterogeneous timestamp representation into a UTC instant.
///
/// Absence is an expected outcome for malformed source data, so this never
/// errors: anything that fails every strategy yields `None` and the caller
/// flags the record instead of dropping it.
///
/// ```
/// use gridmend_core::normalize_timestamp;
/// use gridmend_types::RawTimestamp;
///
/// let iso = RawTimestamp::Text("2023-01-01T00:15:00Z".into());
/// let dotted = RawTimestamp::Text("01.01.2023 00:15".into());
/// assert_eq!(normalize_timestamp(&iso), normalize_timestamp(&dotted));
/// assert_eq!(normalize_timestamp(&RawTimestamp::Text("not a date".into())), None);
/// ```
///
/// Numeric inputs strictly inside `(1, 2_958_466)` are interpreted as
/// spreadsheet epoch-day serials:
///
/// ```
/// use chrono::{TimeZone, Utc};
/// use gridmend_core::normalize_timestamp;
/// use gridmend_types::RawTimestamp;
///
/// // 44927.25 = 2023-01-01 06:00 UTC
/// let ts = normalize_timestamp(&RawTimestamp::Serial(44_927.25));
/// assert_eq!(ts, Some(Utc.with_ymd_and_hms(2023, 1, 1, 6, 0, 0).unwrap()));
/// assert_eq!(normalize_timestamp(&RawTimestamp::Serial(0.5)), None);
/// ```
#[must_use]
pub fn normalize_timestamp(input: &RawTimestamp) -> Option<DateTime<Utc>> {
    match input {
        RawTimestamp::Instant(ts) => Some(*ts),
        RawTimestamp::Serial(serial) => serial_to_instant(*serial),
        RawTimestamp::Text(text) => {
            let text = text.trim();
            if text.is_empty() {
                return None;
            }
            TEXT_STRATEGIES.iter().find_map(|parse| parse(text))
        }
        RawTimestamp::Missing => None,
    }
}

/// Normalize one adapter record into a [`MeterRecord`].
///
/// Unparseable timestamps become [`Timestamp::Invalid`] carrying the source
/// text, keeping the record in the set for round-trip fidelity. NaN values
/// are normalized to `None`; a missing unit becomes [`DEFAULT_UNIT`].
#[must_use]
pub fn normalize_record(raw: &RawRecord, id: u64) -> MeterRecord {
    let timestamp = normalize_timestamp(&raw.timestamp)
        .map_or_else(|| Timestamp::Invalid(raw_text(&raw.timestamp)), Timestamp::Utc);
    let unit = raw
        .unit
        .as_deref()
        .map(str::trim)
        .filter(|u| !u.is_empty())
        .unwrap_or(DEFAULT_UNIT)
        .to_string();
    MeterRecord {
        id,
        timestamp,
        value: raw.value.filter(|v| v.is_finite()),
        unit,
    }
}

/// Normalize a whole adapter batch, assigning ids 1..=n in input order.
#[must_use]
pub fn normalize_records(raws: &[RawRecord]) -> Vec<MeterRecord> {
    raws.iter()
        .enumerate()
        .map(|(i, raw)| normalize_record(raw, i as u64 + 1))
        .collect()
}

fn raw_text(input: &RawTimestamp) -> String {
    match input {
        RawTimestamp::Text(s) => s.clone(),
        RawTimestamp::Serial(n) => n.to_string(),
        RawTimestamp::Instant(ts) => ts.to_rfc3339(),
        RawTimestamp::Missing => String::new(),
    }
}

/// RFC 3339 / RFC 2822, accepted only for years after 1900. The year guard
/// keeps arbitrary numeric strings from parsing as epoch-adjacent dates.
fn parse_rfc(text: &str) -> Option<DateTime<Utc>> {
    let parsed = DateTime::parse_from_rfc3339(text)
        .or_else(|_| DateTime::parse_from_rfc2822(text))
        .ok()?;
    let ts = parsed.with_timezone(&Utc);
    (ts.year() > 1900).then_some(ts)
}

/// `DD.MM.YYYY HH:MM[:SS]`, treated as UTC.
fn parse_dotted_dmy(text: &str) -> Option<DateTime<Utc>> {
    naive_utc(text, &["%d.%m.%Y %H:%M:%S", "%d.%m.%Y %H:%M"])
}

/// `YYYY-MM-DD[T ]HH:MM[:SS][.fff][zone]`. A trailing `Z` reads as UTC; a
/// numeric offset is honored and converted; no zone means UTC.
fn parse_iso_like(text: &str) -> Option<DateTime<Utc>> {
    const NAIVE: &[&str] = &[
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%d %H:%M:%S%.f",
        "%Y-%m-%dT%H:%M",
        "%Y-%m-%d %H:%M",
    ];
    if let Some(stripped) = text.strip_suffix(['Z', 'z']) {
        return naive_utc(stripped, NAIVE).filter(|ts| ts.year() > 1900);
    }
    // %z parses numeric offsets with or without the colon.
    for fmt in ["%Y-%m-%dT%H:%M:%S%.f%z", "%Y-%m-%d %H:%M:%S%.f%z"] {
        if let Ok(ts) = DateTime::parse_from_str(text, fmt) {
            let ts = ts.with_timezone(&Utc);
            return (ts.year() > 1900).then_some(ts);
        }
    }
    naive_utc(text, NAIVE).filter(|ts| ts.year() > 1900)
}

/// `YYYY/MM/DD HH:MM[:SS]`, treated as UTC.
fn parse_slashed_ymd(text: &str) -> Option<DateTime<Utc>> {
    naive_utc(text, &["%Y/%m/%d %H:%M:%S", "%Y/%m/%d %H:%M"])
}

/// `MM/DD/YYYY HH:MM[:SS]` (US convention), treated as UTC.
fn parse_slashed_mdy(text: &str) -> Option<DateTime<Utc>> {
    naive_utc(text, &["%m/%d/%Y %H:%M:%S", "%m/%d/%Y %H:%M"])
}

fn naive_utc(text: &str, formats: &[&str]) -> Option<DateTime<Utc>> {
    formats.iter().find_map(|fmt| {
        NaiveDateTime::parse_from_str(text, fmt)
            .ok()
            .map(|dt| Utc.from_utc_datetime(&dt))
    })
}

/// Spreadsheet epoch-day serial to UTC instant: whole days from the 1899
/// epoch plus the day fraction rounded to the nearest second.
fn serial_to_instant(serial: f64) -> Option<DateTime<Utc>> {
    if !serial.is_finite() || serial <= 1.0 || serial >= SERIAL_MAX {
        return None;
    }
    let (y, m, d) = SERIAL_EPOCH;
    let epoch = NaiveDate::from_ymd_opt(y, m, d)?.and_hms_opt(0, 0, 0)?;
    #[allow(clippy::cast_possible_truncation)]
    let days = serial.trunc() as i64;
    #[allow(clippy::cast_possible_truncation)]
    let secs = (serial.fract() * DAY_SECONDS).round() as i64;
    let dt = epoch
        .checked_add_signed(TimeDelta::days(days))?
        .checked_add_signed(TimeDelta::seconds(secs))?;
    Some(Utc.from_utc_datetime(&dt))
}
