use chrono::{TimeZone, Utc};
use gridmend_core::{normalize_record, normalize_records, normalize_timestamp};
use gridmend_types::{DEFAULT_UNIT, RawRecord, RawTimestamp, Timestamp};

fn text(s: &str) -> RawTimestamp {
    RawTimestamp::Text(s.into())
}

#[test]
fn recognizes_every_text_layout() {
    let expected = Utc.with_ymd_and_hms(2023, 1, 2, 3, 4, 5).unwrap();
    for input in [
        "2023-01-02T03:04:05Z",
        "2023-01-02T03:04:05.000Z",
        "2023-01-02 03:04:05",
        "2023-01-02T03:04:05",
        "02.01.2023 03:04:05",
        "2023/01/02 03:04:05",
        "1/2/2023 03:04:05",
    ] {
        assert_eq!(
            normalize_timestamp(&text(input)),
            Some(expected),
            "layout: {input}"
        );
    }
}

#[test]
fn minute_precision_variants() {
    let expected = Utc.with_ymd_and_hms(2023, 1, 2, 3, 4, 0).unwrap();
    for input in ["02.01.2023 3:4", "2023-01-02 03:04", "2023/1/2 3:04", "01/02/2023 03:04"] {
        assert_eq!(
            normalize_timestamp(&text(input)),
            Some(expected),
            "layout: {input}"
        );
    }
}

#[test]
fn numeric_offsets_convert_to_utc() {
    assert_eq!(
        normalize_timestamp(&text("2023-01-01T02:00:00+02:00")),
        Some(Utc.with_ymd_and_hms(2023, 1, 1, 0, 0, 0).unwrap())
    );
}

#[test]
fn us_convention_is_month_first() {
    assert_eq!(
        normalize_timestamp(&text("3/14/2023 12:00")),
        Some(Utc.with_ymd_and_hms(2023, 3, 14, 12, 0, 0).unwrap())
    );
}

#[test]
fn epoch_adjacent_years_are_rejected() {
    // Guards against misparsing non-date strings as epoch-adjacent dates.
    assert_eq!(normalize_timestamp(&text("1899-01-01T00:00:00Z")), None);
    assert_eq!(normalize_timestamp(&text("1900-06-01 12:00:00")), None);
}

#[test]
fn spreadsheet_serials() {
    // 44927 is 2023-01-01; .25 is a quarter day.
    assert_eq!(
        normalize_timestamp(&RawTimestamp::Serial(44_927.25)),
        Some(Utc.with_ymd_and_hms(2023, 1, 1, 6, 0, 0).unwrap())
    );
    assert_eq!(
        normalize_timestamp(&RawTimestamp::Serial(44_927.0)),
        Some(Utc.with_ymd_and_hms(2023, 1, 1, 0, 0, 0).unwrap())
    );
}

#[test]
fn serial_bounds_are_exclusive() {
    assert_eq!(normalize_timestamp(&RawTimestamp::Serial(1.0)), None);
    assert_eq!(normalize_timestamp(&RawTimestamp::Serial(0.5)), None);
    assert_eq!(normalize_timestamp(&RawTimestamp::Serial(2_958_466.0)), None);
    assert_eq!(normalize_timestamp(&RawTimestamp::Serial(f64::NAN)), None);
}

#[test]
fn failures_are_silent() {
    assert_eq!(normalize_timestamp(&RawTimestamp::Missing), None);
    assert_eq!(normalize_timestamp(&text("")), None);
    assert_eq!(normalize_timestamp(&text("   ")), None);
    assert_eq!(normalize_timestamp(&text("not a date")), None);
    assert_eq!(normalize_timestamp(&text("99.99.2023 12:00")), None);
}

#[test]
fn instants_pass_through() {
    let ts = Utc.with_ymd_and_hms(2021, 7, 1, 8, 30, 0).unwrap();
    assert_eq!(normalize_timestamp(&RawTimestamp::Instant(ts)), Some(ts));
}

#[test]
fn unparseable_records_keep_their_source_text() {
    let raw = RawRecord {
        timestamp: text("soon"),
        value: Some(12.5),
        unit: None,
    };
    let record = normalize_record(&raw, 3);
    assert_eq!(record.id, 3);
    assert_eq!(record.timestamp, Timestamp::Invalid("soon".into()));
    assert_eq!(record.value, Some(12.5));
    assert_eq!(record.unit, DEFAULT_UNIT);
}

#[test]
fn nan_values_become_absent() {
    let raw = RawRecord {
        timestamp: text("2023-01-01T00:00:00Z"),
        value: Some(f64::NAN),
        unit: Some("kWh".into()),
    };
    assert_eq!(normalize_record(&raw, 1).value, None);
}

#[test]
fn batch_normalization_numbers_in_input_order() {
    let raws = vec![
        RawRecord {
            timestamp: text("2023-01-01T00:00:00Z"),
            value: Some(1.0),
            unit: Some("kWh".into()),
        },
        RawRecord {
            timestamp: RawTimestamp::Missing,
            value: None,
            unit: None,
        },
    ];
    let records = normalize_records(&raws);
    assert_eq!(records.len(), 2);
    assert_eq!(records[0].id, 1);
    assert_eq!(records[1].id, 2);
    assert!(records[0].timestamp.is_valid());
    assert!(!records[1].timestamp.is_valid());
}
