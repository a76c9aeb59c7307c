//! Deterministic sample meter datasets for CI-safe tests and examples.
#![warn(missing_docs)]

use chrono::{DateTime, TimeDelta, TimeZone, Utc};
use gridmend_types::{DEFAULT_UNIT, MeterRecord, STEP_SECONDS};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Grid slots seeded as missing on the second day (hour, quarter).
const MISSING_SLOTS: [(i64, i64); 3] = [(3, 2), (10, 1), (15, 3)];
/// Slots duplicated on the second day; the copy carries 90 % of the value.
const DUPLICATE_SLOTS: [(i64, i64); 2] = [(5, 0), (18, 2)];
/// Slots whose value is inflated fivefold on the second day.
const EXTREME_SLOTS: [(i64, i64); 2] = [(8, 1), (20, 3)];

/// Two days of 15-minute readings starting 2023-01-01 UTC, with defects
/// seeded into the second day: three missing slots, two duplicated
/// timestamps, and two fivefold extreme values.
///
/// Base values are whole numbers in `100..=150`, drawn from a seeded RNG so
/// equal seeds produce identical datasets.
#[must_use]
pub fn sample_two_days(seed: u64) -> Vec<MeterRecord> {
    let mut rng = StdRng::seed_from_u64(seed);
    let start = Utc.with_ymd_and_hms(2023, 1, 1, 0, 0, 0).unwrap();
    let mut out: Vec<MeterRecord> = Vec::with_capacity(2 * 96);

    for day in 0..2i64 {
        for hour in 0..24i64 {
            for quarter in 0..4i64 {
                let seeded = day == 1;
                if seeded && MISSING_SLOTS.contains(&(hour, quarter)) {
                    continue;
                }
                let ts = start
                    + TimeDelta::days(day)
                    + TimeDelta::hours(hour)
                    + TimeDelta::minutes(quarter * 15);
                let mut value = f64::from(rng.random_range(100..=150u32));
                if seeded && EXTREME_SLOTS.contains(&(hour, quarter)) {
                    value *= 5.0;
                }
                out.push(MeterRecord::new(
                    out.len() as u64 + 1,
                    ts,
                    Some(value),
                    DEFAULT_UNIT,
                ));
                if seeded && DUPLICATE_SLOTS.contains(&(hour, quarter)) {
                    out.push(MeterRecord::new(
                        out.len() as u64 + 1,
                        ts,
                        Some((value * 0.9).round()),
                        DEFAULT_UNIT,
                    ));
                }
            }
        }
    }

    out
}

/// A defect-free contiguous 15-minute grid of `slots` records, every value
/// equal to `value`.
#[must_use]
pub fn full_grid(start: DateTime<Utc>, slots: usize, value: f64) -> Vec<MeterRecord> {
    (0..slots)
        .map(|i| {
            let ts = start + TimeDelta::seconds(STEP_SECONDS * i as i64);
            MeterRecord::new(i as u64 + 1, ts, Some(value), DEFAULT_UNIT)
        })
        .collect()
}
