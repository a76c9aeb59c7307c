use gridmend_types::MeterRecord;

/// Below this population standard deviation the outlier check is considered
/// degenerate (all values effectively equal) and is skipped.
pub const STDDEV_EPSILON: f64 = 1e-6;

/// Population mean and standard deviation.
///
/// Returns `None` for fewer than two values; a single sample has no spread
/// to measure.
#[must_use]
pub fn mean_stddev(values: &[f64]) -> Option<(f64, f64)> {
    if values.len() < 2 {
        return None;
    }
    #[allow(clippy::cast_precision_loss)]
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
    Some((mean, variance.sqrt()))
}

/// Finite values of the valid-timestamp records, in the given order.
#[must_use]
pub fn numeric_values(records: &[&MeterRecord]) -> Vec<f64> {
    records.iter().filter_map(|r| r.numeric_value()).collect()
}

/// Round to two decimal places, the precision of repaired values.
#[must_use]
pub fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn population_stats() {
        let (mean, stddev) = mean_stddev(&[2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]).unwrap();
        assert!((mean - 5.0).abs() < f64::EPSILON);
        assert!((stddev - 2.0).abs() < 1e-12);
    }

    #[test]
    fn too_few_values() {
        assert_eq!(mean_stddev(&[]), None);
        assert_eq!(mean_stddev(&[42.0]), None);
    }

    #[test]
    fn rounding() {
        assert!((round2(0.125) - 0.13).abs() < 1e-9);
        assert!((round2(115.0 + 1.0 / 3.0) - 115.33).abs() < 1e-9);
        assert!((round2(100.0) - 100.0).abs() < f64::EPSILON);
    }
}
