//! Tax recomputation rules applied to each report row.
//!
//! NDFL is a step bracket, not a marginal one: the whole base is taxed at a
//! single rate picked by which side of the threshold it falls on.

/// Bases at or below this amount use the lower rate.
pub const TAX_BASE_THRESHOLD: f64 = 5_000_000.0;

/// Rate (percent) for bases within the threshold.
pub const LOWER_RATE: f64 = 13.0;

/// Rate (percent) for bases above the threshold.
pub const UPPER_RATE: f64 = 15.0;

/// Fill color for rows whose reported total disagrees with the recomputation.
pub const ALERT_COLOR: &str = "red";

/// Round half away from zero: 2.5 → 3, -2.5 → -3, 2.4 → 2.
///
/// This matches the tax authority's rounding rule, not banker's rounding.
pub fn round_half_away_from_zero(x: f64) -> i64 {
    if x > 0.0 {
        (x + 0.5).trunc() as i64
    } else {
        (x - 0.5).trunc() as i64
    }
}

/// Recompute the expected tax total for one row.
///
/// A row without a tax base cannot be recomputed; its reported total is
/// passed through unchanged so the deviation comes out as zero.
pub fn compute_formula_total(tax_base: Option<f64>, computed_total: Option<f64>) -> Option<f64> {
    let base = match tax_base {
        Some(base) => base,
        None => return computed_total,
    };

    let rate_input = base / 100.0;
    let result = if base <= TAX_BASE_THRESHOLD {
        rate_input * LOWER_RATE
    } else {
        rate_input * UPPER_RATE
    };

    Some(round_half_away_from_zero(result) as f64)
}

/// Difference between the reported total and the recomputed one.
///
/// `None` when either operand is missing; column existence is checked by the
/// table layer before this runs row-wise.
pub fn compute_deviation(computed_total: Option<f64>, formula_total: Option<f64>) -> Option<f64> {
    Some(computed_total? - formula_total?)
}

/// Pick a fill color for a deviation cell.
///
/// Exact zero gets the highlight color; any non-zero deviation, positive or
/// negative, gets the fixed alert color. An undefined deviation (missing or
/// NaN value) gets no fill at all.
pub fn classify_deviation(deviation: Option<f64>, highlight_color: &str) -> Option<String> {
    let value = deviation?;
    if value.is_nan() {
        return None;
    }
    if value == 0.0 {
        Some(highlight_color.to_string())
    } else {
        Some(ALERT_COLOR.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_half_away_from_zero() {
        assert_eq!(round_half_away_from_zero(2.5), 3);
        assert_eq!(round_half_away_from_zero(-2.5), -3);
        assert_eq!(round_half_away_from_zero(2.49), 2);
        assert_eq!(round_half_away_from_zero(-2.49), -2);
        assert_eq!(round_half_away_from_zero(0.5), 1);
        assert_eq!(round_half_away_from_zero(0.0), 0);
    }

    #[test]
    fn test_formula_total_lower_rate() {
        // 1,000,000 / 100 * 13 = 130,000 exactly
        assert_eq!(
            compute_formula_total(Some(1_000_000.0), Some(0.0)),
            Some(130_000.0)
        );
    }

    #[test]
    fn test_formula_total_threshold_is_inclusive() {
        // Exactly 5,000,000 still uses the 13% rate
        assert_eq!(
            compute_formula_total(Some(5_000_000.0), Some(0.0)),
            Some(650_000.0)
        );
    }

    #[test]
    fn test_formula_total_upper_rate() {
        // One ruble over the threshold switches the whole base to 15%
        assert_eq!(
            compute_formula_total(Some(5_000_001.0), Some(0.0)),
            Some(750_000.0)
        );
    }

    #[test]
    fn test_formula_total_rounds_result() {
        // 123 / 100 * 13 = 15.99 → 16
        assert_eq!(compute_formula_total(Some(123.0), Some(0.0)), Some(16.0));
    }

    #[test]
    fn test_formula_total_null_base_passes_through() {
        assert_eq!(compute_formula_total(None, Some(999.0)), Some(999.0));
        assert_eq!(compute_formula_total(None, None), None);
    }

    #[test]
    fn test_deviation() {
        assert_eq!(compute_deviation(Some(100.0), Some(100.0)), Some(0.0));
        assert_eq!(compute_deviation(Some(105.0), Some(100.0)), Some(5.0));
        assert_eq!(compute_deviation(Some(95.0), Some(100.0)), Some(-5.0));
        assert_eq!(compute_deviation(None, Some(100.0)), None);
        assert_eq!(compute_deviation(Some(100.0), None), None);
    }

    #[test]
    fn test_classify_zero_deviation() {
        assert_eq!(
            classify_deviation(Some(0.0), "green"),
            Some("green".to_string())
        );
    }

    #[test]
    fn test_classify_nonzero_deviation_both_signs() {
        assert_eq!(
            classify_deviation(Some(5.0), "green"),
            Some("red".to_string())
        );
        assert_eq!(
            classify_deviation(Some(-5.0), "green"),
            Some("red".to_string())
        );
    }

    #[test]
    fn test_classify_undefined_deviation() {
        assert_eq!(classify_deviation(None, "green"), None);
        assert_eq!(classify_deviation(Some(f64::NAN), "green"), None);
    }
}
