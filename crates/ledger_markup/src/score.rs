//! Score presentation.

/// Decimal places kept in presented totals.
pub const SCORE_DECIMALS: i32 = 4;

/// Round a running total to [`SCORE_DECIMALS`] places, half away from zero.
///
/// Applied once per page when the total is shown; accumulation itself never
/// rounds. `f64`'s `Display` then prints the shortest form (`5`, `1.0001`).
pub fn format_score(score: f64) -> f64 {
    let scale = 10f64.powi(SCORE_DECIMALS);
    let rounded = (score * scale).round() / scale;
    // keep "-0" out of rendered pages
    if rounded == 0.0 { 0.0 } else { rounded }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_score_rounds_half_away_from_zero() {
        assert_eq!(format_score(1.00005), 1.0001);
        assert_eq!(format_score(-1.00005), -1.0001);
    }

    #[test]
    fn test_format_score_rounds_down_below_half() {
        assert_eq!(format_score(1.00004), 1.0);
    }

    #[test]
    fn test_format_score_integers_unchanged() {
        assert_eq!(format_score(5.0), 5.0);
        assert_eq!(format_score(0.0), 0.0);
    }

    #[test]
    fn test_format_score_float_noise() {
        assert_eq!(format_score(0.1 + 0.2), 0.3);
        assert_eq!(format_score(0.1 + 0.2).to_string(), "0.3");
    }

    #[test]
    fn test_format_score_display() {
        assert_eq!(format_score(5.0).to_string(), "5");
        assert_eq!(format_score(11.30004).to_string(), "11.3");
    }

    #[test]
    fn test_format_score_no_negative_zero() {
        let rounded = format_score(-0.00001);
        assert!(rounded.is_sign_positive());
        assert_eq!(rounded.to_string(), "0");
    }
}
