// Utility functions for swap-targeting

/// Clamp a score into the 0-100 range. Non-finite input maps to 0.
pub fn clamp_score(score: f32) -> f32 {
    if !score.is_finite() {
        return 0.0;
    }
    score.clamp(0.0, 100.0)
}

/// Relative difference of `value` from `reference`, in percent.
///
/// Returns `None` when the reference is not a positive finite number.
pub fn percent_difference(reference: f64, value: f64) -> Option<f64> {
    if !reference.is_finite() || !value.is_finite() || reference <= 0.0 {
        return None;
    }
    Some((value - reference).abs() / reference * 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamp_score() {
        assert_eq!(clamp_score(140.0), 100.0);
        assert_eq!(clamp_score(-12.0), 0.0);
        assert_eq!(clamp_score(42.5), 42.5);
        assert_eq!(clamp_score(f32::NAN), 0.0);
    }

    #[test]
    fn test_percent_difference() {
        assert!((percent_difference(500.0, 520.0).unwrap() - 4.0).abs() < 0.001);
        assert!((percent_difference(500.0, 450.0).unwrap() - 10.0).abs() < 0.001);
        assert!(percent_difference(0.0, 100.0).is_none());
    }
}
