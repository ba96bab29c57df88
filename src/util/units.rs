/// Bytes in one gibibyte (1024^3).
pub const GIB: f64 = 1_073_741_824.0;

/// Round to two decimal places, half away from zero.
pub fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

/// Convert an optional byte count to GiB rounded to two decimals.
/// Absent and zero both map to `0.0`.
pub fn bytes_to_gib(bytes: Option<u64>) -> f64 {
    match bytes {
        Some(b) if b > 0 => round2(b as f64 / GIB),
        _                => 0.0,
    }
}

/// Format a GiB (or percent) value as the shortest decimal that round-trips,
/// always with a fractional part: "1.0", "0.5", "33.33".
pub fn fmt_decimal(v: f64) -> String {
    format!("{:?}", v)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bytes_to_gib_whole_and_fractional() {
        assert_eq!(bytes_to_gib(Some(5_368_709_120)), 5.0);
        assert_eq!(bytes_to_gib(Some(536_870_912)), 0.5);
        assert_eq!(bytes_to_gib(Some(1_610_612_736)), 1.5);
    }

    #[test]
    fn test_bytes_to_gib_absent_or_zero() {
        assert_eq!(bytes_to_gib(None), 0.0);
        assert_eq!(bytes_to_gib(Some(0)), 0.0);
    }

    #[test]
    fn test_tiny_value_rounds_to_zero() {
        assert_eq!(bytes_to_gib(Some(1024)), 0.0);
    }

    #[test]
    fn test_round2() {
        assert_eq!(round2(33.333333), 33.33);
        assert_eq!(round2(66.666666), 66.67);
        assert_eq!(round2(50.0), 50.0);
    }

    #[test]
    fn test_fmt_decimal_keeps_fraction() {
        assert_eq!(fmt_decimal(1.0), "1.0");
        assert_eq!(fmt_decimal(0.5), "0.5");
        assert_eq!(fmt_decimal(33.33), "33.33");
        assert_eq!(fmt_decimal(0.0), "0.0");
    }
}
