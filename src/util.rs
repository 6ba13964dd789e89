/// Format a number of seconds as `H:MM:SS`.
pub fn format_duration(seconds: u32) -> String {
    format!(
        "{}:{:02}:{:02}",
        seconds / 3600,
        seconds % 3600 / 60,
        seconds % 60
    )
}

/// Clamp a value into an odd wheel height, rounding even values up.
pub fn odd_at_least_one(count: usize) -> usize {
    match count {
        0 => 1,
        even if even % 2 == 0 => even + 1,
        odd => odd,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(0), "0:00:00");
        assert_eq!(format_duration(7200), "2:00:00");
        assert_eq!(format_duration(8299), "2:18:19");
        assert_eq!(format_duration(86_399), "23:59:59");
    }

    #[test]
    fn test_format_duration_over_a_day() {
        assert_eq!(format_duration(90_061), "25:01:01");
    }

    #[test]
    fn test_odd_at_least_one() {
        assert_eq!(odd_at_least_one(0), 1);
        assert_eq!(odd_at_least_one(1), 1);
        assert_eq!(odd_at_least_one(4), 5);
        assert_eq!(odd_at_least_one(7), 7);
    }
}
