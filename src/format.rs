//! Clock text and progress percentage helpers shared by both widgets.

/// Format a second count as `MM:SS`, or `HH:MM:SS` once it reaches an hour.
pub fn format_clock(seconds: u64) -> String {
    let hours = seconds / 3600;
    let minutes = (seconds % 3600) / 60;
    let secs = seconds % 60;

    if hours > 0 {
        format!("{:02}:{:02}:{:02}", hours, minutes, secs)
    } else {
        format!("{:02}:{:02}", minutes, secs)
    }
}

/// Percentage of `total` already consumed, rounded and clamped to 0..=100.
pub fn progress_percent(remaining: u64, total: u64) -> u8 {
    if total == 0 {
        return 100;
    }
    let ratio = 1.0 - remaining as f64 / total as f64;
    (ratio * 100.0).round().clamp(0.0, 100.0) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_minutes_and_seconds() {
        assert_eq!(format_clock(65), "01:05");
        assert_eq!(format_clock(5), "00:05");
        assert_eq!(format_clock(0), "00:00");
        assert_eq!(format_clock(1500), "25:00");
    }

    #[test]
    fn switches_to_hours_at_one_hour() {
        assert_eq!(format_clock(3599), "59:59");
        assert_eq!(format_clock(3600), "01:00:00");
        assert_eq!(format_clock(3661), "01:01:01");
    }

    #[test]
    fn hours_are_not_capped_at_two_digits() {
        assert_eq!(format_clock(100 * 3600), "100:00:00");
    }

    #[test]
    fn progress_rounds_and_clamps() {
        assert_eq!(progress_percent(1500, 1500), 0);
        assert_eq!(progress_percent(0, 1500), 100);
        assert_eq!(progress_percent(750, 1500), 50);
        // 1 - 299/300 = 0.33% rounds down
        assert_eq!(progress_percent(299, 300), 0);
        assert_eq!(progress_percent(298, 300), 1);
        assert_eq!(progress_percent(2000, 1500), 0);
        assert_eq!(progress_percent(0, 0), 100);
    }
}
