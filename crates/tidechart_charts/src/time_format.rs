//! Timeline and tooltip date formatting.
//!
//! X values are Unix epoch milliseconds in UTC.

use chrono::{DateTime, Utc};

/// Short axis label, e.g. `Mar 4`.
pub fn format_axis_date(epoch_ms: f64) -> String {
    match DateTime::<Utc>::from_timestamp_millis(epoch_ms as i64) {
        Some(dt) => dt.format("%b %-d").to_string(),
        None => format!("{epoch_ms}"),
    }
}

/// Tooltip title with weekday, e.g. `Sat, Mar 4`.
pub fn format_tooltip_date(epoch_ms: f64) -> String {
    match DateTime::<Utc>::from_timestamp_millis(epoch_ms as i64) {
        Some(dt) => dt.format("%a, %b %-d").to_string(),
        None => format!("{epoch_ms}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // 2019-04-20 00:00:00 UTC
    const APR_20: f64 = 1_555_718_400_000.0;

    #[test]
    fn axis_label_is_month_and_day() {
        assert_eq!(format_axis_date(APR_20), "Apr 20");
    }

    #[test]
    fn tooltip_title_includes_weekday() {
        assert_eq!(format_tooltip_date(APR_20), "Sat, Apr 20");
    }

    #[test]
    fn out_of_range_timestamp_falls_back_to_raw_value() {
        let label = format_axis_date(f64::MAX);
        assert!(!label.is_empty());
    }
}
