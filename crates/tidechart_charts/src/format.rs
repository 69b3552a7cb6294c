//! Grid label number formatting.

/// Format a grid-row value for its axis label.
///
/// Values of a million and above render as `N.NM`, a thousand and above
/// as `N.NK`, everything else as a rounded integer.
pub fn format_grid_value(value: f64) -> String {
    let abs = value.abs();
    if abs >= 1_000_000.0 {
        format!("{:.1}M", value / 1_000_000.0)
    } else if abs >= 1_000.0 {
        format!("{:.1}K", value / 1_000.0)
    } else {
        format!("{}", value.round() as i64)
    }
}
