/// Units for [`format_size`], in ascending order.
const UNITS: [&str; 4] = ["B", "KB", "MB", "GB"];

/// Format a byte count with 1024-based units and one decimal place.
///
/// Picks the largest unit in which the value is at least 1, capped at GB.
pub fn format_size(bytes: u64) -> String {
    let mut value = bytes as f64;
    let mut unit = 0;

    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }

    format!("{:.1}{}", value, UNITS[unit])
}
