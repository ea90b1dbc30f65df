//! Human-readable byte-count formatting.

/// Unit labels, in ascending order of magnitude.
const SIZE_SUFFIXES: [&str; 6] = ["Bytes", "KB", "MB", "GB", "TB", "PB"];

/// Format a byte count the way the App Center UI displays release sizes:
/// one decimal place, unit suffix appended without a separating space.
///
/// The value is divided by 1024 while the rounded quotient is still at
/// least 1, so e.g. `1536` formats as `"1.5KB"`.
pub fn format_size(bytes: u64) -> String {
    let mut value = bytes as f64;
    let mut unit = 0;
    while (value / 1024.0).round() >= 1.0 && unit < SIZE_SUFFIXES.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    format!("{value:.1}{}", SIZE_SUFFIXES[unit])
}
