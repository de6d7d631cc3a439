//! File size formatting.
//!
//! The backend reports sizes through `size_human` fields; this helper
//! produces the same style of string for sizes known only locally (for
//! example when recording an upload in the transfer history).

/// Format a file size for display.
///
/// Values are rounded to at most two decimal places with trailing zeros
/// dropped, so `1536` renders as `"1.5 KB"` and `1024` as `"1 KB"`.
#[must_use]
pub fn format_size(bytes: u64) -> String {
    const UNITS: [&str; 5] = ["B", "KB", "MB", "GB", "TB"];

    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }

    let mut rendered = format!("{:.2}", (value * 100.0).round() / 100.0);
    while rendered.ends_with('0') {
        rendered.pop();
    }
    if rendered.ends_with('.') {
        rendered.pop();
    }

    format!("{rendered} {}", UNITS[unit])
}
