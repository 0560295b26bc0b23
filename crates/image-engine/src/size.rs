//! Human-readable byte sizes.

const SIZE_SUFFIXES: [&str; 9] = ["B", "KB", "MB", "GB", "TB", "PB", "EB", "ZB", "YB"];

/// Format a signed byte count with base-1000 units and at most one decimal.
///
/// `0` is `"0 B"`, `-1500` is `"-1.5 KB"`, `1_000_000` is `"1 MB"`.
pub fn byte_size(size: i64) -> String {
    if size == 0 {
        return format!("0 {}", SIZE_SUFFIXES[0]);
    }

    let magnitude = size.unsigned_abs();
    let mut unit = 0;
    let mut divisor: u64 = 1;
    while unit + 1 < SIZE_SUFFIXES.len() && magnitude / divisor >= 1000 {
        divisor *= 1000;
        unit += 1;
    }

    let normalized = magnitude as f64 / divisor as f64;
    let sign = if size < 0 { "-" } else { "" };
    format!("{sign}{} {}", one_decimal(normalized), SIZE_SUFFIXES[unit])
}

fn one_decimal(value: f64) -> String {
    let rounded = (value * 10.0).round() / 10.0;
    if rounded.fract() == 0.0 {
        format!("{rounded:.0}")
    } else {
        format!("{rounded:.1}")
    }
}
