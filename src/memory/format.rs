const UNITS: [&str; 6] = ["B", "KB", "MB", "GB", "TB", "PB"];
const STEP: f64 = 1024.0;

/// Short human-readable size: the largest unit where the value is at least 1,
/// with one decimal place below 10 in that unit (bytes are always whole).
pub fn format_short_size(bytes: u64) -> String {
    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= STEP && unit + 1 < UNITS.len() {
        value /= STEP;
        unit += 1;
    }
    if unit == 0 {
        return format!("{bytes} B");
    }
    if value < 10.0 {
        // The decimal is decided before rounding, so 9.96 prints as "10.0".
        return format!("{value:.1} {}", UNITS[unit]);
    }
    format!("{value:.0} {}", UNITS[unit])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bytes_stay_whole() {
        assert_eq!(format_short_size(0), "0 B");
        assert_eq!(format_short_size(1023), "1023 B");
    }

    #[test]
    fn small_values_keep_one_decimal() {
        assert_eq!(format_short_size(1536), "1.5 KB");
        assert_eq!(format_short_size(3 * 1024 * 1024 * 1024 / 2), "1.5 GB");
    }

    #[test]
    fn large_values_drop_decimals() {
        assert_eq!(format_short_size(512 * 1024 * 1024), "512 MB");
        assert_eq!(format_short_size(12 * 1024), "12 KB");
    }

    #[test]
    fn just_below_ten_keeps_the_decimal() {
        assert_eq!(format_short_size(10_199), "10.0 KB");
        assert_eq!(format_short_size(10_240), "10 KB");
    }
}
