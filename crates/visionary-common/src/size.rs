//! Human-readable byte sizes.

const UNITS: &[&str] = &["bytes", "KB", "MB", "GB", "TB"];

/// Format a byte count using binary (1024) steps, one decimal place.
///
/// Values beyond the terabyte range stay expressed in TB.
///
/// # Examples
///
/// ```
/// use visionary_common::size::format_size;
///
/// assert_eq!(format_size(512), "512.0 bytes");
/// assert_eq!(format_size(1536), "1.5 KB");
/// ```
pub fn format_size(bytes: u64) -> String {
    let mut value = bytes as f64;
    let mut unit = UNITS[0];

    for (i, next) in UNITS.iter().enumerate() {
        unit = next;
        if value < 1024.0 || i == UNITS.len() - 1 {
            break;
        }
        value /= 1024.0;
    }

    format!("{:.1} {}", value, unit)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_size() {
        assert_eq!(format_size(0), "0.0 bytes");
        assert_eq!(format_size(1023), "1023.0 bytes");
        assert_eq!(format_size(1024), "1.0 KB");
        assert_eq!(format_size(10 * 1024 * 1024), "10.0 MB");
        assert_eq!(format_size(15 * 1024 * 1024 * 1024), "15.0 GB");
        assert_eq!(format_size(3 * 1024 * 1024 * 1024 * 1024), "3.0 TB");
    }

    #[test]
    fn test_format_size_caps_at_terabytes() {
        assert_eq!(format_size(2048 * 1024 * 1024 * 1024 * 1024), "2048.0 TB");
    }
}
