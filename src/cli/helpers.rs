//! Shared helper functions for CLI commands

/// Truncate a string to max_len, adding "..." if truncated
///
/// Useful for table columns that need fixed-width output.
pub fn truncate_str(s: &str, max_len: usize) -> String {
    if s.len() <= max_len {
        s.to_string()
    } else {
        format!("{}...", &s[..max_len.saturating_sub(3)])
    }
}

/// Format a length magnitude for display: two decimals, trailing zeros
/// trimmed. Engine values are never rounded; this is presentation only.
pub fn format_length(value: f64) -> String {
    let s = format!("{:.2}", value);
    s.trim_end_matches('0').trim_end_matches('.').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_str() {
        assert_eq!(truncate_str("hello", 10), "hello");
        assert_eq!(truncate_str("hello world", 8), "hello...");
        assert_eq!(truncate_str("hi", 2), "hi");
    }

    #[test]
    fn test_format_length() {
        assert_eq!(format_length(25.4), "25.4");
        assert_eq!(format_length(65.0), "65");
        assert_eq!(format_length(1657.349), "1657.35");
        assert_eq!(format_length(0.0), "0");
    }
}
