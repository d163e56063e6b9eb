/// Truncate a string to a maximum number of characters, adding ellipsis if needed
pub fn truncate_string(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else if max_len <= 3 {
        s.chars().take(max_len).collect()
    } else {
        let truncated: String = s.chars().take(max_len - 3).collect();
        format!("{}...", truncated)
    }
}

/// Compact counts for narrow columns: 950, 1.2k, 23.9k, 1.5M
pub fn format_count(n: i64) -> String {
    let abs = n.unsigned_abs();
    let sign = if n < 0 { "-" } else { "" };
    if abs < 1_000 {
        n.to_string()
    } else if abs < 1_000_000 {
        format!("{}{:.1}k", sign, abs as f64 / 1_000.0)
    } else {
        format!("{}{:.1}M", sign, abs as f64 / 1_000_000.0)
    }
}

/// Empty profile fields come back as "", show a placeholder instead
pub fn or_placeholder<'a>(value: &'a str, placeholder: &'a str) -> &'a str {
    if value.trim().is_empty() {
        placeholder
    } else {
        value
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_string() {
        assert_eq!(truncate_string("Hello", 10), "Hello");
        assert_eq!(truncate_string("Hello World", 8), "Hello...");
        assert_eq!(truncate_string("Hi", 2), "Hi");
        assert_eq!(truncate_string("Zoë Keating", 6), "Zoë...");
    }

    #[test]
    fn test_format_count() {
        assert_eq!(format_count(0), "0");
        assert_eq!(format_count(950), "950");
        assert_eq!(format_count(1_234), "1.2k");
        assert_eq!(format_count(23_933), "23.9k");
        assert_eq!(format_count(1_500_000), "1.5M");
        assert_eq!(format_count(-2_000), "-2.0k");
    }

    #[test]
    fn test_or_placeholder() {
        assert_eq!(or_placeholder("", "-"), "-");
        assert_eq!(or_placeholder("  ", "-"), "-");
        assert_eq!(or_placeholder("Oakland", "-"), "Oakland");
    }
}
