/// Format a price for display: `$120.00`.
pub fn format_price(amount: f64) -> String {
    format!("${:.2}", amount)
}

/// Daily rate display: `$120.00/day`.
pub fn format_daily_rate(rate: f64) -> String {
    format!("{}/day", format_price(rate))
}

/// Format an ISO datetime string to a readable date
pub fn format_date(date: &str) -> String {
    if let Ok(dt) = chrono::DateTime::parse_from_rfc3339(date) {
        dt.format("%b %d, %Y").to_string()
    } else if let Ok(dt) = chrono::NaiveDateTime::parse_from_str(date, "%Y-%m-%dT%H:%M:%S") {
        dt.format("%b %d, %Y").to_string()
    } else if date.len() >= 10 {
        date.chars().take(10).collect()
    } else {
        date.to_string()
    }
}

/// Format an ISO datetime string with the time of day kept
pub fn format_datetime(date: &str) -> String {
    if let Ok(dt) = chrono::DateTime::parse_from_rfc3339(date) {
        dt.format("%b %d, %Y %H:%M").to_string()
    } else if let Ok(dt) = chrono::NaiveDateTime::parse_from_str(date, "%Y-%m-%dT%H:%M:%S") {
        dt.format("%b %d, %Y %H:%M").to_string()
    } else if let Ok(dt) = chrono::NaiveDateTime::parse_from_str(date, "%Y-%m-%dT%H:%M") {
        dt.format("%b %d, %Y %H:%M").to_string()
    } else {
        date.to_string()
    }
}

/// Truncate a string to a maximum length, adding ellipsis if needed
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

/// Format an optional string, returning a default if None
pub fn format_optional(value: &Option<String>, default: &str) -> String {
    value.as_deref().unwrap_or(default).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_price() {
        assert_eq!(format_price(265.0), "$265.00");
        assert_eq!(format_price(88.5), "$88.50");
        assert_eq!(format_daily_rate(120.0), "$120.00/day");
    }

    #[test]
    fn test_format_date() {
        assert_eq!(format_date("2025-07-01T10:00:00"), "Jul 01, 2025");
        assert_eq!(format_date("2025-07-01T10:00:00Z"), "Jul 01, 2025");
        assert_eq!(format_date("2025-07-01"), "2025-07-01");
        assert_eq!(format_date("n/a"), "n/a");
    }

    #[test]
    fn test_format_datetime_keeps_time() {
        assert_eq!(format_datetime("2025-07-01T10:30:00"), "Jul 01, 2025 10:30");
        assert_eq!(format_datetime("2025-07-01T10:30"), "Jul 01, 2025 10:30");
    }

    #[test]
    fn test_truncate_string() {
        assert_eq!(truncate_string("Hello", 10), "Hello");
        assert_eq!(truncate_string("Hello World", 8), "Hello...");
        assert_eq!(truncate_string("Hi", 2), "Hi");
    }
}
