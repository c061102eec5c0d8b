use chrono::{DateTime, NaiveDateTime};

const ORDER_TIME_FORMATS: [&str; 4] = [
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
];

/// Parse a numeric form field. Empty or malformed text is a missing value.
pub fn parse_number(text: &str) -> Option<f64> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }
    text.parse::<f64>().ok()
}

/// Parse an order time as a local wall-clock timestamp.
///
/// RFC 3339 input keeps the wall-clock time of its own offset.
pub fn parse_order_time(text: &str) -> Option<NaiveDateTime> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(dt.naive_local());
    }
    ORDER_TIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(text, fmt).ok())
}

pub fn format_order_time(time: &NaiveDateTime) -> String {
    time.format("%Y-%m-%d %H:%M:%S").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike, Weekday};

    #[test]
    fn test_parse_number() {
        assert_eq!(parse_number(" 6.7 "), Some(6.7));
        assert_eq!(parse_number("-5"), Some(-5.0));
        assert_eq!(parse_number(""), None);
        assert_eq!(parse_number("abc"), None);
    }

    #[test]
    fn test_parse_order_time_formats() {
        let t = parse_order_time("2024-01-26 15:23").unwrap();
        assert_eq!(t.weekday(), Weekday::Fri);
        assert_eq!(t.hour(), 15);

        let t = parse_order_time("2024-01-26T14:59:59.059").unwrap();
        assert_eq!(t.minute(), 59);
        assert_eq!(t.nanosecond(), 59_000_000);

        let t = parse_order_time("2024-01-26T16:00:00+02:00").unwrap();
        assert_eq!(t.hour(), 16);

        assert_eq!(parse_order_time(""), None);
        assert_eq!(parse_order_time("next friday"), None);
    }
}
