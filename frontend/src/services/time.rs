//! Epoch-millisecond helpers for table cells and `datetime-local` inputs.

use chrono::{Local, NaiveDateTime, TimeZone};

const INPUT_FORMAT: &str = "%Y-%m-%dT%H:%M";
const DISPLAY_FORMAT: &str = "%Y-%m-%d %H:%M";

pub fn now_millis() -> i64 {
    js_sys::Date::now() as i64
}

/// Table cell text for a timestamp
pub fn format_millis(millis: i64) -> String {
    Local
        .timestamp_millis_opt(millis)
        .single()
        .map(|dt| dt.format(DISPLAY_FORMAT).to_string())
        .unwrap_or_default()
}

/// Value for an `<input type="datetime-local">`
pub fn to_input_value(millis: i64) -> String {
    Local
        .timestamp_millis_opt(millis)
        .single()
        .map(|dt| dt.format(INPUT_FORMAT).to_string())
        .unwrap_or_default()
}

pub fn from_input_value(value: &str) -> Option<i64> {
    let naive = NaiveDateTime::parse_from_str(value, INPUT_FORMAT).ok()?;
    Local
        .from_local_datetime(&naive)
        .earliest()
        .map(|dt| dt.timestamp_millis())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_input_value_keeps_minutes() {
        let millis = from_input_value("2024-03-01T09:30").unwrap();
        assert_eq!(to_input_value(millis), "2024-03-01T09:30");
        assert_eq!(format_millis(millis), "2024-03-01 09:30");
    }

    #[test]
    fn test_garbage_input_is_rejected() {
        assert_eq!(from_input_value("yesterday"), None);
        assert_eq!(from_input_value(""), None);
    }
}
