//! Common utilities shared across search providers.

use base64::engine::general_purpose::{STANDARD, URL_SAFE};
use base64::Engine;
use chrono::{DateTime, Months, Utc};
use serde_json::Value;

/// Standard base64 with padding, as FOFA expects for `qbase64`.
#[must_use]
pub fn encode_standard(query: &str) -> String {
    STANDARD.encode(query.as_bytes())
}

/// URL-safe base64 with padding, as Hunter expects for `search`.
#[must_use]
pub fn encode_url_safe(query: &str) -> String {
    URL_SAFE.encode(query.as_bytes())
}

/// The instant `months` calendar months before `now`.
///
/// Falls back to `now` if the subtraction leaves chrono's range.
#[must_use]
pub fn months_back(now: DateTime<Utc>, months: u32) -> DateTime<Utc> {
    now.checked_sub_months(Months::new(months)).unwrap_or(now)
}

/// Render a loosely typed JSON scalar as text.
///
/// Strings are taken verbatim, numbers and booleans printed, and anything
/// else (null, arrays, objects) reads as empty.
#[must_use]
pub fn value_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        _ => String::new(),
    }
}

/// Text at a nested object path, or empty.
#[must_use]
pub fn text_at(value: &Value, path: &[&str]) -> String {
    path.iter()
        .try_fold(value, |current, key| current.get(key))
        .map(value_text)
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    #[test]
    fn test_base64_alphabets_differ() {
        // bytes EF AF BF hit the last two alphabet slots
        let query = "\u{fbff}";
        assert_eq!(encode_standard(query), "76+/");
        assert_eq!(encode_url_safe(query), "76-_");
        assert_eq!(encode_standard("ip=\"1.1.1.1\""), "aXA9IjEuMS4xLjEi");
    }

    #[test]
    fn test_months_back() {
        let now = Utc.with_ymd_and_hms(2024, 3, 31, 12, 0, 0).unwrap();
        assert_eq!(
            months_back(now, 1),
            Utc.with_ymd_and_hms(2024, 2, 29, 12, 0, 0).unwrap()
        );
        assert_eq!(
            months_back(now, 12),
            Utc.with_ymd_and_hms(2023, 3, 31, 12, 0, 0).unwrap()
        );
    }

    #[test]
    fn test_value_text() {
        assert_eq!(value_text(&json!("a")), "a");
        assert_eq!(value_text(&json!(443)), "443");
        assert_eq!(value_text(&json!(null)), "");
        assert_eq!(value_text(&json!([1])), "");
    }

    #[test]
    fn test_text_at_path() {
        let value = json!({"service": {"http": {"title": "Login"}}});
        assert_eq!(text_at(&value, &["service", "http", "title"]), "Login");
        assert_eq!(text_at(&value, &["service", "tls", "issuer"]), "");
    }
}
