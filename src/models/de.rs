//! Lenient field parsing for identifiers and counts.
//!
//! The storefront client sends ids either as JSON numbers or as strings, and
//! the catalog export writes integral columns as floats (`"5.0"`).

use serde::{de, Deserialize, Deserializer};

#[derive(Deserialize)]
#[serde(untagged)]
enum NumberOrString {
    Int(i64),
    Float(f64),
    Str(String),
}

/// Parses an integer, accepting float notation with the fraction truncated
pub fn parse_i64(raw: &str) -> Option<i64> {
    let raw = raw.trim();
    raw.parse::<i64>().ok().or_else(|| {
        raw.parse::<f64>()
            .ok()
            .filter(|v| v.is_finite())
            .map(|v| v.trunc() as i64)
    })
}

/// Canonical text form of an identifier: trimmed, `"123.0"` collapsed to `"123"`
pub fn normalize_id(raw: &str) -> String {
    let raw = raw.trim();
    if raw.contains('.') {
        if let Ok(v) = raw.parse::<f64>() {
            if v.is_finite() && v.fract() == 0.0 && v.abs() < 9.0e15 {
                return format!("{}", v as i64);
            }
        }
    }
    raw.to_string()
}

pub fn opt_i64<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<NumberOrString>::deserialize(deserializer)? {
        None => Ok(None),
        Some(NumberOrString::Int(v)) => Ok(Some(v)),
        Some(NumberOrString::Float(v)) => Ok(Some(v.trunc() as i64)),
        Some(NumberOrString::Str(s)) if s.trim().is_empty() => Ok(None),
        Some(NumberOrString::Str(s)) => parse_i64(&s)
            .map(Some)
            .ok_or_else(|| de::Error::custom(format!("invalid integer: {}", s))),
    }
}

pub fn opt_f64<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<NumberOrString>::deserialize(deserializer)? {
        None => Ok(None),
        Some(NumberOrString::Int(v)) => Ok(Some(v as f64)),
        Some(NumberOrString::Float(v)) => Ok(Some(v)),
        Some(NumberOrString::Str(s)) if s.trim().is_empty() => Ok(None),
        Some(NumberOrString::Str(s)) => s
            .trim()
            .parse::<f64>()
            .map(Some)
            .map_err(|_| de::Error::custom(format!("invalid number: {}", s))),
    }
}

pub fn opt_id<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<NumberOrString>::deserialize(deserializer)? {
        None => None,
        Some(NumberOrString::Int(v)) => Some(v.to_string()),
        Some(NumberOrString::Float(v)) => Some(normalize_id(&v.to_string())),
        Some(NumberOrString::Str(s)) if s.trim().is_empty() => None,
        Some(NumberOrString::Str(s)) => Some(normalize_id(&s)),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Debug, Deserialize)]
    struct Probe {
        #[serde(default, deserialize_with = "opt_i64")]
        count: Option<i64>,
        #[serde(default, deserialize_with = "opt_id")]
        id: Option<String>,
        #[serde(default, deserialize_with = "opt_f64")]
        rating: Option<f64>,
    }

    #[test]
    fn test_parse_i64_accepts_float_notation() {
        assert_eq!(parse_i64("42"), Some(42));
        assert_eq!(parse_i64(" 7.0 "), Some(7));
        assert_eq!(parse_i64("3.9"), Some(3));
        assert_eq!(parse_i64("abc"), None);
        assert_eq!(parse_i64("NaN"), None);
    }

    #[test]
    fn test_normalize_id() {
        assert_eq!(normalize_id("1705736792.0"), "1705736792");
        assert_eq!(normalize_id(" 2b7c "), "2b7c");
        assert_eq!(normalize_id("12"), "12");
    }

    #[test]
    fn test_numbers_and_strings_both_accepted() {
        let probe: Probe = serde_json::from_value(json!({"count": "3", "id": 17, "rating": "4.5"})).unwrap();
        assert_eq!(probe.count, Some(3));
        assert_eq!(probe.id.as_deref(), Some("17"));
        assert_eq!(probe.rating, Some(4.5));
    }

    #[test]
    fn test_missing_and_null_are_none() {
        let probe: Probe = serde_json::from_value(json!({"count": null, "id": ""})).unwrap();
        assert_eq!(probe.count, None);
        assert_eq!(probe.id, None);
        assert_eq!(probe.rating, None);
    }

    #[test]
    fn test_garbage_integer_is_rejected() {
        let result: Result<Probe, _> = serde_json::from_value(json!({"count": "many"}));
        assert!(result.is_err());
    }
}
