//! Lenient decoding of upstream signal fields
//!
//! Extraction and model services are loose about types: scores arrive as
//! numbers or numeric strings, labels occasionally as numbers, and any field
//! may be null. Decoding here never rejects a value; anything unusable
//! becomes `None` and the caller applies the field default.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Reads a finite number from a JSON number or numeric string
pub fn number_from_value(value: &Value) -> Option<f64> {
    let number = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    number.filter(|n| n.is_finite())
}

/// Reads a text value from a JSON string, number or boolean
pub fn text_from_value(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Reads a yes/no document flag
///
/// Integers compare against 1 (floats truncate first), strings accept
/// integer text or `true/yes/false/no`. Returns `None` when the value says
/// nothing either way.
pub fn flag_from_value(value: &Value) -> Option<bool> {
    match value {
        Value::Bool(b) => Some(*b),
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|f| f.is_finite()).map(|f| f.trunc() as i64))
            .map(|i| i == 1),
        Value::String(s) => {
            let s = s.trim();
            if let Ok(i) = s.parse::<i64>() {
                return Some(i == 1);
            }
            match s.to_lowercase().as_str() {
                "true" | "yes" => Some(true),
                "false" | "no" => Some(false),
                _ => None,
            }
        }
        _ => None,
    }
}

/// Whether a field value carries content (non-null, non-empty, non-zero)
pub fn is_present(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map(|f| f != 0.0).unwrap_or(true),
        Value::String(s) => !s.is_empty(),
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
    }
}

/// Serde adapter for optional numeric fields
pub fn lenient_f64<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(number_from_value(&value))
}

/// Serde adapter for optional integer fields; fractional values truncate
pub fn lenient_i64<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(number_from_value(&value).map(|n| n.trunc() as i64))
}

/// Serde adapter for optional counters; negative values decode as `None`
pub fn lenient_u64<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(number_from_value(&value)
        .filter(|n| *n >= 0.0)
        .map(|n| n.trunc() as u64))
}

/// Serde adapter for optional text fields
pub fn lenient_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(text_from_value(&value))
}

/// Serde adapter for optional boolean fields
pub fn lenient_bool<'de, D>(deserializer: D) -> Result<Option<bool>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(flag_from_value(&value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_number_from_value() {
        assert_eq!(number_from_value(&json!(0.75)), Some(0.75));
        assert_eq!(number_from_value(&json!(" 2.5 ")), Some(2.5));
        assert_eq!(number_from_value(&json!(3)), Some(3.0));
        assert_eq!(number_from_value(&json!(null)), None);
        assert_eq!(number_from_value(&json!("high")), None);
        assert_eq!(number_from_value(&json!("NaN")), None);
        assert_eq!(number_from_value(&json!([1])), None);
    }

    #[test]
    fn test_flag_from_value() {
        assert_eq!(flag_from_value(&json!(true)), Some(true));
        assert_eq!(flag_from_value(&json!(1)), Some(true));
        assert_eq!(flag_from_value(&json!(1.9)), Some(true));
        assert_eq!(flag_from_value(&json!(2)), Some(false));
        assert_eq!(flag_from_value(&json!(0)), Some(false));
        assert_eq!(flag_from_value(&json!("1")), Some(true));
        assert_eq!(flag_from_value(&json!("Yes")), Some(true));
        assert_eq!(flag_from_value(&json!("no")), Some(false));
        assert_eq!(flag_from_value(&json!("maybe")), None);
        assert_eq!(flag_from_value(&json!(null)), None);
    }

    #[test]
    fn test_is_present() {
        assert!(is_present(&json!("FIR-2231")));
        assert!(is_present(&json!(42)));
        assert!(!is_present(&json!("")));
        assert!(!is_present(&json!(0)));
        assert!(!is_present(&json!(null)));
    }
}
