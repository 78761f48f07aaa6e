//! Shared vendor-JSON extraction helpers.
//!
//! Device responses are loosely typed: numbers arrive as numbers or
//! strings, member references as `[{"name": ...}]` arrays, plain arrays,
//! or bare strings depending on firmware. These helpers absorb that
//! variance in one place.

use serde_json::Value;

/// Extract a list of member names from a vendor reference field.
///
/// Accepts `[{"name": "a"}, ...]`, `["a", ...]`, or `"a"`; anything else
/// yields an empty list.
pub fn member_names(value: Option<&Value>) -> Vec<String> {
    match value {
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(|item| match item {
                Value::Object(obj) => obj.get("name").and_then(Value::as_str).map(String::from),
                Value::String(s) => Some(s.clone()),
                _ => None,
            })
            .collect(),
        Some(Value::String(s)) if !s.is_empty() => vec![s.clone()],
        _ => Vec::new(),
    }
}

/// A vendor field as text, whether it arrived as a string or a number.
pub fn text(value: Option<&Value>) -> Option<String> {
    match value {
        Some(Value::String(s)) if !s.is_empty() => Some(s.clone()),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    }
}

/// A vendor identifier as a number, whether it arrived as a number or a
/// numeric string.
pub fn id_number(value: Option<&Value>) -> Option<i64> {
    match value {
        Some(Value::Number(n)) => n.as_i64(),
        Some(Value::String(s)) => s.parse().ok(),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_member_names_from_object_array() {
        let value = json!([{"name": "port1"}, {"name": "port2"}]);
        assert_eq!(member_names(Some(&value)), ["port1", "port2"]);
    }

    #[test]
    fn test_member_names_from_string_array() {
        let value = json!(["all"]);
        assert_eq!(member_names(Some(&value)), ["all"]);
    }

    #[test]
    fn test_member_names_from_bare_string() {
        let value = json!("port1");
        assert_eq!(member_names(Some(&value)), ["port1"]);
    }

    #[test]
    fn test_member_names_absent() {
        assert!(member_names(None).is_empty());
        assert!(member_names(Some(&json!(null))).is_empty());
    }

    #[test]
    fn test_text_coerces_numbers() {
        assert_eq!(text(Some(&json!(10))), Some("10".to_string()));
        assert_eq!(text(Some(&json!("up"))), Some("up".to_string()));
        assert_eq!(text(Some(&json!(""))), None);
    }

    #[test]
    fn test_id_number_coerces_strings() {
        assert_eq!(id_number(Some(&json!(7))), Some(7));
        assert_eq!(id_number(Some(&json!("7"))), Some(7));
        assert_eq!(id_number(Some(&json!("x"))), None);
    }
}
