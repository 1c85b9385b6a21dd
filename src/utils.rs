use anyhow::Result;
use serde_json::{Number, Value};

/// Re-serializes JSON text with 2-space indentation.
pub fn format_json(text: &str) -> Result<String> {
    let value: Value = serde_json::from_str(text)?;
    Ok(serde_json::to_string_pretty(&value)?)
}

/// `{"error": message}` pretty-printed, the body of every synthetic failure.
pub fn error_json(message: &str) -> String {
    let value = serde_json::json!({ "error": message });
    serde_json::to_string_pretty(&value).unwrap_or_else(|_| format!("{{\"error\": {message:?}}}"))
}

/// String coercion for query and header values.
///
/// Mirrors how a browser stringifies arbitrary JSON values: strings stay
/// unquoted, arrays are joined with commas and objects collapse to
/// `[object Object]`.
pub fn coerce_to_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => "null".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => coerce_number(n),
        Value::Array(items) => items
            .iter()
            .map(|item| match item {
                Value::Null => String::new(),
                other => coerce_to_string(other),
            })
            .collect::<Vec<_>>()
            .join(","),
        Value::Object(_) => "[object Object]".to_string(),
    }
}

/// Whole floats print without a fraction (`1.0` becomes `1`, `-0.0` becomes `0`).
fn coerce_number(n: &Number) -> String {
    match n.as_f64() {
        Some(f) if n.is_f64() && f.fract() == 0.0 && f.abs() < 1e21 => {
            if f == 0.0 {
                "0".to_string()
            } else {
                format!("{f:.0}")
            }
        }
        _ => n.to_string(),
    }
}

/// A key a browser treats as an array index, e.g. `"2"` but not `"02"` or `"-1"`.
fn array_index(key: &str) -> Option<u32> {
    if key.is_empty() || (key.len() > 1 && key.starts_with('0')) {
        return None;
    }
    if !key.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    key.parse::<u32>().ok().filter(|&index| index != u32::MAX)
}

/// Reorders object entries the way a browser enumerates them: array-index
/// keys first in ascending order, then every other key in insertion order.
pub fn browser_entry_order<V>(entries: Vec<(String, V)>) -> Vec<(String, V)> {
    let (mut indexed, named): (Vec<_>, Vec<_>) = entries
        .into_iter()
        .partition(|(key, _)| array_index(key).is_some());
    indexed.sort_by_key(|(key, _)| array_index(key));
    indexed.extend(named);
    indexed
}

#[cfg(test)]
mod test {
    use super::*;
    use serde_json::json;

    #[test]
    fn format_json_should_indent_with_two_spaces() {
        assert_eq!(format_json("{\"a\":1}").unwrap(), "{\n  \"a\": 1\n}");
        assert_eq!(format_json("{}").unwrap(), "{}");
        assert_eq!(format_json(" [ ] ").unwrap(), "[]");
    }

    #[test]
    fn format_json_should_be_idempotent() {
        let once = format_json("{\"b\":[1,2,{\"c\":null}],\"a\":\"x\"}").unwrap();
        let twice = format_json(&once).unwrap();
        assert_eq!(once, twice);
        assert_eq!(
            serde_json::from_str::<Value>(&once).unwrap(),
            json!({"b": [1, 2, {"c": null}], "a": "x"})
        );
    }

    #[test]
    fn format_json_should_keep_key_order() {
        let formatted = format_json("{\"z\":1,\"a\":2}").unwrap();
        assert!(formatted.find("\"z\"").unwrap() < formatted.find("\"a\"").unwrap());
    }

    #[test]
    fn format_json_should_reject_invalid_text() {
        assert!(format_json("not-json").is_err());
        assert!(format_json("").is_err());
    }

    #[test]
    fn error_json_should_wrap_message() {
        assert_eq!(
            error_json("Invalid JSON in Body"),
            "{\n  \"error\": \"Invalid JSON in Body\"\n}"
        );
    }

    #[test]
    fn coerce_to_string_should_follow_browser_rules() {
        assert_eq!(coerce_to_string(&json!("desc")), "desc");
        assert_eq!(coerce_to_string(&json!(1)), "1");
        assert_eq!(coerce_to_string(&json!(1.5)), "1.5");
        assert_eq!(coerce_to_string(&json!(1.0)), "1");
        assert_eq!(coerce_to_string(&json!(-0.0)), "0");
        assert_eq!(coerce_to_string(&json!(-12.0)), "-12");
        assert_eq!(coerce_to_string(&json!([1.0, 2.5])), "1,2.5");
        assert_eq!(coerce_to_string(&json!(true)), "true");
        assert_eq!(coerce_to_string(&json!(null)), "null");
        assert_eq!(coerce_to_string(&json!([1, "a", null, [2, 3]])), "1,a,,2,3");
        assert_eq!(coerce_to_string(&json!({"k": "v"})), "[object Object]");
    }

    #[test]
    fn browser_entry_order_should_put_index_keys_first() {
        let entries = vec![
            ("b".to_string(), 1),
            ("10".to_string(), 2),
            ("2".to_string(), 3),
            ("02".to_string(), 4),
            ("f".to_string(), 5),
        ];
        let keys: Vec<String> = browser_entry_order(entries)
            .into_iter()
            .map(|(key, _)| key)
            .collect();
        assert_eq!(keys, vec!["2", "10", "b", "02", "f"]);
    }
}
