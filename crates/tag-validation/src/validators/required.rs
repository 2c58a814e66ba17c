//! Presence checks shared by `required` and `omitempty`

use serde_json::Value;

/// Check if a value is the zero value of its kind
pub fn is_zero(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64().map(|n| n == 0.0).unwrap_or(false),
        Value::String(s) => s.is_empty(),
        Value::Array(arr) => arr.is_empty(),
        Value::Object(obj) => obj.is_empty(),
    }
}

/// `required`: present and not the zero value
pub fn has_value(value: &Value) -> bool {
    !is_zero(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_required_with_null() {
        assert!(!has_value(&Value::Null));
    }

    #[test]
    fn test_required_with_strings() {
        assert!(!has_value(&json!("")));
        assert!(has_value(&json!("tidak kosong bung")));
        // whitespace is content
        assert!(has_value(&json!("   ")));
    }

    #[test]
    fn test_required_with_collections() {
        assert!(!has_value(&json!([])));
        assert!(has_value(&json!(["tag1"])));
        assert!(!has_value(&json!({})));
        assert!(has_value(&json!({"Name": ""})));
    }

    #[test]
    fn test_required_with_numbers() {
        assert!(!has_value(&json!(0)));
        assert!(!has_value(&json!(0.0)));
        assert!(has_value(&json!(42)));
        assert!(has_value(&json!(-1.5)));
    }

    #[test]
    fn test_required_with_boolean() {
        assert!(!has_value(&json!(false)));
        assert!(has_value(&json!(true)));
    }
}
