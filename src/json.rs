use crate::value::Value;
use indexmap::IndexMap;
use std::rc::Rc;

pub fn parse_json(json_str: &str) -> Result<serde_json::Value, String> {
    serde_json::from_str(json_str).map_err(|e| e.to_string())
}

pub fn parse_json_file(file_path: &str) -> Result<serde_json::Value, String> {
    let json_str = std::fs::read_to_string(file_path).map_err(|e| e.to_string())?;
    parse_json(&json_str)
}

/// Converts a parsed serde_json tree into the internal value model.
pub fn json_to_value(json_val: serde_json::Value) -> Value {
    match json_val {
        serde_json::Value::Null => Value::Null,
        serde_json::Value::Bool(b) => Value::Bool(b),
        serde_json::Value::Number(json_number) => {
            let numeric_value = json_number.as_f64().unwrap_or(0.0);
            let number_string = json_number.to_string();
            let is_float = number_string.contains('.')
                || number_string.contains('e')
                || number_string.contains('E');
            Value::Number(numeric_value, is_float)
        }
        serde_json::Value::String(s) => Value::String(Rc::from(s.as_str())),
        serde_json::Value::Array(array) => {
            let items: Vec<Value> = array.into_iter().map(json_to_value).collect();
            Value::Array(Rc::new(items))
        }
        serde_json::Value::Object(object) => {
            let mut map = IndexMap::new();
            for (k, v) in object {
                map.insert(k, json_to_value(v));
            }
            Value::Object(Rc::new(map))
        }
    }
}

/// Parses JSON text straight into the internal value model.
pub fn parse_document(json_str: &str) -> Result<Value, String> {
    parse_json(json_str).map(json_to_value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_document_object() {
        let value = parse_document(r#"{"score": 10, "name": "a"}"#).unwrap();
        let map = value.as_object().expect("expected object");
        assert_eq!(map.get("score"), Some(&Value::Number(10.0, false)));
        assert_eq!(map.get("name"), Some(&Value::String(Rc::from("a"))));
    }

    #[test]
    fn test_integer_and_float_flags() {
        let value = parse_document(r#"[1, 2.5, 1e3]"#).unwrap();
        let items = value.as_array().unwrap();
        assert_eq!(items[0], Value::Number(1.0, false));
        assert_eq!(items[1], Value::Number(2.5, true));
        assert_eq!(items[2], Value::Number(1000.0, true));
    }

    #[test]
    fn test_parse_error_is_reported() {
        assert!(parse_document("{not json").is_err());
    }

    #[test]
    fn test_object_preserves_insertion_order() {
        let value = parse_document(r#"{"z": 1, "a": 2, "m": 3}"#).unwrap();
        let keys: Vec<&String> = value.as_object().unwrap().keys().collect();
        assert_eq!(keys, vec!["z", "a", "m"]);
    }
}
