use crate::value::Value;

/// Renders a value the way it should appear in a report cell: strings
/// verbatim, numbers in canonical decimal form, containers as compact JSON.
pub fn value_to_display(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n, _) => display_number(*n),
        Value::String(s) => s.to_string(),
        Value::Array(_) | Value::Object(_) => format_json(value),
    }
}

/// Canonical decimal form: integral values drop the fraction part,
/// non-finite values are spelled out.
pub fn display_number(n: f64) -> String {
    if n.is_nan() {
        "NaN".to_string()
    } else if n.is_infinite() {
        if n > 0.0 {
            "Infinity".to_string()
        } else {
            "-Infinity".to_string()
        }
    } else if n.fract() == 0.0 {
        format!("{:.0}", n)
    } else {
        n.to_string()
    }
}

pub fn escape_json_string(s: &str) -> String {
    s.replace('\\', "\\\\")
        .replace('"', "\\\"")
        .replace('\n', "\\n")
        .replace('\r', "\\r")
        .replace('\t', "\\t")
}

/// Compact JSON rendering of a value. The number arm honors the
/// integer/float flag so integers survive the f64 round-trip unchanged.
pub fn format_json(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Number(numeric_value, is_float) => {
            if *is_float {
                let formatted = numeric_value.to_string();
                if formatted.contains('.') || formatted.contains('e') || formatted.contains('E') {
                    formatted
                } else {
                    format!("{}.0", numeric_value)
                }
            } else {
                format!("{:.0}", numeric_value)
            }
        }
        Value::String(s) => format!("\"{}\"", escape_json_string(s)),
        Value::Array(array) => {
            let elements: Vec<String> = array.iter().map(format_json).collect();
            format!("[{}]", elements.join(","))
        }
        Value::Object(object) => {
            let fields: Vec<String> = object
                .iter()
                .map(|(k, v)| format!("\"{}\":{}", k, format_json(v)))
                .collect();
            format!("{{{}}}", fields.join(","))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::json::parse_document;
    use std::rc::Rc;

    #[test]
    fn test_display_number() {
        assert_eq!(display_number(5.0), "5");
        assert_eq!(display_number(2.5), "2.5");
        assert_eq!(display_number(-3.0), "-3");
        assert_eq!(display_number(f64::NAN), "NaN");
        assert_eq!(display_number(f64::INFINITY), "Infinity");
        assert_eq!(display_number(f64::NEG_INFINITY), "-Infinity");
    }

    #[test]
    fn test_value_to_display_scalars() {
        assert_eq!(value_to_display(&Value::Null), "null");
        assert_eq!(value_to_display(&Value::Bool(true)), "true");
        assert_eq!(value_to_display(&Value::String(Rc::from("plain"))), "plain");
        assert_eq!(value_to_display(&Value::Number(12.0, false)), "12");
    }

    #[test]
    fn test_value_to_display_containers_are_compact_json() {
        let value = parse_document(r#"{"a": [1, "x"]}"#).unwrap();
        assert_eq!(value_to_display(&value), r#"{"a":[1,"x"]}"#);
    }

    #[test]
    fn test_format_json_float_flag() {
        let value = parse_document(r#"[1, 1.0, 2.5]"#).unwrap();
        assert_eq!(format_json(&value), "[1,1.0,2.5]");
    }

    #[test]
    fn test_escape_json_string() {
        assert_eq!(escape_json_string("a\"b\\c\nd"), "a\\\"b\\\\c\\nd");
    }
}
