use crate::format::value_to_display;
use crate::value::Value;
use std::rc::Rc;

/// Separator used when an array reduction falls back to string joining.
pub const JOIN_SEPARATOR: &str = "; ";

/// Resolves a dotted path against a document. `None` marks a missing path;
/// resolution never errors. The empty path returns the root unchanged.
pub fn resolve(root: &Value, path: &str) -> Option<Value> {
    if path.is_empty() {
        return Some(root.clone());
    }
    let tokens: Vec<&str> = path.split('.').collect();
    resolve_tokens(root, &tokens)
}

fn resolve_tokens(current: &Value, tokens: &[&str]) -> Option<Value> {
    if tokens.is_empty() {
        return Some(current.clone());
    }
    match current {
        // Fan out: the remaining path applies to every element, then the
        // sub-results collapse to a sum or a joined string. Nested arrays
        // hit this arm again during recursion, so inner arrays reduce first.
        Value::Array(items) => {
            let sub_results: Vec<Option<Value>> = items
                .iter()
                .map(|item| resolve_tokens(item, tokens))
                .collect();
            Some(reduce_fan_out(&sub_results))
        }
        Value::Object(map) => {
            let field_value = map.get(tokens[0])?;
            resolve_tokens(field_value, &tokens[1..])
        }
        // Null or a scalar with path left to walk: missing.
        _ => None,
    }
}

fn reduce_fan_out(sub_results: &[Option<Value>]) -> Value {
    let mut sum = 0.0;
    let mut is_float = false;
    let mut all_numeric = true;
    for sub_result in sub_results {
        match sub_result {
            Some(Value::Number(n, float_flag)) => {
                sum += n;
                is_float |= float_flag;
            }
            _ => {
                all_numeric = false;
                break;
            }
        }
    }
    if all_numeric {
        return Value::Number(sum, is_float);
    }

    let joined = sub_results
        .iter()
        .map(|sub_result| match sub_result {
            Some(v) => value_to_display(v),
            None => String::new(),
        })
        .collect::<Vec<String>>()
        .join(JOIN_SEPARATOR);
    Value::String(Rc::from(joined.as_str()))
}
