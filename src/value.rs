use indexmap::IndexMap;
use std::rc::Rc;

/// A parsed JSON value. Documents are read-only once converted, so arrays
/// and objects share structure through plain `Rc` without interior
/// mutability. The `bool` on `Number` records whether the source literal
/// was written as a float, which controls display formatting.
#[derive(Debug, Clone)]
pub enum Value {
    Null,
    Bool(bool),
    Number(f64, bool),
    String(Rc<str>),
    Array(Rc<Vec<Value>>),
    Object(Rc<IndexMap<String, Value>>),
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Bool(left_bool), Value::Bool(right_bool)) => left_bool == right_bool,
            (Value::Number(left_num, _), Value::Number(right_num, _)) => left_num == right_num,
            (Value::String(left_str), Value::String(right_str)) => left_str == right_str,
            (Value::Array(left_arr), Value::Array(right_arr)) => left_arr == right_arr,
            (Value::Object(left_obj), Value::Object(right_obj)) => left_obj == right_obj,
            _ => false,
        }
    }
}

impl Value {
    pub fn as_object(&self) -> Option<&IndexMap<String, Value>> {
        if let Value::Object(object) = self {
            Some(object.as_ref())
        } else {
            None
        }
    }

    pub fn as_array(&self) -> Option<&[Value]> {
        if let Value::Array(array) = self {
            Some(array.as_slice())
        } else {
            None
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        if let Value::Number(numeric_value, _) = self {
            Some(*numeric_value)
        } else {
            None
        }
    }

    pub fn as_string(&self) -> Option<&str> {
        if let Value::String(string_ref) = self {
            Some(string_ref.as_ref())
        } else {
            None
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        if let Value::Bool(bool_value) = self {
            Some(*bool_value)
        } else {
            None
        }
    }

    /// Truthiness for logical operators: null, false, zero, NaN and the
    /// empty string are falsy; everything else is truthy.
    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Null => false,
            Value::Bool(b) => *b,
            Value::Number(n, _) => *n != 0.0 && !n.is_nan(),
            Value::String(s) => !s.is_empty(),
            Value::Array(_) | Value::Object(_) => true,
        }
    }
}
