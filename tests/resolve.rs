use jrep::resolver::resolve;
use jrep::Value;
use std::rc::Rc;

mod common;
use common::{make_nested_root, make_orders_root, value_from};

#[test]
fn test_empty_path_returns_root_for_any_variant() {
    for json in ["null", "true", "5", "\"s\"", "[1,2]", "{\"a\":1}"] {
        let root = value_from(json);
        assert_eq!(resolve(&root, ""), Some(root.clone()), "root {}", json);
    }
}

#[test]
fn test_single_field_resolution() {
    let root = make_orders_root();
    assert_eq!(
        resolve(&root, "customer"),
        Some(Value::String(Rc::from("Acme")))
    );
    assert_eq!(resolve(&root, "discount"), Some(Value::Number(0.5, true)));
}

#[test]
fn test_numeric_array_reduction_sums() {
    let root = make_orders_root();
    assert_eq!(
        resolve(&root, "orders.total"),
        Some(Value::Number(400.0, false))
    );
}

#[test]
fn test_mixed_array_reduction_joins_with_separator() {
    let root = make_orders_root();
    assert_eq!(
        resolve(&root, "orders.status"),
        Some(Value::String(Rc::from("shipped; open; shipped")))
    );
}

#[test]
fn test_missing_path_never_errors() {
    let root = make_orders_root();
    assert_eq!(resolve(&root, "missing.path"), None);
    assert_eq!(resolve(&root, "customer.length"), None);
    assert_eq!(resolve(&root, "orders.total.more"), None);
}

#[test]
fn test_missing_field_inside_array_joins_empty() {
    let root = value_from(r#"{"rows": [{"v": "a"}, {}, {"v": "b"}]}"#);
    assert_eq!(
        resolve(&root, "rows.v"),
        Some(Value::String(Rc::from("a; ; b")))
    );
}

#[test]
fn test_nested_arrays_reduce_innermost_first() {
    let root = make_nested_root();
    assert_eq!(
        resolve(&root, "warehouse.sections.bins.count"),
        Some(Value::Number(10.0, false))
    );
}

#[test]
fn test_array_of_scalars_at_path_end() {
    let root = value_from(r#"{"tags": ["a", "b"]}"#);
    // Path ends at the array itself: returned as-is, no reduction.
    assert_eq!(resolve(&root, "tags"), Some(value_from(r#"["a","b"]"#)));
}

#[test]
fn test_null_and_scalar_mid_path() {
    let root = value_from(r#"{"a": null, "b": 7}"#);
    assert_eq!(resolve(&root, "a"), Some(Value::Null));
    assert_eq!(resolve(&root, "a.b"), None);
    assert_eq!(resolve(&root, "b.c"), None);
}

#[test]
fn test_heterogeneous_array_with_containers_joins_json() {
    let root = value_from(r#"{"a": [{"b": {"x": 1}}, {"b": 2}]}"#);
    assert_eq!(
        resolve(&root, "a.b"),
        Some(Value::String(Rc::from("{\"x\":1}; 2")))
    );
}

#[test]
fn test_resolution_is_repeatable() {
    let root = make_orders_root();
    assert_eq!(resolve(&root, "orders.total"), resolve(&root, "orders.total"));
    assert_eq!(resolve(&root, "missing"), resolve(&root, "missing"));
}
