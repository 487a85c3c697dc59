use jrep::json::parse_document;
use jrep::report::Document;
use jrep::Value;

pub fn value_from(json: &str) -> Value {
    parse_document(json).expect("test document should parse")
}

pub fn doc(name: &str, json: &str) -> Document {
    Document::parsed(name, value_from(json))
}

pub fn make_orders_root() -> Value {
    value_from(
        r#"{
            "customer": "Acme",
            "discount": 0.5,
            "orders": [
                {"id": 1, "total": 120, "status": "shipped"},
                {"id": 2, "total": 80, "status": "open"},
                {"id": 3, "total": 200, "status": "shipped"}
            ]
        }"#,
    )
}

pub fn make_nested_root() -> Value {
    value_from(
        r#"{
            "warehouse": {
                "sections": [
                    {"bins": [{"count": 1}, {"count": 2}]},
                    {"bins": [{"count": 3}, {"count": 4}]}
                ]
            }
        }"#,
    )
}
