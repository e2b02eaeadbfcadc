use pretty_assertions::assert_eq;
use rand::SeedableRng;
use rand::rngs::StdRng;
use serde_json::{Map, Value, json};
use splash_fieldtypes::{BlockError, FieldTypeRegistry, TypeError, fake_block, validate_block};
use splash_types::field::FieldDescriptor;

fn schema() -> Vec<FieldDescriptor> {
    serde_json::from_value(json!([
        {"id": "ref", "type": "varchar", "name": "Ref", "desc": "Ref"},
        {"id": "qty", "type": "int", "name": "Qty", "desc": "Qty"},
        {"id": "sku@lines", "type": "varchar@list", "name": "SKU", "desc": "SKU"},
        {"id": "product@lines", "type": "objectid::Product@list", "name": "Product", "desc": "Product"},
        {"id": "created", "type": "datetime", "name": "Created", "desc": "Created", "write": false},
        {"id": "secret", "type": "varchar", "name": "Secret", "desc": "Secret", "notest": true}
    ]))
    .expect("schema")
}

fn block(v: Value) -> Map<String, Value> {
    match v {
        Value::Object(m) => m,
        _ => unreachable!("test data is an object"),
    }
}

#[test]
fn valid_block_has_no_errors() {
    let registry = FieldTypeRegistry::builtin();
    let data = block(json!({
        "ref": "A-1",
        "qty": 3,
        "lines": [
            {"sku": "X", "product": "7::Product"},
            {"sku": null, "product": "8::Product"}
        ],
        "created": "2024-01-01 10:00:00",
        "secret": null
    }));
    assert_eq!(validate_block(&registry, &schema(), &data), vec![]);
}

#[test]
fn block_errors_are_collected_per_field() {
    let registry = FieldTypeRegistry::builtin();
    let data = block(json!({
        "ref": "A-1",
        "qty": "many",
        "lines": [{"sku": "X"}],
        "secret": "s"
    }));
    let errors = validate_block(&registry, &schema(), &data);
    assert_eq!(errors.len(), 3);
    assert!(matches!(
        &errors[0],
        BlockError::InvalidField { field, source: TypeError::InvalidData { .. } } if field == "qty"
    ));
    assert_eq!(
        errors[1],
        BlockError::MissingField("product@lines[0]".to_string())
    );
    assert_eq!(errors[2], BlockError::MissingField("created".to_string()));
}

#[test]
fn list_type_must_use_list_suffix() {
    let registry = FieldTypeRegistry::builtin();
    let fields: Vec<FieldDescriptor> = serde_json::from_value(json!([
        {"id": "sku@lines", "type": "varchar@lines", "name": "SKU", "desc": "SKU"}
    ]))
    .expect("schema");
    let data = block(json!({"lines": []}));
    assert_eq!(
        validate_block(&registry, &fields, &data),
        vec![BlockError::ListTypeMismatch("varchar@lines".to_string())]
    );
}

#[test]
fn list_must_be_an_array() {
    let registry = FieldTypeRegistry::builtin();
    let fields = &schema()[2..3];
    let data = block(json!({"lines": "nope"}));
    assert_eq!(
        validate_block(&registry, fields, &data),
        vec![BlockError::NotAList("lines".to_string())]
    );
}

#[test]
fn fake_block_covers_writable_testable_fields() {
    let registry = FieldTypeRegistry::builtin();
    let mut rng = StdRng::seed_from_u64(42);
    let fields = schema();
    let data = fake_block(&registry, &fields, 2, &mut rng).expect("fake");

    let mut keys: Vec<&str> = data.keys().map(String::as_str).collect();
    keys.sort();
    assert_eq!(keys, vec!["lines", "qty", "ref"]);

    let lines = data["lines"].as_array().expect("array");
    assert_eq!(lines.len(), 2);
    for line in lines {
        assert!(line["product"].as_str().is_some_and(|s| s.ends_with("::Product")));
        assert!(line["sku"].is_string());
    }

    let writable: Vec<FieldDescriptor> = fields.into_iter().filter(|f| f.write && !f.notest).collect();
    assert_eq!(validate_block(&registry, &writable, &data), vec![]);
}
