use pretty_assertions::assert_eq;
use serde_json::json;
use splash_fields::{FieldsFactory, SchemaError, search_by_id, search_by_tag};
use splash_hash::md5_hex;
use splash_runtime::adapters::{Dictionary, Logger};
use splash_types::field::{FieldChoice, FieldDescriptor};
use splash_types::ids::FieldType;

fn build(
    dict: &Dictionary,
    body: impl FnOnce(&mut FieldsFactory<'_>),
) -> (Result<Vec<FieldDescriptor>, SchemaError>, Logger) {
    let log = Logger::default();
    let published = {
        let mut factory = FieldsFactory::new(&log, dict);
        body(&mut factory);
        factory.publish()
    };
    (published, log)
}

#[test]
fn create_with_id_and_name_publishes_one_descriptor() {
    let dict = Dictionary::builtin();
    let (fields, log) = build(&dict, |f| {
        f.declare("varchar", "ref", "Reference");
    });
    let fields = fields.expect("published");
    assert_eq!(fields.len(), 1);
    assert_eq!(fields[0].id, "ref");
    assert_eq!(fields[0].field_type, FieldType::plain("varchar"));
    assert_eq!(fields[0].name, "Reference");
    assert_eq!(fields[0].description, "Reference");
    assert!(fields[0].read && fields[0].write);
    assert!(log.raw().err.is_empty());
}

#[test]
fn explicit_description_wins_over_name() {
    let dict = Dictionary::builtin();
    let (fields, _) = build(&dict, |f| {
        f.create("text")
            .identifier("body")
            .description("  Long text  ")
            .name("Body");
    });
    let fields = fields.expect("published");
    assert_eq!(fields[0].description, "Long text");
}

#[test]
fn incomplete_descriptors_are_dropped_and_logged() {
    let dict = Dictionary::builtin();
    let (fields, log) = build(&dict, |f| {
        f.create("varchar").name("No id");
        f.create("").identifier("untyped").name("Untyped");
        f.create("int").identifier("noname");
        f.declare("int", "qty", "Quantity");
    });
    let fields = fields.expect("published");
    let ids: Vec<String> = fields.iter().map(|f| f.id.to_string()).collect();
    assert_eq!(ids, vec!["qty".to_string()]);
    let errors = log.raw().err;
    assert_eq!(
        errors,
        vec![
            "Field definition of type varchar has no identifier.".to_string(),
            "Field definition has no type.".to_string(),
            "Field noname has no name.".to_string(),
        ]
    );
}

#[test]
fn mutators_without_pending_field_are_noops() {
    let dict = Dictionary::builtin();
    let log = Logger::default();
    let mut factory = FieldsFactory::new(&log, &dict);
    factory.identifier("ref").is_required();
    assert_eq!(
        factory.errors(),
        &[SchemaError::NoPendingField, SchemaError::NoPendingField]
    );
    assert!(!factory.has_pending());
    assert_eq!(factory.publish(), Err(SchemaError::NoFieldsDeclared));
    assert_eq!(log.raw().err.len(), 3);
}

#[test]
fn publish_is_single_use() {
    let dict = Dictionary::builtin();
    let log = Logger::default();
    let mut factory = FieldsFactory::new(&log, &dict);
    factory.declare("bool", "active", "Active");
    assert_eq!(factory.publish().expect("first").len(), 1);
    assert_eq!(factory.publish(), Err(SchemaError::NoFieldsDeclared));
    factory.declare("bool", "visible", "Visible");
    assert_eq!(factory.publish().expect("again").len(), 1);
}

#[test]
fn in_list_rewrites_id_and_type() {
    let dict = Dictionary::builtin();
    let (fields, _) = build(&dict, |f| {
        f.create("varchar")
            .identifier("price")
            .in_list("mylist")
            .name("Price");
        f.declare("int", "qty", "Qty").in_list("");
    });
    let fields = fields.expect("published");
    assert_eq!(fields[0].id, "price@mylist");
    assert_eq!(fields[0].field_type.to_string(), "varchar@list");
    assert_eq!(fields[0].list_name(), Some("mylist"));
    assert_eq!(fields[1].id, "qty");
}

#[test]
fn micro_data_tag_is_stable() {
    let dict = Dictionary::builtin();
    let (first, _) = build(&dict, |f| {
        f.declare("varchar", "name", "Name")
            .micro_data("http://schema.org/Product", "name");
    });
    let (second, _) = build(&dict, |f| {
        f.create("varchar")
            .micro_data("http://schema.org/Product", "name")
            .is_listed()
            .identifier("title")
            .name("Title");
    });
    let expected = md5_hex("name::http://schema.org/Product");
    let first = first.expect("published");
    let second = second.expect("published");
    assert_eq!(first[0].tag.as_deref(), Some(expected.as_str()));
    assert_eq!(second[0].tag, first[0].tag);
    assert_eq!(first[0].item_prop.as_deref(), Some("name"));
    assert_eq!(
        search_by_tag(&second, &expected).map(|f| f.id.to_string()),
        Some("title".to_string())
    );
}

#[test]
fn labels_keep_percent_placeholders() {
    let dict = Dictionary::builtin();
    let (fields, _) = build(&dict, |f| {
        f.declare("double", "rate", "Rate %s")
            .group("VAT %s")
            .add_choice("full", "Full %s rate");
    });
    let field = &fields.expect("published")[0];
    assert_eq!(field.name, "Rate %s");
    assert_eq!(field.description, "Rate %s");
    assert_eq!(field.group.as_deref(), Some("VAT %s"));
    assert_eq!(field.choices[0].value, "Full %s rate");
}

#[test]
fn flags_choices_options_and_associations() {
    let mut dict = Dictionary::builtin();
    dict.insert("Red", "Rouge");
    let (fields, _) = build(&dict, |f| {
        f.declare("varchar", "color", "Color")
            .group("Options")
            .is_read_only()
            .is_required()
            .is_logged()
            .is_not_tested()
            .add_choice("r", "Red")
            .add_choices([("g", "Green"), ("b", "Blue")])
            .add_option("maxLength", 6)
            .add_options([("minLength", 1)])
            .association(&["size", "weight"])
            .association(&["size"]);
    });
    let field = &fields.expect("published")[0];
    assert!(field.is_read_only());
    assert!(field.required && field.log && field.notest);
    assert_eq!(field.group.as_deref(), Some("Options"));
    assert_eq!(
        field.choices[0],
        FieldChoice {
            key: "r".into(),
            value: "Rouge".into()
        }
    );
    assert_eq!(field.choices.len(), 3);
    assert!(field.has_choice("b"));
    assert_eq!(field.options.get("maxLength"), Some(&json!(6)));
    assert_eq!(field.options.get("minLength"), Some(&json!(1)));
    assert_eq!(field.associations, vec!["size".to_string()]);
}

#[test]
fn write_only_clears_read() {
    let dict = Dictionary::builtin();
    let (fields, _) = build(&dict, |f| {
        f.declare("varchar", "password", "Password").is_write_only();
    });
    assert!(fields.expect("published")[0].is_write_only());
}

#[test]
fn search_helpers_ignore_empty_keys() {
    let dict = Dictionary::builtin();
    let (fields, _) = build(&dict, |f| {
        f.declare("varchar", "ref", "Reference");
        f.declare("objectid::Product", "product", "Product");
    });
    let fields = fields.expect("published");
    assert!(search_by_id(&fields, "").is_none());
    assert!(search_by_tag(&fields, "").is_none());
    assert!(search_by_id(&fields, "missing").is_none());
    let product = search_by_id(&fields, "product").expect("found");
    assert_eq!(product.field_type.referenced_object(), Some("Product"));
}

#[test]
fn published_descriptor_uses_wire_keys() {
    let dict = Dictionary::builtin();
    let (fields, _) = build(&dict, |f| {
        f.declare("int", "qty", "Quantity").in_list("lines").is_listed();
    });
    let wire = serde_json::to_value(&fields.expect("published")[0]).expect("serialize");
    assert_eq!(wire["id"], json!("qty@lines"));
    assert_eq!(wire["type"], json!("int@list"));
    assert_eq!(wire["desc"], json!("Quantity"));
    assert_eq!(wire["inlist"], json!(true));
    assert_eq!(wire["itemprop"], json!(null));
}
