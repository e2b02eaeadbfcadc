use proptest::prelude::*;
use splash_types::ids::{
    FieldId, FieldType, encode_list_field, encode_object_reference, is_list_field,
    is_object_reference,
};

fn name_strategy() -> impl Strategy<Value = String> {
    prop::string::string_regex("[a-zA-Z0-9_]{1,16}").expect("valid regex")
}

proptest! {
    #[test]
    fn list_field_round_trip(field in name_strategy(), list in name_strategy()) {
        let encoded = encode_list_field(&field, &list);
        let decoded = is_list_field(&encoded).expect("list field");
        prop_assert_eq!(decoded.field_name, field);
        prop_assert_eq!(decoded.list_name, list);
    }

    #[test]
    fn object_reference_round_trip(id in name_strategy(), object_type in name_strategy()) {
        let encoded = encode_object_reference(&id, &object_type);
        let decoded = is_object_reference(&encoded).expect("reference");
        prop_assert_eq!(decoded.object_id, id);
        prop_assert_eq!(decoded.object_type, object_type);
    }

    #[test]
    fn typed_ids_round_trip_through_wire_strings(field in name_strategy(), list in name_strategy()) {
        let id = FieldId::Plain(field).in_list(&list);
        let parsed: FieldId = id.to_string().parse().expect("parse");
        prop_assert_eq!(parsed, id);

        let ty = FieldType::object_ref(list).in_list();
        let parsed: FieldType = ty.to_string().parse().expect("parse");
        prop_assert_eq!(parsed, ty);
    }

    #[test]
    fn plain_names_are_never_composite(name in name_strategy()) {
        prop_assert!(is_list_field(&name).is_none());
        prop_assert!(is_object_reference(&name).is_none());
    }
}
