#![no_main]

//! Fuzz target for field id, field type and object reference parsing.

use libfuzzer_sys::fuzz_target;
use splash_types::ids::{FieldId, FieldType, is_list_field, is_object_reference};

fuzz_target!(|data: &[u8]| {
    let Ok(s) = std::str::from_utf8(data) else {
        return;
    };

    let _ = is_list_field(s);
    let _ = is_object_reference(s);

    if let Ok(id) = FieldId::parse(s) {
        let _ = FieldId::parse(&id.to_string());
    }
    if let Ok(ty) = FieldType::parse(s) {
        let _ = ty.referenced_object();
        let _ = FieldType::parse(&ty.to_string());
    }
});
