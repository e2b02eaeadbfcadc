#![no_main]

//! Fuzz target for published field descriptors and checksums of arbitrary JSON.

use libfuzzer_sys::fuzz_target;
use splash_types::field::FieldDescriptor;

fuzz_target!(|data: &[u8]| {
    let Ok(s) = std::str::from_utf8(data) else {
        return;
    };

    let _ = serde_json::from_str::<FieldDescriptor>(s);
    let _ = serde_json::from_str::<Vec<FieldDescriptor>>(s);

    if let Ok(serde_json::Value::Object(map)) = serde_json::from_str::<serde_json::Value>(s) {
        let _ = splash_hash::checksum::from_map(&map);
        let _ = splash_hash::checksum::debug_from_map(&map);
    }
});
