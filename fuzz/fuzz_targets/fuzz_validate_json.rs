#![no_main]

use libfuzzer_sys::fuzz_target;

// Input layout: first line is the tag, the rest is a JSON document.
fuzz_target!(|data: &[u8]| {
    let s = String::from_utf8_lossy(data);
    let Some((tag, json)) = s.split_once('\n') else {
        return;
    };
    if let Ok(value) = serde_json::from_str::<serde_json::Value>(json) {
        let _ = tagcheck::Validator::new().validate_value(&value, tag);
    }
});
