#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let s = String::from_utf8_lossy(data);
    let validator = tagcheck::Validator::new();
    if let Ok(plan) = validator.plan(&s) {
        // A plan that parsed once must parse identically from the cache.
        let again = validator.plan(&s).expect("cached plan");
        assert_eq!(plan, again);
    }
});
