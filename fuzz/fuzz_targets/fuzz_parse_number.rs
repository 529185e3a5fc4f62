#![no_main]

use libfuzzer_sys::fuzz_target;
use mirror_core::{Value, ValueKind, coerce, format_number, parse_number};

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };
    let n = parse_number(text);
    // Rendering and re-parsing a finite number is lossless.
    if n.is_finite() {
        let again = parse_number(&format_number(n));
        assert!(again == n, "{text:?} -> {n} -> {again}");
    }
    for kind in ValueKind::ALL {
        assert_eq!(coerce(kind, &Value::from(text)).kind(), kind);
    }
});
