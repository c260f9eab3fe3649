#![no_main]
use libfuzzer_sys::fuzz_target;

use json_validator::{tokenize, validate, ValidatorOptions, validate_with_options};

fuzz_target!(|data: &[u8]| {
    // The fuzzer gives us raw bytes; only valid UTF-8 is a candidate document.
    if let Ok(s) = std::str::from_utf8(data) {
        // Looking for panics: both stages must return, never abort.
        let verdict = validate(s);

        // The tokenizer alone must agree on lexical failures.
        if let Err(e) = tokenize(s) {
            assert_eq!(verdict, Err(e));
        }

        let lenient = ValidatorOptions::default()
            .with_escaped_whitespace(true)
            .with_max_depth(Some(64));
        let _ = validate_with_options(s, &lenient);
    }
});
