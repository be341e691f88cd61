// Run with: cargo fuzz run fuzz_identifier
// Anything accepted as an identifier must be short ASCII alphanumerics.
#![no_main]

use fourgoats::domain::validators::validate_identifier_format;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        if validate_identifier_format(s) {
            assert!(!s.is_empty() && s.len() <= 64);
            assert!(s.bytes().all(|b| b.is_ascii_alphanumeric()));
        }
    }
});
