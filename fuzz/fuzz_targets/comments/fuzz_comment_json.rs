// Run with: cargo fuzz run fuzz_comment_json
// Feeds arbitrary add-comment JSON through the input parser; the predicate
// and the parser must always agree.
#![no_main]

use fourgoats::domain::NewComment;
use fourgoats::domain::validators::validate_comment_fields;
use libfuzzer_sys::fuzz_target;
use serde_json::Value;

fuzz_target!(|data: &[u8]| {
    if let Ok(v) = serde_json::from_slice::<Value>(data) {
        let comment = v.get("comment").and_then(|s| s.as_str()).unwrap_or("").to_string();
        let checkin_id = v.get("checkin_id").and_then(|s| s.as_str()).unwrap_or("").to_string();

        let valid = validate_comment_fields(&comment, &checkin_id);
        assert_eq!(valid, NewComment::parse(comment, checkin_id).is_ok());
    }
});
