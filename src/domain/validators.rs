//! Boolean predicates over raw client input, used by the fuzz targets.
//! `CommentService` does not call them: it gates requests by parsing into
//! [`NewComment`], [`CheckinId`] and [`crate::domain::CommentId`], and these
//! answer "would it parse" with the same rules.

use crate::domain::{CheckinId, NewComment};

pub fn validate_comment_fields(body: &str, checkin_id: &str) -> bool {
    NewComment::parse(body.to_string(), checkin_id.to_string()).is_ok()
}

pub fn validate_identifier_format(id: &str) -> bool {
    // comment and checkin ids follow the same rules
    CheckinId::parse(id.to_string()).is_ok()
}
