use std::collections::BTreeMap;

use chrono::{DateTime, SecondsFormat, Utc};
use serde::Deserialize;

/// Flat keyed view of a checkin's comments, as handed to clients.
pub type CommentFields = BTreeMap<String, String>;

pub const VENUE_NAME_KEY: &str = "venueName";
pub const VENUE_WEBSITE_KEY: &str = "venueWebsite";

#[derive(sqlx::FromRow, Debug, Clone)]
pub struct CommentRecord {
    pub id: String,
    pub user_id: String,
    pub first_name: String,
    pub last_name: String,
    pub comment: String,
    pub created_at: DateTime<Utc>,
}

#[derive(sqlx::FromRow, Debug, Clone, PartialEq, Eq)]
pub struct VenueInfo {
    pub venue_name: String,
    pub venue_website: String,
}

/// Flattens records into `dateTime0`, `commentID0`, `comment0`, ... keyed by
/// position. Callers pass records oldest first.
pub fn comment_fields(records: Vec<CommentRecord>) -> CommentFields {
    let mut fields = CommentFields::new();

    for (i, record) in records.into_iter().enumerate() {
        fields.insert(
            format!("dateTime{i}"),
            record.created_at.to_rfc3339_opts(SecondsFormat::Millis, true),
        );
        fields.insert(format!("commentID{i}"), record.id);
        fields.insert(format!("comment{i}"), record.comment);
        fields.insert(format!("userID{i}"), record.user_id);
        fields.insert(format!("firstName{i}"), record.first_name);
        fields.insert(format!("lastName{i}"), record.last_name);
    }

    fields
}

impl VenueInfo {
    pub fn merge_into(self, fields: &mut CommentFields) {
        fields.insert(VENUE_NAME_KEY.to_string(), self.venue_name);
        fields.insert(VENUE_WEBSITE_KEY.to_string(), self.venue_website);
    }
}

#[derive(Deserialize, Debug)]
pub struct AddCommentPayload {
    pub comment: String,
}
