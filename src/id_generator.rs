use chrono::{DateTime, Utc};
use secrecy::{ExposeSecret, Secret};
use sha2::{Digest, Sha256};

use crate::domain::{CheckinId, CommentBody, CommentId, UserId};

/// Derives comment ids from the request itself instead of trusting the
/// client with one. The secret salt and the request instant both feed the
/// digest, so ids cannot be predicted and repeat requests get new ids.
#[derive(Clone)]
pub struct CommentIdGenerator {
    salt: Secret<String>,
}

impl CommentIdGenerator {
    pub fn new(salt: Secret<String>) -> Self {
        Self { salt }
    }

    pub fn generate(
        &self,
        user_id: &UserId,
        body: &CommentBody,
        checkin_id: &CheckinId,
        at: DateTime<Utc>,
    ) -> CommentId {
        let mut hasher = Sha256::new();
        hasher.update(self.salt.expose_secret().as_bytes());
        hasher.update(at.timestamp_millis().to_string().as_bytes());
        hasher.update(user_id.as_ref().as_bytes());
        hasher.update(body.as_ref().as_bytes());
        hasher.update(checkin_id.as_ref().as_bytes());

        // 64 lowercase hex chars always satisfy the id format
        CommentId::from_trusted(hex::encode(hasher.finalize()))
    }
}
