mod comment;
mod identity;
mod memory;

pub use comment::PgCommentStore;
pub use identity::PgIdentityResolver;
pub use memory::{InMemoryStore, StoredComment};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use secrecy::Secret;

use crate::{
    authentication::AuthError,
    domain::{CheckinId, CommentBody, CommentFields, CommentId, UserId, VenueInfo},
};

/// Who is asking, and how they relate to the checkin being touched.
/// Every method is a read.
#[async_trait]
pub trait IdentityResolver: Send + Sync {
    async fn resolve_user(&self, session_token: &Secret<String>) -> Result<UserId, AuthError>;

    async fn get_checkin_owner(&self, checkin_id: &CheckinId) -> Result<UserId, anyhow::Error>;

    async fn is_friend(
        &self,
        user_id: &UserId,
        other_user_id: &UserId,
    ) -> Result<bool, anyhow::Error>;

    async fn is_checkin_owner_profile_public(
        &self,
        checkin_id: &CheckinId,
    ) -> Result<bool, anyhow::Error>;

    async fn is_comment_owner(
        &self,
        user_id: &UserId,
        comment_id: &CommentId,
    ) -> Result<bool, anyhow::Error>;
}

/// Comment persistence plus the checkin/venue lookups comments need.
/// Implementations must make `insert_comment` atomic with respect to
/// `select_comments_by_checkin` and reject duplicate comment ids.
#[async_trait]
pub trait CommentStore: Send + Sync {
    async fn get_checkin_id_for_comment(
        &self,
        comment_id: &CommentId,
    ) -> Result<CheckinId, anyhow::Error>;

    async fn insert_comment(
        &self,
        created_at: DateTime<Utc>,
        comment_id: &CommentId,
        user_id: &UserId,
        body: &CommentBody,
        checkin_id: &CheckinId,
    ) -> Result<(), anyhow::Error>;

    async fn delete_comment(&self, comment_id: &CommentId) -> Result<(), anyhow::Error>;

    async fn select_comments_by_checkin(
        &self,
        checkin_id: &CheckinId,
    ) -> Result<CommentFields, anyhow::Error>;

    async fn get_venue_info(&self, checkin_id: &CheckinId) -> Result<VenueInfo, anyhow::Error>;
}
