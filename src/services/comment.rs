use std::sync::Arc;

use chrono::Utc;
use secrecy::Secret;
use tracing::Span;

use crate::{
    authentication::AuthError,
    domain::{
        CheckinId, CommentFields, CommentId, CommentListResult, ErrorCode, NewComment,
        OperationResult, UserId,
    },
    id_generator::CommentIdGenerator,
    repository::{CommentStore, IdentityResolver},
    utils::error_chain_fmt,
};

#[derive(thiserror::Error)]
pub enum CommentError {
    #[error("{0}")]
    ValidationError(String),

    #[error("not authorized to perform this action")]
    NotAuthorized,

    #[error(transparent)]
    UnexpectedError(#[from] anyhow::Error),
}

impl std::fmt::Debug for CommentError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        error_chain_fmt(self, f)
    }
}

impl From<AuthError> for CommentError {
    fn from(e: AuthError) -> Self {
        CommentError::UnexpectedError(anyhow::Error::new(e))
    }
}

impl CommentError {
    pub fn code(&self) -> ErrorCode {
        match self {
            CommentError::NotAuthorized => ErrorCode::NotAuthorized,
            CommentError::ValidationError(_) | CommentError::UnexpectedError(_) => {
                ErrorCode::UnexpectedError
            }
        }
    }

    fn report(&self) {
        match self {
            CommentError::ValidationError(reason) => {
                tracing::warn!(reason = %reason, "Rejected malformed comment request")
            }
            CommentError::NotAuthorized => tracing::info!("Comment request denied"),
            CommentError::UnexpectedError(_) => {
                tracing::error!(error = ?self, "Comment request failed")
            }
        }
    }
}

/// Add, remove and list comments on checkins.
///
/// Each operation validates its input, resolves who is asking and how they
/// relate to the checkin, applies the policy, and only then touches the
/// store. Nothing escapes as an error: every outcome is folded into an
/// [`OperationResult`] whose error list is empty exactly on success.
#[derive(Clone)]
pub struct CommentService {
    identity: Arc<dyn IdentityResolver>,
    store: Arc<dyn CommentStore>,
    id_generator: CommentIdGenerator,
}

impl CommentService {
    pub fn new(
        identity: Arc<dyn IdentityResolver>,
        store: Arc<dyn CommentStore>,
        id_generator: CommentIdGenerator,
    ) -> Self {
        Self {
            identity,
            store,
            id_generator,
        }
    }

    #[tracing::instrument(
        name = "Add comment",
        skip_all,
        fields(checkin_id = %checkin_id, user_id = tracing::field::Empty)
    )]
    pub async fn add_comment(
        &self,
        session_token: &Secret<String>,
        body: String,
        checkin_id: String,
    ) -> OperationResult {
        let outcome = self.try_add_comment(session_token, body, checkin_id).await;
        OperationResult::from_errors(collect_errors(outcome))
    }

    #[tracing::instrument(
        name = "Remove comment",
        skip_all,
        fields(comment_id = %comment_id, user_id = tracing::field::Empty)
    )]
    pub async fn remove_comment(
        &self,
        session_token: &Secret<String>,
        comment_id: String,
    ) -> OperationResult {
        let outcome = self.try_remove_comment(session_token, comment_id).await;
        OperationResult::from_errors(collect_errors(outcome))
    }

    #[tracing::instrument(
        name = "Get comments",
        skip_all,
        fields(checkin_id = %checkin_id, user_id = tracing::field::Empty)
    )]
    pub async fn get_comments(
        &self,
        session_token: &Secret<String>,
        checkin_id: String,
    ) -> CommentListResult {
        match self.try_get_comments(session_token, checkin_id).await {
            Ok(comments) => CommentListResult::succeeded(comments),
            Err(e) => {
                e.report();
                CommentListResult::failed(e.code())
            }
        }
    }

    async fn try_add_comment(
        &self,
        session_token: &Secret<String>,
        body: String,
        checkin_id: String,
    ) -> Result<(), CommentError> {
        let comment = NewComment::parse(body, checkin_id).map_err(CommentError::ValidationError)?;

        let user_id = self.requester(session_token).await?;
        let owner = self.identity.get_checkin_owner(&comment.checkin_id).await?;

        if !self.may_comment(&user_id, &owner).await? {
            return Err(CommentError::NotAuthorized);
        }

        let created_at = Utc::now();
        let comment_id = self.id_generator.generate(
            &user_id,
            &comment.body,
            &comment.checkin_id,
            created_at,
        );

        self.store
            .insert_comment(
                created_at,
                &comment_id,
                &user_id,
                &comment.body,
                &comment.checkin_id,
            )
            .await?;

        tracing::info!(comment_id = %comment_id, "Comment added");
        Ok(())
    }

    async fn try_remove_comment(
        &self,
        session_token: &Secret<String>,
        comment_id: String,
    ) -> Result<(), CommentError> {
        let comment_id = CommentId::parse(comment_id).map_err(CommentError::ValidationError)?;

        let user_id = self.requester(session_token).await?;
        let checkin_id = self.store.get_checkin_id_for_comment(&comment_id).await?;
        let owner = self.identity.get_checkin_owner(&checkin_id).await?;

        if !self.may_remove(&user_id, &owner, &comment_id).await? {
            return Err(CommentError::NotAuthorized);
        }

        self.store.delete_comment(&comment_id).await?;

        tracing::info!("Comment removed");
        Ok(())
    }

    async fn try_get_comments(
        &self,
        session_token: &Secret<String>,
        checkin_id: String,
    ) -> Result<CommentFields, CommentError> {
        let checkin_id = CheckinId::parse(checkin_id).map_err(CommentError::ValidationError)?;

        let user_id = self.requester(session_token).await?;
        let owner = self.identity.get_checkin_owner(&checkin_id).await?;

        if !self.may_view(&user_id, &owner, &checkin_id).await? {
            return Err(CommentError::NotAuthorized);
        }

        let mut comments = self.store.select_comments_by_checkin(&checkin_id).await?;
        self.store
            .get_venue_info(&checkin_id)
            .await?
            .merge_into(&mut comments);

        Ok(comments)
    }

    async fn requester(&self, session_token: &Secret<String>) -> Result<UserId, CommentError> {
        let user_id = self.identity.resolve_user(session_token).await?;
        Span::current().record("user_id", tracing::field::display(&user_id));
        Ok(user_id)
    }

    // The policies below check ownership first; the relationship lookups are
    // only issued when it fails.

    /// Checkin owner or one of the owner's friends.
    async fn may_comment(&self, user_id: &UserId, owner: &UserId) -> Result<bool, anyhow::Error> {
        Ok(user_id == owner || self.identity.is_friend(user_id, owner).await?)
    }

    /// Checkin owner or the comment's author.
    async fn may_remove(
        &self,
        user_id: &UserId,
        owner: &UserId,
        comment_id: &CommentId,
    ) -> Result<bool, anyhow::Error> {
        Ok(user_id == owner || self.identity.is_comment_owner(user_id, comment_id).await?)
    }

    /// Checkin owner, a friend of the owner, or anyone when the owner's
    /// profile is public.
    async fn may_view(
        &self,
        user_id: &UserId,
        owner: &UserId,
        checkin_id: &CheckinId,
    ) -> Result<bool, anyhow::Error> {
        Ok(user_id == owner
            || self.identity.is_friend(user_id, owner).await?
            || self
                .identity
                .is_checkin_owner_profile_public(checkin_id)
                .await?)
    }
}

fn collect_errors(outcome: Result<(), CommentError>) -> Vec<ErrorCode> {
    match outcome {
        Ok(()) => Vec::new(),
        Err(e) => {
            e.report();
            vec![e.code()]
        }
    }
}
