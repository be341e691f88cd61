use anyhow::Context;
use async_trait::async_trait;
use secrecy::{ExposeSecret, Secret};
use sqlx::PgPool;

use crate::{
    authentication::AuthError,
    domain::{CheckinId, CommentId, UserId},
    repository::IdentityResolver,
};

#[derive(Clone)]
pub struct PgIdentityResolver {
    pool: PgPool,
}

impl PgIdentityResolver {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl IdentityResolver for PgIdentityResolver {
    #[tracing::instrument(name = "Resolve session", skip_all)]
    async fn resolve_user(&self, session_token: &Secret<String>) -> Result<UserId, AuthError> {
        let user_id = sqlx::query_scalar::<_, String>(
            r#"
            SELECT user_id
            FROM sessions
            WHERE token = $1
            AND expires_at > now()
            "#,
        )
        .bind(session_token.expose_secret())
        .fetch_optional(&self.pool)
        .await
        .context("Failed to perform a query to resolve the session token.")?;

        user_id.map(UserId::new).ok_or(AuthError::InvalidSession)
    }

    #[tracing::instrument(skip(self), fields(checkin_id=%checkin_id))]
    async fn get_checkin_owner(&self, checkin_id: &CheckinId) -> Result<UserId, anyhow::Error> {
        let owner = sqlx::query_scalar::<_, String>(
            r#"
            SELECT user_id
            FROM checkins
            WHERE id = $1
            "#,
        )
        .bind(checkin_id.as_ref())
        .fetch_optional(&self.pool)
        .await
        .context("Failed to load checkin owner")?
        .with_context(|| format!("Checkin {checkin_id} does not exist"))?;

        Ok(UserId::new(owner))
    }

    #[tracing::instrument(skip(self))]
    async fn is_friend(
        &self,
        user_id: &UserId,
        other_user_id: &UserId,
    ) -> Result<bool, anyhow::Error> {
        sqlx::query_scalar::<_, bool>(
            r#"
            SELECT EXISTS(
                SELECT 1
                FROM friends
                WHERE user_id = $1
                AND friend_user_id = $2
            )
            "#,
        )
        .bind(user_id.as_ref())
        .bind(other_user_id.as_ref())
        .fetch_one(&self.pool)
        .await
        .context("Failed to check friendship")
    }

    #[tracing::instrument(skip(self), fields(checkin_id=%checkin_id))]
    async fn is_checkin_owner_profile_public(
        &self,
        checkin_id: &CheckinId,
    ) -> Result<bool, anyhow::Error> {
        sqlx::query_scalar::<_, bool>(
            r#"
            SELECT u.is_public
            FROM checkins c
            INNER JOIN users u ON c.user_id = u.id
            WHERE c.id = $1
            "#,
        )
        .bind(checkin_id.as_ref())
        .fetch_optional(&self.pool)
        .await
        .context("Failed to load checkin owner's profile visibility")?
        .with_context(|| format!("Checkin {checkin_id} does not exist"))
    }

    #[tracing::instrument(skip(self), fields(comment_id=%comment_id))]
    async fn is_comment_owner(
        &self,
        user_id: &UserId,
        comment_id: &CommentId,
    ) -> Result<bool, anyhow::Error> {
        sqlx::query_scalar::<_, bool>(
            r#"
            SELECT EXISTS(
                SELECT 1
                FROM comments
                WHERE id = $1
                AND user_id = $2
            )
            "#,
        )
        .bind(comment_id.as_ref())
        .bind(user_id.as_ref())
        .fetch_one(&self.pool)
        .await
        .context("Failed to check if user created this comment")
    }
}
