use anyhow::Context;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::{
    domain::{
        CheckinId, CommentBody, CommentFields, CommentId, CommentRecord, UserId, VenueInfo,
        comment_fields,
    },
    repository::CommentStore,
};

#[derive(Clone)]
pub struct PgCommentStore {
    pool: PgPool,
}

impl PgCommentStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CommentStore for PgCommentStore {
    #[tracing::instrument(skip(self), fields(comment_id=%comment_id))]
    async fn get_checkin_id_for_comment(
        &self,
        comment_id: &CommentId,
    ) -> Result<CheckinId, anyhow::Error> {
        let checkin_id = sqlx::query_scalar::<_, String>(
            r#"
            SELECT checkin_id
            FROM comments
            WHERE id = $1
            "#,
        )
        .bind(comment_id.as_ref())
        .fetch_optional(&self.pool)
        .await
        .context("Failed to load the checkin of a comment")?
        .with_context(|| format!("Comment {comment_id} does not exist"))?;

        Ok(CheckinId::from_trusted(checkin_id))
    }

    // The primary key on comments.id rejects a colliding id.
    #[tracing::instrument(skip(self, body), fields(comment_id=%comment_id, checkin_id=%checkin_id))]
    async fn insert_comment(
        &self,
        created_at: DateTime<Utc>,
        comment_id: &CommentId,
        user_id: &UserId,
        body: &CommentBody,
        checkin_id: &CheckinId,
    ) -> Result<(), anyhow::Error> {
        sqlx::query(
            r#"
            INSERT INTO comments (id, user_id, checkin_id, comment, created_at)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(comment_id.as_ref())
        .bind(user_id.as_ref())
        .bind(checkin_id.as_ref())
        .bind(body.as_ref())
        .bind(created_at)
        .execute(&self.pool)
        .await
        .context("Failed to insert comment")?;

        Ok(())
    }

    #[tracing::instrument(skip(self), fields(comment_id=%comment_id))]
    async fn delete_comment(&self, comment_id: &CommentId) -> Result<(), anyhow::Error> {
        let result = sqlx::query(
            r#"
            DELETE FROM comments
            WHERE id = $1
            "#,
        )
        .bind(comment_id.as_ref())
        .execute(&self.pool)
        .await
        .context("Failed to delete comment")?;

        if result.rows_affected() == 0 {
            anyhow::bail!("Comment {comment_id} was already deleted");
        }

        Ok(())
    }

    #[tracing::instrument(skip(self), fields(checkin_id=%checkin_id))]
    async fn select_comments_by_checkin(
        &self,
        checkin_id: &CheckinId,
    ) -> Result<CommentFields, anyhow::Error> {
        let rows = sqlx::query_as::<_, CommentRecord>(
            r#"
            SELECT c.id, c.user_id, u.first_name, u.last_name, c.comment, c.created_at
            FROM comments c
            INNER JOIN users u ON c.user_id = u.id
            WHERE c.checkin_id = $1
            ORDER BY c.created_at, c.id
            "#,
        )
        .bind(checkin_id.as_ref())
        .fetch_all(&self.pool)
        .await
        .context("Failed to load comments for checkin")?;

        Ok(comment_fields(rows))
    }

    #[tracing::instrument(skip(self), fields(checkin_id=%checkin_id))]
    async fn get_venue_info(&self, checkin_id: &CheckinId) -> Result<VenueInfo, anyhow::Error> {
        sqlx::query_as::<_, VenueInfo>(
            r#"
            SELECT v.name AS venue_name, COALESCE(v.website, '') AS venue_website
            FROM checkins c
            INNER JOIN venues v ON c.venue_id = v.id
            WHERE c.id = $1
            "#,
        )
        .bind(checkin_id.as_ref())
        .fetch_optional(&self.pool)
        .await
        .context("Failed to load venue info for checkin")?
        .with_context(|| format!("No venue found for checkin {checkin_id}"))
    }
}
