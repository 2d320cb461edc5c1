use serde::Serialize;
use sqlx::{FromRow, PgPool};
use time::OffsetDateTime;
use uuid::Uuid;

/// Post record. Posts have no HTTP surface in this service; the repo exists
/// so account deletion can cascade over them and so their absence can be
/// observed afterwards.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Post {
    pub id: Uuid,
    pub user_id: Uuid,
    pub body: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

impl Post {
    pub async fn list_by_user(db: &PgPool, user_id: Uuid) -> sqlx::Result<Vec<Post>> {
        sqlx::query_as::<_, Post>(
            r#"
            SELECT id, user_id, body, created_at
              FROM posts
             WHERE user_id = $1
             ORDER BY created_at DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(db)
        .await
    }

    /// Bulk delete, a no-op when the user has no posts.
    pub async fn delete_by_user(db: &PgPool, user_id: Uuid) -> sqlx::Result<u64> {
        let result = sqlx::query("DELETE FROM posts WHERE user_id = $1")
            .bind(user_id)
            .execute(db)
            .await?;
        Ok(result.rows_affected())
    }
}
