use async_trait::async_trait;
use sqlx::PgPool;

use super::RevisionStore;
use crate::error::AppError;
use crate::models::Revision;

#[derive(Clone)]
pub struct PgRevisionStore {
    pool: PgPool,
}

impl PgRevisionStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RevisionStore for PgRevisionStore {
    async fn insert(&self, revision: &Revision) -> Result<(), AppError> {
        sqlx::query(
            r#"
            INSERT INTO revisions
                (id, device_id, pages_read, from_page_to_page, difficulty, email, token, reminder, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            "#,
        )
        .bind(revision.id)
        .bind(&revision.device_id)
        .bind(revision.pages_read)
        .bind(&revision.from_page_to_page)
        .bind(revision.difficulty)
        .bind(&revision.email)
        .bind(&revision.token)
        .bind(&revision.reminder)
        .bind(revision.created_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn find_by_device(&self, device_id: &str) -> Result<Vec<Revision>, AppError> {
        let revisions = sqlx::query_as::<_, Revision>(
            r#"
            SELECT * FROM revisions
            WHERE device_id = $1
            ORDER BY created_at, id
            "#,
        )
        .bind(device_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(revisions)
    }

    async fn find_by_reminder(&self, reminder: &str) -> Result<Vec<Revision>, AppError> {
        let revisions = sqlx::query_as::<_, Revision>(
            r#"
            SELECT * FROM revisions
            WHERE reminder = $1
            ORDER BY created_at, id
            "#,
        )
        .bind(reminder)
        .fetch_all(&self.pool)
        .await?;

        Ok(revisions)
    }

    async fn delete_by_token(&self, token: &str) -> Result<u64, AppError> {
        let result = sqlx::query(
            r#"
            DELETE FROM revisions WHERE token = $1
            "#,
        )
        .bind(token)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected())
    }

    async fn ping(&self) -> Result<(), AppError> {
        sqlx::query("SELECT 1").fetch_one(&self.pool).await?;
        Ok(())
    }
}
