use async_trait::async_trait;
use sqlx::{postgres::PgPoolOptions, PgPool};
use std::time::Duration;

use crate::error::AppError;
use crate::models::Revision;

pub mod memory;
pub mod postgres;

pub use memory::MemoryRevisionStore;
pub use postgres::PgRevisionStore;

/// Collection of revision records, queried by exact-match filters.
///
/// Listing results come back in store-native (insertion) order.
#[async_trait]
pub trait RevisionStore: Send + Sync {
    async fn insert(&self, revision: &Revision) -> Result<(), AppError>;

    async fn find_by_device(&self, device_id: &str) -> Result<Vec<Revision>, AppError>;

    /// Records whose reminder string equals `reminder` exactly
    async fn find_by_reminder(&self, reminder: &str) -> Result<Vec<Revision>, AppError>;

    /// Removes at most one record; returns how many were removed (0 or 1)
    async fn delete_by_token(&self, token: &str) -> Result<u64, AppError>;

    async fn ping(&self) -> Result<(), AppError>;
}

pub async fn create_pool(database_url: &str) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(20)
        .acquire_timeout(Duration::from_secs(3))
        .connect(database_url)
        .await
}

pub async fn run_migrations(pool: &PgPool) -> Result<(), sqlx::Error> {
    sqlx::migrate!("./migrations")
        .run(pool)
        .await
        .map_err(|e| sqlx::Error::Migrate(Box::new(e)))
}
