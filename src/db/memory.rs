use async_trait::async_trait;
use tokio::sync::RwLock;

use super::RevisionStore;
use crate::error::AppError;
use crate::models::Revision;

/// In-process store used by tests and by local runs without a database
#[derive(Debug, Default)]
pub struct MemoryRevisionStore {
    revisions: RwLock<Vec<Revision>>,
}

impl MemoryRevisionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.revisions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.revisions.read().await.is_empty()
    }
}

#[async_trait]
impl RevisionStore for MemoryRevisionStore {
    async fn insert(&self, revision: &Revision) -> Result<(), AppError> {
        let mut revisions = self.revisions.write().await;

        if revisions.iter().any(|r| r.token == revision.token) {
            return Err(AppError::Validation(format!(
                "token {} already exists",
                revision.token
            )));
        }

        revisions.push(revision.clone());
        Ok(())
    }

    async fn find_by_device(&self, device_id: &str) -> Result<Vec<Revision>, AppError> {
        let revisions = self.revisions.read().await;
        Ok(revisions
            .iter()
            .filter(|r| r.device_id == device_id)
            .cloned()
            .collect())
    }

    async fn find_by_reminder(&self, reminder: &str) -> Result<Vec<Revision>, AppError> {
        let revisions = self.revisions.read().await;
        Ok(revisions
            .iter()
            .filter(|r| r.reminder == reminder)
            .cloned()
            .collect())
    }

    async fn delete_by_token(&self, token: &str) -> Result<u64, AppError> {
        let mut revisions = self.revisions.write().await;

        match revisions.iter().position(|r| r.token == token) {
            Some(index) => {
                revisions.remove(index);
                Ok(1)
            }
            None => Ok(0),
        }
    }

    async fn ping(&self) -> Result<(), AppError> {
        Ok(())
    }
}
