use crate::clock::Clock;
use crate::db::RevisionStore;
use crate::error::AppError;
use crate::models::{NewRevision, Revision};

/// Stores a new progress submission with its computed reminder date
pub async fn submit(
    store: &dyn RevisionStore,
    clock: &dyn Clock,
    data: NewRevision,
) -> Result<Revision, AppError> {
    let revision = Revision::from_submission(data, clock.now())?;

    store.insert(&revision).await?;

    tracing::info!(
        device_id = %revision.device_id,
        token = %revision.token,
        reminder = %revision.reminder,
        "Revision saved"
    );

    Ok(revision)
}

/// Lists every revision stored for a device.
///
/// Returns:
/// - Err(Validation) - device id missing or empty
/// - Err(NotFound) - no record matches
/// - Err(Store) - the query itself failed
pub async fn list_by_device(
    store: &dyn RevisionStore,
    device_id: Option<&str>,
) -> Result<Vec<Revision>, AppError> {
    let device_id = device_id
        .filter(|id| !id.is_empty())
        .ok_or_else(|| AppError::Validation("deviceID is required".to_string()))?;

    let revisions = store.find_by_device(device_id).await?;

    if revisions.is_empty() {
        return Err(AppError::NotFound(
            "No revisions found for this device".to_string(),
        ));
    }

    Ok(revisions)
}

/// Deletes the revision carrying `token`. Succeeds when nothing matches.
pub async fn delete_by_token(store: &dyn RevisionStore, token: &str) -> Result<(), AppError> {
    let removed = store.delete_by_token(token).await?;

    tracing::info!(token = %token, removed, "Revision delete processed");

    Ok(())
}
