use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Query, State,
    },
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{delete, get, post},
    Json, Router,
};
use serde::Deserialize;
use serde_json::json;

use crate::api::AppState;
use crate::error::AppError;
use crate::models::{NewRevision, Revision};
use crate::services::revision_service;

#[derive(Debug)]
pub enum RevisionsError {
    InvalidSubmission(String),
    SaveFailed,
    MissingDeviceId,
    NoRevisions,
    QueryFailed,
    InvalidDeleteRequest(String),
    DeleteFailed(String),
}

impl IntoResponse for RevisionsError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            RevisionsError::InvalidSubmission(msg) => {
                (StatusCode::BAD_REQUEST, json!({ "message": msg }))
            }
            RevisionsError::SaveFailed => (
                StatusCode::BAD_REQUEST,
                json!({ "message": "Unexpected Error Occured" }),
            ),
            RevisionsError::MissingDeviceId => (
                StatusCode::BAD_REQUEST,
                json!({ "error": "deviceID is required" }),
            ),
            RevisionsError::NoRevisions => (
                StatusCode::NOT_FOUND,
                json!({ "message": "No revisions found for this device" }),
            ),
            RevisionsError::QueryFailed => (
                StatusCode::INTERNAL_SERVER_ERROR,
                json!({ "error": "An error occurred while fetching revisions" }),
            ),
            RevisionsError::InvalidDeleteRequest(error) => (
                StatusCode::BAD_REQUEST,
                json!({ "message": "Error deleting revision", "error": error }),
            ),
            RevisionsError::DeleteFailed(error) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                json!({ "message": "Error deleting revision", "error": error }),
            ),
        };

        (status, Json(body)).into_response()
    }
}

async fn submit_progress(
    State(state): State<AppState>,
    payload: Result<Json<NewRevision>, JsonRejection>,
) -> Result<Json<serde_json::Value>, RevisionsError> {
    let Json(data) = payload.map_err(|e| RevisionsError::InvalidSubmission(e.body_text()))?;

    revision_service::submit(state.store.as_ref(), state.clock.as_ref(), data)
        .await
        .map_err(|e| match e {
            AppError::Validation(msg) => RevisionsError::InvalidSubmission(msg),
            other => {
                tracing::error!(error = %other, "Failed to save revision");
                RevisionsError::SaveFailed
            }
        })?;

    Ok(Json(json!({ "message": "Revision has been saved" })))
}

#[derive(Debug, Deserialize)]
struct RevisionsQuery {
    #[serde(rename = "deviceID")]
    device_id: Option<String>,
}

async fn get_revisions(
    State(state): State<AppState>,
    query: Result<Query<RevisionsQuery>, QueryRejection>,
) -> Result<Json<Vec<Revision>>, RevisionsError> {
    let Query(query) = query.map_err(|e| {
        tracing::debug!(error = %e, "Rejected revisions query string");
        RevisionsError::MissingDeviceId
    })?;
    let device_id = query.device_id.as_deref();

    let revisions = revision_service::list_by_device(state.store.as_ref(), device_id)
        .await
        .map_err(|e| match e {
            AppError::Validation(_) => RevisionsError::MissingDeviceId,
            AppError::NotFound(_) => RevisionsError::NoRevisions,
            other => {
                tracing::error!(error = %other, "Failed to fetch revisions");
                RevisionsError::QueryFailed
            }
        })?;

    Ok(Json(revisions))
}

#[derive(Debug, Deserialize)]
struct DeleteRevisionRequest {
    token: String,
}

async fn delete_revision(
    State(state): State<AppState>,
    payload: Result<Json<DeleteRevisionRequest>, JsonRejection>,
) -> Result<Json<serde_json::Value>, RevisionsError> {
    let Json(request) =
        payload.map_err(|e| RevisionsError::InvalidDeleteRequest(e.body_text()))?;

    revision_service::delete_by_token(state.store.as_ref(), &request.token)
        .await
        .map_err(|e| {
            tracing::error!(token = %request.token, error = %e, "Failed to delete revision");
            RevisionsError::DeleteFailed(e.to_string())
        })?;

    Ok(Json(json!({ "message": "Revision deleted successfully" })))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/submit-progress", post(submit_progress))
        .route("/get-revisions", get(get_revisions))
        .route("/delete-revision", delete(delete_revision))
}
