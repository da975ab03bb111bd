use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use tokio_cron_scheduler::JobSchedulerError;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Store error: {0}")]
    Store(#[from] sqlx::Error),

    #[error("Email transport error: {0}")]
    Transport(String),

    #[error("Scheduler error: {0}")]
    Scheduler(#[from] JobSchedulerError),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let error_detail = self.to_string();

        let (status, message) = match self {
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            AppError::Store(_) => (StatusCode::INTERNAL_SERVER_ERROR, "Store error".to_string()),
            AppError::Transport(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Email transport error".to_string(),
            ),
            AppError::Scheduler(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error".to_string(),
            ),
        };

        let body = Json(json!({
            "error": error_detail,
            "message": message,
        }));

        (status, body).into_response()
    }
}
