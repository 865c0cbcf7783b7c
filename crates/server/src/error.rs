use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use db::models::task::TaskError;
use thiserror::Error;
use utils::response::MessageResponse;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Task(#[from] TaskError),
    #[error(transparent)]
    Database(#[from] sqlx::Error),
    #[error("Bad request: {0}")]
    BadRequest(String),
    #[error("Task not found")]
    NotFound,
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status_code = match &self {
            ApiError::Task(TaskError::Validation(_)) | ApiError::BadRequest(_) => {
                StatusCode::BAD_REQUEST
            }
            ApiError::Task(TaskError::NotFound) | ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::Task(TaskError::Database(_)) | ApiError::Database(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        let message = match &self {
            ApiError::Task(TaskError::Validation(msg)) | ApiError::BadRequest(msg) => msg.clone(),
            ApiError::Task(TaskError::NotFound) | ApiError::NotFound => {
                "Task not found".to_string()
            }
            ApiError::Task(TaskError::Database(e)) | ApiError::Database(e) => {
                tracing::error!(error = %e, "Database error while handling request");
                "Server Error".to_string()
            }
        };

        (status_code, Json(MessageResponse::new(message))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_codes_follow_error_kind() {
        let cases = [
            (
                ApiError::Task(TaskError::Validation("Title is required".into())),
                StatusCode::BAD_REQUEST,
            ),
            (ApiError::BadRequest("bad json".into()), StatusCode::BAD_REQUEST),
            (ApiError::Task(TaskError::NotFound), StatusCode::NOT_FOUND),
            (ApiError::NotFound, StatusCode::NOT_FOUND),
            (
                ApiError::Database(sqlx::Error::PoolTimedOut),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];
        for (error, expected) in cases {
            assert_eq!(error.into_response().status(), expected);
        }
    }
}
