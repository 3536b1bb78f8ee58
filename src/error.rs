use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::json;

/// Category of a failure, for callers that need to branch on what went wrong
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    Configuration,
    Transport,
    EmptyCompletion,
    InvalidResponse,
    InvalidInput,
    NotFound,
    RequestInFlight,
    Internal,
}

/// Application-level errors
#[derive(thiserror::Error, Debug)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("HTTP client error: {0}")]
    HttpClient(#[from] reqwest::Error),

    #[error("Completion service returned status {status}: {message}")]
    Upstream { status: u16, message: String },

    #[error("No content in AI response")]
    EmptyCompletion,

    #[error("Invalid AI response: {0}")]
    InvalidResponseShape(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("A recommendation request is already in progress")]
    RequestInFlight,

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl AppError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            AppError::Configuration(_) => ErrorKind::Configuration,
            AppError::HttpClient(_) | AppError::Upstream { .. } => ErrorKind::Transport,
            AppError::EmptyCompletion => ErrorKind::EmptyCompletion,
            AppError::InvalidResponseShape(_) => ErrorKind::InvalidResponse,
            AppError::InvalidInput(_) => ErrorKind::InvalidInput,
            AppError::NotFound(_) => ErrorKind::NotFound,
            AppError::RequestInFlight => ErrorKind::RequestInFlight,
            AppError::Internal(_) => ErrorKind::Internal,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let kind = self.kind();
        let (status, message) = match self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            AppError::InvalidInput(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::RequestInFlight => (StatusCode::CONFLICT, self.to_string()),
            AppError::Configuration(_) | AppError::Internal(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, self.to_string())
            }
            AppError::HttpClient(_)
            | AppError::Upstream { .. }
            | AppError::EmptyCompletion
            | AppError::InvalidResponseShape(_) => (StatusCode::BAD_GATEWAY, self.to_string()),
        };

        let body = Json(json!({
            "error": message,
            "kind": kind,
        }));

        (status, body).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;
