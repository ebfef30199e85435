// error.rs
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;
use tracing::error;

/// Failure talking to the polls REST API.
#[derive(Debug, Error)]
pub enum ApiError {
    /// 401 or 403: the stored bearer token is no longer accepted.
    #[error("session rejected by the API ({0})")]
    Unauthorized(StatusCode),

    #[error("API responded with {0}")]
    Status(StatusCode),

    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
}

impl ApiError {
    pub fn from_status(status: StatusCode) -> Self {
        match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Self::Unauthorized(status),
            _ => Self::Status(status),
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {key}: {message}")]
    Invalid { key: &'static str, message: String },

    #[error("{key} must be an http or https URL")]
    UnsupportedScheme { key: &'static str },
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Malformed form: {0}")]
    MalformedForm(String),

    #[error("Failed to render page: {0}")]
    Template(#[from] askama::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::MalformedForm(_) => StatusCode::BAD_REQUEST,
            AppError::Template(e) => {
                error!("Template error: {e}");
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        (status, self.to_string()).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;
