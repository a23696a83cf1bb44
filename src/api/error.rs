use axum::http::StatusCode;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ApiError {
    #[error("{0}")]
    InvalidInput(String),

    #[error("Invalid request payload: {0}")]
    InvalidPayload(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::InvalidInput(_) | ApiError::InvalidPayload(_) => StatusCode::BAD_REQUEST,
        }
    }
}
