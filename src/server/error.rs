use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use serde::Serialize;

use crate::error::EngineError;

/// JSON envelope shared by every error the API returns.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: String,
    pub message: String,
}

/// API-facing errors with their HTTP mapping. Handlers return
/// `Result<_, ApiError>` so every endpoint fails with the same envelope.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Invalid request: {0}")]
    BadRequest(String),

    #[error("Correction engine is not ready (state: {0})")]
    EngineNotReady(String),

    #[error("Generation backend error: {0}")]
    Generator(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl ApiError {
    fn kind(&self) -> &'static str {
        match self {
            ApiError::BadRequest(_) => "bad_request",
            ApiError::EngineNotReady(_) => "engine_not_ready",
            ApiError::Generator(_) => "generation_failed",
            ApiError::Internal(_) => "internal_error",
        }
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::EngineNotReady(_) => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::Generator(_) => StatusCode::BAD_GATEWAY,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(ErrorResponse {
            success: false,
            error: self.kind().to_string(),
            message: self.to_string(),
        })
    }
}

impl From<EngineError> for ApiError {
    fn from(error: EngineError) -> Self {
        match error {
            EngineError::NotReady { state } => ApiError::EngineNotReady(state.to_string()),
            EngineError::Initialization { details } | EngineError::Generation { details } => {
                ApiError::Generator(details)
            }
        }
    }
}
