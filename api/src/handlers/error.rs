//! HTTP mapping of domain errors.

use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use hb_core::errors::{DomainError, TokenError};
use hb_shared::errors::{error_codes, ErrorResponse};
use thiserror::Error;

/// Errors returned by handlers and middleware, rendered as [`ErrorResponse`] JSON
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Missing or invalid Authorization header")]
    MissingCredentials,

    #[error(transparent)]
    Domain(#[from] DomainError),
}

impl From<TokenError> for ApiError {
    fn from(error: TokenError) -> Self {
        ApiError::Domain(DomainError::Token(error))
    }
}

impl ApiError {
    /// Machine-readable code placed in the `error` field
    pub fn code(&self) -> &'static str {
        match self {
            ApiError::MissingCredentials => error_codes::UNAUTHORIZED,
            ApiError::Domain(error) => match error {
                DomainError::Validation { .. } => error_codes::VALIDATION_ERROR,
                DomainError::NotFound { .. } => error_codes::NOT_FOUND,
                DomainError::Duplicate { .. } => error_codes::CONFLICT,
                DomainError::Unauthorized => error_codes::UNAUTHORIZED,
                DomainError::Token(TokenError::TokenExpired) => error_codes::TOKEN_EXPIRED,
                DomainError::Token(TokenError::TokenGenerationFailed) => error_codes::INTERNAL_ERROR,
                DomainError::Token(_) => error_codes::TOKEN_INVALID,
                DomainError::Database(_) => error_codes::DATABASE_ERROR,
                DomainError::Internal { .. } => error_codes::INTERNAL_ERROR,
            },
        }
    }

    fn message(&self) -> String {
        if self.status_code().is_server_error() {
            "An internal error occurred".to_string()
        } else {
            self.to_string()
        }
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::MissingCredentials => StatusCode::UNAUTHORIZED,
            ApiError::Domain(error) => match error {
                DomainError::Validation { .. } => StatusCode::BAD_REQUEST,
                DomainError::NotFound { .. } => StatusCode::NOT_FOUND,
                DomainError::Duplicate { .. } => StatusCode::CONFLICT,
                DomainError::Unauthorized => StatusCode::UNAUTHORIZED,
                DomainError::Token(TokenError::TokenGenerationFailed) => {
                    StatusCode::INTERNAL_SERVER_ERROR
                }
                DomainError::Token(_) => StatusCode::UNAUTHORIZED,
                DomainError::Database(_) | DomainError::Internal { .. } => {
                    StatusCode::INTERNAL_SERVER_ERROR
                }
            },
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(error = %self, "Request failed");
        }

        let mut body = ErrorResponse::new(self.code(), self.message());
        if let ApiError::Domain(DomainError::Duplicate { field }) = self {
            body = body.add_detail("field", field);
        }

        HttpResponse::build(status).json(body)
    }
}
