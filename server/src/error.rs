use actix_web::{error::ResponseError, http::StatusCode, HttpResponse};
use serde::Serialize;

use crate::auth_token::AuthTokenError;

#[derive(Debug, thiserror::Error)]
pub enum BookingServerError {
    #[error("Database error: {0}")]
    Database(#[from] mongodb::error::Error),

    #[error("Invalid identifier: {0}")]
    InvalidIdentifier(String),

    #[error("Invalid document: {0}")]
    InvalidDocument(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("{0}")]
    NotFound(&'static str),

    #[error("Authentication required")]
    AuthMissing,

    #[error("Invalid session token: {0}")]
    AuthInvalid(AuthTokenError),

    #[error("Failed to issue session token: {0}")]
    TokenIssue(AuthTokenError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl BookingServerError {
    /// Stable machine-readable code sent to clients.
    pub fn code(&self) -> &'static str {
        match self {
            BookingServerError::NotFound(_) => "not_found",
            BookingServerError::Database(_) | BookingServerError::InvalidIdentifier(_) => {
                "store_error"
            }
            BookingServerError::InvalidDocument(_) | BookingServerError::BadRequest(_) => {
                "bad_request"
            }
            BookingServerError::AuthMissing => "auth_missing",
            BookingServerError::AuthInvalid(_) => "auth_invalid",
            BookingServerError::TokenIssue(_)
            | BookingServerError::Config(_)
            | BookingServerError::Internal(_) => "internal",
        }
    }

    /// Client-facing message. Driver and signing details stay in the server log.
    pub fn client_message(&self) -> String {
        match self {
            BookingServerError::NotFound(message) => (*message).to_string(),
            BookingServerError::Database(_) | BookingServerError::InvalidIdentifier(_) => {
                "Database operation failed".to_string()
            }
            BookingServerError::InvalidDocument(_) | BookingServerError::BadRequest(_) => {
                self.to_string()
            }
            BookingServerError::AuthMissing => "Unauthorized access".to_string(),
            BookingServerError::AuthInvalid(_) => "Forbidden access".to_string(),
            BookingServerError::TokenIssue(_)
            | BookingServerError::Config(_)
            | BookingServerError::Internal(_) => "Internal server error".to_string(),
        }
    }
}

#[derive(Serialize)]
struct ErrorResponse {
    success: bool,
    message: String,
    error: &'static str,
}

impl ResponseError for BookingServerError {
    fn status_code(&self) -> StatusCode {
        match self {
            BookingServerError::NotFound(_) => StatusCode::NOT_FOUND,
            BookingServerError::InvalidDocument(_) => StatusCode::BAD_REQUEST,
            BookingServerError::BadRequest(_) => StatusCode::BAD_REQUEST,
            BookingServerError::AuthMissing => StatusCode::UNAUTHORIZED,
            BookingServerError::AuthInvalid(_) => StatusCode::FORBIDDEN,
            BookingServerError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
            BookingServerError::InvalidIdentifier(_) => StatusCode::INTERNAL_SERVER_ERROR,
            BookingServerError::TokenIssue(_) => StatusCode::INTERNAL_SERVER_ERROR,
            BookingServerError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
            BookingServerError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        if status.is_server_error() {
            log::error!("{}", self);
        }

        let error_response = ErrorResponse {
            success: false,
            message: self.client_message(),
            error: self.code(),
        };

        HttpResponse::build(status).json(error_response)
    }
}

pub type Result<T> = std::result::Result<T, BookingServerError>;
