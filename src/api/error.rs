//! Mapping from service failures to HTTP responses.

use super::auth::TokenError;
use crate::task::{domain::ErrorKind, services::TaskLifecycleError};
use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use log::error;
use serde::Serialize;
use thiserror::Error;

/// Errors returned by HTTP handlers.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The bearer token is missing or invalid.
    #[error("unauthorized: {0}")]
    Unauthorized(#[from] TokenError),
    /// The request body or path could not be understood.
    #[error("invalid request: {0}")]
    BadRequest(String),
    /// The path does not name a known task.
    #[error("task not found")]
    UnknownTask,
    /// The caller has no directory record.
    #[error("user profile not found")]
    UnknownUser,
    /// The application state was not registered with the server.
    #[error("application state is not configured")]
    MissingState,
    /// A lifecycle or analytics operation failed.
    #[error(transparent)]
    Service(#[from] TaskLifecycleError),
}

#[derive(Debug, Serialize)]
struct ErrorBody<'a> {
    error: &'a str,
    message: String,
}

impl ApiError {
    fn code(&self) -> &'static str {
        match self {
            Self::Unauthorized(_) => "unauthorized",
            Self::BadRequest(_) => "validation_error",
            Self::UnknownTask | Self::UnknownUser => "not_found",
            Self::MissingState => "internal",
            Self::Service(err) => kind_code(err.kind()),
        }
    }
}

const fn kind_code(kind: ErrorKind) -> &'static str {
    match kind {
        ErrorKind::Validation => "validation_error",
        ErrorKind::Forbidden => "forbidden",
        ErrorKind::NotFound => "not_found",
        ErrorKind::InvalidTransition => "invalid_transition",
        ErrorKind::Internal => "internal",
    }
}

const fn kind_status(kind: ErrorKind) -> StatusCode {
    match kind {
        ErrorKind::Validation => StatusCode::UNPROCESSABLE_ENTITY,
        ErrorKind::Forbidden => StatusCode::FORBIDDEN,
        ErrorKind::NotFound => StatusCode::NOT_FOUND,
        ErrorKind::InvalidTransition => StatusCode::CONFLICT,
        ErrorKind::Internal => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::BadRequest(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::UnknownTask | Self::UnknownUser => StatusCode::NOT_FOUND,
            Self::MissingState => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Service(err) => kind_status(err.kind()),
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        let message = if status.is_server_error() {
            error!("request failed: {self}");
            "internal server error".to_owned()
        } else {
            self.to_string()
        };
        HttpResponse::build(status).json(ErrorBody {
            error: self.code(),
            message,
        })
    }
}
