// HTTP API Error Types
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::{Duration, Utc};
use serde::Serialize;
use serde_json::Value;

use crate::database::DatabaseError;

/// Message returned for every authentication failure, whatever the cause.
pub const AUTHENTICATION_FAILED: &str = "User authentication failed";

/// Message returned when a caller touches a resource owned by someone else.
pub const ACCESS_DENIED: &str = "Access is denied";

const INTERNAL_MESSAGE: &str = "An error occurred while processing your request";

/// Asia/Seoul has no daylight saving time.
const SEOUL_UTC_OFFSET_HOURS: i64 = 9;

/// Predefined business errors with a fixed status and client message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    BadRequest,
    UnknownError,
    EmailNotFound,
    InvalidPassword,
    EmailAlreadyExists,
    InvalidRefreshToken,
    UserNotFound,
    CorrectionNotFound,
    PhotoBookNotFound,
    ResourceNotFound,
}

impl ErrorCode {
    pub fn status(&self) -> StatusCode {
        match self {
            ErrorCode::BadRequest => StatusCode::BAD_REQUEST,
            ErrorCode::UnknownError => StatusCode::INTERNAL_SERVER_ERROR,
            ErrorCode::EmailNotFound => StatusCode::UNAUTHORIZED,
            ErrorCode::InvalidPassword => StatusCode::UNAUTHORIZED,
            ErrorCode::EmailAlreadyExists => StatusCode::CONFLICT,
            ErrorCode::InvalidRefreshToken => StatusCode::UNAUTHORIZED,
            ErrorCode::UserNotFound => StatusCode::NOT_FOUND,
            ErrorCode::CorrectionNotFound => StatusCode::NOT_FOUND,
            ErrorCode::PhotoBookNotFound => StatusCode::NOT_FOUND,
            ErrorCode::ResourceNotFound => StatusCode::NOT_FOUND,
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            ErrorCode::BadRequest => "Invalid input value",
            ErrorCode::UnknownError => "Unknown error occurred",
            ErrorCode::EmailNotFound => "Email not found",
            ErrorCode::InvalidPassword => "Invalid password",
            ErrorCode::EmailAlreadyExists => "Email already exists",
            ErrorCode::InvalidRefreshToken => "Invalid refresh token",
            ErrorCode::UserNotFound => "User not found",
            ErrorCode::CorrectionNotFound => "Correction not found",
            ErrorCode::PhotoBookNotFound => "Photo book not found",
            ErrorCode::ResourceNotFound => "Resource not found",
        }
    }
}

/// One rejected input field
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldError {
    pub field: String,
    pub rejected_value: Value,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, rejected_value: Value, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            rejected_value,
            message: message.into(),
        }
    }
}

/// Body of every error response
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorResponse {
    pub message: String,
    pub path: String,
    pub time: String,
    pub input_errors: Vec<FieldError>,
}

impl ErrorResponse {
    pub fn of(message: impl Into<String>, path: impl Into<String>, input_errors: Vec<FieldError>) -> Self {
        Self {
            message: message.into(),
            path: path.into(),
            time: seoul_timestamp(),
            input_errors,
        }
    }
}

/// Current time formatted as `yyyy-MM-dd HH:mm:ss` in Asia/Seoul
pub fn seoul_timestamp() -> String {
    (Utc::now() + Duration::hours(SEOUL_UTC_OFFSET_HOURS))
        .naive_utc()
        .format("%Y-%m-%d %H:%M:%S")
        .to_string()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Info,
    Warn,
    Error,
}

/// Everything the response middleware needs to log and render an error.
/// Travels in the response extensions because the request path is only known there.
#[derive(Debug, Clone)]
pub struct ErrorReport {
    pub status: StatusCode,
    pub kind: &'static str,
    pub severity: Severity,
    pub message: String,
    pub detail: String,
    pub input_errors: Vec<FieldError>,
}

impl ErrorReport {
    pub fn into_response_with_path(self, path: &str) -> Response {
        let body = ErrorResponse::of(self.message.clone(), path, self.input_errors.clone());
        let status = self.status;
        let mut response = (status, Json(body)).into_response();
        response.extensions_mut().insert(self);
        response
    }

    pub fn log(&self, path: &str) {
        match self.severity {
            Severity::Info => {
                tracing::info!(url = %path, exception = self.kind, "{}", self.detail)
            }
            Severity::Warn => {
                tracing::warn!(url = %path, exception = self.kind, "{}", self.detail)
            }
            Severity::Error => {
                tracing::error!(url = %path, exception = self.kind, "{}", self.detail)
            }
        }
    }
}

/// HTTP API error, translated into a status and [`ErrorResponse`] body
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Request body failed its validation rules
    #[error("validation failed for {} field(s)", .0.len())]
    Validation(Vec<FieldError>),

    /// Body or path could not be parsed into the expected types
    #[error("{message}")]
    InvalidInput {
        message: String,
        field_errors: Vec<FieldError>,
    },

    #[error("{}", .0.message())]
    Business(ErrorCode),

    /// Missing or invalid credentials; the reason is logged, never returned
    #[error("authentication failed: {0}")]
    Unauthenticated(String),

    #[error("{0}")]
    AccessDenied(String),

    /// Runtime failure in hashing, token signing or task scheduling
    #[error("{0}")]
    Internal(String),

    #[error(transparent)]
    Database(#[from] DatabaseError),
}

impl ApiError {
    pub fn invalid_input(message: impl Into<String>) -> Self {
        ApiError::InvalidInput {
            message: message.into(),
            field_errors: Vec::new(),
        }
    }

    pub fn unauthenticated(reason: impl Into<String>) -> Self {
        ApiError::Unauthenticated(reason.into())
    }

    pub fn access_denied() -> Self {
        ApiError::AccessDenied(ACCESS_DENIED.to_string())
    }

    pub fn internal(message: impl Into<String>) -> Self {
        ApiError::Internal(message.into())
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) | ApiError::InvalidInput { .. } => StatusCode::BAD_REQUEST,
            ApiError::Business(code) => code.status(),
            ApiError::Unauthenticated(_) => StatusCode::UNAUTHORIZED,
            ApiError::AccessDenied(_) => StatusCode::FORBIDDEN,
            ApiError::Internal(_) | ApiError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Client-safe message
    pub fn message(&self) -> String {
        match self {
            ApiError::Validation(_) => ErrorCode::BadRequest.message().to_string(),
            ApiError::InvalidInput { message, .. } => message.clone(),
            ApiError::Business(code) => code.message().to_string(),
            ApiError::Unauthenticated(_) => AUTHENTICATION_FAILED.to_string(),
            ApiError::AccessDenied(message) => message.clone(),
            ApiError::Internal(_) | ApiError::Database(_) => INTERNAL_MESSAGE.to_string(),
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            ApiError::Validation(_) => "ValidationError",
            ApiError::InvalidInput { .. } => "InvalidInput",
            ApiError::Business(_) => "BusinessError",
            ApiError::Unauthenticated(_) => "AuthenticationError",
            ApiError::AccessDenied(_) => "AccessDenied",
            ApiError::Internal(_) => "RuntimeError",
            ApiError::Database(_) => "DatabaseError",
        }
    }

    pub fn severity(&self) -> Severity {
        match self {
            ApiError::Validation(_)
            | ApiError::InvalidInput { .. }
            | ApiError::Business(_)
            | ApiError::Unauthenticated(_)
            | ApiError::AccessDenied(_) => Severity::Info,
            ApiError::Internal(_) => Severity::Warn,
            ApiError::Database(_) => Severity::Error,
        }
    }

    pub fn report(&self) -> ErrorReport {
        let input_errors = match self {
            ApiError::Validation(errors) => errors.clone(),
            ApiError::InvalidInput { field_errors, .. } => field_errors.clone(),
            _ => Vec::new(),
        };

        ErrorReport {
            status: self.status_code(),
            kind: self.kind(),
            severity: self.severity(),
            message: self.message(),
            detail: self.to_string(),
            input_errors,
        }
    }
}

impl From<ErrorCode> for ApiError {
    fn from(code: ErrorCode) -> Self {
        ApiError::Business(code)
    }
}

// The path is filled in by `middleware::response::render_error_response`
impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        self.report().into_response_with_path("")
    }
}
