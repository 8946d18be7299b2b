//! Error types and HTTP error response handling.
//!
//! This module defines all application errors and how they are converted
//! into HTTP responses with appropriate status codes and JSON bodies.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;

/// Application-wide error type.
///
/// Every failure is scoped to a single request. Authentication failures fall into
/// the 401 class and authorization failures into the 403 class; the two never mix.
///
/// # Error Categories
///
/// - **Authentication Errors**: missing/malformed header, bad token, bad credentials
/// - **Authorization Errors**: principal kind or shop scope does not match the route
/// - **Tenant Errors**: a tenant-scoped route was reached without a resolvable tenant
/// - **Resource Errors**: requested resources not found or conflicting
/// - **Validation Errors**: invalid request data
/// - **Database / Internal Errors**: never shown to the client in detail
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// No `Authorization` header on a protected route.
    #[error("Authorization header required")]
    MissingAuthorization,

    /// `Authorization` header present but not `Bearer <token>`.
    #[error("Bearer token required")]
    InvalidAuthorizationScheme,

    /// Token failed verification. Expired, forged and malformed tokens all end up here.
    #[error("Invalid token")]
    InvalidToken,

    /// Login failed. Unknown user, inactive user and wrong password are indistinguishable.
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// Authenticated, but not allowed on this route.
    #[error("{0}")]
    Forbidden(String),

    /// Returns HTTP 400 when a tenant-scoped route has no tenant for the request host.
    #[error("Tenant not found")]
    TenantNotResolved,

    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("{0}")]
    Conflict(String),

    /// Client exceeded its request budget.
    #[error("Too many requests, try again later")]
    RateLimited,

    /// Request body or parameters are invalid.
    #[error("Invalid request")]
    InvalidRequest(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        AppError::InvalidRequest(errors.to_string())
    }
}

impl From<bcrypt::BcryptError> for AppError {
    fn from(err: bcrypt::BcryptError) -> Self {
        AppError::Internal(err.to_string())
    }
}

impl From<tokio::task::JoinError> for AppError {
    fn from(err: tokio::task::JoinError) -> Self {
        AppError::Internal(err.to_string())
    }
}

impl AppError {
    /// A unique-index violation becomes `Conflict(message)`; every other database
    /// error stays a `Database` error.
    ///
    /// Used on inserts and updates whose uniqueness was checked up front, where a
    /// concurrent writer can still win the race.
    pub fn conflict_on_unique(err: sqlx::Error, message: impl Into<String>) -> AppError {
        let unique = err
            .as_database_error()
            .is_some_and(|db| db.is_unique_violation());
        if unique {
            AppError::Conflict(message.into())
        } else {
            AppError::Database(err)
        }
    }

    /// HTTP status for this error.
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::MissingAuthorization
            | AppError::InvalidAuthorizationScheme
            | AppError::InvalidToken
            | AppError::InvalidCredentials => StatusCode::UNAUTHORIZED,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::TenantNotResolved | AppError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::RateLimited => StatusCode::TOO_MANY_REQUESTS,
            AppError::Database(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Stable machine-readable code for this error.
    pub fn code(&self) -> &'static str {
        match self {
            AppError::MissingAuthorization => "missing_authorization",
            AppError::InvalidAuthorizationScheme => "invalid_authorization",
            AppError::InvalidToken => "invalid_token",
            AppError::InvalidCredentials => "invalid_credentials",
            AppError::Forbidden(_) => "forbidden",
            AppError::TenantNotResolved => "tenant_not_found",
            AppError::NotFound(_) => "not_found",
            AppError::Conflict(_) => "conflict",
            AppError::RateLimited => "rate_limited",
            AppError::InvalidRequest(_) => "invalid_request",
            AppError::Database(_) | AppError::Internal(_) => "internal_error",
        }
    }
}

/// Convert AppError into an HTTP response.
///
/// # Response Format
///
/// ```json
/// {
///   "error": {
///     "code": "error_type",
///     "message": "Human-readable error message"
///   }
/// }
/// ```
///
/// Database and internal errors are logged and replaced with a generic message.
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let code = self.code();

        let message = match &self {
            AppError::InvalidRequest(msg) => msg.clone(),
            AppError::Database(err) => {
                tracing::error!(error = %err, "database error");
                "An internal error occurred".to_string()
            }
            AppError::Internal(msg) => {
                tracing::error!(error = %msg, "internal error");
                "An internal error occurred".to_string()
            }
            other => other.to_string(),
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}
