use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

/// ApiError
///
/// The request-level failure taxonomy. Every handler returns
/// `Result<_, ApiError>`, and this type is the single place where failures are
/// mapped to HTTP status codes and JSON error bodies.
///
/// `NotFound` deliberately covers both "row does not exist" and "row is not
/// yours": mutating queries carry the ownership predicate in their WHERE
/// clause, so zero affected rows cannot distinguish the two cases, and the
/// response must not leak which one occurred.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Missing or malformed request fields (400). Carries the client-facing message.
    #[error("{0}")]
    InvalidInput(String),

    /// Unknown username or wrong password (400). One message for both, so the
    /// response never confirms that a username exists.
    #[error("Invalid username or password")]
    InvalidCredentials,

    /// Duplicate username at registration (400).
    #[error("User already exists")]
    Conflict,

    /// Missing, malformed, or expired session token (401).
    #[error("Not authenticated")]
    Unauthenticated,

    /// Inactive account, missing permission, or protected target (403).
    #[error("{0}")]
    Forbidden(String),

    /// Zero rows matched: absent or not owned by the caller (404).
    #[error("{0}")]
    NotFound(String),

    /// Database failure (500). Logged in full, surfaced as a generic message.
    #[error("database error")]
    Database(#[from] sqlx::Error),

    /// Outbound email dispatch failure (500).
    #[error("mail dispatch failed: {0}")]
    Mail(String),

    /// PDF rendering failure (500).
    #[error("pdf rendering failed: {0}")]
    Pdf(String),

    /// Any other internal failure, e.g. a hashing error (500).
    #[error("internal error: {0}")]
    Internal(String),
}

impl ApiError {
    /// The HTTP status this error maps to.
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::InvalidInput(_)
            | ApiError::InvalidCredentials
            | ApiError::Conflict => StatusCode::BAD_REQUEST,
            ApiError::Unauthenticated => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Database(_)
            | ApiError::Mail(_)
            | ApiError::Pdf(_)
            | ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    /// Serializes the error as `{"error": "..."}`.
    ///
    /// Server-side failures are logged with their full detail here, at the
    /// request boundary, and the caller only ever sees "Server error".
    fn into_response(self) -> Response {
        let status = self.status();

        let message = if status == StatusCode::INTERNAL_SERVER_ERROR {
            tracing::error!("request failed: {self:?}");
            "Server error".to_string()
        } else {
            self.to_string()
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}
