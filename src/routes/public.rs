use crate::{AppState, handlers};
use axum::{
    Router,
    routing::{get, post},
};

/// Public Router Module
///
/// Defines endpoints that are **unauthenticated** and accessible to any
/// client: the health probe and the session entry/exit points.
///
/// Logout lives here deliberately: clearing a cookie is idempotent and must
/// always succeed, even when the caller no longer holds a valid session.
pub fn public_routes() -> Router<AppState> {
    Router::new()
        // GET /health
        // A simple, unauthenticated endpoint used for monitoring and load
        // balancer checks. Returns "ok" immediately.
        .route("/health", get(|| async { "ok" }))
        // POST /auth/register
        // Creates a new account. Passwords are hashed before storage and
        // duplicate usernames are rejected.
        .route("/auth/register", post(handlers::register))
        // POST /auth/login
        // Verifies credentials and opens a session by setting the http-only
        // token cookie. Inactive accounts are refused.
        .route("/auth/login", post(handlers::login))
        // POST /auth/logout
        // Clears the session cookie. Safe to call any number of times.
        .route("/auth/logout", post(handlers::logout))
}
