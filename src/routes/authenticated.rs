use crate::{AppState, handlers};
use axum::{
    Router,
    routing::{get, post},
};

/// Authenticated Router Module
///
/// Defines the routes accessible to any user with a valid session. This module
/// carries the core todo workflow plus the export/notify endpoints.
///
/// Access Control Strategy:
/// Every handler here relies on the `AuthUser` extractor middleware applied on
/// the router layer above this module. Handlers therefore always receive a
/// validated `AuthUser` (id, username, role), which feeds the
/// ownership-or-elevated checks and the named-permission guard.
pub fn authenticated_routes() -> Router<AppState> {
    Router::<AppState>::new()
        // GET /auth/me
        // Returns the identity embedded in the session token. The client
        // treats any cached copy as advisory and re-validates here.
        .route("/auth/me", get(handlers::me))
        // --- Todo CRUD ---
        // POST /todos — create a todo owned by the caller.
        // GET /todos — list own todos, or all todos for the elevated tier,
        // most recently updated first.
        .route(
            "/todos",
            post(handlers::create_todo).get(handlers::list_todos),
        )
        // GET/PUT/DELETE /todos/{id}
        // Single-todo access. Updates stamp the caller as the editor; deletes
        // additionally require the "delete-todo" permission. Ownership checks
        // are folded into the repository queries, so a non-owner cannot tell
        // a missing row from a protected one.
        .route(
            "/todos/{id}",
            get(handlers::get_todo_details)
                .put(handlers::update_todo)
                .delete(handlers::delete_todo),
        )
        // --- Export / Notify ---
        // GET /todo-action/{id}
        // Downloads the todo rendered as a PDF attachment.
        .route("/todo-action/{id}", get(handlers::download_todo_pdf))
        // POST /send-email
        // Renders the todo PDF and dispatches it by email.
        .route("/send-email", post(handlers::send_email))
}
