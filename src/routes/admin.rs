use crate::{AppState, handlers};
use axum::{
    Router,
    routing::{delete, get, put},
};

/// Admin Router Module
///
/// Defines the user-, role- and permission-administration endpoints. The
/// entire module sits behind the authentication layer, and every handler then
/// checks for the elevated (superadmin) tier before touching the repository.
///
/// The superadmin tier itself is invisible through these endpoints: listings
/// exclude it, superadmin accounts cannot be edited or deleted, and the
/// superadmin role can neither be assigned nor have its permission set read
/// or replaced.
pub fn admin_routes() -> Router<AppState> {
    Router::new()
        // GET /users
        // Lists every account below the superadmin tier, with role names
        // resolved via join.
        .route("/users", get(handlers::get_users))
        // DELETE /users/{id}
        // Removes an account (and, by cascade, its todos). Self-deletion is
        // rejected server-side.
        .route("/users/{id}", delete(handlers::delete_user))
        // PUT /users/{id}/role
        // Moves a user to another role tier. The superadmin role is not
        // assignable here.
        .route("/users/{id}/role", put(handlers::update_user_role))
        // PUT /users/{id}/status
        // Activates or deactivates an account; deactivated accounts cannot
        // log in until re-enabled.
        .route("/users/{id}/status", put(handlers::update_user_status))
        // GET /roles
        // The assignable role catalog (superadmin excluded).
        .route("/roles", get(handlers::get_roles))
        // GET /permissions
        // The full permission catalog for the permissions screen.
        .route("/permissions", get(handlers::get_permissions))
        // GET/PUT /role-permissions/{role_id}
        // Reads or atomically replaces a role's permission set. The replace is
        // transactional: a concurrent reader sees either the old set or the
        // new one, never an empty or partial mix.
        .route(
            "/role-permissions/{role_id}",
            get(handlers::get_role_permissions).put(handlers::update_role_permissions),
        )
}
