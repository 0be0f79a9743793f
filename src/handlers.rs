use crate::{
    AppState,
    auth::{self, AuthUser, SESSION_COOKIE},
    error::ApiError,
    models::{
        LoginRequest, LoginResponse, MeResponse, MessageResponse, Permission, PublicUser,
        RegisterRequest, Role, RoleName, RolePermissionsRequest, SendEmailRequest,
        SendEmailResponse, Todo, TodoRequest, TodoWithUsers, UpdateRoleRequest,
        UpdateStatusRequest, UserResponse,
    },
    pdf::{render_todo_pdf, todo_pdf_filename},
};
use axum::{
    Json,
    extract::{Path, State},
    http::header,
    response::{IntoResponse, Response},
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};

// --- Shared Validation ---

/// Validates a todo payload: the description must survive trimming and the
/// amount must be an actual number. Returns the trimmed description.
fn validate_todo_input(payload: &TodoRequest) -> Result<String, ApiError> {
    let description = payload.description.trim();
    if description.is_empty() {
        return Err(ApiError::InvalidInput(
            "Description cannot be empty".to_string(),
        ));
    }
    if !payload.amount.is_finite() {
        return Err(ApiError::InvalidInput(
            "Amount must be a number".to_string(),
        ));
    }
    Ok(description.to_string())
}

/// Validates a credential field: non-empty after trimming, no interior
/// whitespace. Returns the trimmed value.
fn validate_credential(value: &str, field: &str) -> Result<String, ApiError> {
    let value = value.trim();
    if value.is_empty() || value.chars().any(char::is_whitespace) {
        return Err(ApiError::InvalidInput(format!(
            "{field} must be non-empty and contain no whitespace"
        )));
    }
    Ok(value.to_string())
}

// --- Auth Handlers ---

/// register
///
/// [Public Route] Creates a new account. The password is hashed before
/// storage; the response carries the public user fields only, never the hash.
/// The requested role defaults to the non-privileged "user" tier, and the
/// superadmin tier cannot be requested.
#[utoipa::path(
    post,
    path = "/auth/register",
    request_body = RegisterRequest,
    responses(
        (status = 200, description = "Registered", body = PublicUser),
        (status = 400, description = "Invalid input or duplicate username")
    )
)]
pub async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> Result<Json<PublicUser>, ApiError> {
    let username = validate_credential(&payload.username, "Username")?;
    let password = validate_credential(&payload.password, "Password")?;

    let requested = payload.role.as_deref().unwrap_or("user");
    let role_name: RoleName = requested
        .parse()
        .map_err(|_| ApiError::InvalidInput(format!("Unknown role: {requested}")))?;
    if role_name.is_elevated() {
        return Err(ApiError::Forbidden(
            "The superadmin role cannot be requested".to_string(),
        ));
    }

    if state.repo.find_credentials(&username).await?.is_some() {
        return Err(ApiError::Conflict);
    }

    let role = state
        .repo
        .get_role_by_name(role_name.as_str())
        .await?
        .ok_or_else(|| ApiError::Internal(format!("role {role_name} missing from catalog")))?;

    let hash = auth::hash_password(&password)?;

    // The unique index still backstops a concurrent duplicate registration.
    let user = state
        .repo
        .create_user(&username, &hash, &role)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db) if db.is_unique_violation() => ApiError::Conflict,
            other => ApiError::from(other),
        })?;

    Ok(Json(user))
}

/// login
///
/// [Public Route] Authenticates a user and opens a session.
///
/// Unknown usernames and wrong passwords produce the same response, so the
/// endpoint never confirms that an account exists. Inactive accounts are
/// rejected after the lookup but before any token is issued. On success the
/// signed session token is set as an http-only SameSite=Lax cookie.
#[utoipa::path(
    post,
    path = "/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Logged in", body = LoginResponse),
        (status = 400, description = "Invalid credentials"),
        (status = 403, description = "Account inactive")
    )
)]
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(payload): Json<LoginRequest>,
) -> Result<(CookieJar, Json<LoginResponse>), ApiError> {
    let row = state
        .repo
        .find_credentials(payload.username.trim())
        .await?
        .ok_or(ApiError::InvalidCredentials)?;

    if !row.isactive {
        return Err(ApiError::Forbidden(
            "Your account is inactive. Contact admin.".to_string(),
        ));
    }

    // Register trims credentials before hashing; apply the same normalization.
    if !auth::verify_password(payload.password.trim(), &row.password)? {
        return Err(ApiError::InvalidCredentials);
    }

    let role: RoleName = row
        .role_name
        .parse()
        .map_err(|_| ApiError::Internal(format!("unknown role in database: {}", row.role_name)))?;

    let token = auth::issue_token(row.user_id, &row.username, role, &state.config.jwt_secret)?;

    let cookie = Cookie::build((SESSION_COOKIE, token))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .build();

    let response = LoginResponse {
        message: "Logged in".to_string(),
        user: row.public(),
    };

    Ok((jar.add(cookie), Json(response)))
}

/// me
///
/// [Authenticated Route] Returns the identity embedded in the session token.
/// The server is the sole source of truth here — clients re-validate any
/// cached identity against this endpoint on load.
#[utoipa::path(
    get,
    path = "/auth/me",
    responses(
        (status = 200, description = "Session identity", body = MeResponse),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn me(auth: AuthUser) -> Json<MeResponse> {
    Json(MeResponse {
        user_id: auth.id,
        username: auth.username,
        role: auth.role,
    })
}

/// logout
///
/// [Public Route] Clears the session cookie. Idempotent: removing an absent
/// cookie is a no-op, so repeated calls always succeed.
#[utoipa::path(
    post,
    path = "/auth/logout",
    responses((status = 200, description = "Logged out", body = MessageResponse))
)]
pub async fn logout(jar: CookieJar) -> (CookieJar, Json<MessageResponse>) {
    let removal = Cookie::build((SESSION_COOKIE, "")).path("/").build();
    (
        jar.remove(removal),
        Json(MessageResponse {
            message: "Logged out".to_string(),
        }),
    )
}

// --- Todo Handlers ---

/// create_todo
///
/// [Authenticated Route] Creates a todo owned by the caller. The owner is
/// taken from the session, never from the body.
#[utoipa::path(
    post,
    path = "/todos",
    request_body = TodoRequest,
    responses(
        (status = 200, description = "Created", body = Todo),
        (status = 400, description = "Invalid input")
    )
)]
pub async fn create_todo(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(payload): Json<TodoRequest>,
) -> Result<Json<Todo>, ApiError> {
    let description = validate_todo_input(&payload)?;
    let todo = state
        .repo
        .create_todo(&description, payload.amount, auth.id)
        .await?;
    Ok(Json(todo))
}

/// list_todos
///
/// [Authenticated Route] Lists todos, most recently updated first, joined with
/// creator/updater usernames. Elevated callers see every row; everyone else
/// sees only their own. Substring filtering and re-sorting are client-side
/// presentation concerns.
#[utoipa::path(
    get,
    path = "/todos",
    responses((status = 200, description = "Todos", body = [TodoWithUsers]))
)]
pub async fn list_todos(
    auth: AuthUser,
    State(state): State<AppState>,
) -> Result<Json<Vec<TodoWithUsers>>, ApiError> {
    let todos = if auth.is_elevated() {
        state.repo.list_todos().await?
    } else {
        state.repo.list_todos_for(auth.id).await?
    };
    Ok(Json(todos))
}

/// get_todo_details
///
/// [Authenticated Route] Retrieves a single todo, subject to the same
/// ownership-or-elevated visibility as the listing. A row the caller may not
/// see is indistinguishable from a missing one.
#[utoipa::path(
    get,
    path = "/todos/{id}",
    params(("id" = i32, Path, description = "Todo ID")),
    responses(
        (status = 200, description = "Found", body = TodoWithUsers),
        (status = 404, description = "Not found or no permission")
    )
)]
pub async fn get_todo_details(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<TodoWithUsers>, ApiError> {
    state
        .repo
        .get_todo(id)
        .await?
        .filter(|todo| auth.can_act_on(todo.created_by))
        .map(Json)
        .ok_or_else(|| ApiError::NotFound("Todo not found".to_string()))
}

/// update_todo
///
/// [Authenticated Route] Rewrites a todo's description and amount, stamping
/// the caller as the most recent editor.
///
/// *Authorization*: elevated callers update any row; everyone else only rows
/// they created. Zero matched rows collapses "doesn't exist" and "not yours"
/// into one 404.
#[utoipa::path(
    put,
    path = "/todos/{id}",
    params(("id" = i32, Path, description = "Todo ID")),
    request_body = TodoRequest,
    responses(
        (status = 200, description = "Updated", body = MessageResponse),
        (status = 404, description = "Not found or no permission")
    )
)]
pub async fn update_todo(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(payload): Json<TodoRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    let description = validate_todo_input(&payload)?;

    let updated = if auth.is_elevated() {
        state
            .repo
            .update_todo_admin(id, &description, payload.amount, auth.id)
            .await?
    } else {
        state
            .repo
            .update_todo(id, &description, payload.amount, auth.id)
            .await?
    };

    if updated {
        Ok(Json(MessageResponse {
            message: "Todo updated".to_string(),
        }))
    } else {
        Err(ApiError::NotFound(
            "Todo not found or no permission".to_string(),
        ))
    }
}

/// delete_todo
///
/// [Authenticated Route] Deletes a todo. Two authorization layers apply, in
/// order: the caller's role must hold the "delete-todo" permission, then the
/// ownership-or-elevated rule selects which rows the delete may touch.
#[utoipa::path(
    delete,
    path = "/todos/{id}",
    params(("id" = i32, Path, description = "Todo ID")),
    responses(
        (status = 200, description = "Deleted", body = MessageResponse),
        (status = 403, description = "Missing delete-todo permission"),
        (status = 404, description = "Not found or no permission")
    )
)]
pub async fn delete_todo(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<MessageResponse>, ApiError> {
    auth::require_permission(&state.repo, &auth, "delete-todo").await?;

    let deleted = if auth.is_elevated() {
        state.repo.delete_todo_admin(id).await?
    } else {
        state.repo.delete_todo(id, auth.id).await?
    };

    if deleted {
        Ok(Json(MessageResponse {
            message: "Todo deleted".to_string(),
        }))
    } else {
        Err(ApiError::NotFound(
            "Todo not found or no permission".to_string(),
        ))
    }
}

// --- User Administration Handlers ---

/// get_users
///
/// [Admin Route] Lists every account below the superadmin tier, role names
/// resolved. Superadmin accounts are structurally absent from this view.
#[utoipa::path(
    get,
    path = "/users",
    responses(
        (status = 200, description = "Users", body = [PublicUser]),
        (status = 403, description = "Not an admin")
    )
)]
pub async fn get_users(
    auth: AuthUser,
    State(state): State<AppState>,
) -> Result<Json<Vec<PublicUser>>, ApiError> {
    auth::ensure_elevated(&auth)?;
    Ok(Json(state.repo.list_users().await?))
}

/// delete_user
///
/// [Admin Route] Removes an account. The caller's own account is off limits —
/// self-deletion is rejected here, server-side, not just hidden in a client.
/// The target's todos are removed with the account.
#[utoipa::path(
    delete,
    path = "/users/{id}",
    params(("id" = i32, Path, description = "User ID")),
    responses(
        (status = 200, description = "Deleted", body = MessageResponse),
        (status = 403, description = "Self-deletion or not an admin"),
        (status = 404, description = "Unknown or protected user")
    )
)]
pub async fn delete_user(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<MessageResponse>, ApiError> {
    auth::ensure_elevated(&auth)?;
    if id == auth.id {
        return Err(ApiError::Forbidden(
            "You cannot delete your own account".to_string(),
        ));
    }

    if state.repo.delete_user(id).await? {
        Ok(Json(MessageResponse {
            message: "User deleted successfully".to_string(),
        }))
    } else {
        Err(ApiError::NotFound("User not found".to_string()))
    }
}

/// update_user_role
///
/// [Admin Route] Reassigns a user's role tier. Three guards: no
/// self-modification, the superadmin role cannot be handed out, and superadmin
/// accounts cannot be retargeted (they are invisible to this endpoint).
#[utoipa::path(
    put,
    path = "/users/{id}/role",
    params(("id" = i32, Path, description = "User ID")),
    request_body = UpdateRoleRequest,
    responses(
        (status = 200, description = "Role updated", body = UserResponse),
        (status = 400, description = "Unknown role"),
        (status = 403, description = "Protected target or not an admin"),
        (status = 404, description = "Unknown or protected user")
    )
)]
pub async fn update_user_role(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(payload): Json<UpdateRoleRequest>,
) -> Result<Json<UserResponse>, ApiError> {
    auth::ensure_elevated(&auth)?;
    if id == auth.id {
        return Err(ApiError::Forbidden(
            "You cannot change your own role".to_string(),
        ));
    }

    let role = state
        .repo
        .get_role(payload.role_id)
        .await?
        .ok_or_else(|| ApiError::InvalidInput("Unknown role".to_string()))?;
    if role.role_name == RoleName::Superadmin.as_str() {
        return Err(ApiError::Forbidden(
            "The superadmin role cannot be assigned".to_string(),
        ));
    }

    match state.repo.update_user_role(id, payload.role_id).await? {
        Some(user) => Ok(Json(UserResponse {
            message: "Role updated".to_string(),
            user,
        })),
        None => Err(ApiError::NotFound("User not found".to_string())),
    }
}

/// update_user_status
///
/// [Admin Route] Activates or deactivates an account. A deactivated account
/// fails login with 403 until toggled back. Self-modification is rejected.
#[utoipa::path(
    put,
    path = "/users/{id}/status",
    params(("id" = i32, Path, description = "User ID")),
    request_body = UpdateStatusRequest,
    responses(
        (status = 200, description = "Status updated", body = UserResponse),
        (status = 403, description = "Self-modification or not an admin"),
        (status = 404, description = "Unknown or protected user")
    )
)]
pub async fn update_user_status(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(payload): Json<UpdateStatusRequest>,
) -> Result<Json<UserResponse>, ApiError> {
    auth::ensure_elevated(&auth)?;
    if id == auth.id {
        return Err(ApiError::Forbidden(
            "You cannot change your own status".to_string(),
        ));
    }

    match state.repo.update_user_status(id, payload.isactive).await? {
        Some(user) => Ok(Json(UserResponse {
            message: "Status updated".to_string(),
            user,
        })),
        None => Err(ApiError::NotFound("User not found".to_string())),
    }
}

// --- Permission Administration Handlers ---

/// get_roles
///
/// [Admin Route] The assignable role catalog, superadmin excluded.
#[utoipa::path(
    get,
    path = "/roles",
    responses(
        (status = 200, description = "Roles", body = [Role]),
        (status = 403, description = "Not an admin")
    )
)]
pub async fn get_roles(
    auth: AuthUser,
    State(state): State<AppState>,
) -> Result<Json<Vec<Role>>, ApiError> {
    auth::ensure_elevated(&auth)?;
    Ok(Json(state.repo.list_roles().await?))
}

/// get_permissions
///
/// [Admin Route] The full permission catalog.
#[utoipa::path(
    get,
    path = "/permissions",
    responses(
        (status = 200, description = "Permissions", body = [Permission]),
        (status = 403, description = "Not an admin")
    )
)]
pub async fn get_permissions(
    auth: AuthUser,
    State(state): State<AppState>,
) -> Result<Json<Vec<Permission>>, ApiError> {
    auth::ensure_elevated(&auth)?;
    Ok(Json(state.repo.list_permissions().await?))
}

/// Resolves a role for the permission-administration endpoints, rejecting
/// unknown ids and the superadmin tier (whose permission set is never exposed
/// or editable).
async fn resolve_managed_role(state: &AppState, role_id: i32) -> Result<Role, ApiError> {
    let role = state
        .repo
        .get_role(role_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Role not found".to_string()))?;
    if role.role_name == RoleName::Superadmin.as_str() {
        return Err(ApiError::Forbidden(
            "Superadmin permissions cannot be viewed or changed".to_string(),
        ));
    }
    Ok(role)
}

/// get_role_permissions
///
/// [Admin Route] The permissions currently associated with a role.
#[utoipa::path(
    get,
    path = "/role-permissions/{role_id}",
    params(("role_id" = i32, Path, description = "Role ID")),
    responses(
        (status = 200, description = "Role permissions", body = [Permission]),
        (status = 403, description = "Superadmin or not an admin"),
        (status = 404, description = "Unknown role")
    )
)]
pub async fn get_role_permissions(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(role_id): Path<i32>,
) -> Result<Json<Vec<Permission>>, ApiError> {
    auth::ensure_elevated(&auth)?;
    let role = resolve_managed_role(&state, role_id).await?;
    Ok(Json(state.repo.get_role_permissions(role.role_id).await?))
}

/// update_role_permissions
///
/// [Admin Route] Atomically replaces a role's permission set. The repository
/// wraps the delete-then-insert in one transaction, so a failure (e.g. an
/// unknown permission id) leaves the previous set untouched and a concurrent
/// reader never observes the role stripped bare mid-update.
#[utoipa::path(
    put,
    path = "/role-permissions/{role_id}",
    params(("role_id" = i32, Path, description = "Role ID")),
    request_body = RolePermissionsRequest,
    responses(
        (status = 200, description = "Replaced", body = MessageResponse),
        (status = 400, description = "Unknown permission id"),
        (status = 403, description = "Superadmin or not an admin"),
        (status = 404, description = "Unknown role")
    )
)]
pub async fn update_role_permissions(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(role_id): Path<i32>,
    Json(payload): Json<RolePermissionsRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    auth::ensure_elevated(&auth)?;
    let role = resolve_managed_role(&state, role_id).await?;

    state
        .repo
        .replace_role_permissions(role.role_id, &payload.permission_ids)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db) if db.is_foreign_key_violation() => {
                ApiError::InvalidInput("Unknown permission id".to_string())
            }
            other => ApiError::from(other),
        })?;

    Ok(Json(MessageResponse {
        message: "Role permissions updated successfully".to_string(),
    }))
}

// --- Export / Notify Handlers ---

/// download_todo_pdf
///
/// [Authenticated Route] Streams a PDF rendering of a todo as an attachment
/// download. Visibility follows the ownership-or-elevated rule.
#[utoipa::path(
    get,
    path = "/todo-action/{id}",
    params(("id" = i32, Path, description = "Todo ID")),
    responses(
        (status = 200, description = "PDF document", content_type = "application/pdf"),
        (status = 404, description = "Not found or no permission")
    )
)]
pub async fn download_todo_pdf(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Response, ApiError> {
    let todo = state
        .repo
        .get_todo(id)
        .await?
        .filter(|todo| auth.can_act_on(todo.created_by))
        .ok_or_else(|| ApiError::NotFound("Todo not found".to_string()))?;

    let bytes = render_todo_pdf(&todo)?;

    let headers = [
        (header::CONTENT_TYPE, "application/pdf".to_string()),
        (
            header::CONTENT_DISPOSITION,
            format!("attachment; filename={}", todo_pdf_filename(id)),
        ),
    ];

    Ok((headers, bytes).into_response())
}

/// send_email
///
/// [Authenticated Route] Renders a todo's PDF and dispatches it by email with
/// a caller-supplied subject and message body. All fields are required; the
/// todo must be visible to the caller.
#[utoipa::path(
    post,
    path = "/send-email",
    request_body = SendEmailRequest,
    responses(
        (status = 200, description = "Dispatched", body = SendEmailResponse),
        (status = 400, description = "Missing fields"),
        (status = 404, description = "Not found or no permission"),
        (status = 500, description = "Mail transport failure")
    )
)]
pub async fn send_email(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(payload): Json<SendEmailRequest>,
) -> Result<Json<SendEmailResponse>, ApiError> {
    if payload.to.trim().is_empty()
        || payload.subject.trim().is_empty()
        || payload.message.trim().is_empty()
        || payload.todo_id <= 0
    {
        return Err(ApiError::InvalidInput("Missing fields".to_string()));
    }

    let todo = state
        .repo
        .get_todo(payload.todo_id)
        .await?
        .filter(|todo| auth.can_act_on(todo.created_by))
        .ok_or_else(|| ApiError::NotFound("Todo not found".to_string()))?;

    let pdf = render_todo_pdf(&todo)?;
    let filename = todo_pdf_filename(todo.todo_id);

    state
        .mailer
        .send_todo_pdf(
            payload.to.trim(),
            payload.subject.trim(),
            &payload.message,
            &filename,
            pdf,
        )
        .await
        .map_err(ApiError::Mail)?;

    Ok(Json(SendEmailResponse {
        success: true,
        message: "Email sent with PDF!".to_string(),
    }))
}
