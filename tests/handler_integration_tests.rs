use async_trait::async_trait;
use axum::{
    Json,
    extract::{Path, State},
    http::header,
    response::IntoResponse,
};
use axum_extra::extract::cookie::CookieJar;
use chrono::Utc;
use std::sync::Arc;
use todo_portal::{
    AppState,
    auth::AuthUser,
    config::AppConfig,
    error::ApiError,
    handlers,
    mailer::{MailerState, MockMailer},
    models::{
        CredentialRow, LoginRequest, Permission, PublicUser, RegisterRequest, Role, RoleName,
        RolePermissionsRequest, SendEmailRequest, Todo, TodoRequest, TodoWithUsers,
        UpdateRoleRequest,
    },
    repository::Repository,
};
use tokio::test;

// --- MOCK REPOSITORY IMPLEMENTATION ---

// The central control point for handler tests: handlers depend on the
// Repository trait, so tests script its behavior through these fields.
pub struct MockRepoControl {
    // Pre-canned credential row for login/register lookups.
    pub credentials_to_return: Option<CredentialRow>,
    // Role resolution result for register / role administration.
    pub role_to_return: Option<Role>,

    // Pre-canned outputs for listing endpoints.
    pub users_to_return: Vec<PublicUser>,
    pub roles_to_return: Vec<Role>,
    pub permissions_to_return: Vec<Permission>,
    pub todos_to_return: Vec<TodoWithUsers>,
    pub todo_to_return: Option<TodoWithUsers>,

    // Scripted outcomes for mutations.
    pub user_update_result: Option<PublicUser>,
    pub delete_result: bool,
    pub admin_delete_result: bool,
    pub update_result: bool,
    pub admin_update_result: bool,
    pub has_permission: bool,
}

impl Default for MockRepoControl {
    fn default() -> Self {
        MockRepoControl {
            credentials_to_return: None,
            role_to_return: Some(Role {
                role_id: 7,
                role_name: "user".to_string(),
            }),
            users_to_return: vec![],
            roles_to_return: vec![],
            permissions_to_return: vec![],
            todos_to_return: vec![],
            todo_to_return: None,
            user_update_result: None,
            delete_result: false,
            admin_delete_result: false,
            update_result: false,
            admin_update_result: false,
            has_permission: true, // Default to granted for simpler tests
        }
    }
}

#[async_trait]
impl Repository for MockRepoControl {
    async fn find_credentials(&self, _username: &str) -> Result<Option<CredentialRow>, sqlx::Error> {
        Ok(self.credentials_to_return.clone())
    }
    async fn create_user(
        &self,
        username: &str,
        _password_hash: &str,
        role: &Role,
    ) -> Result<PublicUser, sqlx::Error> {
        Ok(PublicUser {
            user_id: 1,
            username: username.to_string(),
            role_id: role.role_id,
            role_name: role.role_name.clone(),
            isactive: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        })
    }
    async fn list_users(&self) -> Result<Vec<PublicUser>, sqlx::Error> {
        Ok(self.users_to_return.clone())
    }
    async fn update_user_role(
        &self,
        _user_id: i32,
        _role_id: i32,
    ) -> Result<Option<PublicUser>, sqlx::Error> {
        Ok(self.user_update_result.clone())
    }
    async fn update_user_status(
        &self,
        _user_id: i32,
        _isactive: bool,
    ) -> Result<Option<PublicUser>, sqlx::Error> {
        Ok(self.user_update_result.clone())
    }
    async fn delete_user(&self, _user_id: i32) -> Result<bool, sqlx::Error> {
        Ok(self.delete_result)
    }

    async fn get_role(&self, _role_id: i32) -> Result<Option<Role>, sqlx::Error> {
        Ok(self.role_to_return.clone())
    }
    async fn get_role_by_name(&self, _name: &str) -> Result<Option<Role>, sqlx::Error> {
        Ok(self.role_to_return.clone())
    }
    async fn list_roles(&self) -> Result<Vec<Role>, sqlx::Error> {
        Ok(self.roles_to_return.clone())
    }
    async fn list_permissions(&self) -> Result<Vec<Permission>, sqlx::Error> {
        Ok(self.permissions_to_return.clone())
    }
    async fn get_role_permissions(&self, _role_id: i32) -> Result<Vec<Permission>, sqlx::Error> {
        Ok(self.permissions_to_return.clone())
    }
    async fn replace_role_permissions(
        &self,
        _role_id: i32,
        _permission_ids: &[i32],
    ) -> Result<(), sqlx::Error> {
        Ok(())
    }
    async fn role_has_permission(
        &self,
        _role: RoleName,
        _permission: &str,
    ) -> Result<bool, sqlx::Error> {
        Ok(self.has_permission)
    }

    async fn create_todo(
        &self,
        description: &str,
        amount: f64,
        owner_id: i32,
    ) -> Result<Todo, sqlx::Error> {
        // Echo the inputs back so tests can verify handler extraction.
        Ok(Todo {
            todo_id: 1,
            description: description.to_string(),
            amount,
            created_by: owner_id,
            updated_by: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        })
    }
    async fn list_todos(&self) -> Result<Vec<TodoWithUsers>, sqlx::Error> {
        Ok(self.todos_to_return.clone())
    }
    async fn list_todos_for(&self, owner_id: i32) -> Result<Vec<TodoWithUsers>, sqlx::Error> {
        Ok(self
            .todos_to_return
            .clone()
            .into_iter()
            .filter(|t| t.created_by == owner_id)
            .collect())
    }
    async fn get_todo(&self, _todo_id: i32) -> Result<Option<TodoWithUsers>, sqlx::Error> {
        Ok(self.todo_to_return.clone())
    }
    async fn update_todo(
        &self,
        _todo_id: i32,
        _description: &str,
        _amount: f64,
        _caller_id: i32,
    ) -> Result<bool, sqlx::Error> {
        Ok(self.update_result)
    }
    async fn update_todo_admin(
        &self,
        _todo_id: i32,
        _description: &str,
        _amount: f64,
        _caller_id: i32,
    ) -> Result<bool, sqlx::Error> {
        Ok(self.admin_update_result)
    }
    async fn delete_todo(&self, _todo_id: i32, _caller_id: i32) -> Result<bool, sqlx::Error> {
        Ok(self.delete_result)
    }
    async fn delete_todo_admin(&self, _todo_id: i32) -> Result<bool, sqlx::Error> {
        Ok(self.admin_delete_result)
    }
}

// --- TEST UTILITIES ---

const ALICE_ID: i32 = 123;
const ROOT_ID: i32 = 456;

// Creates an AppState using mock components.
fn create_test_state(repo_control: MockRepoControl, mailer: MockMailer) -> AppState {
    AppState {
        repo: Arc::new(repo_control),
        mailer: Arc::new(mailer),
        config: AppConfig::default(),
    }
}

fn superadmin_user() -> AuthUser {
    AuthUser {
        id: ROOT_ID,
        username: "root".to_string(),
        role: RoleName::Superadmin,
    }
}

fn regular_user() -> AuthUser {
    AuthUser {
        id: ALICE_ID,
        username: "alice".to_string(),
        role: RoleName::User,
    }
}

fn todo_owned_by(todo_id: i32, owner: i32) -> TodoWithUsers {
    TodoWithUsers {
        todo_id,
        description: "Buy milk".to_string(),
        amount: 5.0,
        created_by: owner,
        updated_by: None,
        created_by_name: Some("alice".to_string()),
        updated_by_name: None,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

fn credentials_for(username: &str, password: &str, isactive: bool) -> CredentialRow {
    CredentialRow {
        user_id: ALICE_ID,
        username: username.to_string(),
        password: bcrypt::hash(password, 4).unwrap(), // low cost keeps tests fast
        role_id: 7,
        role_name: "user".to_string(),
        isactive,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

// --- AUTH HANDLER TESTS ---

#[test]
async fn test_register_rejects_whitespace_username() {
    let state = create_test_state(MockRepoControl::default(), MockMailer::new());

    let result = handlers::register(
        State(state),
        Json(RegisterRequest {
            username: "al ice".to_string(),
            password: "pw123".to_string(),
            role: None,
        }),
    )
    .await;

    assert!(matches!(result, Err(ApiError::InvalidInput(_))));
}

#[test]
async fn test_register_conflict_on_existing_username() {
    let state = create_test_state(
        MockRepoControl {
            credentials_to_return: Some(credentials_for("alice", "pw123", true)),
            ..MockRepoControl::default()
        },
        MockMailer::new(),
    );

    let result = handlers::register(
        State(state),
        Json(RegisterRequest {
            username: "alice".to_string(),
            password: "pw123".to_string(),
            role: None,
        }),
    )
    .await;

    assert!(matches!(result, Err(ApiError::Conflict)));
}

#[test]
async fn test_register_defaults_to_user_role() {
    let state = create_test_state(MockRepoControl::default(), MockMailer::new());

    let result = handlers::register(
        State(state),
        Json(RegisterRequest {
            username: "alice".to_string(),
            password: "pw123".to_string(),
            role: None,
        }),
    )
    .await;

    let Json(user) = result.unwrap();
    assert_eq!(user.username, "alice");
    assert_eq!(user.role_name, "user");
}

#[test]
async fn test_register_rejects_superadmin_role() {
    let state = create_test_state(MockRepoControl::default(), MockMailer::new());

    let result = handlers::register(
        State(state),
        Json(RegisterRequest {
            username: "mallory".to_string(),
            password: "pw123".to_string(),
            role: Some("superadmin".to_string()),
        }),
    )
    .await;

    assert!(matches!(result, Err(ApiError::Forbidden(_))));
}

#[test]
async fn test_login_sets_session_cookie() {
    let state = create_test_state(
        MockRepoControl {
            credentials_to_return: Some(credentials_for("alice", "pw123", true)),
            ..MockRepoControl::default()
        },
        MockMailer::new(),
    );

    let result = handlers::login(
        State(state),
        CookieJar::default(),
        Json(LoginRequest {
            username: "alice".to_string(),
            password: "pw123".to_string(),
        }),
    )
    .await;

    let (jar, Json(body)) = result.unwrap();
    assert!(jar.get("token").is_some(), "login must set the token cookie");
    assert_eq!(body.message, "Logged in");
    assert_eq!(body.user.username, "alice");
}

#[test]
async fn test_login_rejects_wrong_password() {
    let state = create_test_state(
        MockRepoControl {
            credentials_to_return: Some(credentials_for("alice", "pw123", true)),
            ..MockRepoControl::default()
        },
        MockMailer::new(),
    );

    let result = handlers::login(
        State(state),
        CookieJar::default(),
        Json(LoginRequest {
            username: "alice".to_string(),
            password: "wrong".to_string(),
        }),
    )
    .await;

    assert!(matches!(result, Err(ApiError::InvalidCredentials)));
}

#[test]
async fn test_login_rejects_unknown_username() {
    let state = create_test_state(MockRepoControl::default(), MockMailer::new());

    let result = handlers::login(
        State(state),
        CookieJar::default(),
        Json(LoginRequest {
            username: "nobody".to_string(),
            password: "pw123".to_string(),
        }),
    )
    .await;

    // Same rejection as a wrong password: existence is not leaked.
    assert!(matches!(result, Err(ApiError::InvalidCredentials)));
}

#[test]
async fn test_login_rejects_inactive_account() {
    let state = create_test_state(
        MockRepoControl {
            credentials_to_return: Some(credentials_for("alice", "pw123", false)),
            ..MockRepoControl::default()
        },
        MockMailer::new(),
    );

    let result = handlers::login(
        State(state),
        CookieJar::default(),
        Json(LoginRequest {
            username: "alice".to_string(),
            password: "pw123".to_string(),
        }),
    )
    .await;

    assert!(matches!(result, Err(ApiError::Forbidden(_))));
}

#[test]
async fn test_logout_is_idempotent() {
    // No session at all: logout still succeeds.
    let (_jar, Json(body)) = handlers::logout(CookieJar::default()).await;
    assert_eq!(body.message, "Logged out");

    // And again.
    let (_jar, Json(body)) = handlers::logout(CookieJar::default()).await;
    assert_eq!(body.message, "Logged out");
}

// --- TODO HANDLER TESTS ---

#[test]
async fn test_create_todo_rejects_blank_description() {
    let state = create_test_state(MockRepoControl::default(), MockMailer::new());

    let result = handlers::create_todo(
        regular_user(),
        State(state),
        Json(TodoRequest {
            description: "   ".to_string(),
            amount: 5.0,
        }),
    )
    .await;

    match result {
        Err(ApiError::InvalidInput(msg)) => assert_eq!(msg, "Description cannot be empty"),
        other => panic!("expected InvalidInput, got {other:?}"),
    }
}

#[test]
async fn test_create_todo_stamps_caller_as_owner() {
    let state = create_test_state(MockRepoControl::default(), MockMailer::new());

    let result = handlers::create_todo(
        regular_user(),
        State(state),
        Json(TodoRequest {
            description: "  Buy milk  ".to_string(),
            amount: 5.0,
        }),
    )
    .await;

    let Json(todo) = result.unwrap();
    assert_eq!(todo.created_by, ALICE_ID);
    // The description is trimmed before storage.
    assert_eq!(todo.description, "Buy milk");
}

#[test]
async fn test_list_todos_scopes_to_owner() {
    let state = create_test_state(
        MockRepoControl {
            todos_to_return: vec![todo_owned_by(1, ALICE_ID), todo_owned_by(2, ROOT_ID)],
            ..MockRepoControl::default()
        },
        MockMailer::new(),
    );

    let Json(todos) = handlers::list_todos(regular_user(), State(state)).await.unwrap();

    assert_eq!(todos.len(), 1);
    assert_eq!(todos[0].created_by, ALICE_ID);
}

#[test]
async fn test_list_todos_elevated_sees_all() {
    let state = create_test_state(
        MockRepoControl {
            todos_to_return: vec![todo_owned_by(1, ALICE_ID), todo_owned_by(2, ROOT_ID)],
            ..MockRepoControl::default()
        },
        MockMailer::new(),
    );

    let Json(todos) = handlers::list_todos(superadmin_user(), State(state)).await.unwrap();

    assert_eq!(todos.len(), 2);
}

#[test]
async fn test_get_todo_details_hides_foreign_rows() {
    let state = create_test_state(
        MockRepoControl {
            todo_to_return: Some(todo_owned_by(1, 999)),
            ..MockRepoControl::default()
        },
        MockMailer::new(),
    );

    let result = handlers::get_todo_details(regular_user(), State(state), Path(1)).await;

    // A visible 404, not a 403: existence is not leaked.
    assert!(matches!(result, Err(ApiError::NotFound(_))));
}

#[test]
async fn test_get_todo_details_elevated_sees_any_row() {
    let state = create_test_state(
        MockRepoControl {
            todo_to_return: Some(todo_owned_by(1, 999)),
            ..MockRepoControl::default()
        },
        MockMailer::new(),
    );

    let result = handlers::get_todo_details(superadmin_user(), State(state), Path(1)).await;

    assert!(result.is_ok());
}

#[test]
async fn test_update_todo_not_owner_is_not_found() {
    let state = create_test_state(
        MockRepoControl {
            update_result: false,
            ..MockRepoControl::default()
        },
        MockMailer::new(),
    );

    let result = handlers::update_todo(
        regular_user(),
        State(state),
        Path(1),
        Json(TodoRequest {
            description: "Changed".to_string(),
            amount: 9.0,
        }),
    )
    .await;

    match result {
        Err(ApiError::NotFound(msg)) => assert_eq!(msg, "Todo not found or no permission"),
        other => panic!("expected NotFound, got {other:?}"),
    }
}

#[test]
async fn test_update_todo_admin_override() {
    let state = create_test_state(
        MockRepoControl {
            admin_update_result: true,
            update_result: false,
            ..MockRepoControl::default()
        },
        MockMailer::new(),
    );

    let result = handlers::update_todo(
        superadmin_user(),
        State(state),
        Path(1),
        Json(TodoRequest {
            description: "Changed".to_string(),
            amount: 9.0,
        }),
    )
    .await;

    // The handler took the admin path despite the owner path being scripted to fail.
    assert!(result.is_ok());
}

#[test]
async fn test_delete_todo_requires_permission() {
    let state = create_test_state(
        MockRepoControl {
            has_permission: false,
            delete_result: true,
            ..MockRepoControl::default()
        },
        MockMailer::new(),
    );

    let result = handlers::delete_todo(regular_user(), State(state), Path(1)).await;

    assert!(matches!(result, Err(ApiError::Forbidden(_))));
}

#[test]
async fn test_delete_todo_owner_success() {
    let state = create_test_state(
        MockRepoControl {
            delete_result: true,
            ..MockRepoControl::default()
        },
        MockMailer::new(),
    );

    let result = handlers::delete_todo(regular_user(), State(state), Path(1)).await;

    let Json(body) = result.unwrap();
    assert_eq!(body.message, "Todo deleted");
}

#[test]
async fn test_delete_todo_elevated_ignores_ownership() {
    let state = create_test_state(
        MockRepoControl {
            admin_delete_result: true,
            delete_result: false,
            ..MockRepoControl::default()
        },
        MockMailer::new(),
    );

    let result = handlers::delete_todo(superadmin_user(), State(state), Path(1)).await;

    assert!(result.is_ok());
}

// --- ADMIN HANDLER TESTS ---

#[test]
async fn test_get_users_forbidden_for_regular_users() {
    let state = create_test_state(MockRepoControl::default(), MockMailer::new());

    let result = handlers::get_users(regular_user(), State(state)).await;

    assert!(matches!(result, Err(ApiError::Forbidden(_))));
}

#[test]
async fn test_delete_user_rejects_self_deletion() {
    let state = create_test_state(
        MockRepoControl {
            delete_result: true,
            ..MockRepoControl::default()
        },
        MockMailer::new(),
    );

    // Target id equals the caller's own id.
    let result = handlers::delete_user(superadmin_user(), State(state), Path(ROOT_ID)).await;

    assert!(matches!(result, Err(ApiError::Forbidden(_))));
}

#[test]
async fn test_delete_user_success() {
    let state = create_test_state(
        MockRepoControl {
            delete_result: true,
            ..MockRepoControl::default()
        },
        MockMailer::new(),
    );

    let result = handlers::delete_user(superadmin_user(), State(state), Path(ALICE_ID)).await;

    let Json(body) = result.unwrap();
    assert_eq!(body.message, "User deleted successfully");
}

#[test]
async fn test_update_user_role_cannot_assign_superadmin() {
    let state = create_test_state(
        MockRepoControl {
            role_to_return: Some(Role {
                role_id: 1,
                role_name: "superadmin".to_string(),
            }),
            ..MockRepoControl::default()
        },
        MockMailer::new(),
    );

    let result = handlers::update_user_role(
        superadmin_user(),
        State(state),
        Path(ALICE_ID),
        Json(UpdateRoleRequest { role_id: 1 }),
    )
    .await;

    assert!(matches!(result, Err(ApiError::Forbidden(_))));
}

#[test]
async fn test_update_user_role_success() {
    let updated = PublicUser {
        user_id: ALICE_ID,
        username: "alice".to_string(),
        role_id: 4,
        role_name: "editor".to_string(),
        isactive: true,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    };
    let state = create_test_state(
        MockRepoControl {
            role_to_return: Some(Role {
                role_id: 4,
                role_name: "editor".to_string(),
            }),
            user_update_result: Some(updated.clone()),
            ..MockRepoControl::default()
        },
        MockMailer::new(),
    );

    let result = handlers::update_user_role(
        superadmin_user(),
        State(state),
        Path(ALICE_ID),
        Json(UpdateRoleRequest { role_id: 4 }),
    )
    .await;

    let Json(body) = result.unwrap();
    assert_eq!(body.message, "Role updated");
    assert_eq!(body.user.role_name, "editor");
}

#[test]
async fn test_role_permissions_superadmin_guard() {
    let state = create_test_state(
        MockRepoControl {
            role_to_return: Some(Role {
                role_id: 1,
                role_name: "superadmin".to_string(),
            }),
            ..MockRepoControl::default()
        },
        MockMailer::new(),
    );

    let result = handlers::update_role_permissions(
        superadmin_user(),
        State(state),
        Path(1),
        Json(RolePermissionsRequest {
            permission_ids: vec![1, 2],
        }),
    )
    .await;

    assert!(matches!(result, Err(ApiError::Forbidden(_))));
}

#[test]
async fn test_update_role_permissions_success() {
    let state = create_test_state(
        MockRepoControl {
            role_to_return: Some(Role {
                role_id: 3,
                role_name: "manager".to_string(),
            }),
            ..MockRepoControl::default()
        },
        MockMailer::new(),
    );

    let result = handlers::update_role_permissions(
        superadmin_user(),
        State(state),
        Path(3),
        Json(RolePermissionsRequest {
            permission_ids: vec![1, 2],
        }),
    )
    .await;

    let Json(body) = result.unwrap();
    assert_eq!(body.message, "Role permissions updated successfully");
}

// --- EXPORT / NOTIFY HANDLER TESTS ---

#[test]
async fn test_download_todo_pdf_sets_attachment_headers() {
    let state = create_test_state(
        MockRepoControl {
            todo_to_return: Some(todo_owned_by(7, ALICE_ID)),
            ..MockRepoControl::default()
        },
        MockMailer::new(),
    );

    let response = handlers::download_todo_pdf(regular_user(), State(state), Path(7))
        .await
        .unwrap()
        .into_response();

    let (parts, body) = response.into_parts();
    assert_eq!(
        parts.headers.get(header::CONTENT_TYPE).unwrap(),
        "application/pdf"
    );
    let disposition = parts
        .headers
        .get(header::CONTENT_DISPOSITION)
        .unwrap()
        .to_str()
        .unwrap();
    assert!(disposition.contains("attachment"));
    assert!(disposition.contains("todo_7.pdf"));

    let bytes = axum::body::to_bytes(body, usize::MAX).await.unwrap();
    assert!(bytes.starts_with(b"%PDF"), "body must be a PDF document");
}

#[test]
async fn test_send_email_missing_fields() {
    let state = create_test_state(
        MockRepoControl {
            todo_to_return: Some(todo_owned_by(7, ALICE_ID)),
            ..MockRepoControl::default()
        },
        MockMailer::new(),
    );

    let result = handlers::send_email(
        regular_user(),
        State(state),
        Json(SendEmailRequest {
            to: "".to_string(),
            subject: "Todo".to_string(),
            message: "See attached".to_string(),
            todo_id: 7,
        }),
    )
    .await;

    match result {
        Err(ApiError::InvalidInput(msg)) => assert_eq!(msg, "Missing fields"),
        other => panic!("expected InvalidInput, got {other:?}"),
    }
}

#[test]
async fn test_send_email_dispatches_pdf_attachment() {
    let mailer = Arc::new(MockMailer::new());
    let state = AppState {
        repo: Arc::new(MockRepoControl {
            todo_to_return: Some(todo_owned_by(7, ALICE_ID)),
            ..MockRepoControl::default()
        }),
        mailer: mailer.clone() as MailerState,
        config: AppConfig::default(),
    };

    let result = handlers::send_email(
        regular_user(),
        State(state),
        Json(SendEmailRequest {
            to: "bob@example.com".to_string(),
            subject: "Todo".to_string(),
            message: "See attached".to_string(),
            todo_id: 7,
        }),
    )
    .await;

    let Json(body) = result.unwrap();
    assert!(body.success);

    let sent = mailer.sent.lock().unwrap();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].to, "bob@example.com");
    assert_eq!(sent[0].filename, "todo_7.pdf");
    assert!(sent[0].pdf_len > 0);
}

#[test]
async fn test_send_email_transport_failure_is_server_error() {
    let state = create_test_state(
        MockRepoControl {
            todo_to_return: Some(todo_owned_by(7, ALICE_ID)),
            ..MockRepoControl::default()
        },
        MockMailer::new_failing(),
    );

    let result = handlers::send_email(
        regular_user(),
        State(state),
        Json(SendEmailRequest {
            to: "bob@example.com".to_string(),
            subject: "Todo".to_string(),
            message: "See attached".to_string(),
            todo_id: 7,
        }),
    )
    .await;

    assert!(matches!(result, Err(ApiError::Mail(_))));
}

#[test]
async fn test_send_email_foreign_todo_is_not_found() {
    let state = create_test_state(
        MockRepoControl {
            todo_to_return: Some(todo_owned_by(7, 999)),
            ..MockRepoControl::default()
        },
        MockMailer::new(),
    );

    let result = handlers::send_email(
        regular_user(),
        State(state),
        Json(SendEmailRequest {
            to: "bob@example.com".to_string(),
            subject: "Todo".to_string(),
            message: "See attached".to_string(),
            todo_id: 7,
        }),
    )
    .await;

    assert!(matches!(result, Err(ApiError::NotFound(_))));
}
