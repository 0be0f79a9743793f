use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;
use std::str::FromStr;
use ts_rs::TS;
use utoipa::ToSchema;

// --- Role Enumeration ---

/// RoleName
///
/// The closed set of role tiers. Roles live in the `roles` table with stable
/// numeric identifiers, but in code they are always this enumeration — role
/// strings are parsed once at the boundary (login, token decode) and never
/// compared ad hoc afterwards.
///
/// `Superadmin` is the only elevated tier: it bypasses ownership checks and is
/// the tier the administration endpoints require. It is also deliberately
/// invisible to those same endpoints — superadmin users and the superadmin
/// role never appear in listings and can never be assigned or edited there.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS, ToSchema)]
#[serde(rename_all = "lowercase")]
#[ts(export)]
pub enum RoleName {
    Superadmin,
    Admin,
    Manager,
    Editor,
    Viewer,
    Guest,
    #[default]
    User,
}

impl RoleName {
    /// The lowercase name as stored in `roles.role_name`.
    pub fn as_str(&self) -> &'static str {
        match self {
            RoleName::Superadmin => "superadmin",
            RoleName::Admin => "admin",
            RoleName::Manager => "manager",
            RoleName::Editor => "editor",
            RoleName::Viewer => "viewer",
            RoleName::Guest => "guest",
            RoleName::User => "user",
        }
    }

    /// Whether this tier bypasses ownership checks and may administer users.
    pub fn is_elevated(&self) -> bool {
        matches!(self, RoleName::Superadmin)
    }
}

impl fmt::Display for RoleName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RoleName {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "superadmin" => Ok(RoleName::Superadmin),
            "admin" => Ok(RoleName::Admin),
            "manager" => Ok(RoleName::Manager),
            "editor" => Ok(RoleName::Editor),
            "viewer" => Ok(RoleName::Viewer),
            "guest" => Ok(RoleName::Guest),
            "user" => Ok(RoleName::User),
            _ => Err(()),
        }
    }
}

// --- Core Application Schemas (Mapped to Database) ---

/// Role
///
/// A row of the `roles` table.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, FromRow, Default)]
#[ts(export)]
pub struct Role {
    pub role_id: i32,
    pub role_name: String,
}

/// Permission
///
/// A row of the `permissions` table. Permission names are unique, e.g.
/// "delete-todo".
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, FromRow, Default)]
#[ts(export)]
pub struct Permission {
    pub permission_id: i32,
    pub permission_name: String,
}

/// CredentialRow
///
/// Internal row used during login: the full user record including the stored
/// bcrypt hash and the joined role name. Never serialized to a response —
/// callers convert to [`PublicUser`] via [`CredentialRow::public`].
#[derive(Debug, Clone, FromRow)]
pub struct CredentialRow {
    pub user_id: i32,
    pub username: String,
    pub password: String,
    pub role_id: i32,
    pub role_name: String,
    pub isactive: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl CredentialRow {
    /// Strips the hash, leaving only fields safe to return to a client.
    pub fn public(&self) -> PublicUser {
        PublicUser {
            user_id: self.user_id,
            username: self.username.clone(),
            role_id: self.role_id,
            role_name: self.role_name.clone(),
            isactive: self.isactive,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

/// PublicUser
///
/// The user record as exposed by the API: registration and login responses and
/// the administrative user listing. The password hash is structurally absent.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, FromRow, Default)]
#[ts(export)]
pub struct PublicUser {
    pub user_id: i32,
    pub username: String,
    pub role_id: i32,
    // Resolved via join with `roles`.
    pub role_name: String,
    pub isactive: bool,
    #[ts(type = "string")]
    pub created_at: DateTime<Utc>,
    #[ts(type = "string")]
    pub updated_at: DateTime<Utc>,
}

/// Todo
///
/// A bare row of the `todo` table, as returned by the create endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, FromRow, Default)]
#[ts(export)]
pub struct Todo {
    pub todo_id: i32,
    pub description: String,
    pub amount: f64,
    // FK to users.user_id (owner).
    pub created_by: i32,
    // Most recent editor, if any.
    pub updated_by: Option<i32>,
    #[ts(type = "string")]
    pub created_at: DateTime<Utc>,
    #[ts(type = "string")]
    pub updated_at: DateTime<Utc>,
}

/// TodoWithUsers
///
/// A todo row enriched with the creator/updater usernames (LEFT JOINs against
/// `users`). This is the shape the listing, detail, and PDF endpoints use.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, FromRow, Default)]
#[ts(export)]
pub struct TodoWithUsers {
    pub todo_id: i32,
    pub description: String,
    pub amount: f64,
    pub created_by: i32,
    pub updated_by: Option<i32>,
    // Usernames resolved via join; None when the user has since been removed.
    pub created_by_name: Option<String>,
    pub updated_by_name: Option<String>,
    #[ts(type = "string")]
    pub created_at: DateTime<Utc>,
    #[ts(type = "string")]
    pub updated_at: DateTime<Utc>,
}

// --- Request Payloads (Input Schemas) ---

/// RegisterRequest
///
/// Input payload for POST /auth/register. The optional role is a role *name*
/// ("admin", "viewer", ...); absent means the default non-privileged "user"
/// tier. "superadmin" is rejected.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct RegisterRequest {
    pub username: String,
    pub password: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
}

/// LoginRequest
///
/// Input payload for POST /auth/login.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// TodoRequest
///
/// Input payload for creating or updating a todo. The caller's identity comes
/// from the session token, never from the body.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct TodoRequest {
    pub description: String,
    pub amount: f64,
}

/// UpdateRoleRequest
///
/// Input payload for PUT /users/{id}/role.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct UpdateRoleRequest {
    pub role_id: i32,
}

/// UpdateStatusRequest
///
/// Input payload for PUT /users/{id}/status.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct UpdateStatusRequest {
    pub isactive: bool,
}

/// RolePermissionsRequest
///
/// Input payload for PUT /role-permissions/{role_id}: the complete replacement
/// permission set for the role.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct RolePermissionsRequest {
    #[serde(rename = "permissionIds")]
    pub permission_ids: Vec<i32>,
}

/// SendEmailRequest
///
/// Input payload for POST /send-email: recipient, subject, body text and the
/// todo whose PDF rendering is attached.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct SendEmailRequest {
    pub to: String,
    pub subject: String,
    pub message: String,
    pub todo_id: i32,
}

// --- Response Schemas (Output) ---

/// MeResponse
///
/// Output of GET /auth/me: the identity embedded in the session token.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct MeResponse {
    pub user_id: i32,
    pub username: String,
    pub role: RoleName,
}

/// LoginResponse
///
/// Output of POST /auth/login (the session cookie travels separately).
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct LoginResponse {
    pub message: String,
    pub user: PublicUser,
}

/// MessageResponse
///
/// Generic `{message}` acknowledgement used by update/delete endpoints.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct MessageResponse {
    pub message: String,
}

/// UserResponse
///
/// `{message, user}` shape returned by the user administration updates.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct UserResponse {
    pub message: String,
    pub user: PublicUser,
}

/// SendEmailResponse
///
/// Output of POST /send-email.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct SendEmailResponse {
    pub success: bool,
    pub message: String,
}
