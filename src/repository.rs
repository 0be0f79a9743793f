use crate::models::{CredentialRow, Permission, PublicUser, Role, RoleName, Todo, TodoWithUsers};
use async_trait::async_trait;
use sqlx::PgPool;
use std::sync::Arc;

/// Repository Trait
///
/// The abstract contract for all persistence operations, letting handlers talk
/// to the data layer without knowing the concrete implementation (Postgres in
/// production, mocks in tests).
///
/// **Send + Sync + async_trait** are required to make the trait object
/// (`Arc<dyn Repository>`) safely shareable across Axum's asynchronous task
/// boundaries.
#[async_trait]
pub trait Repository: Send + Sync {
    // --- Users & Credentials ---
    /// Full user row (including the stored hash) by username, for login.
    async fn find_credentials(&self, username: &str) -> Result<Option<CredentialRow>, sqlx::Error>;
    /// Inserts a new user with a pre-hashed password and resolved role.
    async fn create_user(
        &self,
        username: &str,
        password_hash: &str,
        role: &Role,
    ) -> Result<PublicUser, sqlx::Error>;
    /// All users excluding the superadmin tier, role name resolved via join.
    async fn list_users(&self) -> Result<Vec<PublicUser>, sqlx::Error>;
    /// Reassigns a user's role. Superadmin targets are excluded by the query;
    /// zero rows means missing-or-protected.
    async fn update_user_role(
        &self,
        user_id: i32,
        role_id: i32,
    ) -> Result<Option<PublicUser>, sqlx::Error>;
    /// Toggles a user's active flag. Same superadmin exclusion.
    async fn update_user_status(
        &self,
        user_id: i32,
        isactive: bool,
    ) -> Result<Option<PublicUser>, sqlx::Error>;
    /// Deletes a non-superadmin user. The user's todos cascade with the row.
    async fn delete_user(&self, user_id: i32) -> Result<bool, sqlx::Error>;

    // --- Roles & Permissions ---
    async fn get_role(&self, role_id: i32) -> Result<Option<Role>, sqlx::Error>;
    async fn get_role_by_name(&self, name: &str) -> Result<Option<Role>, sqlx::Error>;
    /// Role catalog excluding the superadmin tier.
    async fn list_roles(&self) -> Result<Vec<Role>, sqlx::Error>;
    async fn list_permissions(&self) -> Result<Vec<Permission>, sqlx::Error>;
    async fn get_role_permissions(&self, role_id: i32) -> Result<Vec<Permission>, sqlx::Error>;
    /// Atomic replace of a role's permission set: delete-then-insert inside a
    /// single transaction. A concurrent reader never observes the role with a
    /// partially applied set.
    async fn replace_role_permissions(
        &self,
        role_id: i32,
        permission_ids: &[i32],
    ) -> Result<(), sqlx::Error>;
    /// Whether the role is associated with the named permission.
    async fn role_has_permission(
        &self,
        role: RoleName,
        permission: &str,
    ) -> Result<bool, sqlx::Error>;

    // --- Todos ---
    async fn create_todo(
        &self,
        description: &str,
        amount: f64,
        owner_id: i32,
    ) -> Result<Todo, sqlx::Error>;
    /// Every todo, joined with creator/updater usernames. Elevated callers only.
    async fn list_todos(&self) -> Result<Vec<TodoWithUsers>, sqlx::Error>;
    /// The caller's own todos, same join.
    async fn list_todos_for(&self, owner_id: i32) -> Result<Vec<TodoWithUsers>, sqlx::Error>;
    async fn get_todo(&self, todo_id: i32) -> Result<Option<TodoWithUsers>, sqlx::Error>;
    /// Owner-Only update: matches only rows with `created_by = caller_id`.
    async fn update_todo(
        &self,
        todo_id: i32,
        description: &str,
        amount: f64,
        caller_id: i32,
    ) -> Result<bool, sqlx::Error>;
    /// Admin Override: updates any row, still stamping the caller as editor.
    async fn update_todo_admin(
        &self,
        todo_id: i32,
        description: &str,
        amount: f64,
        caller_id: i32,
    ) -> Result<bool, sqlx::Error>;
    /// Owner-Only delete.
    async fn delete_todo(&self, todo_id: i32, caller_id: i32) -> Result<bool, sqlx::Error>;
    /// Admin Override: delete any row.
    async fn delete_todo_admin(&self, todo_id: i32) -> Result<bool, sqlx::Error>;
}

/// RepositoryState
///
/// The concrete type used to share the persistence layer across the
/// application state.
pub type RepositoryState = Arc<dyn Repository>;

/// PostgresRepository
///
/// The concrete implementation of the `Repository` trait, backed by the
/// PostgreSQL connection pool. Every method is a single parameterized
/// statement except `replace_role_permissions`, which owns the one explicit
/// transaction in the system.
pub struct PostgresRepository {
    pool: PgPool,
}

impl PostgresRepository {
    /// Creates a new repository instance using the initialized connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

// Shared join used by every todo read: resolve creator/updater usernames.
const TODO_SELECT: &str = r#"
    SELECT t.todo_id, t.description, t.amount,
           t.created_by, t.updated_by,
           u1.username AS created_by_name,
           u2.username AS updated_by_name,
           t.created_at, t.updated_at
    FROM todo t
    LEFT JOIN users u1 ON t.created_by = u1.user_id
    LEFT JOIN users u2 ON t.updated_by = u2.user_id
"#;

#[async_trait]
impl Repository for PostgresRepository {
    async fn find_credentials(&self, username: &str) -> Result<Option<CredentialRow>, sqlx::Error> {
        sqlx::query_as::<_, CredentialRow>(
            r#"
            SELECT u.user_id, u.username, u.password, u.role_id, r.role_name,
                   u.isactive, u.created_at, u.updated_at
            FROM users u
            JOIN roles r ON u.role_id = r.role_id
            WHERE u.username = $1
            "#,
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await
    }

    /// create_user
    ///
    /// Inserts the new account with timestamps stamped by the database. The
    /// unique index on `username` is the authority on duplicates — a concurrent
    /// duplicate insert surfaces as a unique violation for the handler to map.
    async fn create_user(
        &self,
        username: &str,
        password_hash: &str,
        role: &Role,
    ) -> Result<PublicUser, sqlx::Error> {
        let row = sqlx::query_as::<_, InsertedUser>(
            r#"
            INSERT INTO users (username, password, role_id, isactive, created_at, updated_at)
            VALUES ($1, $2, $3, TRUE, NOW(), NOW())
            RETURNING user_id, username, role_id, isactive, created_at, updated_at
            "#,
        )
        .bind(username)
        .bind(password_hash)
        .bind(role.role_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(PublicUser {
            user_id: row.user_id,
            username: row.username,
            role_id: row.role_id,
            role_name: role.role_name.clone(),
            isactive: row.isactive,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }

    /// list_users
    ///
    /// The administrative listing. **Never** includes the superadmin tier.
    async fn list_users(&self) -> Result<Vec<PublicUser>, sqlx::Error> {
        sqlx::query_as::<_, PublicUser>(
            r#"
            SELECT u.user_id, u.username, u.role_id, r.role_name,
                   u.isactive, u.created_at, u.updated_at
            FROM users u
            JOIN roles r ON u.role_id = r.role_id
            WHERE r.role_name <> 'superadmin'
            ORDER BY u.user_id ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await
    }

    /// update_user_role
    ///
    /// Uses a CTE so the update and the role-name join come back in one round
    /// trip. The WHERE clause excludes superadmin targets, so zero rows covers
    /// both "no such user" and "protected user" without distinguishing them.
    async fn update_user_role(
        &self,
        user_id: i32,
        role_id: i32,
    ) -> Result<Option<PublicUser>, sqlx::Error> {
        sqlx::query_as::<_, PublicUser>(
            r#"
            WITH updated AS (
                UPDATE users
                SET role_id = $1, updated_at = NOW()
                WHERE user_id = $2
                  AND role_id <> (SELECT role_id FROM roles WHERE role_name = 'superadmin')
                RETURNING user_id, username, role_id, isactive, created_at, updated_at
            )
            SELECT u.user_id, u.username, u.role_id, r.role_name,
                   u.isactive, u.created_at, u.updated_at
            FROM updated u
            JOIN roles r ON u.role_id = r.role_id
            "#,
        )
        .bind(role_id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
    }

    /// update_user_status
    ///
    /// Same shape as `update_user_role` for the active flag.
    async fn update_user_status(
        &self,
        user_id: i32,
        isactive: bool,
    ) -> Result<Option<PublicUser>, sqlx::Error> {
        sqlx::query_as::<_, PublicUser>(
            r#"
            WITH updated AS (
                UPDATE users
                SET isactive = $1, updated_at = NOW()
                WHERE user_id = $2
                  AND role_id <> (SELECT role_id FROM roles WHERE role_name = 'superadmin')
                RETURNING user_id, username, role_id, isactive, created_at, updated_at
            )
            SELECT u.user_id, u.username, u.role_id, r.role_name,
                   u.isactive, u.created_at, u.updated_at
            FROM updated u
            JOIN roles r ON u.role_id = r.role_id
            "#,
        )
        .bind(isactive)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
    }

    async fn delete_user(&self, user_id: i32) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            r#"
            DELETE FROM users
            WHERE user_id = $1
              AND role_id <> (SELECT role_id FROM roles WHERE role_name = 'superadmin')
            "#,
        )
        .bind(user_id)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn get_role(&self, role_id: i32) -> Result<Option<Role>, sqlx::Error> {
        sqlx::query_as::<_, Role>("SELECT role_id, role_name FROM roles WHERE role_id = $1")
            .bind(role_id)
            .fetch_optional(&self.pool)
            .await
    }

    async fn get_role_by_name(&self, name: &str) -> Result<Option<Role>, sqlx::Error> {
        sqlx::query_as::<_, Role>("SELECT role_id, role_name FROM roles WHERE role_name = $1")
            .bind(name)
            .fetch_optional(&self.pool)
            .await
    }

    /// list_roles
    ///
    /// The assignable role catalog. The superadmin tier is not offered.
    async fn list_roles(&self) -> Result<Vec<Role>, sqlx::Error> {
        sqlx::query_as::<_, Role>(
            r#"
            SELECT role_id, role_name
            FROM roles
            WHERE role_name <> 'superadmin'
            ORDER BY role_id ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await
    }

    async fn list_permissions(&self) -> Result<Vec<Permission>, sqlx::Error> {
        sqlx::query_as::<_, Permission>(
            "SELECT permission_id, permission_name FROM permissions ORDER BY permission_id ASC",
        )
        .fetch_all(&self.pool)
        .await
    }

    async fn get_role_permissions(&self, role_id: i32) -> Result<Vec<Permission>, sqlx::Error> {
        sqlx::query_as::<_, Permission>(
            r#"
            SELECT p.permission_id, p.permission_name
            FROM role_permissions rp
            JOIN permissions p ON rp.permission_id = p.permission_id
            WHERE rp.role_id = $1
            ORDER BY p.permission_id ASC
            "#,
        )
        .bind(role_id)
        .fetch_all(&self.pool)
        .await
    }

    /// replace_role_permissions
    ///
    /// Delete-then-insert inside one transaction. On any failure (including an
    /// unknown permission id tripping the FK) the rollback leaves the prior
    /// association set intact; concurrent replaces serialize on the row locks
    /// and the role ends with exactly one submitted set, never empty or mixed.
    async fn replace_role_permissions(
        &self,
        role_id: i32,
        permission_ids: &[i32],
    ) -> Result<(), sqlx::Error> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM role_permissions WHERE role_id = $1")
            .bind(role_id)
            .execute(&mut *tx)
            .await?;

        for permission_id in permission_ids {
            sqlx::query("INSERT INTO role_permissions (role_id, permission_id) VALUES ($1, $2)")
                .bind(role_id)
                .bind(permission_id)
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await
    }

    async fn role_has_permission(
        &self,
        role: RoleName,
        permission: &str,
    ) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar::<_, bool>(
            r#"
            SELECT EXISTS (
                SELECT 1
                FROM role_permissions rp
                JOIN roles r ON rp.role_id = r.role_id
                JOIN permissions p ON rp.permission_id = p.permission_id
                WHERE r.role_name = $1
                  AND p.permission_name = $2
            )
            "#,
        )
        .bind(role.as_str())
        .bind(permission)
        .fetch_one(&self.pool)
        .await
    }

    async fn create_todo(
        &self,
        description: &str,
        amount: f64,
        owner_id: i32,
    ) -> Result<Todo, sqlx::Error> {
        sqlx::query_as::<_, Todo>(
            r#"
            INSERT INTO todo (description, amount, created_by, created_at, updated_at)
            VALUES ($1, $2, $3, NOW(), NOW())
            RETURNING todo_id, description, amount, created_by, updated_by, created_at, updated_at
            "#,
        )
        .bind(description)
        .bind(amount)
        .bind(owner_id)
        .fetch_one(&self.pool)
        .await
    }

    async fn list_todos(&self) -> Result<Vec<TodoWithUsers>, sqlx::Error> {
        let query = format!("{TODO_SELECT} ORDER BY t.updated_at DESC");
        sqlx::query_as::<_, TodoWithUsers>(&query)
            .fetch_all(&self.pool)
            .await
    }

    async fn list_todos_for(&self, owner_id: i32) -> Result<Vec<TodoWithUsers>, sqlx::Error> {
        let query = format!("{TODO_SELECT} WHERE t.created_by = $1 ORDER BY t.updated_at DESC");
        sqlx::query_as::<_, TodoWithUsers>(&query)
            .bind(owner_id)
            .fetch_all(&self.pool)
            .await
    }

    async fn get_todo(&self, todo_id: i32) -> Result<Option<TodoWithUsers>, sqlx::Error> {
        let query = format!("{TODO_SELECT} WHERE t.todo_id = $1");
        sqlx::query_as::<_, TodoWithUsers>(&query)
            .bind(todo_id)
            .fetch_optional(&self.pool)
            .await
    }

    /// update_todo
    ///
    /// The **Owner-Only** path: the ownership predicate lives in the WHERE
    /// clause, so a non-owner caller affects zero rows and learns nothing about
    /// whether the row exists.
    async fn update_todo(
        &self,
        todo_id: i32,
        description: &str,
        amount: f64,
        caller_id: i32,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            r#"
            UPDATE todo
            SET description = $1, amount = $2, updated_by = $3, updated_at = NOW()
            WHERE todo_id = $4 AND created_by = $3
            "#,
        )
        .bind(description)
        .bind(amount)
        .bind(caller_id)
        .bind(todo_id)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// update_todo_admin
    ///
    /// **Admin Override**: updates any row; the elevated caller is still
    /// stamped as `updated_by`.
    async fn update_todo_admin(
        &self,
        todo_id: i32,
        description: &str,
        amount: f64,
        caller_id: i32,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            r#"
            UPDATE todo
            SET description = $1, amount = $2, updated_by = $3, updated_at = NOW()
            WHERE todo_id = $4
            "#,
        )
        .bind(description)
        .bind(amount)
        .bind(caller_id)
        .bind(todo_id)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn delete_todo(&self, todo_id: i32, caller_id: i32) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM todo WHERE todo_id = $1 AND created_by = $2")
            .bind(todo_id)
            .bind(caller_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// delete_todo_admin
    ///
    /// **Admin Override**: deletes a todo without checking ownership.
    async fn delete_todo_admin(&self, todo_id: i32) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM todo WHERE todo_id = $1")
            .bind(todo_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

/// Row shape of the `create_user` RETURNING clause (no role name yet — the
/// caller already resolved the role).
#[derive(sqlx::FromRow)]
struct InsertedUser {
    user_id: i32,
    username: String,
    role_id: i32,
    isactive: bool,
    created_at: chrono::DateTime<chrono::Utc>,
    updated_at: chrono::DateTime<chrono::Utc>,
}
