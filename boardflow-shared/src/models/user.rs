/// User model and database operations
///
/// This module provides the User model and CRUD operations for managing user
/// accounts. Every user carries a single role that drives the authorization
/// checks in the route layer.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE users (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     email TEXT NOT NULL UNIQUE,
///     name TEXT NOT NULL,
///     password_hash TEXT NOT NULL,
///     role TEXT NOT NULL DEFAULT 'user',
///     avatar TEXT,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     CONSTRAINT users_role_check CHECK (role IN ('admin', 'user', 'viewer'))
/// );
/// ```
///
/// # Example
///
/// ```no_run
/// use boardflow_shared::models::user::{User, CreateUser, UserRole};
/// # use sqlx::PgPool;
///
/// # async fn example(pool: PgPool) -> Result<(), sqlx::Error> {
/// let user = User::create(&pool, CreateUser {
///     email: "user@example.com".to_string(),
///     name: "Jordan Smith".to_string(),
///     password_hash: "$argon2id$...".to_string(),
///     role: UserRole::User,
///     avatar: None,
/// }).await?;
///
/// let found = User::find_by_email(&pool, "user@example.com").await?;
/// assert!(found.is_some());
/// # Ok(())
/// # }
/// ```
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

/// User role, stored as TEXT and checked by a database constraint
///
/// - `Admin`: full access, may manage users and change roles
/// - `User`: regular member
/// - `Viewer`: read-mostly account
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "text", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Admin,
    User,
    Viewer,
}

impl UserRole {
    /// String form as stored in the database and serialized on the wire
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Admin => "admin",
            UserRole::User => "user",
            UserRole::Viewer => "viewer",
        }
    }

    /// Parses a role string, returning `None` for unrecognized values
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "admin" => Some(UserRole::Admin),
            "user" => Some(UserRole::User),
            "viewer" => Some(UserRole::Viewer),
            _ => None,
        }
    }

    /// Whether this role grants administrative access
    pub fn is_admin(&self) -> bool {
        matches!(self, UserRole::Admin)
    }
}

/// User model representing an account
///
/// Passwords are stored as Argon2id hashes, never in plaintext. The hash is
/// kept out of API responses by the route layer's response types.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    /// Unique user ID (UUID v4)
    pub id: Uuid,

    /// Email address, unique across all users
    pub email: String,

    /// Display name
    pub name: String,

    /// Argon2id password hash
    pub password_hash: String,

    /// Account role
    pub role: UserRole,

    /// Optional avatar/profile picture URL
    pub avatar: Option<String>,

    /// When the account was created
    pub created_at: DateTime<Utc>,

    /// When the account was last updated
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a new user
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateUser {
    /// Email address
    pub email: String,

    /// Display name
    pub name: String,

    /// Argon2id password hash (NOT a plaintext password)
    pub password_hash: String,

    /// Account role
    pub role: UserRole,

    /// Optional avatar URL
    pub avatar: Option<String>,
}

/// Input for updating an existing user
///
/// All fields are optional. Only supplied fields are written; `updated_at` is
/// always bumped.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateUser {
    /// New email address
    pub email: Option<String>,

    /// New display name
    pub name: Option<String>,

    /// New role
    pub role: Option<UserRole>,

    /// New avatar URL (use Some(None) to clear)
    pub avatar: Option<Option<String>>,

    /// New password hash
    pub password_hash: Option<String>,
}

impl User {
    /// Creates a new user
    ///
    /// # Errors
    ///
    /// Returns an error if the email already exists (unique constraint) or the
    /// database is unreachable.
    pub async fn create(pool: &PgPool, data: CreateUser) -> Result<Self, sqlx::Error> {
        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (email, name, password_hash, role, avatar)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, email, name, password_hash, role, avatar, created_at, updated_at
            "#,
        )
        .bind(data.email)
        .bind(data.name)
        .bind(data.password_hash)
        .bind(data.role)
        .bind(data.avatar)
        .fetch_one(pool)
        .await?;

        Ok(user)
    }

    /// Finds a user by ID, returning `None` if absent
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, email, name, password_hash, role, avatar, created_at, updated_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(user)
    }

    /// Finds a user by email address, returning `None` if absent
    pub async fn find_by_email(pool: &PgPool, email: &str) -> Result<Option<Self>, sqlx::Error> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, email, name, password_hash, role, avatar, created_at, updated_at
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(pool)
        .await?;

        Ok(user)
    }

    /// Lists all users, ordered by display name
    pub async fn list(pool: &PgPool) -> Result<Vec<Self>, sqlx::Error> {
        let users = sqlx::query_as::<_, User>(
            r#"
            SELECT id, email, name, password_hash, role, avatar, created_at, updated_at
            FROM users
            ORDER BY name ASC
            "#,
        )
        .fetch_all(pool)
        .await?;

        Ok(users)
    }

    /// Updates an existing user
    ///
    /// Only non-None fields in `data` are written. The `updated_at` timestamp
    /// is always set to the current time.
    ///
    /// # Returns
    ///
    /// The updated user, or `None` if no user has the given id.
    ///
    /// # Errors
    ///
    /// Returns an error if the new email already belongs to another user or
    /// the database is unreachable.
    pub async fn update(
        pool: &PgPool,
        id: Uuid,
        data: UpdateUser,
    ) -> Result<Option<Self>, sqlx::Error> {
        // Build the SET list dynamically based on which fields are present
        let mut query = String::from("UPDATE users SET updated_at = NOW()");
        let mut bind_count = 1;

        if data.email.is_some() {
            bind_count += 1;
            query.push_str(&format!(", email = ${}", bind_count));
        }
        if data.name.is_some() {
            bind_count += 1;
            query.push_str(&format!(", name = ${}", bind_count));
        }
        if data.role.is_some() {
            bind_count += 1;
            query.push_str(&format!(", role = ${}", bind_count));
        }
        if data.avatar.is_some() {
            bind_count += 1;
            query.push_str(&format!(", avatar = ${}", bind_count));
        }
        if data.password_hash.is_some() {
            bind_count += 1;
            query.push_str(&format!(", password_hash = ${}", bind_count));
        }

        query.push_str(
            " WHERE id = $1 RETURNING id, email, name, password_hash, role, avatar, created_at, updated_at",
        );

        let mut q = sqlx::query_as::<_, User>(&query).bind(id);

        if let Some(email) = data.email {
            q = q.bind(email);
        }
        if let Some(name) = data.name {
            q = q.bind(name);
        }
        if let Some(role) = data.role {
            q = q.bind(role);
        }
        if let Some(avatar) = data.avatar {
            q = q.bind(avatar);
        }
        if let Some(password_hash) = data.password_hash {
            q = q.bind(password_hash);
        }

        let user = q.fetch_optional(pool).await?;

        Ok(user)
    }

    /// Deletes a user by ID
    ///
    /// # Returns
    ///
    /// `true` if a row was deleted, `false` if no user had the given id.
    pub async fn delete(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Counts total number of users
    pub async fn count(pool: &PgPool) -> Result<i64, sqlx::Error> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM users")
            .fetch_one(pool)
            .await?;

        Ok(count)
    }
}
