/// Database models for Boardflow
///
/// This module contains all database models and their CRUD operations.
///
/// # Models
///
/// - `user`: Accounts with role-based access (admin/user/viewer)
/// - `project`: User-owned project records
/// - `ticket`: Kanban board cards
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
/// # Ok(())
/// # }
/// ```

pub mod project;
pub mod ticket;
pub mod user;
