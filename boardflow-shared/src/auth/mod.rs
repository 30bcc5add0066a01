/// Authentication and authorization utilities
///
/// This module provides the authentication primitives for Boardflow:
///
/// # Modules
///
/// - [`password`]: Argon2id password hashing and verification
/// - [`token`]: Session token (JWT) issuing and validation
/// - [`middleware`]: Axum auth gate extracting the token from cookie/header
/// - [`authorization`]: Role checks (admin-only, self-or-admin, self-delete)
///
/// # Security Features
///
/// - **Password Hashing**: Argon2id with 64 MB memory, 3 iterations
/// - **Session Tokens**: HS256 signing, fixed 7-day expiration
/// - **Constant-time Comparison**: password verification never short-circuits
///
/// # Example
///
/// ```no_run
/// use boardflow_shared::auth::password::{hash_password, verify_password};
/// use boardflow_shared::auth::token::{issue_token, verify_token, SessionClaims};
/// use boardflow_shared::models::user::UserRole;
/// use uuid::Uuid;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// // Password authentication
/// let hash = hash_password("user_password")?;
/// assert!(verify_password("user_password", &hash)?);
///
/// // Session token
/// let claims = SessionClaims::new(
///     Uuid::new_v4(),
///     "user@example.com".to_string(),
///     "Jordan Smith".to_string(),
///     UserRole::User,
/// );
/// let token = issue_token(&claims, "secret-key")?;
/// # Ok(())
/// # }
/// ```

pub mod authorization;
pub mod middleware;
pub mod password;
pub mod token;
