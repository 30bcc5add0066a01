/// Authentication endpoints
///
/// This module provides user authentication endpoints:
/// - Signup (creates an account, issues a session)
/// - Login / logout
/// - Current-user lookup
///
/// # Endpoints
///
/// - `POST /api/auth/signup` - Create account, set session cookie
/// - `POST /api/auth/login` - Authenticate, set session cookie
/// - `POST /api/auth/logout` - Clear session cookie
/// - `GET  /api/auth/me` - Current user from the session token
///
/// Signup and login return the token in the body as well as the cookie so
/// non-browser clients can use `Authorization: Bearer`.
use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
};
use axum::{extract::State, http::StatusCode, Extension, Json};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use boardflow_shared::{
    api::ApiEnvelope,
    auth::{
        middleware::{CurrentUser, AUTH_COOKIE},
        password,
        token::{issue_token, SessionClaims, SESSION_TTL_DAYS},
    },
    models::user::{CreateUser, User, UserRole},
};
use serde::{Deserialize, Serialize};
use validator::ValidateEmail;

/// Signup request
///
/// Fields are optional at the serde level so missing values produce the
/// envelope's 400 rather than a deserialization rejection.
#[derive(Debug, Deserialize)]
pub struct SignupRequest {
    /// Email address
    pub email: Option<String>,

    /// Plaintext password (hashed before storage)
    pub password: Option<String>,

    /// Display name
    pub name: Option<String>,

    /// Optional role; defaults to "user"
    pub role: Option<String>,
}

/// Login request
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    /// Email address
    pub email: Option<String>,

    /// Plaintext password
    pub password: Option<String>,
}

/// User fields returned by auth endpoints (never the password hash)
#[derive(Debug, Serialize, Deserialize)]
pub struct AuthenticatedUser {
    /// User ID
    pub id: uuid::Uuid,

    /// Email address
    pub email: String,

    /// Display name
    pub name: String,

    /// Role
    pub role: UserRole,

    /// Avatar URL
    pub avatar: Option<String>,
}

impl From<User> for AuthenticatedUser {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            email: user.email,
            name: user.name,
            role: user.role,
            avatar: user.avatar,
        }
    }
}

/// Payload for signup/login responses
#[derive(Debug, Serialize, Deserialize)]
pub struct SessionData {
    /// The authenticated user
    pub user: AuthenticatedUser,

    /// Session token (also set as the `auth-token` cookie)
    pub token: String,
}

/// Builds the session cookie
///
/// httpOnly + SameSite=Lax always; Secure only in production so local
/// development over plain HTTP keeps working.
fn session_cookie(token: String, production: bool) -> Cookie<'static> {
    Cookie::build((AUTH_COOKIE, token))
        .http_only(true)
        .secure(production)
        .same_site(SameSite::Lax)
        .path("/")
        .max_age(time::Duration::days(SESSION_TTL_DAYS))
        .build()
}

/// Builds an immediately-expiring replacement cookie for logout
fn expired_session_cookie(production: bool) -> Cookie<'static> {
    Cookie::build((AUTH_COOKIE, ""))
        .http_only(true)
        .secure(production)
        .same_site(SameSite::Lax)
        .path("/")
        .max_age(time::Duration::ZERO)
        .build()
}

/// Validates the shared signup/create-user field set
///
/// Returns (email, password, name, role) or the 400 that explains what is
/// missing or malformed.
pub(crate) fn validate_new_user_fields(
    email: Option<String>,
    password: Option<String>,
    name: Option<String>,
    role: Option<String>,
) -> Result<(String, String, String, UserRole), ApiError> {
    let (email, password, name) = match (email, password, name) {
        (Some(e), Some(p), Some(n)) => (e, p, n),
        _ => {
            return Err(ApiError::BadRequest(
                "Email, password, and name are required".to_string(),
            ))
        }
    };

    if !email.validate_email() {
        return Err(ApiError::BadRequest("Invalid email format".to_string()));
    }

    if password.len() < 6 {
        return Err(ApiError::BadRequest(
            "Password must be at least 6 characters".to_string(),
        ));
    }

    let role = match role {
        Some(value) => {
            UserRole::parse(&value).ok_or_else(|| ApiError::BadRequest("Invalid role".to_string()))?
        }
        None => UserRole::User,
    };

    Ok((email, password, name, role))
}

/// Issues a session token for a user
fn issue_session(state: &AppState, user: &User) -> Result<String, ApiError> {
    let claims = SessionClaims::new(user.id, user.email.clone(), user.name.clone(), user.role);
    Ok(issue_token(&claims, state.session_secret())?)
}

/// Signup endpoint
///
/// Creates a new account and starts a session.
///
/// # Endpoint
///
/// ```text
/// POST /api/auth/signup
/// Content-Type: application/json
///
/// { "email": "user@example.com", "password": "secret1", "name": "Jordan" }
/// ```
///
/// # Errors
///
/// - `400 Bad Request`: missing fields, bad email format, short password,
///   unknown role
/// - `409 Conflict`: email already exists
pub async fn signup(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(req): Json<SignupRequest>,
) -> ApiResult<(StatusCode, CookieJar, Json<ApiEnvelope<SessionData>>)> {
    state.ensure_schema().await?;

    let (email, password, name, role) =
        validate_new_user_fields(req.email, req.password, req.name, req.role)?;

    let password_hash = password::hash_password(&password)?;

    let user = User::create(
        &state.db,
        CreateUser {
            email,
            name,
            password_hash,
            role,
            avatar: None,
        },
    )
    .await?;

    let token = issue_session(&state, &user)?;
    let jar = jar.add(session_cookie(token.clone(), state.production()));

    tracing::info!(user_id = %user.id, "New account created");

    Ok((
        StatusCode::CREATED,
        jar,
        Json(ApiEnvelope::ok(SessionData {
            user: user.into(),
            token,
        })),
    ))
}

/// Login endpoint
///
/// Verifies credentials and starts a session.
///
/// # Errors
///
/// - `400 Bad Request`: missing fields
/// - `401 Unauthorized`: unknown email or wrong password (same message for
///   both, so the endpoint does not leak which emails exist)
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(req): Json<LoginRequest>,
) -> ApiResult<(CookieJar, Json<ApiEnvelope<SessionData>>)> {
    state.ensure_schema().await?;

    let (email, password) = match (req.email, req.password) {
        (Some(e), Some(p)) => (e, p),
        _ => {
            return Err(ApiError::BadRequest(
                "Email and password are required".to_string(),
            ))
        }
    };

    let user = User::find_by_email(&state.db, &email)
        .await?
        .ok_or_else(|| ApiError::Unauthorized("Invalid email or password".to_string()))?;

    let valid = password::verify_password(&password, &user.password_hash)?;
    if !valid {
        return Err(ApiError::Unauthorized(
            "Invalid email or password".to_string(),
        ));
    }

    let token = issue_session(&state, &user)?;
    let jar = jar.add(session_cookie(token.clone(), state.production()));

    Ok((
        jar,
        Json(ApiEnvelope::ok(SessionData {
            user: user.into(),
            token,
        })),
    ))
}

/// Logout endpoint
///
/// Replaces the session cookie with an immediately-expiring empty one. The
/// token itself stays valid until its expiry (sessions are stateless), so
/// clients should also drop any copy they hold.
pub async fn logout(
    State(state): State<AppState>,
    jar: CookieJar,
) -> ApiResult<(CookieJar, Json<ApiEnvelope<()>>)> {
    let jar = jar.add(expired_session_cookie(state.production()));

    Ok((jar, Json(ApiEnvelope::message("Logged out successfully"))))
}

/// Current-user endpoint
///
/// Re-reads the user row so the response reflects updates made after the
/// token was issued.
///
/// # Errors
///
/// - `401 Unauthorized`: missing/invalid token (from the auth layer)
/// - `404 Not Found`: the account was deleted after the token was issued
pub async fn me(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
) -> ApiResult<Json<ApiEnvelope<AuthenticatedUser>>> {
    state.ensure_schema().await?;

    let user = User::find_by_id(&state.db, current.id)
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

    Ok(Json(ApiEnvelope::ok(user.into())))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fields(
        email: &str,
        password: &str,
        name: &str,
        role: Option<&str>,
    ) -> Result<(String, String, String, UserRole), ApiError> {
        validate_new_user_fields(
            Some(email.to_string()),
            Some(password.to_string()),
            Some(name.to_string()),
            role.map(String::from),
        )
    }

    #[test]
    fn test_validate_accepts_good_input() {
        let (email, _, name, role) = fields("user@example.com", "secret1", "Jordan", None).unwrap();
        assert_eq!(email, "user@example.com");
        assert_eq!(name, "Jordan");
        assert_eq!(role, UserRole::User);
    }

    #[test]
    fn test_validate_requires_all_fields() {
        let result = validate_new_user_fields(None, Some("secret1".into()), Some("J".into()), None);
        assert!(matches!(result, Err(ApiError::BadRequest(_))));
    }

    #[test]
    fn test_validate_rejects_bad_email() {
        let result = fields("not-an-email", "secret1", "Jordan", None);
        assert!(matches!(result, Err(ApiError::BadRequest(_))));
    }

    #[test]
    fn test_validate_rejects_short_password() {
        let result = fields("user@example.com", "abc", "Jordan", None);
        assert!(matches!(result, Err(ApiError::BadRequest(_))));
    }

    #[test]
    fn test_validate_parses_role() {
        let (.., role) = fields("user@example.com", "secret1", "J", Some("admin")).unwrap();
        assert_eq!(role, UserRole::Admin);

        let result = fields("user@example.com", "secret1", "J", Some("root"));
        assert!(matches!(result, Err(ApiError::BadRequest(_))));
    }

    #[test]
    fn test_session_cookie_attributes() {
        let cookie = session_cookie("tok".to_string(), false);
        assert_eq!(cookie.name(), AUTH_COOKIE);
        assert_eq!(cookie.http_only(), Some(true));
        assert_eq!(cookie.secure(), Some(false));
        assert_eq!(cookie.same_site(), Some(SameSite::Lax));
        assert_eq!(cookie.path(), Some("/"));
        assert_eq!(cookie.max_age(), Some(time::Duration::days(7)));

        let cookie = session_cookie("tok".to_string(), true);
        assert_eq!(cookie.secure(), Some(true));
    }

    #[test]
    fn test_expired_cookie_clears_value() {
        let cookie = expired_session_cookie(false);
        assert_eq!(cookie.value(), "");
        assert_eq!(cookie.max_age(), Some(time::Duration::ZERO));
    }
}
