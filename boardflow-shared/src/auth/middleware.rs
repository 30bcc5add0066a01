/// Authentication middleware for Axum
///
/// This module provides the session auth gate: middleware that extracts the
/// session token from a request, validates it, and adds the caller's identity
/// to request extensions.
///
/// # Token Sources
///
/// The token is looked up in order:
///
/// 1. The `auth-token` cookie (how browsers authenticate)
/// 2. The `Authorization: Bearer <token>` header (API clients)
///
/// # Request Extensions
///
/// After successful authentication the middleware adds a [`CurrentUser`]
/// containing the decoded identity. Handlers extract it with Axum's
/// `Extension` extractor.
///
/// # Example
///
/// ```no_run
/// use axum::{Extension, Router, routing::get, middleware};
/// use boardflow_shared::auth::middleware::{session_auth, CurrentUser};
///
/// async fn protected_handler(Extension(user): Extension<CurrentUser>) -> String {
///     format!("Hello, {}!", user.name)
/// }
///
/// let app: Router = Router::new()
///     .route("/protected", get(protected_handler))
///     .layer(middleware::from_fn(session_auth("your-session-secret")));
/// ```
use axum::{
    extract::Request,
    http::{header, HeaderMap, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use axum_extra::extract::cookie::CookieJar;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::token::{verify_token, TokenError};
use crate::api::{ApiEnvelope, ErrorCode};
use crate::models::user::UserRole;

/// Name of the session cookie
pub const AUTH_COOKIE: &str = "auth-token";

/// Authenticated identity added to request extensions
///
/// Carries the token's claims snapshot; handlers that need fresh data (e.g.
/// `/api/auth/me`) re-read the user row by `id`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentUser {
    /// Authenticated user ID
    pub id: Uuid,

    /// Email at token issue time
    pub email: String,

    /// Display name at token issue time
    pub name: String,

    /// Role at token issue time
    pub role: UserRole,
}

impl CurrentUser {
    /// Whether the caller holds the admin role
    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }
}

impl From<crate::auth::token::SessionClaims> for CurrentUser {
    fn from(claims: crate::auth::token::SessionClaims) -> Self {
        Self {
            id: claims.sub,
            email: claims.email,
            name: claims.name,
            role: claims.role,
        }
    }
}

/// Error type for the auth gate
#[derive(Debug)]
pub enum AuthError {
    /// No token in cookie or header
    MissingToken,

    /// Token failed validation (expired, malformed, bad signature)
    InvalidToken(String),
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let message = match self {
            AuthError::MissingToken => "Not authenticated".to_string(),
            AuthError::InvalidToken(detail) => {
                tracing::debug!(%detail, "Rejected session token");
                "Invalid token".to_string()
            }
        };

        let body: ApiEnvelope<()> = ApiEnvelope::error(ErrorCode::Unauthenticated, message);
        (StatusCode::UNAUTHORIZED, Json(body)).into_response()
    }
}

/// Pulls the session token out of a request's headers
///
/// Checks the `auth-token` cookie first, then the `Authorization: Bearer`
/// header. Returns `None` when neither is present.
pub fn extract_token(headers: &HeaderMap) -> Option<String> {
    let jar = CookieJar::from_headers(headers);
    if let Some(cookie) = jar.get(AUTH_COOKIE) {
        let value = cookie.value();
        if !value.is_empty() {
            return Some(value.to_string());
        }
    }

    headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(|token| token.to_string())
}

/// Session authentication middleware
///
/// Validates the session token and injects [`CurrentUser`] into request
/// extensions.
///
/// # Errors
///
/// Returns 401 Unauthorized (as a response envelope) if the token is missing,
/// malformed, expired, or carries a bad signature.
pub async fn session_auth_middleware(
    secret: String,
    mut req: Request,
    next: Next,
) -> Result<Response, AuthError> {
    let token = extract_token(req.headers()).ok_or(AuthError::MissingToken)?;

    let claims = verify_token(&token, &secret).map_err(|e| match e {
        TokenError::Expired => AuthError::InvalidToken("Token expired".to_string()),
        other => AuthError::InvalidToken(other.to_string()),
    })?;

    req.extensions_mut().insert(CurrentUser::from(claims));

    Ok(next.run(req).await)
}

/// Creates a session authentication middleware closure
///
/// Helper that captures the secret and returns a middleware function for
/// `axum::middleware::from_fn`.
///
/// # Example
///
/// ```no_run
/// use axum::{Router, routing::get, middleware};
/// use boardflow_shared::auth::middleware::session_auth;
///
/// let app: Router = Router::new()
///     .route("/protected", get(|| async { "OK" }))
///     .layer(middleware::from_fn(session_auth("secret")));
/// ```
pub fn session_auth(
    secret: impl Into<String>,
) -> impl Fn(Request, Next) -> std::pin::Pin<Box<dyn std::future::Future<Output = Result<Response, AuthError>> + Send>> + Clone {
    let secret = secret.into();
    move |req, next| {
        let secret = secret.clone();
        Box::pin(session_auth_middleware(secret, req, next))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::token::{issue_token, SessionClaims};
    use axum::http::HeaderValue;

    fn claims() -> SessionClaims {
        SessionClaims::new(
            Uuid::new_v4(),
            "user@example.com".to_string(),
            "Test User".to_string(),
            UserRole::Viewer,
        )
    }

    #[test]
    fn test_current_user_from_claims() {
        let claims = claims();
        let user = CurrentUser::from(claims.clone());

        assert_eq!(user.id, claims.sub);
        assert_eq!(user.email, claims.email);
        assert_eq!(user.name, claims.name);
        assert_eq!(user.role, UserRole::Viewer);
        assert!(!user.is_admin());
    }

    #[test]
    fn test_extract_token_from_cookie() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::COOKIE,
            HeaderValue::from_static("auth-token=abc123; theme=dark"),
        );

        assert_eq!(extract_token(&headers), Some("abc123".to_string()));
    }

    #[test]
    fn test_extract_token_from_bearer_header() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::AUTHORIZATION,
            HeaderValue::from_static("Bearer xyz789"),
        );

        assert_eq!(extract_token(&headers), Some("xyz789".to_string()));
    }

    #[test]
    fn test_extract_token_prefers_cookie() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::COOKIE,
            HeaderValue::from_static("auth-token=from-cookie"),
        );
        headers.insert(
            header::AUTHORIZATION,
            HeaderValue::from_static("Bearer from-header"),
        );

        assert_eq!(extract_token(&headers), Some("from-cookie".to_string()));
    }

    #[test]
    fn test_extract_token_ignores_empty_cookie() {
        // Logout sets an empty cookie; fall through to the header
        let mut headers = HeaderMap::new();
        headers.insert(header::COOKIE, HeaderValue::from_static("auth-token="));
        headers.insert(
            header::AUTHORIZATION,
            HeaderValue::from_static("Bearer fallback"),
        );

        assert_eq!(extract_token(&headers), Some("fallback".to_string()));
    }

    #[test]
    fn test_extract_token_missing() {
        let headers = HeaderMap::new();
        assert_eq!(extract_token(&headers), None);

        let mut headers = HeaderMap::new();
        headers.insert(
            header::AUTHORIZATION,
            HeaderValue::from_static("Basic dXNlcjpwYXNz"),
        );
        assert_eq!(extract_token(&headers), None);
    }

    #[test]
    fn test_auth_error_into_response_is_401() {
        let response = AuthError::MissingToken.into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let response = AuthError::InvalidToken("bad".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_round_trip_through_extractor() {
        let secret = "test-secret-key-at-least-32-bytes-long";
        let token = issue_token(&claims(), secret).unwrap();

        let mut headers = HeaderMap::new();
        headers.insert(
            header::COOKIE,
            HeaderValue::from_str(&format!("auth-token={}", token)).unwrap(),
        );

        let extracted = extract_token(&headers).unwrap();
        let decoded = verify_token(&extracted, secret).unwrap();
        assert_eq!(decoded.role, UserRole::Viewer);
    }
}
