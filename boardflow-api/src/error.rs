/// Error handling for the API server
///
/// This module provides a unified error type that maps to HTTP responses.
/// All handlers return `Result<T, ApiError>`, which converts into the shared
/// response envelope with the right status code and a machine-readable
/// [`ErrorCode`].
///
/// # Status Mapping
///
/// - `BadRequest` → 400 (missing/invalid fields, enum mismatches)
/// - `Unauthorized` → 401 (missing/invalid session token)
/// - `Forbidden` → 403 (authenticated but not allowed)
/// - `NotFound` → 404
/// - `Conflict` → 409 (duplicate email)
/// - `Unavailable` → 500 with code `database_unavailable`
/// - `Internal` → 500
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use std::fmt;

use boardflow_shared::api::{ApiEnvelope, ErrorCode};
use boardflow_shared::auth::authorization::AuthzError;
use boardflow_shared::auth::password::PasswordError;
use boardflow_shared::auth::token::TokenError;
use boardflow_shared::db::retry::is_transient;

/// API result type alias
pub type ApiResult<T> = Result<T, ApiError>;

/// Unified API error type
#[derive(Debug)]
pub enum ApiError {
    /// Bad request (400)
    BadRequest(String),

    /// Unauthorized (401)
    Unauthorized(String),

    /// Forbidden (403)
    Forbidden(String),

    /// Not found (404)
    NotFound(String),

    /// Conflict (409) - duplicate email
    Conflict(String),

    /// Database unreachable (500, code `database_unavailable`)
    Unavailable(String),

    /// Internal server error (500)
    Internal(String),
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::BadRequest(msg) => write!(f, "Bad request: {}", msg),
            ApiError::Unauthorized(msg) => write!(f, "Unauthorized: {}", msg),
            ApiError::Forbidden(msg) => write!(f, "Forbidden: {}", msg),
            ApiError::NotFound(msg) => write!(f, "Not found: {}", msg),
            ApiError::Conflict(msg) => write!(f, "Conflict: {}", msg),
            ApiError::Unavailable(msg) => write!(f, "Database unavailable: {}", msg),
            ApiError::Internal(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for ApiError {}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code, message) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, ErrorCode::Validation, msg),
            ApiError::Unauthorized(msg) => {
                (StatusCode::UNAUTHORIZED, ErrorCode::Unauthenticated, msg)
            }
            ApiError::Forbidden(msg) => (StatusCode::FORBIDDEN, ErrorCode::Forbidden, msg),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, ErrorCode::NotFound, msg),
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, ErrorCode::Conflict, msg),
            ApiError::Unavailable(msg) => {
                // Connectivity problems carry their message through so the
                // operator sees the underlying cause in the client too
                tracing::error!("Database unavailable: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorCode::DatabaseUnavailable,
                    format!(
                        "Database connection failed: {}. Check that the database \
                         is running and DATABASE_URL is correct.",
                        msg
                    ),
                )
            }
            ApiError::Internal(msg) => {
                // Log the detail, return a generic message
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorCode::Internal,
                    "An internal error occurred".to_string(),
                )
            }
        };

        let body: ApiEnvelope<()> = ApiEnvelope::error(code, message);
        (status, Json(body)).into_response()
    }
}

/// Convert sqlx errors to API errors
impl From<sqlx::Error> for ApiError {
    fn from(err: sqlx::Error) -> Self {
        if is_transient(&err) {
            return ApiError::Unavailable(err.to_string());
        }

        match err {
            sqlx::Error::RowNotFound => ApiError::NotFound("Resource not found".to_string()),
            sqlx::Error::Database(db_err) => {
                // Unique constraint violations surface as conflicts
                if let Some(constraint) = db_err.constraint() {
                    if constraint.contains("email") {
                        return ApiError::Conflict("Email already exists".to_string());
                    }
                    return ApiError::Conflict(format!("Constraint violation: {}", constraint));
                }

                ApiError::Internal(format!("Database error: {}", db_err))
            }
            _ => ApiError::Internal(format!("Database error: {}", err)),
        }
    }
}

/// Convert session token errors to API errors
impl From<TokenError> for ApiError {
    fn from(err: TokenError) -> Self {
        match err {
            TokenError::Expired => ApiError::Unauthorized("Token expired".to_string()),
            TokenError::CreateError(msg) => {
                ApiError::Internal(format!("Token creation failed: {}", msg))
            }
            other => ApiError::Unauthorized(format!("Invalid token: {}", other)),
        }
    }
}

/// Convert password errors to API errors
impl From<PasswordError> for ApiError {
    fn from(err: PasswordError) -> Self {
        ApiError::Internal(format!("Password operation failed: {}", err))
    }
}

/// Convert authorization errors to API errors
impl From<AuthzError> for ApiError {
    fn from(err: AuthzError) -> Self {
        match err {
            AuthzError::AdminRequired => ApiError::Forbidden(err.to_string()),
            AuthzError::NotSelfOrAdmin => ApiError::Forbidden(err.to_string()),
            // Deleting yourself is a bad request, not a permission problem
            AuthzError::SelfDeletion => ApiError::BadRequest(err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ApiError::BadRequest("Invalid input".to_string());
        assert_eq!(err.to_string(), "Bad request: Invalid input");

        let err = ApiError::NotFound("User not found".to_string());
        assert_eq!(err.to_string(), "Not found: User not found");
    }

    #[test]
    fn test_status_codes() {
        let cases = [
            (ApiError::BadRequest("x".into()), StatusCode::BAD_REQUEST),
            (ApiError::Unauthorized("x".into()), StatusCode::UNAUTHORIZED),
            (ApiError::Forbidden("x".into()), StatusCode::FORBIDDEN),
            (ApiError::NotFound("x".into()), StatusCode::NOT_FOUND),
            (ApiError::Conflict("x".into()), StatusCode::CONFLICT),
            (
                ApiError::Unavailable("x".into()),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
            (
                ApiError::Internal("x".into()),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (err, expected) in cases {
            assert_eq!(err.into_response().status(), expected);
        }
    }

    #[test]
    fn test_transient_sqlx_error_maps_to_unavailable() {
        let err: ApiError = sqlx::Error::PoolTimedOut.into();
        assert!(matches!(err, ApiError::Unavailable(_)));

        let io = sqlx::Error::Io(std::io::Error::new(
            std::io::ErrorKind::TimedOut,
            "connect timeout",
        ));
        let err: ApiError = io.into();
        assert!(matches!(err, ApiError::Unavailable(_)));
    }

    #[test]
    fn test_row_not_found_maps_to_not_found() {
        let err: ApiError = sqlx::Error::RowNotFound.into();
        assert!(matches!(err, ApiError::NotFound(_)));
    }

    #[test]
    fn test_token_errors_map_to_unauthorized() {
        let err: ApiError = TokenError::Expired.into();
        assert!(matches!(err, ApiError::Unauthorized(_)));

        let err: ApiError = TokenError::InvalidToken("bad signature".to_string()).into();
        assert!(matches!(err, ApiError::Unauthorized(_)));
    }

    #[test]
    fn test_authz_errors() {
        let err: ApiError = AuthzError::AdminRequired.into();
        assert!(matches!(err, ApiError::Forbidden(_)));

        let err: ApiError = AuthzError::SelfDeletion.into();
        assert!(matches!(err, ApiError::BadRequest(_)));
    }
}
