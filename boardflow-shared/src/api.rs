/// Wire types shared between the API server and the client
///
/// Every Boardflow endpoint responds with the same JSON envelope:
///
/// ```json
/// { "success": true,  "data": { ... } }
/// { "success": false, "error": "Invalid status", "code": "validation" }
/// ```
///
/// The `code` field is a machine-readable error kind. Clients branch on it
/// instead of pattern-matching message substrings, which is why it lives here
/// rather than in the server crate.
use serde::{Deserialize, Serialize};

/// Machine-readable error kind carried in the response envelope
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    /// Missing/invalid fields or enum values (400)
    Validation,

    /// Missing or invalid session token (401)
    Unauthenticated,

    /// Authenticated but not allowed (403)
    Forbidden,

    /// Resource does not exist (404)
    NotFound,

    /// Unique-constraint violation, e.g. duplicate email (409)
    Conflict,

    /// Database could not be reached (500)
    DatabaseUnavailable,

    /// Anything else (500)
    Internal,
}

impl ErrorCode {
    /// String form as serialized on the wire
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::Validation => "validation",
            ErrorCode::Unauthenticated => "unauthenticated",
            ErrorCode::Forbidden => "forbidden",
            ErrorCode::NotFound => "not_found",
            ErrorCode::Conflict => "conflict",
            ErrorCode::DatabaseUnavailable => "database_unavailable",
            ErrorCode::Internal => "internal",
        }
    }
}

/// Response envelope used by every endpoint
///
/// `data` is present on success, `error`/`code` on failure, and `message`
/// carries informational text for operations with no payload (logout,
/// deletes).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiEnvelope<T> {
    /// Whether the request succeeded
    pub success: bool,

    /// Payload, present on success
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,

    /// Human-readable error message, present on failure
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,

    /// Machine-readable error kind, present on failure
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<ErrorCode>,

    /// Informational message for payload-less successes
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl<T> ApiEnvelope<T> {
    /// Successful envelope wrapping `data`
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
            code: None,
            message: None,
        }
    }

    /// Successful envelope with only an informational message
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            success: true,
            data: None,
            error: None,
            code: None,
            message: Some(message.into()),
        }
    }

    /// Failed envelope with an error kind and message
    pub fn error(code: ErrorCode, error: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(error.into()),
            code: Some(code),
            message: None,
        }
    }
}
