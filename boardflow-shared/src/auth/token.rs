/// Session token codec
///
/// This module issues and validates the signed session token that backs the
/// `auth-token` cookie. Tokens are signed with HS256 (HMAC-SHA256) and carry
/// the user's identity so request handling never needs a session table.
///
/// # Security
///
/// - **Algorithm**: HS256 (HMAC with SHA-256)
/// - **Expiration**: fixed at 7 days
/// - **Validation**: signature, expiration, not-before, and issuer checks
/// - **Secret Management**: secrets should be at least 32 bytes (256 bits)
///
/// Callers treat *any* verification failure as "unauthenticated"; the error
/// variants exist for logging, not for divergent handling.
///
/// # Example
///
/// ```
/// use boardflow_shared::auth::token::{issue_token, verify_token, SessionClaims};
/// use boardflow_shared::models::user::UserRole;
/// use uuid::Uuid;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let claims = SessionClaims::new(
///     Uuid::new_v4(),
///     "user@example.com".to_string(),
///     "Jordan Smith".to_string(),
///     UserRole::User,
/// );
///
/// let token = issue_token(&claims, "secret-key-at-least-32-bytes-long!")?;
/// let decoded = verify_token(&token, "secret-key-at-least-32-bytes-long!")?;
/// assert_eq!(decoded.sub, claims.sub);
/// assert_eq!(decoded.role, UserRole::User);
/// # Ok(())
/// # }
/// ```
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::user::UserRole;

/// Fixed session lifetime
pub const SESSION_TTL_DAYS: i64 = 7;

/// Issuer claim pinned into every token
const ISSUER: &str = "boardflow";

/// Error type for session token operations
#[derive(Debug, thiserror::Error)]
pub enum TokenError {
    /// Failed to sign/encode a token
    #[error("Failed to create token: {0}")]
    CreateError(String),

    /// Token has expired
    #[error("Token has expired")]
    Expired,

    /// Token is malformed, has a bad signature, or a wrong issuer
    #[error("Invalid token: {0}")]
    InvalidToken(String),
}

/// Claims carried by a session token
///
/// # Standard Claims
///
/// - `sub`: Subject (user ID)
/// - `iss`: Issuer (always "boardflow")
/// - `iat` / `exp` / `nbf`: issued-at, expiration, not-before timestamps
///
/// # Custom Claims
///
/// - `email`, `name`, `role`: the identity snapshot the auth gate hands to
///   route handlers without a database round-trip
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionClaims {
    /// Subject - user ID
    pub sub: Uuid,

    /// Email address at issue time
    pub email: String,

    /// Display name at issue time
    pub name: String,

    /// Role at issue time
    pub role: UserRole,

    /// Issuer - always "boardflow"
    pub iss: String,

    /// Issued at (Unix timestamp)
    pub iat: i64,

    /// Expiration time (Unix timestamp)
    pub exp: i64,

    /// Not before (Unix timestamp)
    pub nbf: i64,
}

impl SessionClaims {
    /// Creates claims for a user with the fixed 7-day expiration
    pub fn new(user_id: Uuid, email: String, name: String, role: UserRole) -> Self {
        Self::with_expiration(user_id, email, name, role, Duration::days(SESSION_TTL_DAYS))
    }

    /// Creates claims with a custom expiration
    ///
    /// Used by tests to mint already-expired tokens; production code always
    /// goes through [`SessionClaims::new`].
    pub fn with_expiration(
        user_id: Uuid,
        email: String,
        name: String,
        role: UserRole,
        expires_in: Duration,
    ) -> Self {
        let now = Utc::now();
        let expiration = now + expires_in;

        Self {
            sub: user_id,
            email,
            name,
            role,
            iss: ISSUER.to_string(),
            iat: now.timestamp(),
            exp: expiration.timestamp(),
            nbf: now.timestamp(),
        }
    }

    /// Checks if the token has expired
    pub fn is_expired(&self) -> bool {
        Utc::now().timestamp() >= self.exp
    }
}

/// Signs claims into a session token
///
/// # Errors
///
/// Returns `TokenError::CreateError` if encoding fails.
///
/// # Security
///
/// The secret should be at least 32 bytes, randomly generated, and stored
/// outside the repository (environment variable or secret manager).
pub fn issue_token(claims: &SessionClaims, secret: &str) -> Result<String, TokenError> {
    let header = Header::new(Algorithm::HS256);
    let key = EncodingKey::from_secret(secret.as_bytes());

    encode(&header, claims, &key)
        .map_err(|e| TokenError::CreateError(format!("Token encoding failed: {}", e)))
}

/// Validates a session token and extracts its claims
///
/// Verifies the signature, expiration, not-before time, and issuer.
///
/// # Errors
///
/// Returns `TokenError::Expired` for expired tokens and
/// `TokenError::InvalidToken` for everything else (bad signature, malformed
/// token, wrong issuer). Callers map both to 401.
pub fn verify_token(token: &str, secret: &str) -> Result<SessionClaims, TokenError> {
    let key = DecodingKey::from_secret(secret.as_bytes());

    let mut validation = Validation::new(Algorithm::HS256);
    validation.set_issuer(&[ISSUER]);
    validation.validate_exp = true;
    validation.validate_nbf = true;

    let token_data = decode::<SessionClaims>(token, &key, &validation).map_err(|e| {
        match e.kind() {
            jsonwebtoken::errors::ErrorKind::ExpiredSignature => TokenError::Expired,
            _ => TokenError::InvalidToken(format!("Token validation failed: {}", e)),
        }
    })?;

    Ok(token_data.claims)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "test-secret-key-at-least-32-bytes-long";

    fn sample_claims() -> SessionClaims {
        SessionClaims::new(
            Uuid::new_v4(),
            "user@example.com".to_string(),
            "Test User".to_string(),
            UserRole::User,
        )
    }

    #[test]
    fn test_claims_creation() {
        let claims = sample_claims();

        assert_eq!(claims.iss, "boardflow");
        assert_eq!(claims.role, UserRole::User);
        assert!(!claims.is_expired());

        // 7-day window, give or take clock granularity
        let lifetime = claims.exp - claims.iat;
        assert_eq!(lifetime, SESSION_TTL_DAYS * 24 * 60 * 60);
    }

    #[test]
    fn test_issue_and_verify_roundtrip() {
        let claims = sample_claims();
        let token = issue_token(&claims, SECRET).expect("Should create token");

        let decoded = verify_token(&token, SECRET).expect("Should validate token");
        assert_eq!(decoded.sub, claims.sub);
        assert_eq!(decoded.email, claims.email);
        assert_eq!(decoded.name, claims.name);
        assert_eq!(decoded.role, claims.role);
        assert_eq!(decoded.iss, "boardflow");
    }

    #[test]
    fn test_verify_with_wrong_secret() {
        let token = issue_token(&sample_claims(), "secret-one-that-is-32-bytes-long!!").unwrap();

        let result = verify_token(&token, "secret-two-that-is-32-bytes-long!!");
        assert!(matches!(result, Err(TokenError::InvalidToken(_))));
    }

    #[test]
    fn test_verify_expired_token() {
        let claims = SessionClaims::with_expiration(
            Uuid::new_v4(),
            "user@example.com".to_string(),
            "Test User".to_string(),
            UserRole::Admin,
            Duration::seconds(-3600),
        );

        assert!(claims.is_expired());

        let token = issue_token(&claims, SECRET).unwrap();
        let result = verify_token(&token, SECRET);
        assert!(matches!(result, Err(TokenError::Expired)));
    }

    #[test]
    fn test_verify_malformed_token() {
        assert!(verify_token("not-a-token", SECRET).is_err());
        assert!(verify_token("", SECRET).is_err());
        assert!(verify_token("a.b.c", SECRET).is_err());
    }

    #[test]
    fn test_tampered_token_rejected() {
        let token = issue_token(&sample_claims(), SECRET).unwrap();

        // Flip a character in the payload section
        let mut parts: Vec<String> = token.split('.').map(String::from).collect();
        let mut payload: Vec<u8> = parts[1].clone().into_bytes();
        payload[0] = if payload[0] == b'A' { b'B' } else { b'A' };
        parts[1] = String::from_utf8(payload).unwrap();
        let tampered = parts.join(".");

        assert!(verify_token(&tampered, SECRET).is_err());
    }

    #[test]
    fn test_claims_carry_role() {
        for role in [UserRole::Admin, UserRole::User, UserRole::Viewer] {
            let claims = SessionClaims::new(
                Uuid::new_v4(),
                "user@example.com".to_string(),
                "Test User".to_string(),
                role,
            );
            let token = issue_token(&claims, SECRET).unwrap();
            let decoded = verify_token(&token, SECRET).unwrap();
            assert_eq!(decoded.role, role);
        }
    }
}
