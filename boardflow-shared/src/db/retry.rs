/// Bounded retry with exponential backoff for transient database failures
///
/// Schema bootstrap (and anything else touching a possibly-cold database)
/// runs through [`with_retry`]. Only transient connection classes are
/// retried: I/O failures (DNS resolution, connection refused, timeouts), TLS
/// handshake failures, and pool-acquire timeouts. Permission, schema, and
/// query errors fail immediately - retrying those only hides real bugs from
/// the operator.
///
/// # Example
///
/// ```no_run
/// use boardflow_shared::db::retry::{with_retry, RetryPolicy};
/// # use sqlx::PgPool;
///
/// # async fn example(pool: PgPool) -> Result<(), sqlx::Error> {
/// let policy = RetryPolicy::default();
/// let row: (i32,) = with_retry(&policy, || async {
///     sqlx::query_as("SELECT 1").fetch_one(&pool).await
/// })
/// .await?;
/// # Ok(())
/// # }
/// ```
use std::future::Future;
use std::time::Duration;

use tracing::warn;

/// Retry policy: fixed attempt count with a doubling delay between attempts
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Total attempts, including the first (must be >= 1)
    pub max_attempts: u32,

    /// Delay before the second attempt; doubles after each failure
    pub initial_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            initial_delay: Duration::from_millis(500),
        }
    }
}

impl RetryPolicy {
    /// Policy that never retries (single attempt)
    pub fn none() -> Self {
        Self {
            max_attempts: 1,
            initial_delay: Duration::ZERO,
        }
    }
}

/// Classifies an error as transient (worth retrying) or not
///
/// Transient: network I/O (covers DNS resolution failures, refused
/// connections, and timeouts), TLS handshake failures, and waiting too long
/// for a pool connection. Everything else - including permission and schema
/// errors reported by the server - is permanent.
pub fn is_transient(error: &sqlx::Error) -> bool {
    matches!(
        error,
        sqlx::Error::Io(_) | sqlx::Error::Tls(_) | sqlx::Error::PoolTimedOut
    )
}

/// Runs an operation, retrying transient failures per the policy
///
/// # Errors
///
/// Returns the last error once attempts are exhausted, or the first
/// non-transient error immediately.
pub async fn with_retry<T, F, Fut>(policy: &RetryPolicy, mut op: F) -> Result<T, sqlx::Error>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, sqlx::Error>>,
{
    let mut delay = policy.initial_delay;
    let mut attempt = 1u32;

    loop {
        match op().await {
            Ok(value) => return Ok(value),
            Err(error) if is_transient(&error) && attempt < policy.max_attempts => {
                warn!(
                    attempt,
                    max_attempts = policy.max_attempts,
                    delay_ms = delay.as_millis() as u64,
                    error = %error,
                    "Transient database error, retrying"
                );

                tokio::time::sleep(delay).await;
                delay *= 2;
                attempt += 1;
            }
            Err(error) => return Err(error),
        }
    }
}
