/// Database layer for Boardflow
///
/// This module provides connection pooling, the transient-failure retry
/// policy, and the lazy schema bootstrap. Models live in the `models` module
/// at crate root level.
///
/// # Modules
///
/// - `pool`: PostgreSQL connection pool management with health checks
/// - `retry`: bounded exponential backoff for transient connection failures
/// - `schema`: once-only, idempotent schema bootstrap with a `migrations`
///   bookkeeping table
///
/// # Example
///
/// ```no_run
/// use boardflow_shared::db::pool::{create_pool, DatabaseConfig};
/// use boardflow_shared::db::schema::SchemaInit;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let config = DatabaseConfig {
///         url: std::env::var("DATABASE_URL")?,
///         ..Default::default()
///     };
///
///     let pool = create_pool(config).await?;
///
///     let schema = SchemaInit::new();
///     schema.ensure(&pool).await?;
///     Ok(())
/// }
/// ```

pub mod pool;
pub mod retry;
pub mod schema;
