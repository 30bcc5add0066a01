/// Lazy, idempotent schema bootstrap
///
/// Boardflow creates its schema in-process on first use instead of through an
/// external migration runner. Bootstrap is a sequence of named steps; each
/// applied step is recorded in the `migrations` bookkeeping table and skipped
/// on every later run, so re-running the sequence leaves the schema
/// untouched. New columns arrive as additive steps (`ADD COLUMN IF NOT
/// EXISTS`) rather than table rebuilds.
///
/// A process holds exactly one [`SchemaInit`] guard. Concurrent first
/// requests race into `ensure()`, but only one runs the bootstrap sequence;
/// the rest wait for its outcome. A failed attempt leaves the guard unset so
/// the next request tries again. The whole sequence runs under the transient-
/// failure retry policy from [`crate::db::retry`].
///
/// # Example
///
/// ```no_run
/// use boardflow_shared::db::schema::SchemaInit;
/// # use sqlx::PgPool;
///
/// # async fn example(pool: PgPool) -> Result<(), sqlx::Error> {
/// let schema = SchemaInit::new();
///
/// // Called from every handler; only the first call does work
/// schema.ensure(&pool).await?;
/// schema.ensure(&pool).await?;
/// # Ok(())
/// # }
/// ```
use sqlx::PgPool;
use tokio::sync::OnceCell;
use tracing::{debug, info};

use super::retry::{with_retry, RetryPolicy};

/// One named bootstrap step
///
/// Statements run one at a time (each its own autocommit statement); the step
/// name is recorded only after all of them succeed.
#[derive(Debug, Clone, Copy)]
pub struct SchemaStep {
    /// Unique step name recorded in the `migrations` table
    pub name: &'static str,

    /// SQL statements, executed in order
    pub statements: &'static [&'static str],
}

/// Bookkeeping table; created before any step runs
const CREATE_MIGRATIONS_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS migrations (
    id SERIAL PRIMARY KEY,
    name TEXT NOT NULL UNIQUE,
    executed_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
)
"#;

/// The full bootstrap sequence, in execution order
///
/// Steps are append-only: existing entries never change once shipped, new
/// schema work gets a new step.
pub const SCHEMA_STEPS: &[SchemaStep] = &[
    SchemaStep {
        name: "001_create_users",
        statements: &[r#"
            CREATE TABLE IF NOT EXISTS users (
                id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
                email TEXT NOT NULL UNIQUE,
                name TEXT NOT NULL,
                password_hash TEXT NOT NULL,
                role TEXT NOT NULL DEFAULT 'user',
                avatar TEXT,
                created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
                updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
                CONSTRAINT users_role_check CHECK (role IN ('admin', 'user', 'viewer'))
            )
        "#],
    },
    SchemaStep {
        name: "002_create_projects",
        statements: &[r#"
            CREATE TABLE IF NOT EXISTS projects (
                id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
                name TEXT NOT NULL,
                description TEXT,
                owner_id UUID NOT NULL REFERENCES users(id) ON DELETE CASCADE,
                status TEXT NOT NULL DEFAULT 'active',
                created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
                updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
                CONSTRAINT projects_status_check CHECK (
                    status IN ('active', 'archived', 'completed')
                )
            )
        "#],
    },
    SchemaStep {
        name: "003_create_tickets",
        statements: &[r#"
            CREATE TABLE IF NOT EXISTS tickets (
                id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
                title TEXT NOT NULL,
                description TEXT NOT NULL,
                status TEXT NOT NULL DEFAULT 'todo',
                priority TEXT NOT NULL DEFAULT 'medium',
                assignee TEXT,
                assignee_id UUID REFERENCES users(id) ON DELETE SET NULL,
                created_by UUID REFERENCES users(id) ON DELETE SET NULL,
                created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
                updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
                CONSTRAINT tickets_status_check CHECK (
                    status IN ('todo', 'in-progress', 'review', 'done')
                ),
                CONSTRAINT tickets_priority_check CHECK (
                    priority IN ('low', 'medium', 'high')
                )
            )
        "#],
    },
    SchemaStep {
        name: "004_ticket_indexes",
        statements: &[
            "CREATE INDEX IF NOT EXISTS idx_tickets_status ON tickets (status)",
            "CREATE INDEX IF NOT EXISTS idx_tickets_priority ON tickets (priority)",
            "CREATE INDEX IF NOT EXISTS idx_tickets_created_at ON tickets (created_at)",
        ],
    },
    SchemaStep {
        name: "005_ticket_project_id",
        statements: &[
            // Additive, non-destructive: older rows keep a NULL project
            "ALTER TABLE tickets ADD COLUMN IF NOT EXISTS project_id UUID \
             REFERENCES projects(id) ON DELETE SET NULL",
            "CREATE INDEX IF NOT EXISTS idx_tickets_project_id ON tickets (project_id)",
        ],
    },
];

/// Bootstrap status information
#[derive(Debug, Clone)]
pub struct SchemaStatus {
    /// Number of steps recorded in the `migrations` table
    pub applied_steps: usize,

    /// Number of steps this binary knows about
    pub total_steps: usize,
}

impl SchemaStatus {
    /// Whether every known step has been applied
    pub fn is_up_to_date(&self) -> bool {
        self.applied_steps >= self.total_steps
    }
}

/// Once-only schema initialization guard
///
/// Owns the "is the database initialized" state for the whole process. Route
/// handlers call [`SchemaInit::ensure`] before touching the store; only the
/// first caller pays for bootstrap.
#[derive(Debug)]
pub struct SchemaInit {
    cell: OnceCell<()>,
    policy: RetryPolicy,
}

impl Default for SchemaInit {
    fn default() -> Self {
        Self::new()
    }
}

impl SchemaInit {
    /// Creates a guard with the default retry policy
    pub fn new() -> Self {
        Self::with_policy(RetryPolicy::default())
    }

    /// Creates a guard with a custom retry policy
    pub fn with_policy(policy: RetryPolicy) -> Self {
        Self {
            cell: OnceCell::new(),
            policy,
        }
    }

    /// Ensures the schema exists, running bootstrap at most once
    ///
    /// Concurrent callers during the first initialization wait for the
    /// winner. If bootstrap fails, the guard stays unset and the next caller
    /// retries from scratch.
    ///
    /// # Errors
    ///
    /// Returns the bootstrap error after the retry policy is exhausted (for
    /// transient failures) or immediately (for permission/schema errors).
    pub async fn ensure(&self, pool: &PgPool) -> Result<(), sqlx::Error> {
        self.cell
            .get_or_try_init(|| async {
                with_retry(&self.policy, || apply_schema(pool)).await
            })
            .await?;

        Ok(())
    }

    /// Whether bootstrap has completed in this process
    pub fn is_initialized(&self) -> bool {
        self.cell.initialized()
    }
}

/// Runs every pending bootstrap step
///
/// Idempotent: already-recorded steps are skipped, and the statements
/// themselves are guarded (`IF NOT EXISTS`) so a crash between executing a
/// step and recording it does not wedge the next run.
pub async fn apply_schema(pool: &PgPool) -> Result<(), sqlx::Error> {
    sqlx::query(CREATE_MIGRATIONS_TABLE).execute(pool).await?;

    for step in SCHEMA_STEPS {
        if step_applied(pool, step.name).await? {
            debug!(step = step.name, "Schema step already applied, skipping");
            continue;
        }

        for statement in step.statements {
            sqlx::query(statement).execute(pool).await?;
        }

        record_step(pool, step.name).await?;
        info!(step = step.name, "Applied schema step");
    }

    Ok(())
}

/// Reads the current bootstrap status
pub async fn schema_status(pool: &PgPool) -> Result<SchemaStatus, sqlx::Error> {
    let table_exists: bool = sqlx::query_scalar(
        "SELECT EXISTS (
            SELECT FROM information_schema.tables
            WHERE table_schema = 'public'
            AND table_name = 'migrations'
        )",
    )
    .fetch_one(pool)
    .await?;

    if !table_exists {
        return Ok(SchemaStatus {
            applied_steps: 0,
            total_steps: SCHEMA_STEPS.len(),
        });
    }

    let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM migrations")
        .fetch_one(pool)
        .await?;

    Ok(SchemaStatus {
        applied_steps: count as usize,
        total_steps: SCHEMA_STEPS.len(),
    })
}

async fn step_applied(pool: &PgPool, name: &str) -> Result<bool, sqlx::Error> {
    let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM migrations WHERE name = $1")
        .bind(name)
        .fetch_one(pool)
        .await?;

    Ok(count > 0)
}

async fn record_step(pool: &PgPool, name: &str) -> Result<(), sqlx::Error> {
    // ON CONFLICT covers a concurrent bootstrap from another process
    sqlx::query("INSERT INTO migrations (name) VALUES ($1) ON CONFLICT (name) DO NOTHING")
        .bind(name)
        .execute(pool)
        .await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_steps_have_unique_names() {
        let names: HashSet<_> = SCHEMA_STEPS.iter().map(|s| s.name).collect();
        assert_eq!(names.len(), SCHEMA_STEPS.len());
    }

    #[test]
    fn test_steps_are_ordered_by_name() {
        // Execution order is array order; the numeric prefixes must agree
        // with it so the bookkeeping table reads chronologically
        for pair in SCHEMA_STEPS.windows(2) {
            assert!(
                pair[0].name < pair[1].name,
                "{} should sort before {}",
                pair[0].name,
                pair[1].name
            );
        }
    }

    #[test]
    fn test_every_step_has_statements() {
        for step in SCHEMA_STEPS {
            assert!(
                !step.statements.is_empty(),
                "step {} has no statements",
                step.name
            );
        }
    }

    #[test]
    fn test_project_id_step_is_additive() {
        let step = SCHEMA_STEPS
            .iter()
            .find(|s| s.name == "005_ticket_project_id")
            .expect("project_id step exists");

        assert!(step.statements[0].contains("ADD COLUMN IF NOT EXISTS"));
    }

    #[test]
    fn test_status_up_to_date() {
        let status = SchemaStatus {
            applied_steps: SCHEMA_STEPS.len(),
            total_steps: SCHEMA_STEPS.len(),
        };
        assert!(status.is_up_to_date());

        let status = SchemaStatus {
            applied_steps: 0,
            total_steps: SCHEMA_STEPS.len(),
        };
        assert!(!status.is_up_to_date());
    }

    #[test]
    fn test_guard_starts_uninitialized() {
        let guard = SchemaInit::new();
        assert!(!guard.is_initialized());
    }

    // Database-backed bootstrap tests (idempotence, concurrent first
    // requests) live in tests/schema_tests.rs
}
