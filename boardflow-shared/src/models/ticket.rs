/// Ticket model and database operations
///
/// Tickets are the cards on the kanban board. There is no enforced transition
/// graph: any status may move to any other status via drag or edit. Status and
/// priority strings are validated by the route layer before they reach this
/// module.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE tickets (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     title TEXT NOT NULL,
///     description TEXT NOT NULL,
///     status TEXT NOT NULL DEFAULT 'todo',
///     priority TEXT NOT NULL DEFAULT 'medium',
///     assignee TEXT,
///     assignee_id UUID REFERENCES users(id) ON DELETE SET NULL,
///     created_by UUID REFERENCES users(id) ON DELETE SET NULL,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     CONSTRAINT tickets_status_check CHECK (
///         status IN ('todo', 'in-progress', 'review', 'done')
///     ),
///     CONSTRAINT tickets_priority_check CHECK (
///         priority IN ('low', 'medium', 'high')
///     )
/// );
/// -- added later, additive:
/// ALTER TABLE tickets ADD COLUMN IF NOT EXISTS project_id UUID
///     REFERENCES projects(id) ON DELETE SET NULL;
/// ```
///
/// # Example
///
/// ```no_run
/// use boardflow_shared::models::ticket::{Ticket, CreateTicket, TicketStatus, TicketPriority};
/// # use sqlx::PgPool;
///
/// # async fn example(pool: PgPool) -> Result<(), sqlx::Error> {
/// let ticket = Ticket::create(&pool, CreateTicket {
///     title: "Fix bug".to_string(),
///     description: "Login page 500s on empty password".to_string(),
///     status: TicketStatus::Todo,
///     priority: TicketPriority::High,
///     assignee: None,
///     assignee_id: None,
///     created_by: None,
///     project_id: None,
/// }).await?;
///
/// assert_eq!(ticket.created_at, ticket.updated_at);
/// # Ok(())
/// # }
/// ```
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

/// Board column a ticket sits in, stored as TEXT with a CHECK constraint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "text", rename_all = "kebab-case")]
#[serde(rename_all = "kebab-case")]
pub enum TicketStatus {
    Todo,
    InProgress,
    Review,
    Done,
}

impl TicketStatus {
    /// All statuses in board-column order
    pub const ALL: [TicketStatus; 4] = [
        TicketStatus::Todo,
        TicketStatus::InProgress,
        TicketStatus::Review,
        TicketStatus::Done,
    ];

    /// String form as stored in the database and serialized on the wire
    pub fn as_str(&self) -> &'static str {
        match self {
            TicketStatus::Todo => "todo",
            TicketStatus::InProgress => "in-progress",
            TicketStatus::Review => "review",
            TicketStatus::Done => "done",
        }
    }

    /// Parses a status string, returning `None` for unrecognized values
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "todo" => Some(TicketStatus::Todo),
            "in-progress" => Some(TicketStatus::InProgress),
            "review" => Some(TicketStatus::Review),
            "done" => Some(TicketStatus::Done),
            _ => None,
        }
    }
}

/// Ticket priority, stored as TEXT with a CHECK constraint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "text", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum TicketPriority {
    Low,
    Medium,
    High,
}

impl TicketPriority {
    /// String form as stored in the database and serialized on the wire
    pub fn as_str(&self) -> &'static str {
        match self {
            TicketPriority::Low => "low",
            TicketPriority::Medium => "medium",
            TicketPriority::High => "high",
        }
    }

    /// Parses a priority string, returning `None` for unrecognized values
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "low" => Some(TicketPriority::Low),
            "medium" => Some(TicketPriority::Medium),
            "high" => Some(TicketPriority::High),
            _ => None,
        }
    }
}

/// Ticket model
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Ticket {
    /// Unique ticket ID (UUID v4)
    pub id: Uuid,

    /// Short title shown on the card
    pub title: String,

    /// Full description
    pub description: String,

    /// Board column
    pub status: TicketStatus,

    /// Priority
    pub priority: TicketPriority,

    /// Free-text assignee name (display only)
    pub assignee: Option<String>,

    /// Assigned user, if linked to an account
    pub assignee_id: Option<Uuid>,

    /// User who created the ticket, when known
    pub created_by: Option<Uuid>,

    /// Project this ticket belongs to, if any
    pub project_id: Option<Uuid>,

    /// When the ticket was created
    pub created_at: DateTime<Utc>,

    /// When the ticket was last updated
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a new ticket
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateTicket {
    /// Ticket title
    pub title: String,

    /// Ticket description
    pub description: String,

    /// Initial board column
    pub status: TicketStatus,

    /// Priority
    pub priority: TicketPriority,

    /// Optional free-text assignee name
    pub assignee: Option<String>,

    /// Optional assigned user
    pub assignee_id: Option<Uuid>,

    /// Creating user, when a session accompanied the request
    pub created_by: Option<Uuid>,

    /// Optional project membership
    pub project_id: Option<Uuid>,
}

/// Input for updating an existing ticket
///
/// Only supplied fields are written; `updated_at` is always bumped. The
/// double-Option fields distinguish "leave untouched" (`None`) from "clear"
/// (`Some(None)`).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateTicket {
    /// New title
    pub title: Option<String>,

    /// New description
    pub description: Option<String>,

    /// New board column
    pub status: Option<TicketStatus>,

    /// New priority
    pub priority: Option<TicketPriority>,

    /// New assignee name (use Some(None) to clear)
    pub assignee: Option<Option<String>>,

    /// New assigned user (use Some(None) to clear)
    pub assignee_id: Option<Option<Uuid>>,

    /// New project membership (use Some(None) to clear)
    pub project_id: Option<Option<Uuid>>,
}

impl Ticket {
    /// Creates a new ticket
    ///
    /// `created_at` and `updated_at` come from the same statement timestamp
    /// and are therefore equal on a fresh ticket.
    pub async fn create(pool: &PgPool, data: CreateTicket) -> Result<Self, sqlx::Error> {
        let ticket = sqlx::query_as::<_, Ticket>(
            r#"
            INSERT INTO tickets (title, description, status, priority, assignee,
                                 assignee_id, created_by, project_id)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING id, title, description, status, priority, assignee,
                      assignee_id, created_by, project_id, created_at, updated_at
            "#,
        )
        .bind(data.title)
        .bind(data.description)
        .bind(data.status)
        .bind(data.priority)
        .bind(data.assignee)
        .bind(data.assignee_id)
        .bind(data.created_by)
        .bind(data.project_id)
        .fetch_one(pool)
        .await?;

        Ok(ticket)
    }

    /// Finds a ticket by ID, returning `None` if absent
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        let ticket = sqlx::query_as::<_, Ticket>(
            r#"
            SELECT id, title, description, status, priority, assignee,
                   assignee_id, created_by, project_id, created_at, updated_at
            FROM tickets
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(ticket)
    }

    /// Lists all tickets, newest first
    pub async fn list(pool: &PgPool) -> Result<Vec<Self>, sqlx::Error> {
        let tickets = sqlx::query_as::<_, Ticket>(
            r#"
            SELECT id, title, description, status, priority, assignee,
                   assignee_id, created_by, project_id, created_at, updated_at
            FROM tickets
            ORDER BY created_at DESC
            "#,
        )
        .fetch_all(pool)
        .await?;

        Ok(tickets)
    }

    /// Updates an existing ticket
    ///
    /// # Returns
    ///
    /// The updated ticket, or `None` if no ticket has the given id.
    pub async fn update(
        pool: &PgPool,
        id: Uuid,
        data: UpdateTicket,
    ) -> Result<Option<Self>, sqlx::Error> {
        let mut query = String::from("UPDATE tickets SET updated_at = NOW()");
        let mut bind_count = 1;

        if data.title.is_some() {
            bind_count += 1;
            query.push_str(&format!(", title = ${}", bind_count));
        }
        if data.description.is_some() {
            bind_count += 1;
            query.push_str(&format!(", description = ${}", bind_count));
        }
        if data.status.is_some() {
            bind_count += 1;
            query.push_str(&format!(", status = ${}", bind_count));
        }
        if data.priority.is_some() {
            bind_count += 1;
            query.push_str(&format!(", priority = ${}", bind_count));
        }
        if data.assignee.is_some() {
            bind_count += 1;
            query.push_str(&format!(", assignee = ${}", bind_count));
        }
        if data.assignee_id.is_some() {
            bind_count += 1;
            query.push_str(&format!(", assignee_id = ${}", bind_count));
        }
        if data.project_id.is_some() {
            bind_count += 1;
            query.push_str(&format!(", project_id = ${}", bind_count));
        }

        query.push_str(
            " WHERE id = $1 RETURNING id, title, description, status, priority, assignee, \
             assignee_id, created_by, project_id, created_at, updated_at",
        );

        let mut q = sqlx::query_as::<_, Ticket>(&query).bind(id);

        if let Some(title) = data.title {
            q = q.bind(title);
        }
        if let Some(description) = data.description {
            q = q.bind(description);
        }
        if let Some(status) = data.status {
            q = q.bind(status);
        }
        if let Some(priority) = data.priority {
            q = q.bind(priority);
        }
        if let Some(assignee) = data.assignee {
            q = q.bind(assignee);
        }
        if let Some(assignee_id) = data.assignee_id {
            q = q.bind(assignee_id);
        }
        if let Some(project_id) = data.project_id {
            q = q.bind(project_id);
        }

        let ticket = q.fetch_optional(pool).await?;

        Ok(ticket)
    }

    /// Deletes a ticket by ID
    ///
    /// # Returns
    ///
    /// `true` if a row was deleted, `false` if no ticket had the given id.
    pub async fn delete(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM tickets WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_as_str() {
        assert_eq!(TicketStatus::Todo.as_str(), "todo");
        assert_eq!(TicketStatus::InProgress.as_str(), "in-progress");
        assert_eq!(TicketStatus::Review.as_str(), "review");
        assert_eq!(TicketStatus::Done.as_str(), "done");
    }

    #[test]
    fn test_status_parse_roundtrip() {
        for status in TicketStatus::ALL {
            assert_eq!(TicketStatus::parse(status.as_str()), Some(status));
        }
    }

    #[test]
    fn test_status_parse_rejects_unknown() {
        assert_eq!(TicketStatus::parse("blocked"), None);
        assert_eq!(TicketStatus::parse("in_progress"), None);
        assert_eq!(TicketStatus::parse(""), None);
    }

    #[test]
    fn test_status_serde_uses_kebab_case() {
        let json = serde_json::to_string(&TicketStatus::InProgress).unwrap();
        assert_eq!(json, "\"in-progress\"");

        let back: TicketStatus = serde_json::from_str("\"in-progress\"").unwrap();
        assert_eq!(back, TicketStatus::InProgress);
    }

    #[test]
    fn test_priority_parse() {
        assert_eq!(TicketPriority::parse("low"), Some(TicketPriority::Low));
        assert_eq!(TicketPriority::parse("medium"), Some(TicketPriority::Medium));
        assert_eq!(TicketPriority::parse("high"), Some(TicketPriority::High));
        assert_eq!(TicketPriority::parse("urgent"), None);
    }

    #[test]
    fn test_update_ticket_default_is_empty() {
        let update = UpdateTicket::default();
        assert!(update.title.is_none());
        assert!(update.status.is_none());
        assert!(update.priority.is_none());
        assert!(update.assignee.is_none());
        assert!(update.project_id.is_none());
    }
}
