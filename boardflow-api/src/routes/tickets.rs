/// Ticket (board card) endpoints
///
/// The board is public: these routes work without a session. When a valid
/// session token does accompany a create request, the caller is recorded as
/// `created_by`.
///
/// Status and priority are validated here, before anything reaches the data
/// layer, so a bad enum value never touches storage.
///
/// # Endpoints
///
/// - `GET    /api/tickets` - all tickets, newest first
/// - `POST   /api/tickets` - create a ticket
/// - `GET    /api/tickets/:id` - read one ticket
/// - `PUT    /api/tickets/:id` - partial update
/// - `DELETE /api/tickets/:id` - delete
use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
};
use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    Json,
};
use boardflow_shared::{
    api::ApiEnvelope,
    auth::{middleware::extract_token, token::verify_token},
    models::ticket::{CreateTicket, Ticket, TicketPriority, TicketStatus, UpdateTicket},
};
use serde::Deserialize;
use uuid::Uuid;

/// Create-ticket request
///
/// `status` and `priority` arrive as strings and are validated here so bad
/// values produce the 400 envelope instead of a deserialization rejection.
#[derive(Debug, Deserialize)]
pub struct CreateTicketRequest {
    /// Ticket title (required)
    pub title: Option<String>,

    /// Ticket description (required)
    pub description: Option<String>,

    /// Board column (required, one of todo/in-progress/review/done)
    pub status: Option<String>,

    /// Priority (required, one of low/medium/high)
    pub priority: Option<String>,

    /// Optional free-text assignee name
    pub assignee: Option<String>,

    /// Optional assigned user id
    pub assignee_id: Option<Uuid>,

    /// Optional project membership
    pub project_id: Option<Uuid>,
}

/// Update-ticket request; all fields optional
#[derive(Debug, Deserialize)]
pub struct UpdateTicketRequest {
    /// New title
    pub title: Option<String>,

    /// New description
    pub description: Option<String>,

    /// New board column
    pub status: Option<String>,

    /// New priority
    pub priority: Option<String>,

    /// New assignee name; empty string clears the assignee
    pub assignee: Option<String>,

    /// New assigned user id
    pub assignee_id: Option<Uuid>,

    /// New project membership
    pub project_id: Option<Uuid>,
}

/// Parses a path id, mapping malformed ids to the same 404 an unknown id gets
fn parse_ticket_id(id: &str) -> Result<Uuid, ApiError> {
    Uuid::parse_str(id).map_err(|_| ApiError::NotFound("Ticket not found".to_string()))
}

fn parse_status(value: &str) -> Result<TicketStatus, ApiError> {
    TicketStatus::parse(value).ok_or_else(|| ApiError::BadRequest("Invalid status".to_string()))
}

fn parse_priority(value: &str) -> Result<TicketPriority, ApiError> {
    TicketPriority::parse(value).ok_or_else(|| ApiError::BadRequest("Invalid priority".to_string()))
}

/// Identifies the caller when a valid session token is present
///
/// Tickets never *require* a session; this only enriches `created_by`.
fn optional_caller(state: &AppState, headers: &HeaderMap) -> Option<Uuid> {
    let token = extract_token(headers)?;
    verify_token(&token, state.session_secret())
        .ok()
        .map(|claims| claims.sub)
}

/// Lists all tickets, newest first
pub async fn list_tickets(
    State(state): State<AppState>,
) -> ApiResult<Json<ApiEnvelope<Vec<Ticket>>>> {
    state.ensure_schema().await?;

    let tickets = Ticket::list(&state.db).await?;

    Ok(Json(ApiEnvelope::ok(tickets)))
}

/// Creates a ticket
///
/// # Errors
///
/// - `400 Bad Request`: missing required fields, unknown status/priority
pub async fn create_ticket(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(req): Json<CreateTicketRequest>,
) -> ApiResult<(StatusCode, Json<ApiEnvelope<Ticket>>)> {
    let (title, description, status, priority) =
        match (req.title, req.description, req.status, req.priority) {
            (Some(t), Some(d), Some(s), Some(p)) => (t, d, s, p),
            _ => {
                return Err(ApiError::BadRequest("Missing required fields".to_string()));
            }
        };

    let status = parse_status(&status)?;
    let priority = parse_priority(&priority)?;

    // Empty assignee strings mean "unassigned"
    let assignee = req.assignee.filter(|a| !a.is_empty());

    state.ensure_schema().await?;

    let created_by = optional_caller(&state, &headers);

    let ticket = Ticket::create(
        &state.db,
        CreateTicket {
            title,
            description,
            status,
            priority,
            assignee,
            assignee_id: req.assignee_id,
            created_by,
            project_id: req.project_id,
        },
    )
    .await?;

    tracing::debug!(ticket_id = %ticket.id, "Ticket created");

    Ok((StatusCode::CREATED, Json(ApiEnvelope::ok(ticket))))
}

/// Reads a single ticket
pub async fn get_ticket(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<ApiEnvelope<Ticket>>> {
    state.ensure_schema().await?;

    let id = parse_ticket_id(&id)?;

    let ticket = Ticket::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Ticket not found".to_string()))?;

    Ok(Json(ApiEnvelope::ok(ticket)))
}

/// Updates a ticket
///
/// Enum values are checked before storage is touched: an invalid status or
/// priority is rejected with 400 and the stored ticket stays unchanged.
pub async fn update_ticket(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<UpdateTicketRequest>,
) -> ApiResult<Json<ApiEnvelope<Ticket>>> {
    let id = parse_ticket_id(&id)?;

    let status = req.status.as_deref().map(parse_status).transpose()?;
    let priority = req.priority.as_deref().map(parse_priority).transpose()?;

    // Provided-but-empty assignee clears the field
    let assignee = req
        .assignee
        .map(|a| if a.is_empty() { None } else { Some(a) });

    state.ensure_schema().await?;

    let ticket = Ticket::update(
        &state.db,
        id,
        UpdateTicket {
            title: req.title,
            description: req.description,
            status,
            priority,
            assignee,
            assignee_id: req.assignee_id.map(Some),
            project_id: req.project_id.map(Some),
        },
    )
    .await?
    .ok_or_else(|| ApiError::NotFound("Ticket not found".to_string()))?;

    Ok(Json(ApiEnvelope::ok(ticket)))
}

/// Deletes a ticket
pub async fn delete_ticket(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<ApiEnvelope<()>>> {
    state.ensure_schema().await?;

    let id = parse_ticket_id(&id)?;

    let deleted = Ticket::delete(&state.db, id).await?;
    if !deleted {
        return Err(ApiError::NotFound("Ticket not found".to_string()));
    }

    Ok(Json(ApiEnvelope::message("Ticket deleted successfully")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_status() {
        assert_eq!(parse_status("todo").unwrap(), TicketStatus::Todo);
        assert_eq!(
            parse_status("in-progress").unwrap(),
            TicketStatus::InProgress
        );
        assert!(matches!(
            parse_status("blocked"),
            Err(ApiError::BadRequest(_))
        ));
    }

    #[test]
    fn test_parse_priority() {
        assert_eq!(parse_priority("high").unwrap(), TicketPriority::High);
        assert!(matches!(
            parse_priority("urgent"),
            Err(ApiError::BadRequest(_))
        ));
    }

    #[test]
    fn test_parse_ticket_id_malformed_is_not_found() {
        assert!(matches!(
            parse_ticket_id("not-a-uuid"),
            Err(ApiError::NotFound(_))
        ));
    }
}
