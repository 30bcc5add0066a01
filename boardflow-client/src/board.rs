/// Client-side board state
///
/// Holds the full ticket list the way the board view consumes it: grouped
/// into status columns, filtered locally by priority, and mutated
/// optimistically when a card is dragged.
///
/// A drag to another column applies the new status locally first, then issues
/// the update call. If the call fails for any reason, the whole list is
/// reloaded from the server - there is no client-side conflict resolution,
/// the server's view simply wins.
///
/// # Example
///
/// ```no_run
/// use boardflow_client::{ApiClient, BoardState};
/// use boardflow_shared::models::ticket::{TicketPriority, TicketStatus};
///
/// # async fn example(ticket_id: uuid::Uuid) -> Result<(), boardflow_client::ClientError> {
/// let client = ApiClient::new("http://localhost:8080");
/// let mut board = BoardState::new();
///
/// board.load(&client).await?;
/// board.set_filter(Some(TicketPriority::High));
///
/// for ticket in board.column(TicketStatus::Todo) {
///     println!("todo: {}", ticket.title);
/// }
///
/// board.move_ticket(&client, ticket_id, TicketStatus::Done).await?;
/// # Ok(())
/// # }
/// ```
use uuid::Uuid;

use boardflow_shared::models::ticket::{Ticket, TicketPriority, TicketStatus};

use crate::api::{ApiClient, ClientError, TicketPatch};

/// In-memory board state backing the kanban view
#[derive(Debug, Default)]
pub struct BoardState {
    tickets: Vec<Ticket>,
    filter: Option<TicketPriority>,
}

impl BoardState {
    /// Creates an empty board
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the local list with the server's
    pub async fn load(&mut self, client: &ApiClient) -> Result<(), ClientError> {
        self.tickets = client.list_tickets().await?;
        Ok(())
    }

    /// Sets the local priority filter (None shows everything)
    pub fn set_filter(&mut self, filter: Option<TicketPriority>) {
        self.filter = filter;
    }

    /// The active priority filter
    pub fn filter(&self) -> Option<TicketPriority> {
        self.filter
    }

    /// All tickets, unfiltered
    pub fn tickets(&self) -> &[Ticket] {
        &self.tickets
    }

    /// Tickets passing the active filter
    pub fn visible(&self) -> Vec<&Ticket> {
        self.tickets
            .iter()
            .filter(|t| self.filter.map_or(true, |p| t.priority == p))
            .collect()
    }

    /// Visible tickets in one status column
    pub fn column(&self, status: TicketStatus) -> Vec<&Ticket> {
        self.visible()
            .into_iter()
            .filter(|t| t.status == status)
            .collect()
    }

    /// Looks up a ticket by id
    pub fn ticket(&self, id: Uuid) -> Option<&Ticket> {
        self.tickets.iter().find(|t| t.id == id)
    }

    /// Number of tickets (unfiltered)
    pub fn len(&self) -> usize {
        self.tickets.len()
    }

    /// Whether the board holds no tickets
    pub fn is_empty(&self) -> bool {
        self.tickets.is_empty()
    }

    /// Moves a ticket to another column
    ///
    /// The new status is applied locally before the network call so the card
    /// lands in its column immediately. On success the server's copy of the
    /// ticket (with its bumped `updated_at`) replaces the local one. On
    /// failure the entire list is reloaded from the server to resynchronize,
    /// and the error is returned for the caller to surface.
    pub async fn move_ticket(
        &mut self,
        client: &ApiClient,
        id: Uuid,
        new_status: TicketStatus,
    ) -> Result<(), ClientError> {
        // Optimistic local move
        if let Some(ticket) = self.tickets.iter_mut().find(|t| t.id == id) {
            ticket.status = new_status;
        }

        match client
            .update_ticket(id, &TicketPatch::move_to(new_status))
            .await
        {
            Ok(updated) => {
                if let Some(ticket) = self.tickets.iter_mut().find(|t| t.id == id) {
                    *ticket = updated;
                }
                Ok(())
            }
            Err(error) => {
                tracing::warn!(ticket_id = %id, %error, "Ticket move failed, resyncing board");

                // The server's view wins; a failed resync keeps the stale
                // list rather than masking the original error
                if let Ok(fresh) = client.list_tickets().await {
                    self.tickets = fresh;
                }

                Err(error)
            }
        }
    }

    /// Removes a ticket locally and on the server
    pub async fn remove_ticket(
        &mut self,
        client: &ApiClient,
        id: Uuid,
    ) -> Result<(), ClientError> {
        client.delete_ticket(id).await?;
        self.tickets.retain(|t| t.id != id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn ticket(title: &str, status: TicketStatus, priority: TicketPriority) -> Ticket {
        let now = Utc::now();
        Ticket {
            id: Uuid::new_v4(),
            title: title.to_string(),
            description: "test".to_string(),
            status,
            priority,
            assignee: None,
            assignee_id: None,
            created_by: None,
            project_id: None,
            created_at: now,
            updated_at: now,
        }
    }

    fn board_with(tickets: Vec<Ticket>) -> BoardState {
        BoardState {
            tickets,
            filter: None,
        }
    }

    #[test]
    fn test_empty_board() {
        let board = BoardState::new();
        assert!(board.is_empty());
        assert_eq!(board.len(), 0);
        assert!(board.visible().is_empty());
        assert!(board.column(TicketStatus::Todo).is_empty());
    }

    #[test]
    fn test_priority_filter() {
        let board = {
            let mut b = board_with(vec![
                ticket("a", TicketStatus::Todo, TicketPriority::High),
                ticket("b", TicketStatus::Todo, TicketPriority::Low),
                ticket("c", TicketStatus::Done, TicketPriority::High),
            ]);
            b.set_filter(Some(TicketPriority::High));
            b
        };

        let visible = board.visible();
        assert_eq!(visible.len(), 2);
        assert!(visible.iter().all(|t| t.priority == TicketPriority::High));

        // Filtering is local: the full list stays intact
        assert_eq!(board.len(), 3);
    }

    #[test]
    fn test_clearing_filter_shows_everything() {
        let mut board = board_with(vec![
            ticket("a", TicketStatus::Todo, TicketPriority::High),
            ticket("b", TicketStatus::Todo, TicketPriority::Low),
        ]);

        board.set_filter(Some(TicketPriority::Low));
        assert_eq!(board.visible().len(), 1);

        board.set_filter(None);
        assert_eq!(board.visible().len(), 2);
    }

    #[test]
    fn test_column_grouping() {
        let board = board_with(vec![
            ticket("a", TicketStatus::Todo, TicketPriority::Medium),
            ticket("b", TicketStatus::InProgress, TicketPriority::Medium),
            ticket("c", TicketStatus::InProgress, TicketPriority::Medium),
            ticket("d", TicketStatus::Done, TicketPriority::Medium),
        ]);

        assert_eq!(board.column(TicketStatus::Todo).len(), 1);
        assert_eq!(board.column(TicketStatus::InProgress).len(), 2);
        assert_eq!(board.column(TicketStatus::Review).len(), 0);
        assert_eq!(board.column(TicketStatus::Done).len(), 1);
    }

    #[test]
    fn test_column_respects_filter() {
        let mut board = board_with(vec![
            ticket("a", TicketStatus::Todo, TicketPriority::High),
            ticket("b", TicketStatus::Todo, TicketPriority::Low),
        ]);

        board.set_filter(Some(TicketPriority::High));
        assert_eq!(board.column(TicketStatus::Todo).len(), 1);
        assert_eq!(board.column(TicketStatus::Todo)[0].title, "a");
    }

    #[test]
    fn test_ticket_lookup() {
        let t = ticket("a", TicketStatus::Todo, TicketPriority::Medium);
        let id = t.id;
        let board = board_with(vec![t]);

        assert_eq!(board.ticket(id).unwrap().title, "a");
        assert!(board.ticket(Uuid::new_v4()).is_none());
    }

    // move_ticket's optimistic-update and resync-on-failure behavior is
    // covered against a mock server in tests/board_sync_test.rs
}
