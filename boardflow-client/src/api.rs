/// HTTP client for the Boardflow API
///
/// Wraps reqwest with the response-envelope handling every endpoint shares.
/// After `login`/`signup` the client remembers the session token and sends it
/// as a bearer header on subsequent calls.
///
/// API-level failures surface as [`ClientError::Api`] carrying the
/// machine-readable [`ErrorCode`] from the envelope, so callers branch on
/// `error.code()` instead of matching message substrings.
///
/// # Example
///
/// ```no_run
/// use boardflow_client::ApiClient;
///
/// # async fn example() -> Result<(), boardflow_client::ClientError> {
/// let mut client = ApiClient::new("http://localhost:8080");
/// client.login("user@example.com", "secret1").await?;
///
/// let tickets = client.list_tickets().await?;
/// println!("{} tickets on the board", tickets.len());
/// # Ok(())
/// # }
/// ```
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use uuid::Uuid;

use boardflow_shared::api::{ApiEnvelope, ErrorCode};
use boardflow_shared::models::project::Project;
use boardflow_shared::models::ticket::{Ticket, TicketPriority, TicketStatus};
use boardflow_shared::models::user::UserRole;

/// Error type for API client operations
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// Transport-level failure (connection, timeout, bad body)
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The server answered with a failure envelope
    #[error("{message}")]
    Api {
        /// Machine-readable error kind from the envelope
        code: Option<ErrorCode>,

        /// Human-readable message from the envelope
        message: String,
    },
}

impl ClientError {
    /// The structured error kind, when the server provided one
    pub fn code(&self) -> Option<ErrorCode> {
        match self {
            ClientError::Api { code, .. } => *code,
            ClientError::Http(_) => None,
        }
    }

    /// Whether the server reported its database as unreachable
    pub fn is_database_unavailable(&self) -> bool {
        self.code() == Some(ErrorCode::DatabaseUnavailable)
    }

    /// Whether the failure was an authentication problem
    pub fn is_unauthenticated(&self) -> bool {
        self.code() == Some(ErrorCode::Unauthenticated)
    }
}

/// Account fields returned by auth and user endpoints
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountInfo {
    /// User ID
    pub id: Uuid,

    /// Email address
    pub email: String,

    /// Display name
    pub name: String,

    /// Role
    pub role: UserRole,

    /// Avatar URL
    pub avatar: Option<String>,
}

/// Signup/login response payload
#[derive(Debug, Clone, Deserialize)]
pub struct Session {
    /// The authenticated account
    pub user: AccountInfo,

    /// Session token
    pub token: String,
}

/// Fields for creating a ticket
#[derive(Debug, Clone, Serialize)]
pub struct NewTicket {
    /// Ticket title
    pub title: String,

    /// Ticket description
    pub description: String,

    /// Initial board column
    pub status: TicketStatus,

    /// Priority
    pub priority: TicketPriority,

    /// Optional free-text assignee name
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assignee: Option<String>,

    /// Optional assigned user id
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assignee_id: Option<Uuid>,

    /// Optional project membership
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project_id: Option<Uuid>,
}

/// Partial ticket update; only set fields are sent
#[derive(Debug, Clone, Default, Serialize)]
pub struct TicketPatch {
    /// New title
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    /// New description
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// New board column
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<TicketStatus>,

    /// New priority
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<TicketPriority>,

    /// New assignee name; empty string clears the assignee
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assignee: Option<String>,
}

impl TicketPatch {
    /// Patch that only moves a ticket to a new column
    pub fn move_to(status: TicketStatus) -> Self {
        Self {
            status: Some(status),
            ..Default::default()
        }
    }
}

/// Typed client for the Boardflow HTTP API
#[derive(Debug, Clone)]
pub struct ApiClient {
    base_url: String,
    http: reqwest::Client,
    token: Option<String>,
}

impl ApiClient {
    /// Creates a client for the given base URL (no trailing slash needed)
    pub fn new(base_url: impl Into<String>) -> Self {
        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }

        Self {
            base_url,
            http: reqwest::Client::new(),
            token: None,
        }
    }

    /// The session token, if authenticated
    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    /// Sets the session token explicitly (e.g. restored from storage)
    pub fn set_token(&mut self, token: impl Into<String>) {
        self.token = Some(token.into());
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn request(&self, method: reqwest::Method, path: &str) -> reqwest::RequestBuilder {
        let mut builder = self.http.request(method, self.url(path));
        if let Some(token) = &self.token {
            builder = builder.bearer_auth(token);
        }
        builder
    }

    /// Unwraps the shared response envelope into its payload
    async fn decode<T: DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, ClientError> {
        let envelope: ApiEnvelope<T> = response.json().await?;

        if envelope.success {
            envelope.data.ok_or_else(|| ClientError::Api {
                code: None,
                message: "Response envelope missing data".to_string(),
            })
        } else {
            Err(ClientError::Api {
                code: envelope.code,
                message: envelope
                    .error
                    .unwrap_or_else(|| "Request failed".to_string()),
            })
        }
    }

    /// Unwraps an envelope for endpoints that return no payload
    async fn decode_empty(response: reqwest::Response) -> Result<(), ClientError> {
        let envelope: ApiEnvelope<serde_json::Value> = response.json().await?;

        if envelope.success {
            Ok(())
        } else {
            Err(ClientError::Api {
                code: envelope.code,
                message: envelope
                    .error
                    .unwrap_or_else(|| "Request failed".to_string()),
            })
        }
    }

    // ---- auth ----

    /// Creates an account and stores the session token
    pub async fn signup(
        &mut self,
        email: &str,
        password: &str,
        name: &str,
    ) -> Result<Session, ClientError> {
        let response = self
            .request(reqwest::Method::POST, "/api/auth/signup")
            .json(&serde_json::json!({
                "email": email,
                "password": password,
                "name": name,
            }))
            .send()
            .await?;

        let session: Session = Self::decode(response).await?;
        self.token = Some(session.token.clone());
        Ok(session)
    }

    /// Authenticates and stores the session token
    pub async fn login(&mut self, email: &str, password: &str) -> Result<Session, ClientError> {
        let response = self
            .request(reqwest::Method::POST, "/api/auth/login")
            .json(&serde_json::json!({
                "email": email,
                "password": password,
            }))
            .send()
            .await?;

        let session: Session = Self::decode(response).await?;
        self.token = Some(session.token.clone());
        Ok(session)
    }

    /// Ends the session and drops the stored token
    pub async fn logout(&mut self) -> Result<(), ClientError> {
        let response = self
            .request(reqwest::Method::POST, "/api/auth/logout")
            .send()
            .await?;

        Self::decode_empty(response).await?;
        self.token = None;
        Ok(())
    }

    /// Fetches the current account
    pub async fn me(&self) -> Result<AccountInfo, ClientError> {
        let response = self
            .request(reqwest::Method::GET, "/api/auth/me")
            .send()
            .await?;

        Self::decode(response).await
    }

    // ---- tickets ----

    /// Fetches all tickets, newest first
    pub async fn list_tickets(&self) -> Result<Vec<Ticket>, ClientError> {
        let response = self
            .request(reqwest::Method::GET, "/api/tickets")
            .send()
            .await?;

        Self::decode(response).await
    }

    /// Creates a ticket
    pub async fn create_ticket(&self, ticket: &NewTicket) -> Result<Ticket, ClientError> {
        let response = self
            .request(reqwest::Method::POST, "/api/tickets")
            .json(ticket)
            .send()
            .await?;

        Self::decode(response).await
    }

    /// Applies a partial update to a ticket
    pub async fn update_ticket(
        &self,
        id: Uuid,
        patch: &TicketPatch,
    ) -> Result<Ticket, ClientError> {
        let response = self
            .request(reqwest::Method::PUT, &format!("/api/tickets/{}", id))
            .json(patch)
            .send()
            .await?;

        Self::decode(response).await
    }

    /// Deletes a ticket
    pub async fn delete_ticket(&self, id: Uuid) -> Result<(), ClientError> {
        let response = self
            .request(reqwest::Method::DELETE, &format!("/api/tickets/{}", id))
            .send()
            .await?;

        Self::decode_empty(response).await
    }

    // ---- users & projects ----

    /// Fetches all users (requires a session)
    pub async fn list_users(&self) -> Result<Vec<AccountInfo>, ClientError> {
        let response = self
            .request(reqwest::Method::GET, "/api/users")
            .send()
            .await?;

        Self::decode(response).await
    }

    /// Fetches the caller's projects (requires a session)
    pub async fn list_projects(&self) -> Result<Vec<Project>, ClientError> {
        let response = self
            .request(reqwest::Method::GET, "/api/projects")
            .send()
            .await?;

        Self::decode(response).await
    }

    /// Creates a project owned by the caller (requires a session)
    pub async fn create_project(
        &self,
        name: &str,
        description: Option<&str>,
    ) -> Result<Project, ClientError> {
        let response = self
            .request(reqwest::Method::POST, "/api/projects")
            .json(&serde_json::json!({
                "name": name,
                "description": description,
            }))
            .send()
            .await?;

        Self::decode(response).await
    }
}
