/// Application state and router builder
///
/// This module defines the shared application state and provides
/// a function to build the Axum router with all routes and middleware.
///
/// # Example
///
/// ```no_run
/// use boardflow_api::{app::AppState, config::Config};
/// use sqlx::PgPool;
///
/// # async fn example() -> anyhow::Result<()> {
/// let config = Config::from_env()?;
/// let pool = PgPool::connect(&config.database.url).await?;
/// let state = AppState::new(pool, config);
/// let app = boardflow_api::app::build_router(state);
/// # Ok(())
/// # }
/// ```
use crate::{config::Config, error::ApiError, middleware::security::SecurityHeadersLayer};
use axum::{
    http::{header, HeaderValue, Method},
    routing::{get, post},
    Router,
};
use boardflow_shared::auth::middleware::session_auth;
use boardflow_shared::db::schema::SchemaInit;
use sqlx::PgPool;
use std::sync::Arc;
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

/// Shared application state
///
/// Cloned for each request handler via Axum's `State` extractor.
/// Uses Arc internally for cheap cloning.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: PgPool,

    /// Once-only schema initialization guard, shared by every route
    pub schema: Arc<SchemaInit>,

    /// Application configuration
    pub config: Arc<Config>,
}

impl AppState {
    /// Creates new application state
    pub fn new(db: PgPool, config: Config) -> Self {
        Self {
            db,
            schema: Arc::new(SchemaInit::new()),
            config: Arc::new(config),
        }
    }

    /// Gets the session token secret
    pub fn session_secret(&self) -> &str {
        &self.config.auth.secret
    }

    /// Whether the server runs in production mode (Secure cookies, HSTS)
    pub fn production(&self) -> bool {
        self.config.api.production
    }

    /// Ensures the database schema exists
    ///
    /// Called at the top of every handler that touches the store. Only the
    /// first call per process does work; concurrent first requests wait for
    /// the winner.
    pub async fn ensure_schema(&self) -> Result<(), ApiError> {
        self.schema.ensure(&self.db).await.map_err(ApiError::from)
    }
}

/// Builds the complete Axum router with all routes and middleware
///
/// # Architecture
///
/// ```text
/// /
/// ├── /health                    # Health check (public)
/// └── /api/
///     ├── /auth/
///     │   ├── POST /signup       # Public
///     │   ├── POST /login        # Public
///     │   ├── POST /logout       # Public
///     │   └── GET  /me           # Session required
///     ├── /users                 # Session required; role rules per handler
///     ├── /projects              # Session required
///     └── /tickets               # Public (board is world-readable)
/// ```
///
/// # Middleware Stack
///
/// Applied in order (bottom to top):
/// 1. Request tracing (tower-http TraceLayer)
/// 2. CORS (tower-http CorsLayer)
/// 3. Security headers
/// 4. Session authentication (per-route-group basis)
pub fn build_router(state: AppState) -> Router {
    use crate::routes;

    let secret = state.config.auth.secret.clone();

    // Health check (public, no auth)
    let health_routes = Router::new().route("/health", get(routes::health::health_check));

    // Auth routes: signup/login/logout are public, /me requires a session
    let auth_routes = Router::new()
        .route("/signup", post(routes::auth::signup))
        .route("/login", post(routes::auth::login))
        .route("/logout", post(routes::auth::logout))
        .merge(
            Router::new()
                .route("/me", get(routes::auth::me))
                .layer(axum::middleware::from_fn(session_auth(secret.clone()))),
        );

    // User management (session required; admin/self rules live in handlers
    // because GET and POST on the same path differ)
    let user_routes = Router::new()
        .route(
            "/",
            get(routes::users::list_users).post(routes::users::create_user),
        )
        .route(
            "/:id",
            get(routes::users::get_user)
                .put(routes::users::update_user)
                .delete(routes::users::delete_user),
        )
        .layer(axum::middleware::from_fn(session_auth(secret.clone())));

    // Projects (session required)
    let project_routes = Router::new()
        .route(
            "/",
            get(routes::projects::list_projects).post(routes::projects::create_project),
        )
        .layer(axum::middleware::from_fn(session_auth(secret)));

    // Tickets (public; the board is readable and editable without an account)
    let ticket_routes = Router::new()
        .route(
            "/",
            get(routes::tickets::list_tickets).post(routes::tickets::create_ticket),
        )
        .route(
            "/:id",
            get(routes::tickets::get_ticket)
                .put(routes::tickets::update_ticket)
                .delete(routes::tickets::delete_ticket),
        );

    // Configure CORS based on environment
    let cors = if state.config.api.cors_origins.contains(&"*".to_string()) {
        // Development mode: permissive CORS
        CorsLayer::permissive()
    } else {
        // Production mode: configure allowed origins
        let origins: Vec<HeaderValue> = state
            .config
            .api
            .cors_origins
            .iter()
            .filter_map(|origin| origin.parse().ok())
            .collect();

        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods([
                Method::GET,
                Method::POST,
                Method::PUT,
                Method::DELETE,
                Method::OPTIONS,
            ])
            .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
            .allow_credentials(true)
            .max_age(std::time::Duration::from_secs(3600))
    };

    // Combine all routes with the middleware stack
    Router::new()
        .merge(health_routes)
        .nest("/api/auth", auth_routes)
        .nest("/api/users", user_routes)
        .nest("/api/projects", project_routes)
        .nest("/api/tickets", ticket_routes)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(cors)
        .layer(SecurityHeadersLayer::new(state.config.api.production))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    // Router wiring is exercised end-to-end by the integration tests in
    // tests/integration_test.rs against a live database.
}
