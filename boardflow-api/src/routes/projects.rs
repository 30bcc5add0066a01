/// Project endpoints
///
/// Projects are scoped to their owner: listing returns only the caller's
/// projects, and creation always assigns the caller as owner.
///
/// # Endpoints
///
/// - `GET  /api/projects` - caller's projects, newest first
/// - `POST /api/projects` - create a project owned by the caller
use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
};
use axum::{extract::State, http::StatusCode, Extension, Json};
use boardflow_shared::{
    api::ApiEnvelope,
    auth::middleware::CurrentUser,
    models::project::{CreateProject, Project, ProjectStatus},
};
use serde::Deserialize;

/// Create-project request
#[derive(Debug, Deserialize)]
pub struct CreateProjectRequest {
    /// Project name (required, whitespace-trimmed)
    pub name: Option<String>,

    /// Optional description
    pub description: Option<String>,
}

/// Lists the caller's projects, newest first
pub async fn list_projects(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
) -> ApiResult<Json<ApiEnvelope<Vec<Project>>>> {
    state.ensure_schema().await?;

    let projects = Project::list_by_owner(&state.db, current.id).await?;

    Ok(Json(ApiEnvelope::ok(projects)))
}

/// Creates a project owned by the caller
///
/// New projects always start with status "active".
///
/// # Errors
///
/// - `400 Bad Request`: missing or whitespace-only name
pub async fn create_project(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Json(req): Json<CreateProjectRequest>,
) -> ApiResult<(StatusCode, Json<ApiEnvelope<Project>>)> {
    state.ensure_schema().await?;

    let name = req
        .name
        .as_deref()
        .map(str::trim)
        .filter(|n| !n.is_empty())
        .ok_or_else(|| ApiError::BadRequest("Project name is required".to_string()))?
        .to_string();

    let description = req
        .description
        .as_deref()
        .map(str::trim)
        .filter(|d| !d.is_empty())
        .map(String::from);

    let project = Project::create(
        &state.db,
        CreateProject {
            name,
            description,
            owner_id: current.id,
            status: ProjectStatus::Active,
        },
    )
    .await?;

    tracing::info!(project_id = %project.id, owner_id = %current.id, "Project created");

    Ok((StatusCode::CREATED, Json(ApiEnvelope::ok(project))))
}
