/// User management endpoints
///
/// All routes here sit behind the session auth layer; the finer-grained role
/// rules are enforced per handler:
///
/// - `GET    /api/users`     - any authenticated user
/// - `POST   /api/users`     - admin only
/// - `GET    /api/users/:id` - self or admin
/// - `PUT    /api/users/:id` - self or admin; only admins may change `role`
/// - `DELETE /api/users/:id` - admin only, never the caller's own account
use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
    routes::auth::validate_new_user_fields,
};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use boardflow_shared::{
    api::ApiEnvelope,
    auth::{
        authorization::{deny_self_delete, require_admin, require_self_or_admin},
        middleware::CurrentUser,
        password,
    },
    models::user::{CreateUser, UpdateUser, User, UserRole},
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// User fields returned by these endpoints (never the password hash)
#[derive(Debug, Serialize, Deserialize)]
pub struct UserResponse {
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

    /// When the account was created
    pub created_at: DateTime<Utc>,

    /// When the account was last updated
    pub updated_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            email: user.email,
            name: user.name,
            role: user.role,
            avatar: user.avatar,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

/// Create-user request (admin only)
#[derive(Debug, Deserialize)]
pub struct CreateUserRequest {
    /// Email address
    pub email: Option<String>,

    /// Plaintext password (hashed before storage)
    pub password: Option<String>,

    /// Display name
    pub name: Option<String>,

    /// Optional role; defaults to "user"
    pub role: Option<String>,
}

/// Update-user request
///
/// All fields optional; only supplied ones are touched. `role` is ignored
/// unless the caller is an admin.
#[derive(Debug, Deserialize)]
pub struct UpdateUserRequest {
    /// New email address
    pub email: Option<String>,

    /// New display name
    pub name: Option<String>,

    /// New role (admin callers only; silently dropped otherwise)
    pub role: Option<String>,

    /// New avatar URL
    pub avatar: Option<String>,

    /// New plaintext password (hashed before storage)
    pub password: Option<String>,
}

/// Parses a path id, mapping malformed ids to the same 404 an unknown id gets
fn parse_user_id(id: &str) -> Result<Uuid, ApiError> {
    Uuid::parse_str(id).map_err(|_| ApiError::NotFound("User not found".to_string()))
}

/// Lists all users, ordered by name
pub async fn list_users(
    State(state): State<AppState>,
    Extension(_current): Extension<CurrentUser>,
) -> ApiResult<Json<ApiEnvelope<Vec<UserResponse>>>> {
    state.ensure_schema().await?;

    let users = User::list(&state.db).await?;

    Ok(Json(ApiEnvelope::ok(
        users.into_iter().map(UserResponse::from).collect(),
    )))
}

/// Creates a user (admin only)
///
/// # Errors
///
/// - `400 Bad Request`: missing fields, bad email, short password
/// - `403 Forbidden`: caller is not an admin
/// - `409 Conflict`: email already exists
pub async fn create_user(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Json(req): Json<CreateUserRequest>,
) -> ApiResult<(StatusCode, Json<ApiEnvelope<UserResponse>>)> {
    state.ensure_schema().await?;
    require_admin(&current)?;

    let (email, password, name, role) =
        validate_new_user_fields(req.email, req.password, req.name, req.role)?;

    let password_hash = password::hash_password(&password)?;

    let user = User::create(
        &state.db,
        CreateUser {
            email,
            name,
            password_hash,
            role,
            avatar: None,
        },
    )
    .await?;

    tracing::info!(user_id = %user.id, created_by = %current.id, "User created by admin");

    Ok((StatusCode::CREATED, Json(ApiEnvelope::ok(user.into()))))
}

/// Reads a single user (self or admin)
pub async fn get_user(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Path(id): Path<String>,
) -> ApiResult<Json<ApiEnvelope<UserResponse>>> {
    state.ensure_schema().await?;

    let id = parse_user_id(&id)?;
    require_self_or_admin(&current, id)?;

    let user = User::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

    Ok(Json(ApiEnvelope::ok(user.into())))
}

/// Updates a user (self or admin)
///
/// A non-admin caller's `role` field is ignored rather than rejected, so the
/// UI can submit the full form without branching on the caller's role.
pub async fn update_user(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Path(id): Path<String>,
    Json(req): Json<UpdateUserRequest>,
) -> ApiResult<Json<ApiEnvelope<UserResponse>>> {
    state.ensure_schema().await?;

    let id = parse_user_id(&id)?;
    require_self_or_admin(&current, id)?;

    let role = match req.role {
        Some(value) if current.is_admin() => Some(
            UserRole::parse(&value).ok_or_else(|| ApiError::BadRequest("Invalid role".to_string()))?,
        ),
        _ => None,
    };

    // Empty password strings mean "unchanged", matching the form behavior
    let password_hash = match req.password.as_deref() {
        Some(p) if !p.is_empty() => Some(password::hash_password(p)?),
        _ => None,
    };

    let user = User::update(
        &state.db,
        id,
        UpdateUser {
            email: req.email,
            name: req.name,
            role,
            avatar: req.avatar.map(Some),
            password_hash,
        },
    )
    .await?
    .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

    Ok(Json(ApiEnvelope::ok(user.into())))
}

/// Deletes a user (admin only; self-delete always rejected)
///
/// # Errors
///
/// - `400 Bad Request`: target is the caller's own account
/// - `403 Forbidden`: caller is not an admin
/// - `404 Not Found`: no such user
pub async fn delete_user(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Path(id): Path<String>,
) -> ApiResult<Json<ApiEnvelope<()>>> {
    state.ensure_schema().await?;
    require_admin(&current)?;

    let id = parse_user_id(&id)?;
    deny_self_delete(&current, id)?;

    let deleted = User::delete(&state.db, id).await?;
    if !deleted {
        return Err(ApiError::NotFound("User not found".to_string()));
    }

    tracing::info!(user_id = %id, deleted_by = %current.id, "User deleted");

    Ok(Json(ApiEnvelope::message("User deleted successfully")))
}
