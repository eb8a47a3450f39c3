/// Task endpoints
///
/// Every handler resolves the caller through the identity resolver first,
/// before looking at the path or body, and passes the resulting user ID to the task service. A task owned by someone
/// else answers exactly like a missing one: `404`.
///
/// # Endpoints
///
/// - `GET /api/tasks` - List caller's tasks, newest first
/// - `POST /api/tasks` - Create task
/// - `GET /api/tasks/:id` - Get task
/// - `PUT /api/tasks/:id` - Update task
/// - `DELETE /api/tasks/:id` - Delete task

use crate::{app::AppState, error::ApiResult, routes::not_blank};
use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use taskvault_shared::{
    auth::middleware::IdentityContext,
    models::task::{Task, TaskFields, TaskStatus},
};
use validator::Validate;

/// Create/update request body
#[derive(Debug, Deserialize, Validate)]
pub struct TaskRequest {
    #[validate(
        custom(function = "not_blank", message = "Title is required"),
        length(min = 1, max = 200, message = "Title must be between 1 and 200 characters")
    )]
    pub title: String,

    #[validate(length(max = 1000, message = "Description must be at most 1000 characters"))]
    pub description: Option<String>,

    /// Omitted: PENDING on create, unchanged on update
    pub status: Option<TaskStatus>,
}

impl From<TaskRequest> for TaskFields {
    fn from(req: TaskRequest) -> Self {
        TaskFields {
            title: req.title,
            description: req.description,
            status: req.status,
        }
    }
}

pub async fn list_tasks(
    State(state): State<AppState>,
    identity: IdentityContext,
) -> ApiResult<Json<Vec<Task>>> {
    let caller = state.identity.current_user_id(&identity).await?;
    Ok(Json(state.tasks.list(caller).await?))
}

pub async fn get_task(
    State(state): State<AppState>,
    identity: IdentityContext,
    path: Result<Path<i64>, PathRejection>,
) -> ApiResult<Json<Task>> {
    let caller = state.identity.current_user_id(&identity).await?;
    let Path(id) = path?;
    Ok(Json(state.tasks.get(id, caller).await?))
}

/// Creates a task owned by the caller
///
/// # Errors
///
/// - `401 Unauthorized`: No resolvable identity
/// - `422 Unprocessable Entity`: Validation failed
pub async fn create_task(
    State(state): State<AppState>,
    identity: IdentityContext,
    payload: Result<Json<TaskRequest>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<Task>)> {
    let caller = state.identity.current_user_id(&identity).await?;
    let Json(req) = payload?;
    req.validate()?;

    let task = state.tasks.create(req.into(), caller).await?;
    Ok((StatusCode::CREATED, Json(task)))
}

/// Replaces title and description; replaces status only when given
pub async fn update_task(
    State(state): State<AppState>,
    identity: IdentityContext,
    path: Result<Path<i64>, PathRejection>,
    payload: Result<Json<TaskRequest>, JsonRejection>,
) -> ApiResult<Json<Task>> {
    let caller = state.identity.current_user_id(&identity).await?;
    let Path(id) = path?;
    let Json(req) = payload?;
    req.validate()?;

    Ok(Json(state.tasks.update(id, req.into(), caller).await?))
}

pub async fn delete_task(
    State(state): State<AppState>,
    identity: IdentityContext,
    path: Result<Path<i64>, PathRejection>,
) -> ApiResult<StatusCode> {
    let caller = state.identity.current_user_id(&identity).await?;
    let Path(id) = path?;
    state.tasks.delete(id, caller).await?;
    Ok(StatusCode::NO_CONTENT)
}
