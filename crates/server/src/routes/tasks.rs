use axum::{
    Json, Router,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
    response::Json as ResponseJson,
    routing::{get, put},
};
use db::models::task::{CreateTask, Task, UpdateTask};
use utils::response::MessageResponse;
use uuid::Uuid;

use crate::{AppState, error::ApiError};

/// GET /api/tasks
pub async fn get_tasks(
    State(state): State<AppState>,
) -> Result<ResponseJson<Vec<Task>>, ApiError> {
    let tasks = Task::find_all(&state.db().pool).await?;
    Ok(ResponseJson(tasks))
}

/// POST /api/tasks
pub async fn create_task(
    State(state): State<AppState>,
    payload: Result<Json<CreateTask>, JsonRejection>,
) -> Result<(StatusCode, ResponseJson<Task>), ApiError> {
    let Json(payload) = payload?;
    let task = Task::create(&state.db().pool, &payload, Uuid::new_v4()).await?;

    tracing::info!(task_id = %task.id, "Task created");
    Ok((StatusCode::CREATED, ResponseJson(task)))
}

/// PUT /api/tasks/{id}
/// The body is a partial update; absent fields keep their stored value.
pub async fn update_task(
    State(state): State<AppState>,
    Path(task_id): Path<String>,
    payload: Result<Json<UpdateTask>, JsonRejection>,
) -> Result<ResponseJson<Task>, ApiError> {
    let task_id = parse_task_id(&task_id)?;
    let Json(payload) = payload?;
    let task = Task::update(&state.db().pool, task_id, &payload).await?;

    tracing::debug!(task_id = %task.id, completed = task.completed, "Task updated");
    Ok(ResponseJson(task))
}

/// DELETE /api/tasks/{id}
pub async fn delete_task(
    State(state): State<AppState>,
    Path(task_id): Path<String>,
) -> Result<ResponseJson<MessageResponse>, ApiError> {
    let task_id = parse_task_id(&task_id)?;
    Task::delete(&state.db().pool, task_id).await?;

    tracing::info!(task_id = %task_id, "Task deleted");
    Ok(ResponseJson(MessageResponse::new("Task deleted")))
}

// An id that cannot be a task id names no task.
fn parse_task_id(raw: &str) -> Result<Uuid, ApiError> {
    Uuid::parse_str(raw).map_err(|_| ApiError::NotFound)
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/tasks", get(get_tasks).post(create_task))
        .route("/tasks/{id}", put(update_task).delete(delete_task))
}
