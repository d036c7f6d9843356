//! Task route handlers.

use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
};
use serde::Serialize;
use tracing::info;

use super::AppState;
use crate::error::{ApiError, ApiResult};
use crate::types::{Task, TaskId, TaskPayload};

/// Confirmation body for operations that return no resource.
#[derive(Debug, Serialize)]
pub(super) struct MessageResponse {
    pub message: String,
}

/// Parse a path id; anything that is not an integer cannot name a task.
fn parse_task_id(raw: &str) -> ApiResult<TaskId> {
    raw.trim()
        .parse()
        .map_err(|_| ApiError::task_not_found(raw))
}

fn payload(body: Result<Json<TaskPayload>, JsonRejection>) -> ApiResult<TaskPayload> {
    body.map(|Json(payload)| payload)
        .map_err(|rejection| ApiError::invalid_body(rejection.body_text()))
}

/// POST /tasks
pub(super) async fn create_task(
    State(state): State<AppState>,
    body: Result<Json<TaskPayload>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<Task>)> {
    let input = payload(body)?.validate()?;

    let task = state
        .db()
        .create_task(&input)
        .map_err(|e| ApiError::database("create task", e))?;

    info!(task_id = task.id, "Task created");
    Ok((StatusCode::CREATED, Json(task)))
}

/// GET /tasks
pub(super) async fn list_tasks(State(state): State<AppState>) -> ApiResult<Json<Vec<Task>>> {
    let tasks = state
        .db()
        .list_tasks()
        .map_err(|e| ApiError::database("list tasks", e))?;
    Ok(Json(tasks))
}

/// PUT /tasks/{id}
pub(super) async fn update_task(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
    body: Result<Json<TaskPayload>, JsonRejection>,
) -> ApiResult<Json<Task>> {
    let input = payload(body)?.validate()?;
    let task_id = parse_task_id(&raw_id)?;

    let task = state
        .db()
        .update_task(task_id, &input)
        .map_err(|e| ApiError::database("update task", e))?
        .ok_or_else(|| ApiError::task_not_found(task_id))?;

    info!(task_id, completed = task.completed, "Task updated");
    Ok(Json(task))
}

/// DELETE /tasks/{id}
pub(super) async fn delete_task(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> ApiResult<Json<MessageResponse>> {
    let task_id = parse_task_id(&raw_id)?;

    let deleted = state
        .db()
        .delete_task(task_id)
        .map_err(|e| ApiError::database("delete task", e))?;
    if !deleted {
        return Err(ApiError::task_not_found(task_id));
    }

    info!(task_id, "Task deleted");
    Ok(Json(MessageResponse {
        message: "Task deleted successfully".to_string(),
    }))
}
