/// Task endpoints
///
/// All handlers here sit behind the session layer and operate only on the
/// current user's tasks. An ID that exists but belongs to someone else is
/// answered with 404, exactly like an ID that does not exist.
///
/// # Endpoints
///
/// - `GET /tasks` - Open tasks
/// - `GET /tasks/completed` - Completed tasks, newest completion first
/// - `POST /tasks/create` - Create a task
/// - `GET /tasks/:id` - View a task
/// - `POST /tasks/:id` - Update title/description/important
/// - `POST /tasks/:id/complete` - Mark completed (sets the timestamp once)
/// - `POST /tasks/:id/delete` - Delete a task

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use serde::Deserialize;
use tasknest_shared::{
    auth::middleware::CurrentUser,
    models::task::{NewTask, Task, TaskChanges},
};
use uuid::Uuid;
use validator::Validate;

/// Task form payload, shared by create and update
///
/// The owner never comes from the payload; handlers take it from the
/// session.
#[derive(Debug, Deserialize, Validate)]
pub struct TaskForm {
    /// Task title
    #[validate(length(
        min = 1,
        max = 200,
        message = "Title must be between 1 and 200 characters"
    ))]
    pub title: String,

    /// Task description
    #[validate(length(
        min = 1,
        max = 1000,
        message = "Description must be between 1 and 1000 characters"
    ))]
    pub description: String,

    /// Important flag, defaults to false when omitted
    #[serde(default)]
    pub important: bool,
}

/// List the current user's open tasks
pub async fn list_open(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
) -> ApiResult<Json<Vec<Task>>> {
    let tasks = Task::list_open(&state.db, user.user_id).await?;

    Ok(Json(tasks))
}

/// List the current user's completed tasks, newest completion first
pub async fn list_completed(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
) -> ApiResult<Json<Vec<Task>>> {
    let tasks = Task::list_completed(&state.db, user.user_id).await?;

    Ok(Json(tasks))
}

/// Create a task owned by the current user
///
/// # Errors
///
/// - `422`: missing or over-length fields
pub async fn create(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Json(form): Json<TaskForm>,
) -> ApiResult<(StatusCode, Json<Task>)> {
    form.validate()?;

    let task = Task::create(
        &state.db,
        user.user_id,
        NewTask {
            title: form.title,
            description: form.description,
            important: form.important,
        },
    )
    .await?;

    Ok((StatusCode::CREATED, Json(task)))
}

/// View a single task
///
/// # Errors
///
/// - `404`: no such task for this user
pub async fn detail(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<Task>> {
    let task = Task::find(&state.db, id, user.user_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Task not found".to_string()))?;

    Ok(Json(task))
}

/// Update a task's editable fields
///
/// Creation time, completion state, and ownership are not editable.
///
/// # Errors
///
/// - `422`: missing or over-length fields
/// - `404`: no such task for this user
pub async fn update(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
    Json(form): Json<TaskForm>,
) -> ApiResult<Json<Task>> {
    form.validate()?;

    let task = Task::update(
        &state.db,
        id,
        user.user_id,
        TaskChanges {
            title: form.title,
            description: form.description,
            important: form.important,
        },
    )
    .await?
    .ok_or_else(|| ApiError::NotFound("Task not found".to_string()))?;

    Ok(Json(task))
}

/// Mark a task completed
///
/// Sets the completion timestamp if the task is still open; a second
/// completion returns the task unchanged.
///
/// # Errors
///
/// - `404`: no such task for this user
pub async fn complete(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<Task>> {
    let task = Task::complete(&state.db, id, user.user_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Task not found".to_string()))?;

    Ok(Json(task))
}

/// Delete a task
///
/// # Errors
///
/// - `404`: no such task for this user
pub async fn delete(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    let deleted = Task::delete(&state.db, id, user.user_id).await?;

    if !deleted {
        return Err(ApiError::NotFound("Task not found".to_string()));
    }

    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form(title: &str, description: &str) -> TaskForm {
        TaskForm {
            title: title.to_string(),
            description: description.to_string(),
            important: false,
        }
    }

    #[test]
    fn test_form_accepts_reasonable_input() {
        assert!(form("Buy milk", "2% milk").validate().is_ok());
    }

    #[test]
    fn test_form_requires_title_and_description() {
        assert!(form("", "2% milk").validate().is_err());
        assert!(form("Buy milk", "").validate().is_err());
    }

    #[test]
    fn test_form_enforces_length_limits() {
        assert!(form(&"t".repeat(200), "ok").validate().is_ok());
        assert!(form(&"t".repeat(201), "ok").validate().is_err());

        assert!(form("ok", &"d".repeat(1000)).validate().is_ok());
        assert!(form("ok", &"d".repeat(1001)).validate().is_err());
    }

    #[test]
    fn test_important_defaults_to_false() {
        let form: TaskForm =
            serde_json::from_str(r#"{"title": "Buy milk", "description": "2% milk"}"#).unwrap();
        assert!(!form.important);
    }
}
