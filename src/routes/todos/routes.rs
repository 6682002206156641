use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    Json,
};

use super::dto::{CreateTodo, ListParams, UpdateTodo};
use super::model::TodoResponse;
use crate::error::Result;
use crate::state::AppState;

// HANDLERS

/// List todos by ascending id, paginated with `skip` / `limit`
pub async fn list(
    State(state): State<AppState>,
    params: std::result::Result<Query<ListParams>, QueryRejection>,
) -> Result<Json<Vec<TodoResponse>>> {
    let Query(params) = params?;
    params.validate()?;

    let todos = state.db.list(params.skip, params.limit).await?;

    Ok(Json(todos.into_iter().map(TodoResponse::from).collect()))
}

/// Create a todo, the table fills in id, `completed` and timestamps
pub async fn create(
    State(state): State<AppState>,
    payload: std::result::Result<Json<CreateTodo>, JsonRejection>,
) -> Result<(StatusCode, Json<TodoResponse>)> {
    let Json(payload) = payload?;
    let new_todo = payload.validate()?;

    let todo = state.db.create(new_todo).await?;
    tracing::info!(todo_id = todo.id, "todo created");

    Ok((StatusCode::CREATED, Json(todo.into())))
}

/// Partial update: fields missing from the body keep their stored values
pub async fn update(
    State(state): State<AppState>,
    todo_id: std::result::Result<Path<i32>, PathRejection>,
    payload: std::result::Result<Json<UpdateTodo>, JsonRejection>,
) -> Result<Json<TodoResponse>> {
    let Path(todo_id) = todo_id?;
    let Json(payload) = payload?;
    let patch = payload.into_patch()?;

    let todo = state.db.update(todo_id, patch).await?;
    tracing::info!(todo_id, "todo updated");

    Ok(Json(todo.into()))
}

pub async fn delete(
    State(state): State<AppState>,
    todo_id: std::result::Result<Path<i32>, PathRejection>,
) -> Result<StatusCode> {
    let Path(todo_id) = todo_id?;
    state.db.delete(todo_id).await?;
    tracing::info!(todo_id, "todo deleted");

    Ok(StatusCode::NO_CONTENT)
}
