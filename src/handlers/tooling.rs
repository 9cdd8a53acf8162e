//! Unauthenticated routes for out-of-band tools. Only mounted when
//! `TODO_TOOLING_ROUTES` is enabled; they bypass ownership filtering.

use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::extract::{Path, State};
use axum::{http::StatusCode, Json};
use tracing::{info, warn};

use crate::db::{create_todo, delete_todo, list_todos, update_todo, Scope};
use crate::error::AppError;
use crate::models::{CreateTodo, Todo, UpdateTodo};
use crate::validation::{check_id, validate_create, validate_update};
use crate::AppState;

pub async fn list_all(State(state): State<AppState>) -> Result<Json<Vec<Todo>>, AppError> {
    let todos = list_todos(&state.db, Scope::Unrestricted)?;
    warn!(count = todos.len(), "Tooling listed todos of all owners");
    Ok(Json(todos))
}

pub async fn create(
    State(state): State<AppState>,
    payload: Result<Json<CreateTodo>, JsonRejection>,
) -> Result<(StatusCode, Json<Todo>), AppError> {
    let Json(req) = payload?;
    let new_todo = validate_create(req)?;

    let owner = &state.config.tooling_owner;
    let todo = create_todo(&state.db, owner, &new_todo)?;
    info!(id = todo.id, %owner, "Created todo via tooling");
    Ok((StatusCode::CREATED, Json(todo)))
}

pub async fn update(
    State(state): State<AppState>,
    path: Result<Path<i64>, PathRejection>,
    payload: Result<Json<UpdateTodo>, JsonRejection>,
) -> Result<Json<Todo>, AppError> {
    let Path(id) = path?;
    let id = check_id(id)?;
    let Json(req) = payload?;
    let changes = validate_update(req)?;

    let todo = update_todo(&state.db, Scope::Unrestricted, id, &changes)?
        .ok_or(AppError::NotFound)?;
    warn!(id, "Tooling updated todo without owner check");
    Ok(Json(todo))
}

pub async fn remove(
    State(state): State<AppState>,
    path: Result<Path<i64>, PathRejection>,
) -> Result<StatusCode, AppError> {
    let Path(id) = path?;
    let id = check_id(id)?;

    if delete_todo(&state.db, Scope::Unrestricted, id)? {
        warn!(id, "Tooling deleted todo without owner check");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::NotFound)
    }
}
