use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::extract::{Path, State};
use axum::{http::StatusCode, response::IntoResponse, Json};
use tracing::info;

use crate::db::{create_todo, delete_todo, get_todo, list_todos, update_todo, Scope};
use crate::error::AppError;
use crate::middleware::Owner;
use crate::models::{CreateTodo, Todo, UpdateTodo};
use crate::validation::{check_id, validate_create, validate_update};
use crate::AppState;

pub async fn list_owned_todos(
    Owner(owner): Owner,
    State(state): State<AppState>,
) -> Result<Json<Vec<Todo>>, AppError> {
    let todos = list_todos(&state.db, Scope::Owner(&owner))?;
    info!(count = todos.len(), %owner, "Listed todos");
    Ok(Json(todos))
}

pub async fn create_new_todo(
    Owner(owner): Owner,
    State(state): State<AppState>,
    payload: Result<Json<CreateTodo>, JsonRejection>,
) -> Result<(StatusCode, Json<Todo>), AppError> {
    let Json(req) = payload?;
    let new_todo = validate_create(req)?;

    let todo = create_todo(&state.db, &owner, &new_todo)?;
    info!(id = todo.id, %owner, "Created todo");
    Ok((StatusCode::CREATED, Json(todo)))
}

pub async fn get_single_todo(
    Owner(owner): Owner,
    State(state): State<AppState>,
    path: Result<Path<i64>, PathRejection>,
) -> Result<Json<Todo>, AppError> {
    let Path(id) = path?;
    let id = check_id(id)?;

    get_todo(&state.db, Scope::Owner(&owner), id)?
        .map(Json)
        .ok_or(AppError::NotFound)
}

pub async fn update_existing_todo(
    Owner(owner): Owner,
    State(state): State<AppState>,
    path: Result<Path<i64>, PathRejection>,
    payload: Result<Json<UpdateTodo>, JsonRejection>,
) -> Result<Json<Todo>, AppError> {
    let Path(id) = path?;
    let id = check_id(id)?;
    let Json(req) = payload?;
    let changes = validate_update(req)?;

    match update_todo(&state.db, Scope::Owner(&owner), id, &changes)? {
        Some(todo) => {
            info!(id = todo.id, completed = todo.completed, %owner, "Updated todo");
            Ok(Json(todo))
        }
        None => Err(AppError::NotFound),
    }
}

pub async fn delete_existing_todo(
    Owner(owner): Owner,
    State(state): State<AppState>,
    path: Result<Path<i64>, PathRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Path(id) = path?;
    let id = check_id(id)?;

    if delete_todo(&state.db, Scope::Owner(&owner), id)? {
        info!(id, %owner, "Deleted todo");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::NotFound)
    }
}
