//! Procedure-call surface: the same four operations as the REST routes,
//! POST-only, with arguments in the JSON body.

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use serde_json::{json, Value};
use tracing::info;

use crate::db::{create_todo, delete_todo, list_todos, update_todo, Scope};
use crate::error::AppError;
use crate::middleware::Owner;
use crate::models::{CreateTodo, RpcDeleteTodo, RpcUpdateTodo, Todo};
use crate::validation::{parse_rpc_id, validate_create, validate_update};
use crate::AppState;

pub async fn get_todos(
    Owner(owner): Owner,
    State(state): State<AppState>,
) -> Result<Json<Vec<Todo>>, AppError> {
    let todos = list_todos(&state.db, Scope::Owner(&owner))?;
    info!(count = todos.len(), %owner, "Listed todos via rpc");
    Ok(Json(todos))
}

pub async fn create_todo_rpc(
    Owner(owner): Owner,
    State(state): State<AppState>,
    payload: Result<Json<CreateTodo>, JsonRejection>,
) -> Result<Json<Todo>, AppError> {
    let Json(req) = payload?;
    let new_todo = validate_create(req)?;

    let todo = create_todo(&state.db, &owner, &new_todo)?;
    info!(id = todo.id, %owner, "Created todo via rpc");
    Ok(Json(todo))
}

pub async fn update_todo_rpc(
    Owner(owner): Owner,
    State(state): State<AppState>,
    payload: Result<Json<RpcUpdateTodo>, JsonRejection>,
) -> Result<Json<Todo>, AppError> {
    let Json(req) = payload?;
    let id = parse_rpc_id(req.id.as_ref())?;
    let changes = validate_update(req.changes)?;

    let todo = update_todo(&state.db, Scope::Owner(&owner), id, &changes)?
        .ok_or(AppError::NotFound)?;
    info!(id, completed = todo.completed, %owner, "Updated todo via rpc");
    Ok(Json(todo))
}

pub async fn delete_todo_rpc(
    Owner(owner): Owner,
    State(state): State<AppState>,
    payload: Result<Json<RpcDeleteTodo>, JsonRejection>,
) -> Result<Json<Value>, AppError> {
    let Json(req) = payload?;
    let id = parse_rpc_id(req.id.as_ref())?;

    if !delete_todo(&state.db, Scope::Owner(&owner), id)? {
        return Err(AppError::NotFound);
    }
    info!(id, %owner, "Deleted todo via rpc");
    Ok(Json(json!({ "success": true })))
}
