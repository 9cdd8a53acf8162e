use std::sync::{Arc, Mutex, MutexGuard};

use rusqlite::types::Type;
use rusqlite::{Connection, OptionalExtension, Result, Row, ToSql};
use time::OffsetDateTime;

use crate::error::AppError;
use crate::models::Todo;
use crate::validation::{NewTodo, TodoChanges};

pub type DbPool = Arc<Mutex<Connection>>;

const SCHEMA: &str = "
    CREATE TABLE IF NOT EXISTS todos (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        owner TEXT NOT NULL,
        title TEXT NOT NULL,
        description TEXT,
        completed INTEGER NOT NULL DEFAULT 0,
        created_at INTEGER NOT NULL
    );

    CREATE INDEX IF NOT EXISTS todos_owner_idx ON todos (owner);
";

const TODO_COLUMNS: &str = "id, title, description, completed, created_at";

/// Which rows an operation may see.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope<'a> {
    /// Only rows owned by this id.
    Owner(&'a str),
    /// Every row; used by the tooling routes only.
    Unrestricted,
}

pub fn init_db(path: &str) -> Result<DbPool> {
    let conn = Connection::open(path)?;
    conn.execute_batch(SCHEMA)?;
    Ok(Arc::new(Mutex::new(conn)))
}

pub fn init_in_memory() -> Result<DbPool> {
    init_db(":memory:")
}

fn lock(pool: &DbPool) -> Result<MutexGuard<'_, Connection>, AppError> {
    pool.lock()
        .map_err(|_| AppError::Internal("database connection lock poisoned".to_string()))
}

fn row_to_todo(row: &Row) -> Result<Todo> {
    let created_at: i64 = row.get(4)?;
    let created_at = OffsetDateTime::from_unix_timestamp(created_at)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(4, Type::Integer, Box::new(e)))?;

    Ok(Todo {
        id: row.get(0)?,
        title: row.get(1)?,
        description: row.get(2)?,
        completed: row.get::<_, i32>(3)? != 0,
        created_at,
    })
}

pub fn create_todo(pool: &DbPool, owner: &str, todo: &NewTodo) -> Result<Todo, AppError> {
    let conn = lock(pool)?;
    let now = OffsetDateTime::now_utc().unix_timestamp();

    let todo = conn.query_row(
        &format!(
            "INSERT INTO todos (owner, title, description, completed, created_at)
             VALUES (?1, ?2, ?3, 0, ?4)
             RETURNING {TODO_COLUMNS}"
        ),
        (owner, &todo.title, &todo.description, now),
        row_to_todo,
    )?;

    Ok(todo)
}

pub fn list_todos(pool: &DbPool, scope: Scope<'_>) -> Result<Vec<Todo>, AppError> {
    let conn = lock(pool)?;

    let todos = match scope {
        Scope::Owner(owner) => {
            let mut stmt = conn.prepare(&format!(
                "SELECT {TODO_COLUMNS} FROM todos WHERE owner = ?1 ORDER BY id ASC"
            ))?;
            let rows = stmt.query_map([owner], row_to_todo)?;
            rows.collect::<Result<Vec<_>, _>>()?
        }
        Scope::Unrestricted => {
            let mut stmt =
                conn.prepare(&format!("SELECT {TODO_COLUMNS} FROM todos ORDER BY id ASC"))?;
            let rows = stmt.query_map([], row_to_todo)?;
            rows.collect::<Result<Vec<_>, _>>()?
        }
    };
    Ok(todos)
}

pub fn get_todo(pool: &DbPool, scope: Scope<'_>, id: i64) -> Result<Option<Todo>, AppError> {
    let conn = lock(pool)?;
    let mut params: Vec<Box<dyn ToSql>> = Vec::new();
    let filter = scoped_filter(scope, id, &mut params);

    let params_refs: Vec<&dyn ToSql> = params.iter().map(|p| p.as_ref()).collect();
    let todo = conn
        .query_row(
            &format!("SELECT {TODO_COLUMNS} FROM todos WHERE {filter}"),
            params_refs.as_slice(),
            row_to_todo,
        )
        .optional()?;
    Ok(todo)
}

/// Applies `changes` to the row matching `id` within `scope` in one statement.
/// Returns `None` when no such row is visible.
pub fn update_todo(
    pool: &DbPool,
    scope: Scope<'_>,
    id: i64,
    changes: &TodoChanges,
) -> Result<Option<Todo>, AppError> {
    let conn = lock(pool)?;

    let mut updates = Vec::new();
    let mut params: Vec<Box<dyn ToSql>> = Vec::new();

    if let Some(title) = &changes.title {
        updates.push("title = ?");
        params.push(Box::new(title.clone()));
    }
    if let Some(description) = &changes.description {
        updates.push("description = ?");
        params.push(Box::new(description.clone()));
    }
    if let Some(completed) = changes.completed {
        updates.push("completed = ?");
        params.push(Box::new(completed));
    }

    if updates.is_empty() {
        return Err(AppError::bad_request("No updates provided"));
    }

    let filter = scoped_filter(scope, id, &mut params);
    let query = format!(
        "UPDATE todos SET {} WHERE {filter} RETURNING {TODO_COLUMNS}",
        updates.join(", ")
    );

    let params_refs: Vec<&dyn ToSql> = params.iter().map(|p| p.as_ref()).collect();
    let todo = conn
        .query_row(&query, params_refs.as_slice(), row_to_todo)
        .optional()?;
    Ok(todo)
}

pub fn delete_todo(pool: &DbPool, scope: Scope<'_>, id: i64) -> Result<bool, AppError> {
    let conn = lock(pool)?;
    let mut params: Vec<Box<dyn ToSql>> = Vec::new();
    let filter = scoped_filter(scope, id, &mut params);

    let params_refs: Vec<&dyn ToSql> = params.iter().map(|p| p.as_ref()).collect();
    let rows = conn.execute(
        &format!("DELETE FROM todos WHERE {filter}"),
        params_refs.as_slice(),
    )?;
    Ok(rows > 0)
}

/// Appends the id (and owner) parameters and returns the matching WHERE clause.
fn scoped_filter(scope: Scope<'_>, id: i64, params: &mut Vec<Box<dyn ToSql>>) -> &'static str {
    params.push(Box::new(id));
    match scope {
        Scope::Owner(owner) => {
            params.push(Box::new(owner.to_string()));
            "id = ? AND owner = ?"
        }
        Scope::Unrestricted => "id = ?",
    }
}
