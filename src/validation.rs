use crate::error::AppError;
use crate::models::{CreateTodo, RpcId, UpdateTodo};

/// A create request that passed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTodo {
    pub title: String,
    pub description: Option<String>,
}

/// The fields an update will replace. `None` means "leave as is".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TodoChanges {
    pub title: Option<String>,
    pub description: Option<Option<String>>,
    pub completed: Option<bool>,
}

impl TodoChanges {
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.description.is_none() && self.completed.is_none()
    }
}

pub fn validate_create(req: CreateTodo) -> Result<NewTodo, AppError> {
    let title = req
        .title
        .as_deref()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or_else(|| AppError::bad_request("Title is required"))?;

    Ok(NewTodo {
        title: title.to_string(),
        description: normalize_description(req.description),
    })
}

pub fn validate_update(req: UpdateTodo) -> Result<TodoChanges, AppError> {
    let title = match req.title {
        None => None,
        Some(value) => {
            let title = value
                .as_deref()
                .map(str::trim)
                .filter(|t| !t.is_empty())
                .ok_or_else(|| AppError::bad_request("Title cannot be empty"))?;
            Some(title.to_string())
        }
    };

    let completed = match req.completed {
        None => None,
        Some(Some(completed)) => Some(completed),
        Some(None) => return Err(AppError::bad_request("Completed must be a boolean")),
    };

    let changes = TodoChanges {
        title,
        description: req.description.map(normalize_description),
        completed,
    };

    if changes.is_empty() {
        return Err(AppError::bad_request("No updates provided"));
    }
    Ok(changes)
}

/// Path and body ids must be positive.
pub fn check_id(id: i64) -> Result<i64, AppError> {
    if id > 0 {
        Ok(id)
    } else {
        Err(AppError::bad_request("Valid todo ID is required"))
    }
}

pub fn parse_rpc_id(id: Option<&RpcId>) -> Result<i64, AppError> {
    let parsed = match id {
        Some(RpcId::Number(n)) => n.as_i64(),
        Some(RpcId::Text(s)) => s.trim().parse::<i64>().ok(),
        None => None,
    };
    parsed
        .ok_or_else(|| AppError::bad_request("Valid todo ID is required"))
        .and_then(check_id)
}

// Blank descriptions are stored as null.
fn normalize_description(description: Option<String>) -> Option<String> {
    description
        .map(|d| d.trim().to_string())
        .filter(|d| !d.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn update(json: serde_json::Value) -> UpdateTodo {
        serde_json::from_value(json).unwrap()
    }

    #[test]
    fn create_trims_title_and_description() {
        let todo = validate_create(CreateTodo {
            title: Some("  Buy milk ".into()),
            description: Some(" 2% ".into()),
        })
        .unwrap();
        assert_eq!(todo.title, "Buy milk");
        assert_eq!(todo.description.as_deref(), Some("2%"));
    }

    #[test]
    fn create_rejects_missing_or_blank_title() {
        assert!(validate_create(CreateTodo::default()).is_err());
        let err = validate_create(CreateTodo {
            title: Some("   ".into()),
            description: None,
        })
        .unwrap_err();
        assert_eq!(err.to_string(), "Title is required");
    }

    #[test]
    fn update_distinguishes_absent_from_null() {
        let changes = validate_update(update(serde_json::json!({ "completed": true }))).unwrap();
        assert_eq!(changes.description, None);
        assert_eq!(changes.title, None);

        let changes = validate_update(update(serde_json::json!({ "description": null }))).unwrap();
        assert_eq!(changes.description, Some(None));
    }

    #[test]
    fn update_clears_description_with_empty_string() {
        let changes = validate_update(update(serde_json::json!({ "description": "  " }))).unwrap();
        assert_eq!(changes.description, Some(None));
    }

    #[test]
    fn update_rejects_blank_or_null_title() {
        assert!(validate_update(update(serde_json::json!({ "title": "" }))).is_err());
        assert!(validate_update(update(serde_json::json!({ "title": null }))).is_err());
    }

    #[test]
    fn update_rejects_empty_payload() {
        let err = validate_update(update(serde_json::json!({ "unknown": 1 }))).unwrap_err();
        assert_eq!(err.to_string(), "No updates provided");
    }

    #[test]
    fn rpc_ids_accept_numbers_and_numeric_strings() {
        assert_eq!(parse_rpc_id(Some(&RpcId::Text("12".into()))).unwrap(), 12);
        assert_eq!(
            parse_rpc_id(Some(&RpcId::Number(serde_json::Number::from(7)))).unwrap(),
            7
        );
        assert!(parse_rpc_id(Some(&RpcId::Text("abc".into()))).is_err());
        assert!(parse_rpc_id(Some(&RpcId::Number(serde_json::Number::from(0)))).is_err());
        assert!(parse_rpc_id(None).is_err());
    }
}
