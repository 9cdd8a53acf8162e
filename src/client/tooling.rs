use reqwest::Client;
use serde_json::json;

use crate::models::{CreateTodo, Todo};

use super::{parse, ClientError};

/// Client for the unauthenticated `/mcp/todos` routes. The server must run
/// with `TODO_TOOLING_ROUTES` enabled.
#[derive(Debug, Clone)]
pub struct ToolingClient {
    http: Client,
    base_url: String,
}

impl ToolingClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        ToolingClient {
            http: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub async fn list_all(&self) -> Result<Vec<Todo>, ClientError> {
        let resp = self.http.get(self.url(None)).send().await?;
        parse(resp).await
    }

    pub async fn create(&self, title: &str) -> Result<Todo, ClientError> {
        let body = CreateTodo {
            title: Some(title.to_string()),
            description: None,
        };
        let resp = self.http.post(self.url(None)).json(&body).send().await?;
        parse(resp).await
    }

    pub async fn set_completed(&self, id: i64, completed: bool) -> Result<Todo, ClientError> {
        let resp = self
            .http
            .patch(self.url(Some(id)))
            .json(&json!({ "completed": completed }))
            .send()
            .await?;
        parse(resp).await
    }

    pub async fn delete(&self, id: i64) -> Result<(), ClientError> {
        let resp = self.http.delete(self.url(Some(id))).send().await?;
        let status = resp.status();
        if status.is_success() {
            return Ok(());
        }
        parse::<serde_json::Value>(resp).await.map(|_| ())
    }

    fn url(&self, id: Option<i64>) -> String {
        match id {
            Some(id) => format!("{}/mcp/todos/{}", self.base_url, id),
            None => format!("{}/mcp/todos", self.base_url),
        }
    }
}
