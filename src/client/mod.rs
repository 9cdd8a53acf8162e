//! Typed access to the RPC surface, plus the client-side list helpers the
//! browser app relies on: sorting and optimistic updates with rollback.

mod optimistic;
mod sort;
mod tooling;

pub use optimistic::OptimisticList;
pub use sort::{sort_todos, SortOrder};
pub use tooling::ToolingClient;

use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::models::{CreateTodo, RpcDeleteTodo, RpcId, RpcUpdateTodo, Todo, UpdateTodo};

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("{status}: {message}")]
    Api { status: StatusCode, message: String },
    #[error("todo {0} is not in the local list")]
    UnknownTodo(i64),
    #[error("failed to encode response: {0}")]
    Encode(#[from] serde_json::Error),
}

impl ClientError {
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ClientError::Api { status, .. } => Some(*status),
            ClientError::Http(err) => err.status(),
            ClientError::UnknownTodo(_) | ClientError::Encode(_) => None,
        }
    }
}

#[derive(Deserialize)]
struct ErrorBody {
    error: String,
}

#[derive(Debug, Clone)]
pub struct TodoClient {
    http: Client,
    base_url: String,
    token: Option<String>,
}

impl TodoClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        TodoClient {
            http: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token: None,
        }
    }

    /// Sends `token` as a bearer credential on every call.
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    pub async fn health(&self) -> Result<Value, ClientError> {
        let resp = self
            .http
            .get(format!("{}/health", self.base_url))
            .send()
            .await?;
        parse(resp).await
    }

    pub async fn list(&self) -> Result<Vec<Todo>, ClientError> {
        let resp = self.rpc("getTodos").json(&json!({})).send().await?;
        parse(resp).await
    }

    pub async fn create(&self, title: &str, description: Option<&str>) -> Result<Todo, ClientError> {
        let body = CreateTodo {
            title: Some(title.to_string()),
            description: description.map(str::to_string),
        };
        let resp = self.rpc("createTodo").json(&body).send().await?;
        parse(resp).await
    }

    pub async fn update(&self, id: i64, changes: UpdateTodo) -> Result<Todo, ClientError> {
        let body = RpcUpdateTodo {
            id: Some(RpcId::Number(id.into())),
            changes,
        };
        let resp = self.rpc("updateTodo").json(&body).send().await?;
        parse(resp).await
    }

    pub async fn delete(&self, id: i64) -> Result<(), ClientError> {
        let body = RpcDeleteTodo {
            id: Some(RpcId::Number(id.into())),
        };
        let resp = self.rpc("deleteTodo").json(&body).send().await?;
        parse::<Value>(resp).await.map(|_| ())
    }

    fn rpc(&self, procedure: &str) -> RequestBuilder {
        let req = self
            .http
            .post(format!("{}/rpc/{}", self.base_url, procedure));
        match &self.token {
            Some(token) => req.bearer_auth(token),
            None => req,
        }
    }
}

async fn parse<T: DeserializeOwned>(resp: Response) -> Result<T, ClientError> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp.json().await?);
    }

    let message = match resp.json::<ErrorBody>().await {
        Ok(body) => body.error,
        Err(_) => status
            .canonical_reason()
            .unwrap_or("request failed")
            .to_string(),
    };
    Err(ClientError::Api { status, message })
}
