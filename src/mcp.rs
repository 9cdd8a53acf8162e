//! MCP tool server exposing the tooling routes to assistants over stdio.

use rmcp::handler::server::router::tool::ToolRouter;
use rmcp::handler::server::wrapper::Parameters;
use rmcp::model::{CallToolResult, Content, ServerCapabilities, ServerInfo};
use rmcp::{tool, tool_handler, tool_router, ErrorData as McpError, ServerHandler};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::client::{ClientError, ToolingClient};

#[derive(Debug, Clone, Serialize, Deserialize, schemars::JsonSchema)]
pub struct CreateTodoArgs {
    /// The title of the todo
    pub title: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, schemars::JsonSchema)]
pub struct UpdateTodoArgs {
    /// The ID of the todo
    pub id: i64,
    /// Whether the todo is completed
    pub completed: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, schemars::JsonSchema)]
pub struct DeleteTodoArgs {
    /// The ID of the todo
    pub id: i64,
}

#[derive(Clone)]
pub struct TodoTools {
    client: ToolingClient,
    tool_router: ToolRouter<TodoTools>,
}

#[tool_router]
impl TodoTools {
    pub fn new(client: ToolingClient) -> Self {
        TodoTools {
            client,
            tool_router: Self::tool_router(),
        }
    }

    #[tool(description = "Get all todos")]
    pub async fn list_todos(&self) -> Result<CallToolResult, McpError> {
        let result = self.client.list_all().await.and_then(pretty);
        Ok(respond("list_todos", result))
    }

    #[tool(description = "Create a new todo")]
    pub async fn create_todo(
        &self,
        Parameters(args): Parameters<CreateTodoArgs>,
    ) -> Result<CallToolResult, McpError> {
        let result = self
            .client
            .create(&args.title)
            .await
            .and_then(pretty)
            .map(|todo| format!("Created todo: {todo}"));
        Ok(respond("create_todo", result))
    }

    #[tool(description = "Update a todo (mark as completed/incomplete)")]
    pub async fn update_todo(
        &self,
        Parameters(args): Parameters<UpdateTodoArgs>,
    ) -> Result<CallToolResult, McpError> {
        let result = self
            .client
            .set_completed(args.id, args.completed)
            .await
            .and_then(pretty)
            .map(|todo| format!("Updated todo: {todo}"));
        Ok(respond("update_todo", result))
    }

    #[tool(description = "Delete a todo")]
    pub async fn delete_todo(
        &self,
        Parameters(args): Parameters<DeleteTodoArgs>,
    ) -> Result<CallToolResult, McpError> {
        let result = self
            .client
            .delete(args.id)
            .await
            .map(|()| format!("Deleted todo with ID: {}", args.id));
        Ok(respond("delete_todo", result))
    }
}

#[tool_handler]
impl ServerHandler for TodoTools {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            instructions: Some("List, create, complete and delete todos.".to_string()),
            ..Default::default()
        }
    }
}

fn pretty<T: Serialize>(value: T) -> Result<String, ClientError> {
    serde_json::to_string_pretty(&value).map_err(ClientError::Encode)
}

// Tool failures are reported to the assistant, not as protocol errors.
fn respond(tool: &str, result: Result<String, ClientError>) -> CallToolResult {
    match result {
        Ok(text) => {
            info!(tool, "Tool call succeeded");
            CallToolResult::success(vec![Content::text(text)])
        }
        Err(err) => {
            warn!(tool, error = %err, "Tool call failed");
            CallToolResult::error(vec![Content::text(format!("Error: {err}"))])
        }
    }
}
