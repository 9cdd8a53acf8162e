use rmcp::{transport::stdio, ServiceExt};
use tracing::info;
use tracing_subscriber::EnvFilter;

use todo_api::client::ToolingClient;
use todo_api::mcp::TodoTools;

const DEFAULT_API_URL: &str = "http://localhost:3001";

#[tokio::main]
async fn main() {
    // stdout carries the protocol
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();

    let _ = dotenvy::dotenv();
    let base_url = std::env::var("TODO_API_URL").unwrap_or_else(|_| DEFAULT_API_URL.to_string());

    let tools = TodoTools::new(ToolingClient::new(&base_url));
    let service = tools
        .serve(stdio())
        .await
        .expect("starting MCP server on stdio");

    info!(%base_url, "Todo MCP server running on stdio");

    service.waiting().await.expect("MCP server failed");
}
