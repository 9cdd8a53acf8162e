pub mod auth;
pub mod client;
pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod mcp;
pub mod middleware;
pub mod models;
pub mod validation;

use std::sync::Arc;

use axum::{
    routing::{get, patch, post},
    Router,
};
use config::Config;
use db::DbPool;

#[derive(Clone)]
pub struct AppState {
    pub db: DbPool,
    pub verifier: Arc<auth::TokenVerifier>,
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(db: DbPool, config: Config) -> Result<Self, auth::AuthError> {
        let verifier = auth::TokenVerifier::new(
            &config.key,
            config.issuer.as_deref(),
            config.audience.as_deref(),
        )?;
        Ok(AppState {
            db,
            verifier: Arc::new(verifier),
            config: Arc::new(config),
        })
    }
}

pub fn create_app(state: AppState) -> Router {
    let base_path = state.config.base_path.clone();

    let mut app_routes = Router::new()
        .route("/", get(handlers::meta::index))
        .route("/health", get(handlers::meta::health))
        .route(
            "/todos",
            get(handlers::api::list_owned_todos).post(handlers::api::create_new_todo),
        )
        .route(
            "/todos/{id}",
            get(handlers::api::get_single_todo)
                .patch(handlers::api::update_existing_todo)
                .delete(handlers::api::delete_existing_todo),
        )
        .route("/rpc/getTodos", post(handlers::rpc::get_todos))
        .route("/rpc/createTodo", post(handlers::rpc::create_todo_rpc))
        .route("/rpc/updateTodo", post(handlers::rpc::update_todo_rpc))
        .route("/rpc/deleteTodo", post(handlers::rpc::delete_todo_rpc));

    if state.config.tooling_routes {
        tracing::warn!("Unauthenticated tooling routes enabled under /mcp/todos");
        app_routes = app_routes
            .route(
                "/mcp/todos",
                get(handlers::tooling::list_all).post(handlers::tooling::create),
            )
            .route(
                "/mcp/todos/{id}",
                patch(handlers::tooling::update).delete(handlers::tooling::remove),
            );
    }

    let app_routes = app_routes
        .layer(
            tower::ServiceBuilder::new()
                .layer(tower_http::trace::TraceLayer::new_for_http())
                .layer(middleware::cors_layer(&state.config))
                .layer(tower_http::compression::CompressionLayer::new()),
        )
        .with_state(state);

    tracing::info!("base_path: {base_path:?}");

    if base_path.is_empty() {
        app_routes
    } else {
        Router::new().nest(&base_path, app_routes)
    }
}
