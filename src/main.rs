use std::net::Ipv4Addr;

use tracing::info;
use tracing_subscriber::EnvFilter;

use todo_api::{config::Config, create_app, db, AppState};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = Config::from_env().expect("loading configuration");
    let port = config.port;

    if config.dev_fallback_owner.is_some() {
        tracing::warn!("TODO_DEV_FALLBACK_OWNER is set; unauthenticated requests get a fallback owner");
    }

    let db = db::init_db(&config.database_path).expect("initializing database");
    let state = AppState::new(db, config).expect("loading identity-provider key material");
    let app = create_app(state);
    let addr = (Ipv4Addr::UNSPECIFIED, port);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .unwrap_or_else(|err| panic!("Failed to bind to port {port}: {err}"));

    info!("running on {addr:?}");

    axum::serve(listener, app).await.expect("failed serving");
}
