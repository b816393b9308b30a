use std::net::SocketAddr;
use std::sync::Arc;

use estate_api::app::app;
use estate_api::middleware::rate_limit;
use estate_api::state::AppState;
use estate_api::store::postgres::PgDocumentStore;
use estate_api::store::DocumentStore;

#[tokio::main]
async fn main() {
    // Load .env if present so cargo run picks up DATABASE_URL, JWT_SECRET, etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt::init();

    let config = estate_api::config::config();
    tracing::info!("starting Estate API in {:?} mode", config.environment);

    let store: Arc<dyn DocumentStore> = Arc::new(PgDocumentStore::new());
    let state = Arc::new(AppState::new(store));

    // Idle-bucket eviction keeps the rate-limit table bounded
    rate_limit::spawn_sweeper(Arc::clone(&state.limiter));

    let app = app(state);

    // Allow tests or deployments to override port via env
    let port = std::env::var("ESTATE_API_PORT")
        .ok()
        .or_else(|| std::env::var("PORT").ok())
        .and_then(|s| s.parse::<u16>().ok())
        .unwrap_or(3000);

    let bind_addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .unwrap_or_else(|e| panic!("failed to bind {}: {}", bind_addr, e));

    tracing::info!("Estate API listening on http://{}", bind_addr);

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await
    .expect("server");
}
