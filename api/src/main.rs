//! DEX Bot API Server
//!
//! Chat webhook and JSON endpoints for token analysis and price alerts.

use std::{env, net::SocketAddr, sync::Arc};

use alloy::providers::ProviderBuilder;
use axum::{routing::get, Router};
use dexbot_core::{
    alerts::PgAlertStore, chain::RpcChainProvider, AlertRegistry, ChainConfig, ScoringConfig,
    SecurityScorer,
};
use tower_http::cors::{Any, CorsLayer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod chat;
mod routes;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub scorer: SecurityScorer,
    pub registry: AlertRegistry,
}

mod defaults {
    pub const API_PORT: &str = "8080";
    pub const API_HOST: &str = "0.0.0.0";
}

/// Build the HTTP router around a prepared state
pub fn app(state: Arc<AppState>) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(root))
        .route("/health", get(health_check))
        .nest("/api", routes::api_routes())
        .with_state(state)
        .layer(cors)
        .layer(tower_http::trace::TraceLayer::new_for_http())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "api=debug,dexbot_core=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting DEX Bot API Server...");

    let db_pool = dexbot_db::initialize_database().await?;
    tracing::info!("Connected to database");

    let chain_config = ChainConfig::from_env()?;
    let scoring_config = ScoringConfig::from_env()?;
    tracing::info!(?scoring_config, "Scoring configuration loaded");

    let provider = ProviderBuilder::new()
        .on_builtin(&chain_config.rpc_url)
        .await?;
    let chain = RpcChainProvider::new(provider, db_pool.clone(), chain_config.lp_lockers);

    let state = Arc::new(AppState {
        scorer: SecurityScorer::new(Arc::new(chain), scoring_config),
        registry: AlertRegistry::new(Arc::new(PgAlertStore::new(db_pool))),
    });

    let port = env::var("API_PORT")
        .unwrap_or_else(|_| defaults::API_PORT.to_string())
        .parse::<u16>()?;

    let host = env::var("API_HOST").unwrap_or_else(|_| defaults::API_HOST.to_string());

    let addr: SocketAddr = format!("{}:{}", host, port).parse()?;
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app(state)).await?;

    Ok(())
}

/// Root endpoint - API information
async fn root() -> axum::response::Html<&'static str> {
    axum::response::Html(r#"
<!DOCTYPE html>
<html>
<head><title>DEX Bot API</title></head>
<body>
    <h1>DEX Bot API</h1>
    <ul>
        <li><code>GET /health</code> - Health check</li>
        <li><code>POST /api/chat</code> - Chat command webhook</li>
        <li><code>GET /api/tokens/:address/analysis</code> - Token analysis</li>
        <li><code>POST /api/alerts</code> - Set a price alert</li>
        <li><code>DELETE /api/alerts/:id?user_id=</code> - Cancel a price alert</li>
        <li><code>GET /api/users/:user_id/alerts</code> - A user's alerts</li>
    </ul>
</body>
</html>
    "#)
}

/// Health check endpoint
async fn health_check() -> &'static str {
    "OK"
}
