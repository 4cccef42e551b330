//! Price alert monitor
//!
//! Polls current prices for tokens with pending alerts, triggers the alerts
//! that reached their target and publishes them to Redis.

use std::{env, error::Error, sync::Arc};

use alloy::providers::ProviderBuilder;
use dexbot_core::{
    alerts::PgAlertStore, chain::RpcChainProvider, AlertRegistry, ChainConfig,
};
use dexbot_db::initialize_database;
use error::AppError;
use redis_client::RedisPublisher;
use service::check_and_notify;
use tokio::time::{sleep, Duration};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod error;
mod redis_client;
mod service;

mod defaults {
    pub const POLL_INTERVAL: &str = "30";
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "monitor=debug,dexbot_core=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting price alert monitor...");

    let db_pool = initialize_database().await?;
    tracing::info!("Connected to Postgres");

    let chain_config = ChainConfig::from_env()?;
    let provider = ProviderBuilder::new()
        .on_builtin(&chain_config.rpc_url)
        .await?;
    let chain = RpcChainProvider::new(provider, db_pool.clone(), chain_config.lp_lockers);

    let registry = AlertRegistry::new(Arc::new(PgAlertStore::new(db_pool)));
    let mut redis = RedisPublisher::new().await?;

    let raw_interval =
        env::var("POLL_INTERVAL").unwrap_or_else(|_| defaults::POLL_INTERVAL.to_string());
    let poll_interval = raw_interval
        .parse::<u64>()
        .map_err(|_| AppError::InvalidEnvVar("POLL_INTERVAL".into(), raw_interval.clone()))?;
    let sleep_duration = Duration::from_secs(poll_interval);

    tracing::info!("Monitor started. Polling every {} seconds...", poll_interval);

    loop {
        match check_and_notify(&registry, &chain, &mut redis).await {
            Ok(0) => {}
            Ok(count) => tracing::info!("Triggered {count} alerts"),
            Err(err) => tracing::error!("Alert check failed: {err}"),
        }

        sleep(sleep_duration).await;
    }
}
