use std::env;

use sqlx::{
    migrate::{MigrateError, Migrator},
    postgres::{PgConnectOptions, PgPoolOptions},
    Pool, Postgres,
};
use thiserror::Error;

pub mod entity;

// Re-export commonly used types
pub use entity::{NewPriceAlertRecord, PriceAlertRecord, TokenStats};

/// Schema for `price_alerts` and `token_stats`, applied on startup
pub static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

mod defaults {
    pub const DATABASE_MAX_CONNECTIONS: &str = "5";
}

#[derive(Error, Debug)]
pub enum DbError {
    #[error("Invalid `{0}` environment variable: `{1}`")]
    InvalidEnvVar(&'static str, String),

    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),

    #[error("Failed to apply migrations: {0}")]
    Migrate(#[from] MigrateError),
}

async fn create_pool(max_connections: u32) -> Result<Pool<Postgres>, sqlx::Error> {
    // Connection details come from the standard PG* variables
    let conn = PgConnectOptions::new();

    PgPoolOptions::new()
        .max_connections(max_connections)
        .connect_with(conn)
        .await
}

pub async fn initialize_database() -> Result<Pool<Postgres>, DbError> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    let raw = env::var("DATABASE_MAX_CONNECTIONS")
        .unwrap_or(String::from(defaults::DATABASE_MAX_CONNECTIONS));
    let db_max_connections = raw
        .parse::<u32>()
        .map_err(|_| DbError::InvalidEnvVar("DATABASE_MAX_CONNECTIONS", raw.clone()))?;

    let pool = create_pool(db_max_connections).await?;
    MIGRATOR.run(&pool).await?;

    Ok(pool)
}
