use std::env;

use async_trait::async_trait;
use redis::{aio::MultiplexedConnection, AsyncCommands, Client};

use crate::{
    error::AppError,
    service::{AlertNotifier, TriggeredAlertPayload},
};

/// Redis publisher for triggered alert notifications
pub struct RedisPublisher {
    connection: MultiplexedConnection,
}

impl RedisPublisher {
    /// Create a new Redis publisher from REDIS_URL environment variable
    pub async fn new() -> Result<Self, AppError> {
        let redis_url = env::var("REDIS_URL")
            .map_err(|_| AppError::MissingEnvVar("REDIS_URL".to_string()))?;

        let client = Client::open(redis_url.as_str())
            .map_err(|e| AppError::RedisConnection(e.to_string()))?;

        let connection = client
            .get_multiplexed_async_connection()
            .await
            .map_err(|e| AppError::RedisConnection(e.to_string()))?;

        tracing::info!("Connected to Redis at {}", redis_url);
        Ok(Self { connection })
    }

    /// Publish a message to a Redis channel
    pub async fn publish(&mut self, channel: &str, payload: &str) -> Result<(), AppError> {
        self.connection
            .publish::<_, _, ()>(channel, payload)
            .await
            .map_err(|e| AppError::RedisPublish(e.to_string()))?;
        Ok(())
    }
}

#[async_trait]
impl AlertNotifier for RedisPublisher {
    async fn notify(&mut self, payload: &TriggeredAlertPayload) -> Result<(), AppError> {
        let body =
            serde_json::to_string(payload).map_err(|e| AppError::Encode(e.to_string()))?;
        self.publish(channels::TRIGGERED_ALERTS, &body).await
    }
}

/// Redis channels for bot notifications
pub mod channels {
    /// Channel consumed by the chat delivery worker
    pub const TRIGGERED_ALERTS: &str = "dexbot:alerts:triggered";
}
