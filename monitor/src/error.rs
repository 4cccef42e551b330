use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Missing `{0}` environment variable")]
    MissingEnvVar(String),

    #[error("Invalid `{0}` environment variable: `{1}`")]
    InvalidEnvVar(String, String),

    #[error("Redis connection error: {0}")]
    RedisConnection(String),

    #[error("Redis publish error: {0}")]
    RedisPublish(String),

    #[error("Notification encode error: {0}")]
    Encode(String),
}
