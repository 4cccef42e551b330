//! API route definitions

pub mod alerts;
pub mod chat;
pub mod tokens;

use std::sync::Arc;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{delete, get, post},
    Json, Router,
};
use dexbot_core::Error;
use serde::Serialize;

use crate::AppState;

/// Create all API routes
pub fn api_routes() -> Router<Arc<AppState>> {
    Router::new()
        // Chat webhook
        .route("/chat", post(chat::post_message))
        // Token routes
        .route("/tokens/:address/analysis", get(tokens::get_token_analysis))
        // Alert routes
        .route("/alerts", post(alerts::create_alert))
        .route("/alerts/:id", delete(alerts::cancel_alert))
        .route("/users/:user_id/alerts", get(alerts::get_user_alerts))
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
}

/// Map a core error onto an HTTP response
pub fn error_response(err: &Error) -> Response {
    let status = match err {
        Error::InvalidAddress(_) | Error::InvalidPrice(_) => StatusCode::BAD_REQUEST,
        Error::DataUnavailable(_) => StatusCode::BAD_GATEWAY,
        Error::NotFound(_) => StatusCode::NOT_FOUND,
        Error::Forbidden(_) => StatusCode::FORBIDDEN,
        Error::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };

    if status.is_server_error() {
        tracing::error!("Request failed: {}", err);
    }

    (
        status,
        Json(ErrorBody {
            error: err.to_string(),
        }),
    )
        .into_response()
}
