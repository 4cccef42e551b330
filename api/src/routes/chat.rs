//! Chat webhook route

use std::sync::Arc;

use axum::{extract::State, Json};
use dexbot_core::UserId;
use serde::Deserialize;

use crate::{
    chat::{handle_message, Reply},
    AppState,
};

/// Incoming chat message forwarded by the messaging platform adapter
#[derive(Debug, Deserialize)]
pub struct ChatMessage {
    pub user_id: UserId,
    pub text: String,
}

/// POST /api/chat
/// Runs a chat command or menu callback and returns the reply to send
pub async fn post_message(
    State(state): State<Arc<AppState>>,
    Json(message): Json<ChatMessage>,
) -> Json<Reply> {
    tracing::debug!(user_id = message.user_id, text = %message.text, "Chat message");
    Json(handle_message(&state, message.user_id, &message.text).await)
}
