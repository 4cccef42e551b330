//! Token API routes

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    response::IntoResponse,
    Json,
};
use dexbot_core::TokenHandle;

use super::error_response;
use crate::AppState;

/// GET /api/tokens/:address/analysis
/// Returns a freshly computed token report
pub async fn get_token_analysis(
    State(state): State<Arc<AppState>>,
    Path(address): Path<String>,
) -> impl IntoResponse {
    let token = match TokenHandle::parse(&address) {
        Ok(token) => token,
        Err(e) => return error_response(&e),
    };

    match state.scorer.score(&token).await {
        Ok(report) => Json(report).into_response(),
        Err(e) => error_response(&e),
    }
}
