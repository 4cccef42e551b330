//! Alert API routes

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use bigdecimal::BigDecimal;
use dexbot_core::{AlertId, UserId};
use serde::{Deserialize, Serialize};

use super::error_response;
use crate::AppState;

/// Body for creating an alert
#[derive(Debug, Deserialize)]
pub struct CreateAlert {
    pub user_id: UserId,
    pub token_address: String,
    pub target_price: BigDecimal,
}

#[derive(Debug, Serialize)]
pub struct AlertCreated {
    pub alert_id: AlertId,
}

/// Query params for cancellation
#[derive(Debug, Deserialize)]
pub struct CancelParams {
    pub user_id: UserId,
}

/// POST /api/alerts
pub async fn create_alert(
    State(state): State<Arc<AppState>>,
    Json(body): Json<CreateAlert>,
) -> impl IntoResponse {
    match state
        .registry
        .set_alert(body.user_id, &body.token_address, body.target_price)
        .await
    {
        Ok(alert_id) => (StatusCode::CREATED, Json(AlertCreated { alert_id })).into_response(),
        Err(e) => error_response(&e),
    }
}

/// DELETE /api/alerts/:id?user_id=
pub async fn cancel_alert(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    Query(params): Query<CancelParams>,
) -> impl IntoResponse {
    match state.registry.cancel_alert(AlertId(id), params.user_id).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => error_response(&e),
    }
}

/// GET /api/users/:user_id/alerts
/// Returns the user's most recent alerts, newest first
pub async fn get_user_alerts(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<UserId>,
) -> impl IntoResponse {
    match state.registry.alerts_for_user(user_id).await {
        Ok(alerts) => Json(alerts).into_response(),
        Err(e) => error_response(&e),
    }
}
