use std::collections::HashMap;

use alloy::primitives::Address;
use async_trait::async_trait;
use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use dexbot_core::{AlertId, AlertRegistry, ChainDataProvider, PriceAlert, UserId};
use serde::Serialize;

use crate::error::AppError;

/// Message published for every triggered alert
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TriggeredAlertPayload {
    pub alert_id: AlertId,
    pub user_id: UserId,
    pub token_address: Address,
    pub target_price: BigDecimal,
    /// Price observed when the alert fired
    pub price: BigDecimal,
    pub triggered_at: DateTime<Utc>,
}

impl TriggeredAlertPayload {
    pub fn from_alert(alert: &PriceAlert, price: BigDecimal) -> Self {
        Self {
            alert_id: alert.id,
            user_id: alert.user_id,
            token_address: alert.token_address,
            target_price: alert.target_price.clone(),
            price,
            triggered_at: alert.resolved_at.unwrap_or_else(Utc::now),
        }
    }
}

/// Delivery side of triggered alerts
#[async_trait]
pub trait AlertNotifier: Send {
    async fn notify(&mut self, payload: &TriggeredAlertPayload) -> Result<(), AppError>;
}

/// Quote every token with pending alerts
async fn quote_prices(
    registry: &AlertRegistry,
    provider: &dyn ChainDataProvider,
) -> Result<HashMap<Address, BigDecimal>, dexbot_core::Error> {
    let tokens = registry.pending_tokens().await?;
    let mut prices = HashMap::with_capacity(tokens.len());

    for token in tokens {
        match provider.current_price(token).await {
            Ok(price) => {
                prices.insert(token, price);
            }
            Err(e) => {
                // Skip this token; its alerts wait for the next pass
                tracing::warn!(%token, error = %e, "Price quote failed");
            }
        }
    }

    Ok(prices)
}

/// One monitor pass: quote, check, notify.
///
/// Returns the number of alerts triggered. Delivery is at most once: a
/// payload that fails to publish is logged and never retried, and the alert
/// stays `Triggered`.
pub async fn check_and_notify<N: AlertNotifier>(
    registry: &AlertRegistry,
    provider: &dyn ChainDataProvider,
    notifier: &mut N,
) -> Result<usize, dexbot_core::Error> {
    let prices = quote_prices(registry, provider).await?;
    if prices.is_empty() {
        tracing::debug!("No prices to check");
        return Ok(0);
    }

    let triggered = registry.check_alerts(&prices).await?;

    for alert in &triggered {
        let Some(price) = prices.get(&alert.token_address) else {
            continue;
        };
        let payload = TriggeredAlertPayload::from_alert(alert, price.clone());

        if let Err(e) = notifier.notify(&payload).await {
            tracing::error!(
                alert_id = %alert.id,
                user_id = alert.user_id,
                error = %e,
                "Failed to publish alert, notification dropped"
            );
        }
    }

    Ok(triggered.len())
}
