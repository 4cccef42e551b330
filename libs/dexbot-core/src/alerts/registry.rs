use std::{collections::HashMap, sync::Arc};

use alloy::primitives::Address;
use bigdecimal::{BigDecimal, Zero};

use super::{AlertId, AlertStatus, AlertStore, InMemoryAlertStore, NewPriceAlert, PriceAlert, UserId};
use crate::{chain::parse_address, error::Error};

mod defaults {
    pub const USER_ALERT_LIMIT: usize = 50;
}

/// Owns the alert lifecycle. Built once per process and handed to every
/// request handler.
#[derive(Clone)]
pub struct AlertRegistry {
    store: Arc<dyn AlertStore>,
}

impl AlertRegistry {
    pub fn new(store: Arc<dyn AlertStore>) -> Self {
        Self { store }
    }

    pub fn in_memory() -> Self {
        Self::new(Arc::new(InMemoryAlertStore::new()))
    }

    /// Register a pending alert for `token_address` at `target_price`
    pub async fn set_alert(
        &self,
        user_id: UserId,
        token_address: &str,
        target_price: BigDecimal,
    ) -> Result<AlertId, Error> {
        if target_price <= BigDecimal::zero() {
            return Err(Error::InvalidPrice(target_price.to_string()));
        }

        let token_address = parse_address(token_address)?;

        let alert = self
            .store
            .insert(NewPriceAlert {
                user_id,
                token_address,
                target_price,
            })
            .await?;

        tracing::info!(
            alert_id = %alert.id,
            user_id,
            token = %alert.token_address,
            target = %alert.target_price,
            "Alert set"
        );

        Ok(alert.id)
    }

    /// Trigger every pending alert whose token price reached its target.
    ///
    /// Returns only the alerts this call moved to `Triggered`; an alert is
    /// never returned twice, even across concurrent calls.
    pub async fn check_alerts(
        &self,
        current_prices: &HashMap<Address, BigDecimal>,
    ) -> Result<Vec<PriceAlert>, Error> {
        if current_prices.is_empty() {
            return Ok(Vec::new());
        }

        let mut triggered = Vec::new();

        for alert in self.store.pending().await? {
            let Some(price) = current_prices.get(&alert.token_address) else {
                continue;
            };

            if *price < alert.target_price {
                continue;
            }

            // Lost races (cancelled or triggered elsewhere) come back as None
            if let Some(updated) = self.store.resolve(alert.id, AlertStatus::Triggered).await? {
                tracing::info!(
                    alert_id = %updated.id,
                    user_id = updated.user_id,
                    token = %updated.token_address,
                    %price,
                    target = %updated.target_price,
                    "Alert triggered"
                );
                triggered.push(updated);
            }
        }

        Ok(triggered)
    }

    /// Cancel a pending alert on behalf of its owner
    pub async fn cancel_alert(
        &self,
        alert_id: AlertId,
        requesting_user: UserId,
    ) -> Result<(), Error> {
        let alert = match self.store.get(alert_id).await? {
            Some(alert) if alert.status == AlertStatus::Pending => alert,
            _ => return Err(Error::NotFound(alert_id)),
        };

        if alert.user_id != requesting_user {
            tracing::warn!(%alert_id, requesting_user, "Cancel refused: not the owner");
            return Err(Error::Forbidden(alert_id));
        }

        self.store
            .resolve(alert_id, AlertStatus::Cancelled)
            .await?
            .ok_or(Error::NotFound(alert_id))?;

        tracing::info!(%alert_id, user_id = requesting_user, "Alert cancelled");

        Ok(())
    }

    pub async fn get(&self, alert_id: AlertId) -> Result<Option<PriceAlert>, Error> {
        Ok(self.store.get(alert_id).await?)
    }

    /// A user's most recent alerts, newest first
    pub async fn alerts_for_user(&self, user_id: UserId) -> Result<Vec<PriceAlert>, Error> {
        Ok(self
            .store
            .by_user(user_id, defaults::USER_ALERT_LIMIT)
            .await?)
    }

    /// Tokens that need a price quote on the next check
    pub async fn pending_tokens(&self) -> Result<Vec<Address>, Error> {
        Ok(self.store.pending_tokens().await?)
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::*;

    const TOKEN: &str = "0xc765bddb93b0d1c1a88282ba0fa6b2d00e3e0c83";
    const OTHER_TOKEN: &str = "0x407993575c91ce7643a4d4ccacc9a98c36ee1bbe";

    fn price(value: &str) -> BigDecimal {
        BigDecimal::from_str(value).unwrap()
    }

    fn prices(entries: &[(&str, &str)]) -> HashMap<Address, BigDecimal> {
        entries
            .iter()
            .map(|(token, value)| (parse_address(token).unwrap(), price(value)))
            .collect()
    }

    #[tokio::test]
    async fn test_zero_price_rejected() {
        let registry = AlertRegistry::in_memory();
        let err = registry.set_alert(1, TOKEN, price("0")).await.unwrap_err();
        assert!(matches!(err, Error::InvalidPrice(_)));
    }

    #[tokio::test]
    async fn test_negative_price_rejected() {
        let registry = AlertRegistry::in_memory();
        let err = registry.set_alert(1, TOKEN, price("-2.5")).await.unwrap_err();
        assert!(matches!(err, Error::InvalidPrice(_)));
    }

    #[tokio::test]
    async fn test_price_checked_before_address() {
        let registry = AlertRegistry::in_memory();
        let err = registry.set_alert(1, "0xValid", price("0")).await.unwrap_err();
        assert!(matches!(err, Error::InvalidPrice(ref p) if p == "0"));
        assert!(registry.pending_tokens().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_invalid_address_rejected() {
        let registry = AlertRegistry::in_memory();
        let err = registry.set_alert(1, "0xValid", price("1")).await.unwrap_err();
        assert!(matches!(err, Error::InvalidAddress(_)));
        assert!(registry.pending_tokens().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_trigger_exactly_once() {
        let registry = AlertRegistry::in_memory();
        let id = registry.set_alert(1, TOKEN, price("1.5")).await.unwrap();

        let feed = prices(&[(TOKEN, "1.5")]);
        let first = registry.check_alerts(&feed).await.unwrap();
        assert_eq!(first.len(), 1);
        assert_eq!(first[0].id, id);
        assert_eq!(first[0].status, AlertStatus::Triggered);
        assert!(first[0].resolved_at.is_some());

        let second = registry.check_alerts(&feed).await.unwrap();
        assert!(second.is_empty());
    }

    #[tokio::test]
    async fn test_price_below_target_stays_pending() {
        let registry = AlertRegistry::in_memory();
        let id = registry.set_alert(1, TOKEN, price("2")).await.unwrap();

        let triggered = registry
            .check_alerts(&prices(&[(TOKEN, "1.999")]))
            .await
            .unwrap();

        assert!(triggered.is_empty());
        let alert = registry.get(id).await.unwrap().unwrap();
        assert_eq!(alert.status, AlertStatus::Pending);
    }

    #[tokio::test]
    async fn test_only_matching_tokens_trigger() {
        let registry = AlertRegistry::in_memory();
        let hit = registry.set_alert(1, TOKEN, price("1")).await.unwrap();
        let miss = registry.set_alert(1, OTHER_TOKEN, price("1")).await.unwrap();
        let second_hit = registry.set_alert(2, TOKEN, price("0.5")).await.unwrap();

        let triggered = registry
            .check_alerts(&prices(&[(TOKEN, "3")]))
            .await
            .unwrap();
        let ids: Vec<AlertId> = triggered.iter().map(|a| a.id).collect();

        assert_eq!(ids, vec![hit, second_hit]);
        let pending = registry.get(miss).await.unwrap().unwrap();
        assert_eq!(pending.status, AlertStatus::Pending);
        assert_eq!(
            registry.pending_tokens().await.unwrap(),
            vec![parse_address(OTHER_TOKEN).unwrap()]
        );
    }

    #[tokio::test]
    async fn test_empty_price_map_changes_nothing() {
        let registry = AlertRegistry::in_memory();
        let id = registry.set_alert(1, TOKEN, price("1")).await.unwrap();

        let triggered = registry.check_alerts(&HashMap::new()).await.unwrap();

        assert!(triggered.is_empty());
        let alert = registry.get(id).await.unwrap().unwrap();
        assert_eq!(alert.status, AlertStatus::Pending);
        assert!(alert.resolved_at.is_none());
    }

    #[tokio::test]
    async fn test_cancel_by_other_user_forbidden() {
        let registry = AlertRegistry::in_memory();
        let id = registry.set_alert(1, TOKEN, price("1")).await.unwrap();

        let err = registry.cancel_alert(id, 2).await.unwrap_err();
        assert!(matches!(err, Error::Forbidden(alert_id) if alert_id == id));

        let alert = registry.get(id).await.unwrap().unwrap();
        assert_eq!(alert.status, AlertStatus::Pending);
    }

    #[tokio::test]
    async fn test_cancel_by_owner() {
        let registry = AlertRegistry::in_memory();
        let id = registry.set_alert(1, TOKEN, price("1")).await.unwrap();

        registry.cancel_alert(id, 1).await.unwrap();

        let alert = registry.get(id).await.unwrap().unwrap();
        assert_eq!(alert.status, AlertStatus::Cancelled);

        // Cancelled alerts never trigger
        let triggered = registry
            .check_alerts(&prices(&[(TOKEN, "10")]))
            .await
            .unwrap();
        assert!(triggered.is_empty());
    }

    #[tokio::test]
    async fn test_cancel_missing_or_resolved_not_found() {
        let registry = AlertRegistry::in_memory();
        let err = registry.cancel_alert(AlertId(99), 1).await.unwrap_err();
        assert!(matches!(err, Error::NotFound(AlertId(99))));

        let id = registry.set_alert(1, TOKEN, price("1")).await.unwrap();
        registry
            .check_alerts(&prices(&[(TOKEN, "1")]))
            .await
            .unwrap();

        let err = registry.cancel_alert(id, 1).await.unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));
        let err = registry.cancel_alert(id, 2).await.unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));
    }

    #[tokio::test]
    async fn test_user_may_hold_many_alerts_per_token() {
        let registry = AlertRegistry::in_memory();
        let a = registry.set_alert(1, TOKEN, price("1")).await.unwrap();
        let b = registry.set_alert(1, TOKEN, price("2")).await.unwrap();

        assert_ne!(a, b);
        let alerts = registry.alerts_for_user(1).await.unwrap();
        assert_eq!(alerts.len(), 2);
        assert!(registry.alerts_for_user(2).await.unwrap().is_empty());
    }
}
