use std::collections::{BTreeMap, BTreeSet};

use alloy::primitives::Address;
use async_trait::async_trait;
use chrono::Utc;
use thiserror::Error;
use tokio::sync::RwLock;

use super::{AlertId, AlertStatus, NewPriceAlert, PriceAlert, UserId};

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Corrupt alert row {0}: {1}")]
    Corrupt(i64, String),

    #[error("Cannot move alert {0} to `{1}`")]
    InvalidTransition(AlertId, &'static str),
}

/// Persistence seam for the alert registry.
///
/// `resolve` is a compare-and-set on `Pending`: of any number of concurrent
/// transitions on one alert, exactly one returns `Some`.
#[async_trait]
pub trait AlertStore: Send + Sync {
    async fn insert(&self, alert: NewPriceAlert) -> Result<PriceAlert, StoreError>;

    async fn get(&self, id: AlertId) -> Result<Option<PriceAlert>, StoreError>;

    /// Pending alerts, oldest first
    async fn pending(&self) -> Result<Vec<PriceAlert>, StoreError>;

    async fn pending_tokens(&self) -> Result<Vec<Address>, StoreError>;

    /// A user's alerts, newest first
    async fn by_user(&self, user_id: UserId, limit: usize) -> Result<Vec<PriceAlert>, StoreError>;

    /// Move a pending alert to `status`, returning the updated alert.
    async fn resolve(
        &self,
        id: AlertId,
        status: AlertStatus,
    ) -> Result<Option<PriceAlert>, StoreError>;
}

#[derive(Default)]
struct MemoryState {
    next_id: i64,
    alerts: BTreeMap<AlertId, PriceAlert>,
}

/// Process-local store
#[derive(Default)]
pub struct InMemoryAlertStore {
    state: RwLock<MemoryState>,
}

impl InMemoryAlertStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl AlertStore for InMemoryAlertStore {
    async fn insert(&self, alert: NewPriceAlert) -> Result<PriceAlert, StoreError> {
        let mut state = self.state.write().await;
        state.next_id += 1;

        let alert = PriceAlert {
            id: AlertId(state.next_id),
            user_id: alert.user_id,
            token_address: alert.token_address,
            target_price: alert.target_price,
            created_at: Utc::now(),
            status: AlertStatus::Pending,
            resolved_at: None,
        };
        state.alerts.insert(alert.id, alert.clone());

        Ok(alert)
    }

    async fn get(&self, id: AlertId) -> Result<Option<PriceAlert>, StoreError> {
        Ok(self.state.read().await.alerts.get(&id).cloned())
    }

    async fn pending(&self) -> Result<Vec<PriceAlert>, StoreError> {
        let state = self.state.read().await;
        Ok(state
            .alerts
            .values()
            .filter(|a| a.status == AlertStatus::Pending)
            .cloned()
            .collect())
    }

    async fn pending_tokens(&self) -> Result<Vec<Address>, StoreError> {
        let state = self.state.read().await;
        let tokens: BTreeSet<Address> = state
            .alerts
            .values()
            .filter(|a| a.status == AlertStatus::Pending)
            .map(|a| a.token_address)
            .collect();

        Ok(tokens.into_iter().collect())
    }

    async fn by_user(&self, user_id: UserId, limit: usize) -> Result<Vec<PriceAlert>, StoreError> {
        let state = self.state.read().await;
        Ok(state
            .alerts
            .values()
            .rev()
            .filter(|a| a.user_id == user_id)
            .take(limit)
            .cloned()
            .collect())
    }

    async fn resolve(
        &self,
        id: AlertId,
        status: AlertStatus,
    ) -> Result<Option<PriceAlert>, StoreError> {
        if !status.is_terminal() {
            return Err(StoreError::InvalidTransition(id, status.as_str()));
        }

        let mut state = self.state.write().await;
        match state.alerts.get_mut(&id) {
            Some(alert) if alert.status == AlertStatus::Pending => {
                alert.status = status;
                alert.resolved_at = Some(Utc::now());
                Ok(Some(alert.clone()))
            }
            _ => Ok(None),
        }
    }
}
