use std::str::FromStr;

use alloy::primitives::Address;
use async_trait::async_trait;
use dexbot_db::{NewPriceAlertRecord, PriceAlertRecord};
use sqlx::{Pool, Postgres};

use super::{AlertId, AlertStatus, AlertStore, NewPriceAlert, PriceAlert, StoreError, UserId};

/// Alert store backed by the `price_alerts` table
#[derive(Clone)]
pub struct PgAlertStore {
    db_pool: Pool<Postgres>,
}

impl PgAlertStore {
    pub fn new(db_pool: Pool<Postgres>) -> Self {
        Self { db_pool }
    }
}

impl TryFrom<PriceAlertRecord> for PriceAlert {
    type Error = StoreError;

    fn try_from(record: PriceAlertRecord) -> Result<Self, Self::Error> {
        let token_address = Address::from_str(&record.token_address)
            .map_err(|e| StoreError::Corrupt(record.id, e.to_string()))?;
        let status = AlertStatus::from_str(&record.status)
            .map_err(|e| StoreError::Corrupt(record.id, e))?;

        Ok(PriceAlert {
            id: AlertId(record.id),
            user_id: record.user_id,
            token_address,
            target_price: record.target_price,
            created_at: record.created_at,
            status,
            resolved_at: record.resolved_at,
        })
    }
}

fn convert_all(records: Vec<PriceAlertRecord>) -> Result<Vec<PriceAlert>, StoreError> {
    records.into_iter().map(PriceAlert::try_from).collect()
}

#[async_trait]
impl AlertStore for PgAlertStore {
    async fn insert(&self, alert: NewPriceAlert) -> Result<PriceAlert, StoreError> {
        let record = NewPriceAlertRecord {
            user_id: alert.user_id,
            token_address: alert.token_address.to_string(),
            target_price: alert.target_price,
        };

        PriceAlertRecord::create(&record, &self.db_pool)
            .await?
            .try_into()
    }

    async fn get(&self, id: AlertId) -> Result<Option<PriceAlert>, StoreError> {
        PriceAlertRecord::find_by_id(id.0, &self.db_pool)
            .await?
            .map(PriceAlert::try_from)
            .transpose()
    }

    async fn pending(&self) -> Result<Vec<PriceAlert>, StoreError> {
        convert_all(PriceAlertRecord::find_pending(&self.db_pool).await?)
    }

    async fn pending_tokens(&self) -> Result<Vec<Address>, StoreError> {
        let tokens = PriceAlertRecord::pending_tokens(&self.db_pool).await?;

        tokens
            .iter()
            .map(|t| {
                Address::from_str(t).map_err(|e| StoreError::Corrupt(0, format!("{t}: {e}")))
            })
            .collect()
    }

    async fn by_user(&self, user_id: UserId, limit: usize) -> Result<Vec<PriceAlert>, StoreError> {
        let limit = i64::try_from(limit).unwrap_or(i64::MAX);
        convert_all(PriceAlertRecord::find_by_user(user_id, limit, &self.db_pool).await?)
    }

    async fn resolve(
        &self,
        id: AlertId,
        status: AlertStatus,
    ) -> Result<Option<PriceAlert>, StoreError> {
        if !status.is_terminal() {
            return Err(StoreError::InvalidTransition(id, status.as_str()));
        }

        PriceAlertRecord::resolve(id.0, status.as_str(), &self.db_pool)
            .await?
            .map(PriceAlert::try_from)
            .transpose()
    }
}
