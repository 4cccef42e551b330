use sqlx::{
    types::{chrono, BigDecimal},
    Executor, Postgres,
};

/// Row of the `price_alerts` table
#[derive(sqlx::FromRow, Debug, Clone)]
pub struct PriceAlertRecord {
    pub id: i64,
    pub user_id: i64,
    pub token_address: String,
    pub target_price: BigDecimal,
    pub status: String,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub resolved_at: Option<chrono::DateTime<chrono::Utc>>,
}

/// Input for creating a new price alert
#[derive(Debug, Clone)]
pub struct NewPriceAlertRecord {
    pub user_id: i64,
    pub token_address: String,
    pub target_price: BigDecimal,
}

impl PriceAlertRecord {
    /// Insert a pending alert
    pub async fn create<'c, E>(
        alert: &NewPriceAlertRecord,
        connection: E,
    ) -> Result<PriceAlertRecord, sqlx::Error>
    where
        E: Executor<'c, Database = Postgres>,
    {
        let query = r#"
            INSERT INTO price_alerts (user_id, token_address, target_price)
            VALUES ($1, $2, $3)
            RETURNING *
        "#;

        sqlx::query_as::<_, PriceAlertRecord>(query)
            .bind(alert.user_id)
            .bind(alert.token_address.to_lowercase())
            .bind(&alert.target_price)
            .fetch_one(connection)
            .await
    }

    pub async fn find_by_id<'c, E>(
        id: i64,
        connection: E,
    ) -> Result<Option<PriceAlertRecord>, sqlx::Error>
    where
        E: Executor<'c, Database = Postgres>,
    {
        sqlx::query_as::<_, PriceAlertRecord>("SELECT * FROM price_alerts WHERE id = $1")
            .bind(id)
            .fetch_optional(connection)
            .await
    }

    /// All pending alerts, oldest first
    pub async fn find_pending<'c, E>(connection: E) -> Result<Vec<PriceAlertRecord>, sqlx::Error>
    where
        E: Executor<'c, Database = Postgres>,
    {
        sqlx::query_as::<_, PriceAlertRecord>(
            "SELECT * FROM price_alerts WHERE status = 'pending' ORDER BY id ASC",
        )
        .fetch_all(connection)
        .await
    }

    /// Distinct tokens that still have pending alerts
    pub async fn pending_tokens<'c, E>(connection: E) -> Result<Vec<String>, sqlx::Error>
    where
        E: Executor<'c, Database = Postgres>,
    {
        sqlx::query_scalar(
            "SELECT DISTINCT token_address FROM price_alerts WHERE status = 'pending'",
        )
        .fetch_all(connection)
        .await
    }

    /// Alerts owned by a user, newest first
    pub async fn find_by_user<'c, E>(
        user_id: i64,
        limit: i64,
        connection: E,
    ) -> Result<Vec<PriceAlertRecord>, sqlx::Error>
    where
        E: Executor<'c, Database = Postgres>,
    {
        sqlx::query_as::<_, PriceAlertRecord>(
            "SELECT * FROM price_alerts WHERE user_id = $1 ORDER BY created_at DESC, id DESC LIMIT $2",
        )
        .bind(user_id)
        .bind(limit)
        .fetch_all(connection)
        .await
    }

    /// Move a pending alert to a terminal status.
    ///
    /// Returns `None` when the alert was no longer pending, so concurrent
    /// transitions on the same alert resolve to exactly one winner.
    pub async fn resolve<'c, E>(
        id: i64,
        new_status: &str,
        connection: E,
    ) -> Result<Option<PriceAlertRecord>, sqlx::Error>
    where
        E: Executor<'c, Database = Postgres>,
    {
        let query = r#"
            UPDATE price_alerts
            SET status = $2, resolved_at = NOW()
            WHERE id = $1 AND status = 'pending'
            RETURNING *
        "#;

        sqlx::query_as::<_, PriceAlertRecord>(query)
            .bind(id)
            .bind(new_status)
            .fetch_optional(connection)
            .await
    }
}
