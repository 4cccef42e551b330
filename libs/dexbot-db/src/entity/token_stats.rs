use sqlx::{
    types::{chrono, BigDecimal},
    Executor, Postgres,
};

/// Off-chain token statistics maintained by an external indexer
#[derive(sqlx::FromRow, Debug, Clone)]
pub struct TokenStats {
    pub address: String,
    pub volume_24h: BigDecimal,
    pub holder_count: i64,
    pub contract_verified: bool,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

impl TokenStats {
    /// Find stats by token address (lowercase hex, 0x-prefixed)
    pub async fn find_by_address<'c, E>(
        address: &str,
        connection: E,
    ) -> Result<Option<TokenStats>, sqlx::Error>
    where
        E: Executor<'c, Database = Postgres>,
    {
        sqlx::query_as::<_, TokenStats>("SELECT * FROM token_stats WHERE address = $1")
            .bind(address.to_lowercase())
            .fetch_optional(connection)
            .await
    }
}
