//! JSON-RPC backed chain data provider.
//!
//! Pool reserves, ownership, LP locks and bytecode come from the node.
//! Volume, holder count and verification status come from the `token_stats`
//! table, which an external indexer keeps up to date.

use alloy::{
    primitives::{keccak256, Address, U256},
    providers::Provider,
    sol,
};
use async_trait::async_trait;
use bigdecimal::{BigDecimal, Zero};
use dexbot_db::TokenStats;
use sqlx::{Pool, Postgres};

use super::{ChainDataProvider, ChainError};
use crate::scoring::scale_reserve;

sol! {
    #[sol(rpc)]
    interface IDexPair {
        // Declared as uint256 on the way out; uint112 words decode the same
        function getReserves() external view returns (uint256 reserve0, uint256 reserve1, uint32 blockTimestampLast);
        function balanceOf(address owner) external view returns (uint256);
    }

    #[sol(rpc)]
    interface IOwnable {
        function owner() external view returns (address);
    }
}

/// Function signatures whose presence in deployed bytecode flags a token
pub const SUSPICIOUS_SIGNATURES: &[&str] = &[
    "mint(address,uint256)",
    "blacklist(address)",
    "addToBlacklist(address)",
    "setFee(uint256)",
    "setTaxFee(uint256)",
    "setMaxTxAmount(uint256)",
    "pause()",
];

/// Both sides of a pool are quoted with this many decimals
const PRICE_DECIMALS: u32 = 18;

/// Check whether `code` embeds the 4-byte selector of `signature`
pub fn contains_selector(code: &[u8], signature: &str) -> bool {
    let hash = keccak256(signature.as_bytes());
    let selector = &hash[..4];
    code.windows(4).any(|window| window == selector)
}

pub struct RpcChainProvider<P> {
    provider: P,
    db_pool: Pool<Postgres>,
    lp_lockers: Vec<Address>,
}

impl<P> RpcChainProvider<P>
where
    P: Provider + 'static,
{
    pub fn new(provider: P, db_pool: Pool<Postgres>, lp_lockers: Vec<Address>) -> Self {
        Self {
            provider,
            db_pool,
            lp_lockers,
        }
    }

    async fn stats(&self, token: Address) -> Result<TokenStats, ChainError> {
        TokenStats::find_by_address(&token.to_string(), &self.db_pool)
            .await
            .map_err(|e| ChainError::Stats(e.to_string()))?
            .ok_or(ChainError::MissingStats(token))
    }

    async fn code(&self, address: Address) -> Result<Vec<u8>, ChainError> {
        let code = self
            .provider
            .get_code_at(address)
            .await
            .map_err(|e| ChainError::Rpc(e.to_string()))?;

        if code.is_empty() {
            return Err(ChainError::NoCode(address));
        }

        Ok(code.to_vec())
    }
}

#[async_trait]
impl<P> ChainDataProvider for RpcChainProvider<P>
where
    P: Provider + 'static,
{
    async fn reserves(&self, pair: Address) -> Result<(U256, U256), ChainError> {
        let contract = IDexPair::new(pair, &self.provider);
        let reserves = contract
            .getReserves()
            .call()
            .await
            .map_err(|e| ChainError::Rpc(e.to_string()))?;

        Ok((reserves.reserve0, reserves.reserve1))
    }

    async fn volume_24h(&self, token: Address) -> Result<BigDecimal, ChainError> {
        Ok(self.stats(token).await?.volume_24h)
    }

    async fn holder_count(&self, token: Address) -> Result<u64, ChainError> {
        let stats = self.stats(token).await?;
        u64::try_from(stats.holder_count)
            .map_err(|_| ChainError::Stats(format!("negative holder count for {token}")))
    }

    async fn is_verified(&self, token: Address) -> Result<bool, ChainError> {
        Ok(self.stats(token).await?.contract_verified)
    }

    async fn is_liquidity_locked(&self, pair: Address) -> Result<bool, ChainError> {
        let contract = IDexPair::new(pair, &self.provider);

        for locker in &self.lp_lockers {
            let balance = contract
                .balanceOf(*locker)
                .call()
                .await
                .map_err(|e| ChainError::Rpc(e.to_string()))?
                ._0;

            if !balance.is_zero() {
                tracing::debug!(%pair, %locker, %balance, "LP tokens held by locker");
                return Ok(true);
            }
        }

        Ok(false)
    }

    async fn is_ownership_renounced(&self, token: Address) -> Result<bool, ChainError> {
        let contract = IOwnable::new(token, &self.provider);
        let owner = contract
            .owner()
            .call()
            .await
            .map_err(|e| ChainError::Rpc(e.to_string()))?
            ._0;

        Ok(owner == Address::ZERO)
    }

    async fn has_suspicious_functions(&self, token: Address) -> Result<bool, ChainError> {
        let code = self.code(token).await?;

        Ok(SUSPICIOUS_SIGNATURES
            .iter()
            .any(|signature| contains_selector(&code, signature)))
    }

    async fn current_price(&self, token: Address) -> Result<BigDecimal, ChainError> {
        let (reserve0, reserve1) = self.reserves(token).await?;
        let base = scale_reserve(reserve0, PRICE_DECIMALS);
        let quote = scale_reserve(reserve1, PRICE_DECIMALS);

        if base.is_zero() {
            return Err(ChainError::EmptyPool(token));
        }

        Ok(quote / base)
    }
}
