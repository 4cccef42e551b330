//! Fixed-answer provider for tests.

use std::collections::HashMap;

use alloy::primitives::{Address, U256};
use async_trait::async_trait;
use bigdecimal::BigDecimal;

use super::{ChainDataProvider, ChainError};
use crate::scoring::SignalSet;

/// Answers every read from its fields, regardless of the address asked.
///
/// Prices are looked up per token; a token without an entry fails its quote.
#[derive(Debug, Clone)]
pub struct StaticChainProvider {
    pub reserves: (U256, U256),
    pub volume_24h: BigDecimal,
    pub holder_count: u64,
    pub signals: SignalSet,
    pub prices: HashMap<Address, BigDecimal>,
    /// Make every read except price quotes fail
    pub unavailable: bool,
}

impl Default for StaticChainProvider {
    fn default() -> Self {
        Self {
            reserves: (U256::ZERO, U256::ZERO),
            volume_24h: BigDecimal::from(0),
            holder_count: 0,
            signals: SignalSet::default(),
            prices: HashMap::new(),
            unavailable: false,
        }
    }
}

impl StaticChainProvider {
    fn check(&self) -> Result<(), ChainError> {
        if self.unavailable {
            return Err(ChainError::Rpc("connection refused".into()));
        }
        Ok(())
    }
}

#[async_trait]
impl ChainDataProvider for StaticChainProvider {
    async fn reserves(&self, _pair: Address) -> Result<(U256, U256), ChainError> {
        self.check()?;
        Ok(self.reserves)
    }

    async fn volume_24h(&self, _token: Address) -> Result<BigDecimal, ChainError> {
        self.check()?;
        Ok(self.volume_24h.clone())
    }

    async fn holder_count(&self, _token: Address) -> Result<u64, ChainError> {
        self.check()?;
        Ok(self.holder_count)
    }

    async fn is_verified(&self, _token: Address) -> Result<bool, ChainError> {
        self.check()?;
        Ok(self.signals.contract_verified)
    }

    async fn is_liquidity_locked(&self, _pair: Address) -> Result<bool, ChainError> {
        self.check()?;
        Ok(self.signals.liquidity_locked)
    }

    async fn is_ownership_renounced(&self, _token: Address) -> Result<bool, ChainError> {
        self.check()?;
        Ok(self.signals.ownership_renounced)
    }

    async fn has_suspicious_functions(&self, _token: Address) -> Result<bool, ChainError> {
        self.check()?;
        Ok(!self.signals.no_suspicious_functions)
    }

    async fn current_price(&self, token: Address) -> Result<BigDecimal, ChainError> {
        self.prices
            .get(&token)
            .cloned()
            .ok_or(ChainError::EmptyPool(token))
    }
}
