//! Chain data provider interface.
//!
//! The scorer and the price monitor only see this trait. Transport details
//! stay inside [`ChainError`] and are flattened into
//! [`crate::Error::DataUnavailable`] before reaching callers.

pub mod rpc;

#[cfg(any(test, feature = "test-util"))]
pub mod fake;

use std::str::FromStr;

use alloy::primitives::{Address, U256};
use async_trait::async_trait;
use bigdecimal::BigDecimal;
use thiserror::Error;

use crate::error::Error;

pub use rpc::RpcChainProvider;

#[derive(Error, Debug)]
pub enum ChainError {
    #[error("RPC error: {0}")]
    Rpc(String),

    #[error("No contract code at {0}")]
    NoCode(Address),

    #[error("Pool {0} has an empty reserve")]
    EmptyPool(Address),

    #[error("No indexed stats for token {0}")]
    MissingStats(Address),

    #[error("Stats lookup failed: {0}")]
    Stats(String),
}

/// Read-only capabilities the analysis needs from the chain.
///
/// `pair` arguments name a DEX pool contract; `token` arguments name the
/// contract being analyzed. The bot analyzes pool addresses directly, so in
/// practice both are the same address.
#[async_trait]
pub trait ChainDataProvider: Send + Sync {
    /// Raw `(reserve0, reserve1)` of a pool
    async fn reserves(&self, pair: Address) -> Result<(U256, U256), ChainError>;

    async fn volume_24h(&self, token: Address) -> Result<BigDecimal, ChainError>;

    async fn holder_count(&self, token: Address) -> Result<u64, ChainError>;

    async fn is_verified(&self, token: Address) -> Result<bool, ChainError>;

    async fn is_liquidity_locked(&self, pair: Address) -> Result<bool, ChainError>;

    async fn is_ownership_renounced(&self, token: Address) -> Result<bool, ChainError>;

    async fn has_suspicious_functions(&self, token: Address) -> Result<bool, ChainError>;

    /// Current price of the token, quoted in the pool's counter asset
    async fn current_price(&self, token: Address) -> Result<BigDecimal, ChainError>;
}

/// A validated contract address submitted for analysis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TokenHandle {
    pub address: Address,
}

impl TokenHandle {
    pub fn parse(input: &str) -> Result<Self, Error> {
        parse_address(input).map(|address| Self { address })
    }
}

impl FromStr for TokenHandle {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// Parse a 20-byte hex address, with or without the `0x` prefix.
///
/// All-lowercase and all-uppercase inputs are accepted as-is; mixed case must
/// carry a valid EIP-55 checksum.
pub fn parse_address(input: &str) -> Result<Address, Error> {
    let trimmed = input.trim();
    let hex = trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
        .unwrap_or(trimmed);

    if hex.len() != 40 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(Error::InvalidAddress(input.to_string()));
    }

    let has_lower = hex.chars().any(|c| c.is_ascii_lowercase());
    let has_upper = hex.chars().any(|c| c.is_ascii_uppercase());

    let parsed = if has_lower && has_upper {
        Address::parse_checksummed(format!("0x{hex}"), None).ok()
    } else {
        Address::from_str(hex).ok()
    };

    parsed.ok_or_else(|| Error::InvalidAddress(input.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lowercase_address() {
        let addr = parse_address("0xc765bddb93b0d1c1a88282ba0fa6b2d00e3e0c83").unwrap();
        assert_eq!(
            addr,
            Address::from_str("c765bddb93b0d1c1a88282ba0fa6b2d00e3e0c83").unwrap()
        );
    }

    #[test]
    fn test_prefix_is_optional() {
        assert!(parse_address("bb4cdb9cbd36b01bd1cbaebf2de08d9173bc095c").is_ok());
    }

    #[test]
    fn test_valid_checksum() {
        assert!(parse_address("0xbb4CdB9CBd36B01bD1cBaEBF2De08d9173bc095c").is_ok());
    }

    #[test]
    fn test_bad_checksum_rejected() {
        let err = parse_address("0xBb4CdB9CBd36B01bD1cBaEBF2De08d9173bc095c").unwrap_err();
        assert!(matches!(err, Error::InvalidAddress(_)));
    }

    #[test]
    fn test_malformed_rejected() {
        for input in ["", "0x", "0xValid", "0x1234", "0xzz65bddb93b0d1c1a88282ba0fa6b2d00e3e0c83"] {
            assert!(
                matches!(parse_address(input), Err(Error::InvalidAddress(_))),
                "{input} should be rejected"
            );
        }
    }
}
