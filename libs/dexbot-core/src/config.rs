//! Environment-driven configuration for scoring and chain access.

use std::{env, str::FromStr};

use alloy::primitives::Address;
use thiserror::Error;

use crate::scoring::SignalWeights;

mod defaults {
    pub const SCORE_WEIGHT_VERIFIED: &str = "20";
    pub const SCORE_WEIGHT_LIQUIDITY_LOCKED: &str = "30";
    pub const SCORE_WEIGHT_OWNERSHIP_RENOUNCED: &str = "25";
    pub const SCORE_WEIGHT_NO_SUSPICIOUS_FUNCTIONS: &str = "25";
    /// Reserves are assumed to be denominated in wei
    pub const RESERVE_DECIMALS: &str = "18";
    /// Unicrypt, PinkSale and Mudra lockers on BSC, plus the dead address
    pub const LP_LOCKERS: &str = "0xc765bddb93b0d1c1a88282ba0fa6b2d00e3e0c83,\
        0x407993575c91ce7643a4d4ccacc9a98c36ee1bbe,\
        0xae34bd8a0d1153e51a11a59df23598c304dc5abc,\
        0x000000000000000000000000000000000000dead";
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Missing `{0}` environment variable")]
    MissingEnvVar(String),

    #[error("Invalid value for `{0}`: `{1}`")]
    InvalidValue(String, String),
}

/// Read `name` from the environment, falling back to `default`
fn env_or<T: FromStr>(name: &str, default: &str) -> Result<T, ConfigError> {
    let raw = env::var(name).unwrap_or_else(|_| default.to_string());
    raw.trim()
        .parse::<T>()
        .map_err(|_| ConfigError::InvalidValue(name.to_string(), raw))
}

/// Scoring weights and the reserve scaling used by [`crate::SecurityScorer`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoringConfig {
    pub weights: SignalWeights,
    /// Liquidity is `reserve0 / 10^reserve_decimals`
    pub reserve_decimals: u32,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            weights: SignalWeights::default(),
            reserve_decimals: 18,
        }
    }
}

impl ScoringConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        let weights = SignalWeights {
            contract_verified: env_or("SCORE_WEIGHT_VERIFIED", defaults::SCORE_WEIGHT_VERIFIED)?,
            liquidity_locked: env_or(
                "SCORE_WEIGHT_LIQUIDITY_LOCKED",
                defaults::SCORE_WEIGHT_LIQUIDITY_LOCKED,
            )?,
            ownership_renounced: env_or(
                "SCORE_WEIGHT_OWNERSHIP_RENOUNCED",
                defaults::SCORE_WEIGHT_OWNERSHIP_RENOUNCED,
            )?,
            no_suspicious_functions: env_or(
                "SCORE_WEIGHT_NO_SUSPICIOUS_FUNCTIONS",
                defaults::SCORE_WEIGHT_NO_SUSPICIOUS_FUNCTIONS,
            )?,
        };

        let reserve_decimals = env_or::<u32>("RESERVE_DECIMALS", defaults::RESERVE_DECIMALS)?;

        Ok(Self {
            weights,
            reserve_decimals,
        })
    }
}

/// JSON-RPC endpoint and liquidity locker addresses
#[derive(Debug, Clone)]
pub struct ChainConfig {
    pub rpc_url: String,
    pub lp_lockers: Vec<Address>,
}

impl ChainConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        let rpc_url =
            env::var("RPC_URL").map_err(|_| ConfigError::MissingEnvVar("RPC_URL".into()))?;

        let raw = env::var("LP_LOCKERS").unwrap_or_else(|_| defaults::LP_LOCKERS.to_string());
        let lp_lockers = parse_lockers(&raw)?;

        Ok(Self {
            rpc_url,
            lp_lockers,
        })
    }
}

fn parse_lockers(raw: &str) -> Result<Vec<Address>, ConfigError> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| {
            Address::from_str(s)
                .map_err(|_| ConfigError::InvalidValue("LP_LOCKERS".into(), s.to_string()))
        })
        .collect()
}
