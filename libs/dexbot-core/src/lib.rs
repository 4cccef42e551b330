//! Token analysis and price alert core for the DEX bot.
//!
//! - `scoring`: security score aggregation and token reports
//! - `alerts`: price alert registry and its stores
//! - `chain`: chain data provider interface and the JSON-RPC adapter

pub mod alerts;
pub mod chain;
pub mod config;
pub mod error;
pub mod scoring;

pub use alerts::{AlertId, AlertRegistry, AlertStatus, PriceAlert, UserId};
pub use chain::{ChainDataProvider, ChainError, TokenHandle};
pub use config::{ChainConfig, ConfigError, ScoringConfig};
pub use error::Error;
pub use scoring::{SecurityScorer, SecuritySignal, SignalSet, SignalWeights, TokenReport};
