//! Price alerts
//!
//! An alert moves from `Pending` to either `Triggered` (the observed price
//! reached the target) or `Cancelled` (the owner withdrew it). Both are
//! terminal.

pub mod pg;
pub mod registry;
pub mod store;

use std::{fmt, str::FromStr};

use alloy::primitives::Address;
use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use serde::Serialize;

pub use pg::PgAlertStore;
pub use registry::AlertRegistry;
pub use store::{AlertStore, InMemoryAlertStore, StoreError};

/// Chat platform user id
pub type UserId = i64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct AlertId(pub i64);

impl fmt::Display for AlertId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for AlertId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().trim_start_matches('#').parse().map(AlertId)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertStatus {
    Pending,
    Triggered,
    Cancelled,
}

impl AlertStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AlertStatus::Pending => "pending",
            AlertStatus::Triggered => "triggered",
            AlertStatus::Cancelled => "cancelled",
        }
    }

    pub fn is_terminal(&self) -> bool {
        !matches!(self, AlertStatus::Pending)
    }
}

impl FromStr for AlertStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(AlertStatus::Pending),
            "triggered" => Ok(AlertStatus::Triggered),
            "cancelled" => Ok(AlertStatus::Cancelled),
            other => Err(format!("unknown alert status `{other}`")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PriceAlert {
    pub id: AlertId,
    pub user_id: UserId,
    pub token_address: Address,
    pub target_price: BigDecimal,
    pub created_at: DateTime<Utc>,
    pub status: AlertStatus,
    /// Set when the alert reaches a terminal status
    pub resolved_at: Option<DateTime<Utc>>,
}

/// Input for a new pending alert, already validated
#[derive(Debug, Clone)]
pub struct NewPriceAlert {
    pub user_id: UserId,
    pub token_address: Address,
    pub target_price: BigDecimal,
}
