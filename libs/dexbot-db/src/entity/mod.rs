pub mod price_alert;
pub mod token_stats;

pub use price_alert::{NewPriceAlertRecord, PriceAlertRecord};
pub use token_stats::TokenStats;
