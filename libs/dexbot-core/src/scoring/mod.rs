//! Security scoring module
//!
//! Combines four independent contract signals into a 0-100 score:
//! - Contract verified (20)
//! - Liquidity locked (30)
//! - Ownership renounced (25)
//! - No suspicious functions (25)

pub mod scorer;
pub mod signals;

pub use scorer::{rating, scale_reserve, SecurityScorer, TokenReport};
pub use signals::{ScoreBreakdown, SecuritySignal, SignalSet, SignalWeights, MAX_SCORE};
