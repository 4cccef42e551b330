use std::sync::Arc;

use alloy::primitives::{Address, U256};
use bigdecimal::{
    num_bigint::{BigInt, Sign},
    BigDecimal,
};
use serde::Serialize;

use super::signals::{ScoreBreakdown, SignalSet};
use crate::{
    chain::{ChainDataProvider, TokenHandle},
    config::ScoringConfig,
    error::Error,
};

/// Analysis result for a single token. Recomputed on every request.
#[derive(Debug, Clone, Serialize)]
pub struct TokenReport {
    pub token_address: Address,
    pub liquidity_eth: BigDecimal,
    pub volume_24h: BigDecimal,
    pub holder_count: u64,
    /// Always in [0, 100]
    pub security_score: u8,
    pub signals: SignalSet,
    pub breakdown: Vec<ScoreBreakdown>,
}

impl TokenReport {
    pub fn rating(&self) -> &'static str {
        rating(self.security_score)
    }
}

/// Convert a raw on-chain amount into a decimal: `raw / 10^decimals`.
///
/// Exact; the result carries `decimals` digits of scale.
pub fn scale_reserve(raw: U256, decimals: u32) -> BigDecimal {
    let digits = BigInt::from_bytes_be(Sign::Plus, &raw.to_be_bytes::<32>());
    BigDecimal::new(digits, i64::from(decimals))
}

/// Human-readable rating for a score
pub fn rating(score: u8) -> &'static str {
    match score {
        80..=100 => "Excellent",
        60..=79 => "Good",
        40..=59 => "Fair",
        20..=39 => "Poor",
        _ => "Risky",
    }
}

/// Produces [`TokenReport`]s from chain reads
#[derive(Clone)]
pub struct SecurityScorer {
    provider: Arc<dyn ChainDataProvider>,
    config: ScoringConfig,
}

impl SecurityScorer {
    pub fn new(provider: Arc<dyn ChainDataProvider>, config: ScoringConfig) -> Self {
        Self { provider, config }
    }

    /// Analyze a token.
    ///
    /// All reads are independent and issued concurrently. Any failing read
    /// aborts the analysis with [`Error::DataUnavailable`].
    pub async fn score(&self, token: &TokenHandle) -> Result<TokenReport, Error> {
        let address = token.address;
        let provider = &self.provider;

        let (
            (reserve0, _reserve1),
            volume_24h,
            holder_count,
            verified,
            locked,
            renounced,
            suspicious,
        ) = tokio::try_join!(
            provider.reserves(address),
            provider.volume_24h(address),
            provider.holder_count(address),
            provider.is_verified(address),
            provider.is_liquidity_locked(address),
            provider.is_ownership_renounced(address),
            provider.has_suspicious_functions(address),
        )
        .map_err(|e| {
            tracing::warn!(%address, error = %e, "Token analysis aborted");
            Error::from(e)
        })?;

        let signals = SignalSet {
            contract_verified: verified,
            liquidity_locked: locked,
            ownership_renounced: renounced,
            no_suspicious_functions: !suspicious,
        };

        let weights = &self.config.weights;
        let security_score = weights.score(&signals);
        let liquidity_eth = scale_reserve(reserve0, self.config.reserve_decimals);

        tracing::info!(
            %address,
            %liquidity_eth,
            holder_count,
            security_score,
            "Analyzed token"
        );

        Ok(TokenReport {
            token_address: address,
            liquidity_eth,
            volume_24h,
            holder_count,
            security_score,
            signals,
            breakdown: weights.breakdown(&signals),
        })
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::*;
    use crate::{chain::fake::StaticChainProvider, scoring::SignalWeights};

    const PAIR: &str = "0x16b9a82891338f9ba80e2d6970fdda79d1eb0dae";

    fn wei(eth: u64) -> U256 {
        U256::from(eth) * U256::from(10u64).pow(U256::from(18u64))
    }

    fn scorer(provider: StaticChainProvider) -> SecurityScorer {
        SecurityScorer::new(Arc::new(provider), ScoringConfig::default())
    }

    #[test]
    fn test_scale_two_eth() {
        let liquidity = scale_reserve(wei(2), 18);
        assert_eq!(liquidity, BigDecimal::from(2));
        assert_eq!(liquidity.with_scale(2).to_string(), "2.00");
    }

    #[test]
    fn test_scale_is_exact_for_dust() {
        let liquidity = scale_reserve(U256::from(1u64), 18);
        assert_eq!(liquidity, BigDecimal::from_str("0.000000000000000001").unwrap());
    }

    #[test]
    fn test_scale_other_decimals() {
        let liquidity = scale_reserve(U256::from(1_500_000u64), 6);
        assert_eq!(liquidity, BigDecimal::from_str("1.5").unwrap());
    }

    #[test]
    fn test_rating() {
        assert_eq!(rating(100), "Excellent");
        assert_eq!(rating(75), "Good");
        assert_eq!(rating(45), "Fair");
        assert_eq!(rating(25), "Poor");
        assert_eq!(rating(0), "Risky");
    }

    #[tokio::test]
    async fn test_score_report() {
        let provider = StaticChainProvider {
            reserves: (wei(2), wei(1000)),
            volume_24h: BigDecimal::from_str("1000.00").unwrap(),
            holder_count: 150,
            signals: SignalSet {
                contract_verified: true,
                liquidity_locked: true,
                ownership_renounced: false,
                no_suspicious_functions: true,
            },
            ..Default::default()
        };

        let token = TokenHandle::parse(PAIR).unwrap();
        let report = scorer(provider).score(&token).await.unwrap();

        assert_eq!(report.token_address, token.address);
        assert_eq!(report.liquidity_eth, BigDecimal::from(2));
        assert_eq!(report.volume_24h, BigDecimal::from(1000));
        assert_eq!(report.holder_count, 150);
        assert_eq!(report.security_score, 75);
        assert_eq!(report.rating(), "Good");
        assert_eq!(report.breakdown.len(), 4);
    }

    #[tokio::test]
    async fn test_suspicious_functions_cost_points() {
        let provider = StaticChainProvider {
            signals: SignalSet {
                contract_verified: true,
                liquidity_locked: true,
                ownership_renounced: true,
                no_suspicious_functions: false,
            },
            ..Default::default()
        };

        let token = TokenHandle::parse(PAIR).unwrap();
        let report = scorer(provider).score(&token).await.unwrap();

        assert_eq!(report.security_score, 75);
        assert!(!report.signals.no_suspicious_functions);
    }

    #[tokio::test]
    async fn test_configured_weights_are_clamped() {
        let provider = StaticChainProvider {
            signals: SignalSet {
                contract_verified: true,
                liquidity_locked: true,
                ownership_renounced: true,
                no_suspicious_functions: true,
            },
            ..Default::default()
        };
        let config = ScoringConfig {
            weights: SignalWeights {
                contract_verified: 50,
                liquidity_locked: 50,
                ownership_renounced: 50,
                no_suspicious_functions: 50,
            },
            reserve_decimals: 18,
        };

        let scorer = SecurityScorer::new(Arc::new(provider), config);
        let token = TokenHandle::parse(PAIR).unwrap();
        let report = scorer.score(&token).await.unwrap();

        assert_eq!(report.security_score, 100);
    }

    #[tokio::test]
    async fn test_unavailable_data_aborts() {
        let provider = StaticChainProvider {
            unavailable: true,
            ..Default::default()
        };

        let token = TokenHandle::parse(PAIR).unwrap();
        let err = scorer(provider).score(&token).await.unwrap_err();

        assert!(matches!(err, Error::DataUnavailable(_)));
    }
}
