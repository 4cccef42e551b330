use serde::Serialize;

/// Upper bound of the security score
pub const MAX_SCORE: u8 = 100;

/// A single independent check contributing to the security score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SecuritySignal {
    ContractVerified,
    LiquidityLocked,
    OwnershipRenounced,
    NoSuspiciousFunctions,
}

impl SecuritySignal {
    /// Evaluation order
    pub const ALL: [SecuritySignal; 4] = [
        SecuritySignal::ContractVerified,
        SecuritySignal::LiquidityLocked,
        SecuritySignal::OwnershipRenounced,
        SecuritySignal::NoSuspiciousFunctions,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            SecuritySignal::ContractVerified => "Contract",
            SecuritySignal::LiquidityLocked => "LP Lock",
            SecuritySignal::OwnershipRenounced => "Ownership",
            SecuritySignal::NoSuspiciousFunctions => "Functions",
        }
    }

    fn reason(&self, holds: bool) -> &'static str {
        match (self, holds) {
            (SecuritySignal::ContractVerified, true) => "Contract source verified",
            (SecuritySignal::ContractVerified, false) => "Contract source not verified",
            (SecuritySignal::LiquidityLocked, true) => "LP tokens locked or burned",
            (SecuritySignal::LiquidityLocked, false) => "LP not locked - high rug risk",
            (SecuritySignal::OwnershipRenounced, true) => "Ownership renounced",
            (SecuritySignal::OwnershipRenounced, false) => "Ownership not renounced",
            (SecuritySignal::NoSuspiciousFunctions, true) => "No mint/blacklist/fee functions",
            (SecuritySignal::NoSuspiciousFunctions, false) => "Suspicious admin functions found",
        }
    }
}

/// Which signals held for a contract
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SignalSet {
    pub contract_verified: bool,
    pub liquidity_locked: bool,
    pub ownership_renounced: bool,
    pub no_suspicious_functions: bool,
}

impl SignalSet {
    pub fn holds(&self, signal: SecuritySignal) -> bool {
        match signal {
            SecuritySignal::ContractVerified => self.contract_verified,
            SecuritySignal::LiquidityLocked => self.liquidity_locked,
            SecuritySignal::OwnershipRenounced => self.ownership_renounced,
            SecuritySignal::NoSuspiciousFunctions => self.no_suspicious_functions,
        }
    }
}

/// Individual score component breakdown
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScoreBreakdown {
    pub signal: SecuritySignal,
    pub name: String,
    pub score: u8,
    pub max_score: u8,
    pub reason: String,
}

/// Points awarded per satisfied signal
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SignalWeights {
    pub contract_verified: u8,
    pub liquidity_locked: u8,
    pub ownership_renounced: u8,
    pub no_suspicious_functions: u8,
}

impl Default for SignalWeights {
    fn default() -> Self {
        Self {
            contract_verified: 20,
            liquidity_locked: 30,
            ownership_renounced: 25,
            no_suspicious_functions: 25,
        }
    }
}

impl SignalWeights {
    pub fn weight(&self, signal: SecuritySignal) -> u8 {
        match signal {
            SecuritySignal::ContractVerified => self.contract_verified,
            SecuritySignal::LiquidityLocked => self.liquidity_locked,
            SecuritySignal::OwnershipRenounced => self.ownership_renounced,
            SecuritySignal::NoSuspiciousFunctions => self.no_suspicious_functions,
        }
    }

    /// Sum of all weights, unclamped
    pub fn total(&self) -> u32 {
        SecuritySignal::ALL
            .iter()
            .map(|s| u32::from(self.weight(*s)))
            .sum()
    }

    /// Sum of satisfied weights, clamped to [0, 100]
    pub fn score(&self, signals: &SignalSet) -> u8 {
        let sum: u32 = SecuritySignal::ALL
            .iter()
            .filter(|s| signals.holds(**s))
            .map(|s| u32::from(self.weight(*s)))
            .sum();

        sum.min(u32::from(MAX_SCORE)) as u8
    }

    pub fn breakdown(&self, signals: &SignalSet) -> Vec<ScoreBreakdown> {
        SecuritySignal::ALL
            .iter()
            .map(|signal| {
                let holds = signals.holds(*signal);
                let max_score = self.weight(*signal);

                ScoreBreakdown {
                    signal: *signal,
                    name: signal.name().to_string(),
                    score: if holds { max_score } else { 0 },
                    max_score,
                    reason: signal.reason(holds).to_string(),
                }
            })
            .collect()
    }
}
