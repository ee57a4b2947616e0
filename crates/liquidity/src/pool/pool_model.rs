//! Pool statistics model.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Aggregate, provider-independent pool figures.
///
/// Percent fields are already scaled (`65` means 65%).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct PoolStats {
    #[serde(alias = "totalLiquidity")]
    pub total_liquidity: Decimal,
    #[serde(alias = "totalProviders")]
    pub total_providers: u64,
    #[serde(alias = "poolUtilization")]
    pub pool_utilization: Decimal,
    #[serde(alias = "averageApy")]
    pub average_apy: Decimal,
    #[serde(alias = "totalDeposited")]
    pub total_deposited: Decimal,
    #[serde(alias = "totalWithdrawn")]
    pub total_withdrawn: Decimal,
    #[serde(alias = "totalVolume24h")]
    pub total_volume_24h: Decimal,
    #[serde(alias = "totalEarningsDistributed")]
    pub total_earnings_distributed: Decimal,
    #[serde(alias = "averageProviderBalance")]
    pub average_provider_balance: Option<Decimal>,
    #[serde(alias = "lockPeriodDays")]
    pub lock_period_days: Option<u32>,
}

/// Health band of the pool's utilization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UtilizationLevel {
    Healthy,
    Moderate,
    High,
}

impl UtilizationLevel {
    pub fn description(&self) -> &'static str {
        match self {
            UtilizationLevel::Healthy => "Healthy - Low utilization, plenty of liquidity available",
            UtilizationLevel::Moderate => "Moderate - Normal utilization levels",
            UtilizationLevel::High => "High - Pool is heavily utilized",
        }
    }
}

impl PoolStats {
    fn utilization_fraction(&self) -> Decimal {
        self.pool_utilization / Decimal::ONE_HUNDRED
    }

    /// Liquidity not currently deployed.
    pub fn available_liquidity(&self) -> Decimal {
        self.total_liquidity * (Decimal::ONE - self.utilization_fraction())
    }

    /// Liquidity currently in use.
    pub fn deployed_liquidity(&self) -> Decimal {
        self.total_liquidity * self.utilization_fraction()
    }

    /// Reported average when present, otherwise liquidity over providers
    /// (treating zero providers as one).
    pub fn average_provider_balance(&self) -> Decimal {
        self.average_provider_balance.unwrap_or_else(|| {
            self.total_liquidity / Decimal::from(self.total_providers.max(1))
        })
    }

    pub fn utilization_level(&self) -> UtilizationLevel {
        if self.pool_utilization < Decimal::from(60) {
            UtilizationLevel::Healthy
        } else if self.pool_utilization < Decimal::from(80) {
            UtilizationLevel::Moderate
        } else {
            UtilizationLevel::High
        }
    }
}
