use std::fmt;
use std::time::Duration;

/// Logical name of a cached resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QueryKey {
    ProviderInfo,
    DepositInstructions,
    PoolStats,
    Transactions,
    Earnings,
    Notifications,
    UserSettings,
}

impl QueryKey {
    pub const ALL: [QueryKey; 7] = [
        QueryKey::ProviderInfo,
        QueryKey::DepositInstructions,
        QueryKey::PoolStats,
        QueryKey::Transactions,
        QueryKey::Earnings,
        QueryKey::Notifications,
        QueryKey::UserSettings,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            QueryKey::ProviderInfo => "providerInfo",
            QueryKey::DepositInstructions => "depositInstructions",
            QueryKey::PoolStats => "poolStats",
            QueryKey::Transactions => "transactions",
            QueryKey::Earnings => "earnings",
            QueryKey::Notifications => "notifications",
            QueryKey::UserSettings => "userSettings",
        }
    }

    /// How long a fetched value is served before the next read refetches.
    pub fn stale_time(&self) -> Duration {
        match self {
            QueryKey::ProviderInfo | QueryKey::Transactions | QueryKey::Notifications => {
                Duration::from_secs(30)
            }
            QueryKey::PoolStats | QueryKey::Earnings => Duration::from_secs(60),
            QueryKey::DepositInstructions | QueryKey::UserSettings => Duration::from_secs(300),
        }
    }

    /// Extra attempts after a transient failure.
    pub fn retry_count(&self) -> u32 {
        match self {
            QueryKey::DepositInstructions | QueryKey::UserSettings => 1,
            _ => 2,
        }
    }

    /// Everything except the public pool statistics is per-provider.
    pub fn requires_session(&self) -> bool {
        !matches!(self, QueryKey::PoolStats)
    }
}

impl fmt::Display for QueryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
