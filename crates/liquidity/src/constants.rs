/// Default base URL of the liquidity API, including the version prefix.
pub const DEFAULT_API_URL: &str = "https://api.goopenly.xyz/api/v1";

/// Default block explorer for transaction links (Base mainnet).
pub const DEFAULT_EXPLORER_URL: &str = "https://basescan.org";

/// Default timeout for API requests.
pub const DEFAULT_TIMEOUT_MS: u64 = 30_000;

/// Base delay before the first retry of a failed read; doubles per attempt.
pub const DEFAULT_RETRY_DELAY_MS: u64 = 1_000;

/// Upper bound for a single retry delay.
pub const MAX_RETRY_DELAY_MS: u64 = 30_000;

/// Chain and token every deposit check is issued for.
pub const DEFAULT_CHAIN: &str = "base";
pub const DEFAULT_TOKEN: &str = "USDC";

/// Currency assumed when settings cannot be loaded.
pub const DEFAULT_CURRENCY: &str = "USD";

/// Placeholder for missing transaction hashes in exports.
pub const MISSING_HASH: &str = "N/A";

/// Number of most recent earnings rows shown in the breakdown.
pub const RECENT_EARNINGS_ROWS: usize = 10;

pub mod endpoints {
    pub const PROVIDER_INFO: &str = "/protected/liquidity/my-info";
    pub const DEPOSIT_INSTRUCTIONS: &str = "/protected/liquidity/deposit-instructions";
    pub const POOL_STATS: &str = "/public/liquidity/stats";
    pub const TRANSACTIONS: &str = "/protected/liquidity/transactions";
    pub const EARNINGS: &str = "/protected/liquidity/earnings";
    pub const NOTIFICATIONS: &str = "/protected/liquidity/notifications";
    pub const SETTINGS: &str = "/protected/liquidity/settings";
    pub const CONFIRM_DEPOSIT: &str = "/protected/liquidity/confirm-deposit";
    pub const WITHDRAW: &str = "/protected/liquidity/withdraw";

    /// Path for marking one notification as read.
    pub fn notification_read(id: &str) -> String {
        format!("{}/{}/read", NOTIFICATIONS, id)
    }
}
