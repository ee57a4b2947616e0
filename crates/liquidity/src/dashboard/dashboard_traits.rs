use crate::earnings::EarningsData;
use crate::errors::Result;
use crate::notifications::Notification;
use crate::pool::PoolStats;
use crate::provider::{DepositCheckOutcome, DepositInstructions, ProviderInfo};
use crate::settings::UserSettings;
use crate::transactions::{Transaction, TransactionFilter};
use crate::withdrawals::{WithdrawalForm, WithdrawalReceipt};
use async_trait::async_trait;

/// Trait for dashboard queries and mutations
#[async_trait]
pub trait DashboardServiceTrait: Send + Sync {
    async fn provider_info(&self) -> Result<ProviderInfo>;
    async fn deposit_instructions(&self) -> Result<DepositInstructions>;
    async fn pool_stats(&self) -> Result<PoolStats>;
    async fn transactions(&self) -> Result<Vec<Transaction>>;
    async fn filtered_transactions(&self, filter: TransactionFilter) -> Result<Vec<Transaction>>;
    async fn earnings(&self) -> Result<EarningsData>;
    async fn notifications(&self) -> Result<Vec<Notification>>;
    async fn unread_notification_count(&self) -> Result<usize>;
    async fn user_settings(&self) -> Result<UserSettings>;

    async fn confirm_deposit(&self) -> Result<DepositCheckOutcome>;
    async fn withdraw(&self, form: &WithdrawalForm) -> Result<WithdrawalReceipt>;
    async fn update_settings(&self, settings: UserSettings) -> Result<UserSettings>;
    async fn mark_notification_read(&self, notification_id: &str) -> Result<()>;

    async fn export_transactions_csv(&self, filter: TransactionFilter) -> Result<String>;
    fn transaction_explorer_url(&self, tx_hash: &str) -> String;
    fn address_explorer_url(&self, address: &str) -> String;
    /// Drops every cached query, e.g. after signing out.
    fn clear_cache(&self);
}
