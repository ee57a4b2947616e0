use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use log::{debug, error, info, warn};

use crate::api::{LiquidityApiClient, ReqwestTransport};
use crate::auth::AuthProviderTrait;
use crate::cache::{QueryCache, QueryKey, SharedQueryCache};
use crate::config::ClientConfig;
use crate::constants::MAX_RETRY_DELAY_MS;
use crate::earnings::EarningsData;
use crate::errors::{Error, Result, RetryClass};
use crate::notifications::{mark_read_in, mark_unread_in, unread_count, Notification};
use crate::pool::PoolStats;
use crate::provider::{DepositCheckOutcome, DepositConfirmation, DepositInstructions, ProviderInfo};
use crate::settings::UserSettings;
use crate::transactions::{filter_transactions, transactions_to_csv, Transaction, TransactionFilter};
use crate::utils::explorer;
use crate::withdrawals::{validate_withdrawal, WithdrawalForm, WithdrawalReceipt};

use super::dashboard_traits::DashboardServiceTrait;

/// Writes that change balances make these queries outdated.
const BALANCE_QUERIES: [QueryKey; 3] = [
    QueryKey::ProviderInfo,
    QueryKey::Transactions,
    QueryKey::Earnings,
];

/// Dashboard queries and mutations on top of the API client and the query cache.
pub struct DashboardService {
    client: LiquidityApiClient,
    cache: SharedQueryCache,
    config: ClientConfig,
}

impl DashboardService {
    pub fn new(client: LiquidityApiClient, cache: SharedQueryCache, config: ClientConfig) -> Self {
        DashboardService {
            client,
            cache,
            config,
        }
    }

    /// Builds a service talking to the live API over reqwest.
    pub fn from_config(config: ClientConfig, auth: Arc<dyn AuthProviderTrait>) -> Result<Self> {
        let transport = Arc::new(ReqwestTransport::new(&config)?);
        let client = LiquidityApiClient::new(transport, auth);
        Ok(Self::new(client, Arc::new(QueryCache::new()), config))
    }

    pub fn cache(&self) -> &SharedQueryCache {
        &self.cache
    }

    /// A query whose key needs a session is disabled while signed out.
    fn ensure_session(&self, key: QueryKey) -> Result<()> {
        if key.requires_session() && !self.client.auth().is_signed_in() {
            debug!("[Dashboard] Skipping {} - not signed in", key);
            return Err(Error::NotAuthenticated);
        }
        Ok(())
    }

    fn retry_delay(&self, attempt: u32) -> Duration {
        let factor = 2u32.saturating_pow(attempt);
        self.config
            .retry_base_delay
            .saturating_mul(factor)
            .min(Duration::from_millis(MAX_RETRY_DELAY_MS))
    }

    /// Runs `fetch`, retrying transient failures up to the key's retry count.
    async fn fetch_with_retry<T, F, Fut>(&self, key: QueryKey, fetch: F) -> Result<T>
    where
        F: Fn() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let mut attempt = 0;
        loop {
            match fetch().await {
                Ok(value) => return Ok(value),
                Err(e) if attempt < key.retry_count() && e.retry_class() == RetryClass::Retry => {
                    let delay = self.retry_delay(attempt);
                    warn!(
                        "[Dashboard] {} failed ({}), retrying in {:?}",
                        key, e, delay
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }

    /// Cached query that propagates failures.
    async fn query<T, F, Fut>(&self, key: QueryKey, fetch: F) -> Result<T>
    where
        T: Clone + Send + Sync + 'static,
        F: Fn() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        self.ensure_session(key)?;
        self.cache
            .get_or_fetch(key, self.fetch_with_retry(key, fetch))
            .await
    }

    /// Cached query that substitutes `fallback` for any failure other than a
    /// missing session. The fallback is cached like a fetched value.
    async fn query_or<T, F, Fut>(&self, key: QueryKey, fetch: F, fallback: T) -> Result<T>
    where
        T: Clone + Send + Sync + 'static,
        F: Fn() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        self.ensure_session(key)?;
        let fetch_or_fallback = async {
            match self.fetch_with_retry(key, fetch).await {
                Err(e @ (Error::NotAuthenticated | Error::MissingToken)) => Err(e),
                Err(e) => {
                    warn!("[Dashboard] Using fallback for {}: {}", key, e);
                    Ok(fallback)
                }
                ok => ok,
            }
        };
        self.cache.get_or_fetch(key, fetch_or_fallback).await
    }
}

#[async_trait]
impl DashboardServiceTrait for DashboardService {
    async fn provider_info(&self) -> Result<ProviderInfo> {
        self.query(QueryKey::ProviderInfo, || self.client.get_provider_info())
            .await
    }

    async fn deposit_instructions(&self) -> Result<DepositInstructions> {
        self.query(QueryKey::DepositInstructions, || {
            self.client.get_deposit_instructions()
        })
        .await
    }

    async fn pool_stats(&self) -> Result<PoolStats> {
        self.query(QueryKey::PoolStats, || self.client.get_pool_stats())
            .await
    }

    async fn transactions(&self) -> Result<Vec<Transaction>> {
        self.query_or(
            QueryKey::Transactions,
            || self.client.get_transactions(),
            Vec::new(),
        )
        .await
    }

    async fn filtered_transactions(&self, filter: TransactionFilter) -> Result<Vec<Transaction>> {
        let transactions = self.transactions().await?;
        Ok(filter_transactions(&transactions, filter))
    }

    async fn earnings(&self) -> Result<EarningsData> {
        self.query_or(
            QueryKey::Earnings,
            || self.client.get_earnings(),
            EarningsData::default(),
        )
        .await
    }

    async fn notifications(&self) -> Result<Vec<Notification>> {
        self.query_or(
            QueryKey::Notifications,
            || self.client.get_notifications(),
            Vec::new(),
        )
        .await
    }

    async fn unread_notification_count(&self) -> Result<usize> {
        let notifications = self.notifications().await?;
        Ok(unread_count(&notifications))
    }

    async fn user_settings(&self) -> Result<UserSettings> {
        self.query_or(
            QueryKey::UserSettings,
            || self.client.get_settings(),
            UserSettings::default(),
        )
        .await
    }

    async fn confirm_deposit(&self) -> Result<DepositCheckOutcome> {
        let result = self
            .client
            .confirm_deposit(&DepositConfirmation::default())
            .await
            .map_err(|e| {
                error!("[Dashboard] Deposit check failed: {}", e);
                e
            })?;

        self.cache.invalidate_many(&BALANCE_QUERIES).await;
        info!(
            "[Dashboard] Deposit check finished: {} deposit(s) detected",
            result.deposits_detected
        );
        Ok(DepositCheckOutcome::from(result))
    }

    async fn withdraw(&self, form: &WithdrawalForm) -> Result<WithdrawalReceipt> {
        let provider = self.provider_info().await?;
        let request = validate_withdrawal(form, &provider).map_err(|e| {
            debug!("[Dashboard] Withdrawal rejected before sending: {}", e);
            Error::from(e)
        })?;

        let receipt = self.client.withdraw(&request).await.map_err(|e| {
            error!("[Dashboard] Withdrawal failed: {}", e);
            e
        })?;

        self.cache.invalidate_many(&BALANCE_QUERIES).await;
        info!(
            "[Dashboard] Withdrawal of {} submitted",
            request.amount.normalize()
        );
        Ok(receipt)
    }

    async fn update_settings(&self, settings: UserSettings) -> Result<UserSettings> {
        let echoed = self.client.update_settings(&settings).await.map_err(|e| {
            error!("[Dashboard] Saving settings failed: {}", e);
            e
        })?;

        let saved = echoed.unwrap_or(settings);
        self.cache.set(QueryKey::UserSettings, saved.clone()).await;
        self.cache.mark_stale(QueryKey::UserSettings);
        info!("[Dashboard] Settings saved");
        Ok(saved)
    }

    async fn mark_notification_read(&self, notification_id: &str) -> Result<()> {
        let mut flipped = false;
        self.cache
            .update::<Vec<Notification>, _>(QueryKey::Notifications, |list| {
                flipped = mark_read_in(list, notification_id);
            })
            .await;

        if let Err(e) = self.client.mark_notification_read(notification_id).await {
            error!(
                "[Dashboard] Marking notification {} read failed: {}",
                notification_id, e
            );
            if flipped {
                self.cache
                    .update::<Vec<Notification>, _>(QueryKey::Notifications, |list| {
                        mark_unread_in(list, notification_id);
                    })
                    .await;
            }
            return Err(e);
        }

        debug!("[Dashboard] Notification {} marked read", notification_id);
        Ok(())
    }

    async fn export_transactions_csv(&self, filter: TransactionFilter) -> Result<String> {
        let transactions = self.filtered_transactions(filter).await?;
        let csv = transactions_to_csv(&transactions)?;
        info!(
            "[Dashboard] Exported {} transaction(s) with filter '{}'",
            transactions.len(),
            filter
        );
        Ok(csv)
    }

    fn transaction_explorer_url(&self, tx_hash: &str) -> String {
        explorer::tx_url(&self.config.explorer_url, tx_hash)
    }

    fn address_explorer_url(&self, address: &str) -> String {
        explorer::address_url(&self.config.explorer_url, address)
    }

    fn clear_cache(&self) {
        self.cache.invalidate_all();
    }
}
