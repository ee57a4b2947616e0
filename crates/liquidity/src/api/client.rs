//! HTTP client for the StablePay liquidity API.
//!
//! One method per endpoint. Each call resolves a fresh bearer token (protected
//! routes only), sends the request, maps failures onto [`Error`] and unwraps
//! the response envelope. No caching happens here.

use std::sync::Arc;

use log::{debug, warn};
use serde::Serialize;
use serde_json::Value;

use crate::auth::{require_token, AuthProviderTrait};
use crate::constants::endpoints;
use crate::earnings::EarningsData;
use crate::errors::{Error, Result};
use crate::notifications::Notification;
use crate::pool::PoolStats;
use crate::provider::{
    DepositConfirmation, DepositConfirmationResult, DepositInstructions, ProviderInfo,
};
use crate::settings::UserSettings;
use crate::transactions::Transaction;
use crate::withdrawals::{WithdrawalReceipt, WithdrawalRequest};

use super::envelope::{extract_error_message, ApiPayload};
use super::transport::{HttpMethod, HttpRequest, HttpResponse, HttpTransport};

/// Whether a route needs the bearer token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Access {
    Public,
    Protected,
}

#[derive(Clone)]
pub struct LiquidityApiClient {
    transport: Arc<dyn HttpTransport>,
    auth: Arc<dyn AuthProviderTrait>,
}

impl LiquidityApiClient {
    pub fn new(transport: Arc<dyn HttpTransport>, auth: Arc<dyn AuthProviderTrait>) -> Self {
        Self { transport, auth }
    }

    pub fn auth(&self) -> &Arc<dyn AuthProviderTrait> {
        &self.auth
    }

    async fn request(
        &self,
        method: HttpMethod,
        path: &str,
        body: Option<Value>,
        access: Access,
    ) -> Result<ApiPayload> {
        let bearer_token = match access {
            Access::Protected => Some(require_token(self.auth.as_ref()).await?),
            Access::Public => None,
        };

        debug!("[LiquidityApi] {} {}", method.as_str(), path);
        let response = self
            .transport
            .send(HttpRequest {
                method,
                path: path.to_string(),
                bearer_token,
                body,
            })
            .await?;

        self.parse_response(method, path, response)
    }

    /// Map an HTTP response onto a payload or an error.
    fn parse_response(
        &self,
        method: HttpMethod,
        path: &str,
        response: HttpResponse,
    ) -> Result<ApiPayload> {
        let status = response.status;
        let body: Value = if response.body.trim().is_empty() {
            Value::Null
        } else {
            match serde_json::from_str(&response.body) {
                Ok(value) => value,
                Err(_) if !response.is_success() => Value::String(response.body.clone()),
                Err(e) => {
                    return Err(Error::Decode(format!(
                        "{} - {}",
                        e,
                        response.body.chars().take(200).collect::<String>()
                    )))
                }
            }
        };

        if status == 401 {
            warn!(
                "[LiquidityApi] {} {} unauthorized - redirecting to sign-in",
                method.as_str(),
                path
            );
            self.auth.on_unauthorized();
            return Err(Error::Unauthorized);
        }

        if !response.is_success() {
            let message = extract_error_message(&body).unwrap_or_else(|| match &body {
                Value::String(text) if !text.is_empty() => {
                    text.chars().take(200).collect::<String>()
                }
                _ => format!("HTTP {}", status),
            });
            return Err(Error::Api { status, message });
        }

        let payload = ApiPayload::from_body(body.clone());
        if payload.is_rejected() {
            let message = extract_error_message(&body)
                .unwrap_or_else(|| "Request was rejected by the server".to_string());
            return Err(Error::Api { status, message });
        }

        debug!(
            "[LiquidityApi] {} {} -> {}",
            method.as_str(),
            path,
            status
        );
        Ok(payload)
    }

    async fn get(&self, path: &str, access: Access) -> Result<ApiPayload> {
        self.request(HttpMethod::Get, path, None, access).await
    }

    async fn send_json<B: Serialize>(
        &self,
        method: HttpMethod,
        path: &str,
        body: &B,
    ) -> Result<ApiPayload> {
        let body = serde_json::to_value(body)?;
        self.request(method, path, Some(body), Access::Protected)
            .await
    }

    // ─────────────────────────────────────────────────────────────────────
    // Reads
    // ─────────────────────────────────────────────────────────────────────

    pub async fn get_provider_info(&self) -> Result<ProviderInfo> {
        self.get(endpoints::PROVIDER_INFO, Access::Protected)
            .await?
            .decode()
    }

    pub async fn get_deposit_instructions(&self) -> Result<DepositInstructions> {
        self.get(endpoints::DEPOSIT_INSTRUCTIONS, Access::Protected)
            .await?
            .decode()
    }

    /// Public route; no session needed.
    pub async fn get_pool_stats(&self) -> Result<PoolStats> {
        self.get(endpoints::POOL_STATS, Access::Public)
            .await?
            .decode()
    }

    pub async fn get_transactions(&self) -> Result<Vec<Transaction>> {
        self.get(endpoints::TRANSACTIONS, Access::Protected)
            .await?
            .decode_list()
    }

    pub async fn get_earnings(&self) -> Result<EarningsData> {
        self.get(endpoints::EARNINGS, Access::Protected)
            .await?
            .decode()
    }

    pub async fn get_notifications(&self) -> Result<Vec<Notification>> {
        self.get(endpoints::NOTIFICATIONS, Access::Protected)
            .await?
            .decode_list()
    }

    pub async fn get_settings(&self) -> Result<UserSettings> {
        self.get(endpoints::SETTINGS, Access::Protected)
            .await?
            .decode()
    }

    // ─────────────────────────────────────────────────────────────────────
    // Writes
    // ─────────────────────────────────────────────────────────────────────

    /// Saves the full settings object. Returns the server's copy when the
    /// response echoes one.
    pub async fn update_settings(&self, settings: &UserSettings) -> Result<Option<UserSettings>> {
        let payload = self
            .send_json(HttpMethod::Put, endpoints::SETTINGS, settings)
            .await?;
        Ok(UserSettings::from_echo(&payload.data, settings))
    }

    /// Asks the backend to scan the chain for new deposits and credit them.
    pub async fn confirm_deposit(
        &self,
        confirmation: &DepositConfirmation,
    ) -> Result<DepositConfirmationResult> {
        let payload = self
            .send_json(HttpMethod::Post, endpoints::CONFIRM_DEPOSIT, confirmation)
            .await?;
        if payload.data.is_null() {
            return Ok(DepositConfirmationResult::default());
        }
        payload.decode()
    }

    pub async fn withdraw(&self, request: &WithdrawalRequest) -> Result<WithdrawalReceipt> {
        let payload = self
            .send_json(HttpMethod::Post, endpoints::WITHDRAW, request)
            .await?;
        let message = payload.message.clone();
        let mut receipt: WithdrawalReceipt = if payload.data.is_object() {
            payload.decode().unwrap_or_else(|e| {
                warn!("[LiquidityApi] Withdrawal receipt could not be decoded: {}", e);
                WithdrawalReceipt::default()
            })
        } else {
            WithdrawalReceipt::default()
        };
        if receipt.message.is_none() {
            receipt.message = message;
        }
        Ok(receipt)
    }

    pub async fn mark_notification_read(&self, notification_id: &str) -> Result<()> {
        let path = endpoints::notification_read(&urlencoding::encode(notification_id));
        self.request(HttpMethod::Put, &path, None, Access::Protected)
            .await?;
        Ok(())
    }
}
