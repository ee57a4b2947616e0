//! Provider domain models.
//!
//! The backend has shipped both camelCase and snake_case shapes for the same
//! record, so every renamed field also accepts its snake_case alias.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_CHAIN, DEFAULT_TOKEN};
use crate::utils::format::format_currency;

/// Balance, lifetime totals and lock state of the signed-in provider.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct ProviderInfo {
    #[serde(alias = "balance", alias = "current_balance")]
    pub current_balance: Decimal,
    #[serde(alias = "total_deposited")]
    pub total_deposited: Decimal,
    #[serde(alias = "total_earnings")]
    pub total_earnings: Decimal,
    #[serde(alias = "total_withdrawn")]
    pub total_withdrawn: Decimal,
    #[serde(alias = "can_withdraw")]
    pub can_withdraw: bool,
    #[serde(alias = "days_until_withdrawal")]
    pub days_until_withdrawal: u32,
    #[serde(alias = "is_provider")]
    pub is_provider: bool,
    pub chain: String,
    pub token: String,
    pub deposits: Vec<DepositRecord>,
    pub withdrawals: Vec<WithdrawalRecord>,
    pub apy: Option<Decimal>,
    #[serde(alias = "lock_until")]
    pub lock_until: Option<DateTime<Utc>>,
    #[serde(alias = "created_at")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(alias = "last_activity")]
    pub last_activity: Option<DateTime<Utc>>,
}

impl ProviderInfo {
    /// Withdrawals are blocked until the lock period has elapsed.
    pub fn is_locked(&self) -> bool {
        !self.can_withdraw
    }

    /// Explanation shown while withdrawals are locked.
    pub fn lock_message(&self) -> Option<String> {
        if !self.is_locked() {
            return None;
        }
        let days = self.days_until_withdrawal;
        Some(format!(
            "Your funds are locked for {} more day{}.",
            days,
            if days == 1 { "" } else { "s" }
        ))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DepositRecord {
    pub id: String,
    pub amount: Decimal,
    pub timestamp: DateTime<Utc>,
    #[serde(default, alias = "tx_hash")]
    pub tx_hash: Option<String>,
    #[serde(default)]
    pub status: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WithdrawalRecord {
    pub id: String,
    pub amount: Decimal,
    pub timestamp: DateTime<Utc>,
    #[serde(default, alias = "tx_hash")]
    pub tx_hash: Option<String>,
    #[serde(default)]
    pub status: String,
    #[serde(default, alias = "destination_address")]
    pub destination_address: String,
}

/// Where and how to send funds into the pool.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct DepositInstructions {
    #[serde(alias = "deposit_address")]
    pub deposit_address: String,
    pub chain: String,
    pub token: String,
    #[serde(alias = "minimum_deposit")]
    pub minimum_deposit: Decimal,
    #[serde(alias = "lock_period_days")]
    pub lock_period_days: u32,
    pub instructions: Vec<String>,
    pub note: Option<String>,
}

/// Body of a deposit check: which chain and token to scan.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DepositConfirmation {
    pub chain: String,
    pub token: String,
}

impl Default for DepositConfirmation {
    fn default() -> Self {
        Self {
            chain: DEFAULT_CHAIN.to_string(),
            token: DEFAULT_TOKEN.to_string(),
        }
    }
}

/// What the backend found and credited during a deposit check.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct DepositConfirmationResult {
    #[serde(alias = "deposits_detected")]
    pub deposits_detected: u32,
    #[serde(alias = "total_amount_credited")]
    pub total_amount_credited: Decimal,
}

/// Result of a deposit check as reported to the user.
#[derive(Debug, Clone, PartialEq)]
pub enum DepositCheckOutcome {
    Credited { deposits: u32, amount: Decimal },
    NothingNew,
}

impl From<DepositConfirmationResult> for DepositCheckOutcome {
    fn from(result: DepositConfirmationResult) -> Self {
        if result.deposits_detected > 0 {
            DepositCheckOutcome::Credited {
                deposits: result.deposits_detected,
                amount: result.total_amount_credited,
            }
        } else {
            DepositCheckOutcome::NothingNew
        }
    }
}

impl DepositCheckOutcome {
    pub fn message(&self) -> String {
        match self {
            DepositCheckOutcome::Credited { amount, .. } => {
                format!("Deposit of {} credited successfully!", format_currency(*amount))
            }
            DepositCheckOutcome::NothingNew => "No new deposits detected. Please ensure your \
                 transaction has been confirmed on the blockchain (1-2 minutes)."
                .to_string(),
        }
    }
}
