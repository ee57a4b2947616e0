//! Transaction log models and filtering.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::errors::Error;

/// One entry of the provider's append-only transaction log.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Transaction {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: TransactionKind,
    pub amount: Decimal,
    pub status: TransactionStatus,
    pub timestamp: DateTime<Utc>,
    #[serde(default, alias = "txHash")]
    pub tx_hash: Option<String>,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    Deposit,
    Withdrawal,
    Earning,
    #[serde(other)]
    Unknown,
}

impl TransactionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionKind::Deposit => "deposit",
            TransactionKind::Withdrawal => "withdrawal",
            TransactionKind::Earning => "earning",
            TransactionKind::Unknown => "unknown",
        }
    }

    /// Capitalized label used in exports.
    pub fn label(&self) -> &'static str {
        match self {
            TransactionKind::Deposit => "Deposit",
            TransactionKind::Withdrawal => "Withdrawal",
            TransactionKind::Earning => "Earning",
            TransactionKind::Unknown => "Unknown",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum TransactionStatus {
    Pending,
    Completed,
    Failed,
    #[serde(other)]
    Unknown,
}

impl TransactionStatus {
    pub fn label(&self) -> &'static str {
        match self {
            TransactionStatus::Pending => "Pending",
            TransactionStatus::Completed => "Completed",
            TransactionStatus::Failed => "Failed",
            TransactionStatus::Unknown => "Unknown",
        }
    }
}

/// Type filter offered on the history view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TransactionFilter {
    #[default]
    All,
    Deposit,
    Withdrawal,
    Earning,
}

impl TransactionFilter {
    pub const ALL: [TransactionFilter; 4] = [
        TransactionFilter::All,
        TransactionFilter::Deposit,
        TransactionFilter::Withdrawal,
        TransactionFilter::Earning,
    ];

    pub fn matches(&self, transaction: &Transaction) -> bool {
        match self {
            TransactionFilter::All => true,
            TransactionFilter::Deposit => transaction.kind == TransactionKind::Deposit,
            TransactionFilter::Withdrawal => transaction.kind == TransactionKind::Withdrawal,
            TransactionFilter::Earning => transaction.kind == TransactionKind::Earning,
        }
    }
}

impl fmt::Display for TransactionFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TransactionFilter::All => "all",
            TransactionFilter::Deposit => "deposit",
            TransactionFilter::Withdrawal => "withdrawal",
            TransactionFilter::Earning => "earning",
        };
        f.write_str(name)
    }
}

impl FromStr for TransactionFilter {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "all" => Ok(TransactionFilter::All),
            "deposit" => Ok(TransactionFilter::Deposit),
            "withdrawal" => Ok(TransactionFilter::Withdrawal),
            "earning" => Ok(TransactionFilter::Earning),
            other => Err(Error::Unexpected(format!(
                "Unknown transaction filter '{}'",
                other
            ))),
        }
    }
}

/// Returns the transactions matching `filter`, preserving order.
pub fn filter_transactions(transactions: &[Transaction], filter: TransactionFilter) -> Vec<Transaction> {
    transactions
        .iter()
        .filter(|tx| filter.matches(tx))
        .cloned()
        .collect()
}
