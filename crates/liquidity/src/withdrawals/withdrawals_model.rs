use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Raw input of the withdrawal form, exactly as typed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WithdrawalForm {
    pub amount: String,
    pub destination_address: String,
}

impl WithdrawalForm {
    pub fn new(amount: impl Into<String>, destination_address: impl Into<String>) -> Self {
        Self {
            amount: amount.into(),
            destination_address: destination_address.into(),
        }
    }

    /// Fills the amount with the whole available balance.
    pub fn with_max_amount(mut self, available: Decimal) -> Self {
        self.amount = available.normalize().to_string();
        self
    }
}

/// Body of `POST /protected/liquidity/withdraw`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WithdrawalRequest {
    pub amount: Decimal,
    pub destination_address: String,
    pub confirm: bool,
}

/// What the backend returns for an accepted withdrawal.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct WithdrawalReceipt {
    #[serde(alias = "withdrawalId", alias = "withdrawal_id")]
    pub id: Option<String>,
    pub status: Option<String>,
    pub amount: Option<Decimal>,
    #[serde(alias = "txHash")]
    pub tx_hash: Option<String>,
    pub message: Option<String>,
}
