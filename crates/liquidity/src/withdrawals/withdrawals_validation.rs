//! Pre-flight checks for withdrawals.
//!
//! These run before any request is built. The backend enforces the same rules
//! authoritatively.

use std::str::FromStr;

use lazy_static::lazy_static;
use regex::Regex;
use rust_decimal::Decimal;

use crate::errors::ValidationError;
use crate::provider::ProviderInfo;

use super::withdrawals_model::{WithdrawalForm, WithdrawalRequest};

lazy_static! {
    /// Format: ^0x[0-9a-fA-F]{40}$
    static ref ETH_ADDRESS_REGEX: Regex =
        Regex::new(r"^0x[0-9a-fA-F]{40}$").expect("Invalid regex pattern");
}

pub fn is_valid_eth_address(address: &str) -> bool {
    ETH_ADDRESS_REGEX.is_match(address)
}

/// Turns the form into a request, or explains why it cannot be sent.
///
/// Checks run in order: lock state, required fields, amount, balance,
/// address format.
pub fn validate_withdrawal(
    form: &WithdrawalForm,
    provider: &ProviderInfo,
) -> Result<WithdrawalRequest, ValidationError> {
    if provider.is_locked() {
        return Err(ValidationError::WithdrawalLocked {
            days_remaining: provider.days_until_withdrawal,
        });
    }

    let amount_text = form.amount.trim();
    let address = form.destination_address.trim();
    if amount_text.is_empty() || address.is_empty() {
        return Err(ValidationError::MissingFields);
    }

    let amount = Decimal::from_str(amount_text)
        .or_else(|_| Decimal::from_scientific(amount_text))
        .map_err(|_| ValidationError::InvalidAmount(amount_text.to_string()))?;
    if amount <= Decimal::ZERO {
        return Err(ValidationError::InvalidAmount(amount_text.to_string()));
    }
    if amount > provider.current_balance {
        return Err(ValidationError::ExceedsBalance {
            requested: amount,
            available: provider.current_balance,
        });
    }

    if !is_valid_eth_address(address) {
        return Err(ValidationError::InvalidAddress(address.to_string()));
    }

    Ok(WithdrawalRequest {
        amount,
        destination_address: address.to_string(),
        confirm: true,
    })
}
