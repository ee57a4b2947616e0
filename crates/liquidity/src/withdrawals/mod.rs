//! Withdrawals module - form input, request body and pre-flight validation.

mod withdrawals_model;
mod withdrawals_validation;

pub use withdrawals_model::{WithdrawalForm, WithdrawalReceipt, WithdrawalRequest};
pub use withdrawals_validation::{is_valid_eth_address, validate_withdrawal};
