//! Provider module - balance, lock state and deposit models.

mod provider_model;

pub use provider_model::{
    DepositCheckOutcome, DepositConfirmation, DepositConfirmationResult, DepositInstructions,
    DepositRecord, ProviderInfo, WithdrawalRecord,
};
