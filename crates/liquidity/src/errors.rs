//! Error types for the StablePay liquidity client.
//!
//! Every failure the dashboard can observe maps onto [`Error`]. Transport and
//! decoding failures are carried as strings so the type stays `Clone`: a single
//! coalesced fetch hands its failure to every caller waiting on the same key.

use rust_decimal::Decimal;
use thiserror::Error;

/// Type alias for Result using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Root error type for the liquidity client.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// No signed-in session. The request was never sent.
    #[error("User not authenticated")]
    NotAuthenticated,

    /// The identity provider returned no token for the current session.
    #[error("Failed to retrieve authentication token")]
    MissingToken,

    /// The API answered 401. The sign-in hook has already been invoked.
    #[error("Unauthorized: sign in again to continue")]
    Unauthorized,

    #[error("API error {status}: {message}")]
    Api { status: u16, message: String },

    #[error("Network error: {0}")]
    Network(String),

    #[error("Failed to parse response: {0}")]
    Decode(String),

    #[error("Input validation failed: {0}")]
    Validation(#[from] ValidationError),

    #[error("Export failed: {0}")]
    Export(String),

    #[error("Invalid configuration value: {0}")]
    Config(String),

    #[error("Unexpected error: {0}")]
    Unexpected(String),
}

/// Client-side checks performed before a write reaches the network.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("Please enter amount and destination address")]
    MissingFields,

    #[error("Invalid withdrawal amount: {0}")]
    InvalidAmount(String),

    #[error("Withdrawal amount {requested} exceeds available balance {available}")]
    ExceedsBalance {
        requested: Decimal,
        available: Decimal,
    },

    #[error("Invalid Ethereum address: {0}")]
    InvalidAddress(String),

    #[error("Withdrawals are locked for {days_remaining} more day(s)")]
    WithdrawalLocked { days_remaining: u32 },
}

/// Classification for retry policy on read queries.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum RetryClass {
    /// Terminal: auth, validation, decode and client errors.
    Never,
    /// Transient: network failures, timeouts, throttling and server errors.
    Retry,
}

impl Error {
    /// Returns the retry classification for this error.
    pub fn retry_class(&self) -> RetryClass {
        match self {
            Self::Network(_) => RetryClass::Retry,
            Self::Api { status, .. } if *status == 408 || *status == 429 || *status >= 500 => {
                RetryClass::Retry
            }
            _ => RetryClass::Never,
        }
    }

    /// True for failures that mean the session is missing or expired.
    pub fn is_auth(&self) -> bool {
        matches!(
            self,
            Self::NotAuthenticated | Self::MissingToken | Self::Unauthorized
        )
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            Error::Decode(err.to_string())
        } else {
            Error::Network(err.to_string())
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Decode(err.to_string())
    }
}
