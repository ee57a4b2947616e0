//! Session and bearer-token access.
//!
//! Protected calls ask the provider for a fresh token right before each
//! request. A missing session stops the call before anything is sent.

use async_trait::async_trait;
use log::{debug, warn};

use crate::errors::{Error, Result};

/// Source of the signed-in session.
#[async_trait]
pub trait AuthProviderTrait: Send + Sync {
    /// Whether a session currently exists.
    fn is_signed_in(&self) -> bool;

    /// Returns a short-lived bearer token for the session, if any.
    async fn get_token(&self) -> Result<Option<String>>;

    /// Called whenever the API answers 401. Front ends send the user to the
    /// sign-in view from here.
    fn on_unauthorized(&self);
}

/// Resolves the bearer token for a protected call, refusing to proceed
/// without a session.
pub async fn require_token(auth: &dyn AuthProviderTrait) -> Result<String> {
    if !auth.is_signed_in() {
        warn!("[Auth] User is not signed in");
        return Err(Error::NotAuthenticated);
    }

    match auth.get_token().await? {
        Some(token) if !token.trim().is_empty() => {
            debug!("[Auth] Token retrieved (length: {})", token.len());
            Ok(token)
        }
        _ => {
            warn!("[Auth] Token is missing for a signed-in session");
            Err(Error::MissingToken)
        }
    }
}

/// Token supplied up front, e.g. from the environment.
#[derive(Debug, Clone, Default)]
pub struct StaticTokenProvider {
    token: Option<String>,
}

impl StaticTokenProvider {
    pub fn new(token: Option<String>) -> Self {
        Self {
            token: token.filter(|t| !t.trim().is_empty()),
        }
    }

    pub fn signed_out() -> Self {
        Self { token: None }
    }
}

#[async_trait]
impl AuthProviderTrait for StaticTokenProvider {
    fn is_signed_in(&self) -> bool {
        self.token.is_some()
    }

    async fn get_token(&self) -> Result<Option<String>> {
        Ok(self.token.clone())
    }

    fn on_unauthorized(&self) {
        warn!("[Auth] Session rejected by the API; a new sign-in is required");
    }
}
