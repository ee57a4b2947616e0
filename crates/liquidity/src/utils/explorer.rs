//! Outbound block-explorer links.

/// Link to a transaction on the configured block explorer.
pub fn tx_url(explorer_url: &str, tx_hash: &str) -> String {
    format!("{}/tx/{}", explorer_url.trim_end_matches('/'), tx_hash.trim())
}

/// Link to an address on the configured block explorer.
pub fn address_url(explorer_url: &str, address: &str) -> String {
    format!(
        "{}/address/{}",
        explorer_url.trim_end_matches('/'),
        address.trim()
    )
}
