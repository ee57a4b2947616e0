//! Network boundary: transport, envelope normalization and endpoint calls.

pub mod client;
pub mod envelope;
pub mod transport;

pub use client::LiquidityApiClient;
pub use envelope::{extract_error_message, unwrap_envelope, unwrap_list, ApiPayload};
pub use transport::{HttpMethod, HttpRequest, HttpResponse, HttpTransport, ReqwestTransport};
