//! StablePay Liquidity - typed client for the liquidity-provider dashboard.
//!
//! Models for every resource the API exposes, a reqwest-backed network
//! boundary, a per-resource query cache and the [`DashboardService`] that
//! ties them together. Rendering is left to the front end.

pub mod api;
pub mod auth;
pub mod cache;
pub mod config;
pub mod constants;
pub mod dashboard;
pub mod earnings;
pub mod errors;
pub mod notifications;
pub mod pool;
pub mod provider;
pub mod settings;
pub mod transactions;
pub mod utils;
pub mod withdrawals;

pub use dashboard::{DashboardService, DashboardServiceTrait};

// Re-export error types
pub use errors::Error;
pub use errors::Result;
