//! Pool module - public aggregate statistics.

mod pool_model;

pub use pool_model::{PoolStats, UtilizationLevel};
