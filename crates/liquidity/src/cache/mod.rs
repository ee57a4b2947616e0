//! Query cache keyed by resource name.

mod query_cache;
mod query_key;

pub use query_cache::{QueryCache, SharedQueryCache};
pub use query_key::QueryKey;
