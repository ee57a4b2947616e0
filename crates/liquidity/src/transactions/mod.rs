//! Transactions module - log entries, filtering and CSV export.

mod transactions_export;
mod transactions_model;

pub use transactions_export::{
    export_file_name, transactions_to_csv, write_transactions_csv, CSV_HEADERS,
};
pub use transactions_model::{
    filter_transactions, Transaction, TransactionFilter, TransactionKind, TransactionStatus,
};
