//! CSV export of the visible transaction rows.

use std::io::Write;

use chrono::{DateTime, Utc};
use csv::WriterBuilder;

use crate::constants::MISSING_HASH;
use crate::errors::{Error, Result};
use crate::utils::format::{format_date, DateStyle};

use super::transactions_model::Transaction;

/// Column order of the export.
pub const CSV_HEADERS: [&str; 6] = [
    "Date",
    "Type",
    "Amount",
    "Status",
    "Transaction Hash",
    "Description",
];

/// Writes one header row plus one row per transaction.
pub fn write_transactions_csv<W: Write>(transactions: &[Transaction], writer: W) -> Result<()> {
    let mut csv_writer = WriterBuilder::new().has_headers(false).from_writer(writer);

    csv_writer
        .write_record(CSV_HEADERS)
        .map_err(|e| Error::Export(e.to_string()))?;

    for tx in transactions {
        let date = format_date(tx.timestamp, DateStyle::Long);
        let amount = tx.amount.normalize().to_string();
        let hash = tx
            .tx_hash
            .as_deref()
            .filter(|h| !h.is_empty())
            .unwrap_or(MISSING_HASH);

        csv_writer
            .write_record([
                date.as_str(),
                tx.kind.label(),
                amount.as_str(),
                tx.status.label(),
                hash,
                tx.description.as_str(),
            ])
            .map_err(|e| Error::Export(e.to_string()))?;
    }

    csv_writer.flush().map_err(|e| Error::Export(e.to_string()))
}

/// Renders the export into a string.
pub fn transactions_to_csv(transactions: &[Transaction]) -> Result<String> {
    let mut buffer = Vec::new();
    write_transactions_csv(transactions, &mut buffer)?;
    String::from_utf8(buffer).map_err(|e| Error::Export(e.to_string()))
}

/// `transactions-<unix millis>.csv`
pub fn export_file_name(now: DateTime<Utc>) -> String {
    format!("transactions-{}.csv", now.timestamp_millis())
}
