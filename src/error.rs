//! Error types for the ledger core.

use thiserror::Error;

/// Result type alias for ledger operations
pub type Result<T> = std::result::Result<T, LedgerError>;

/// Errors raised at the crate's ingestion boundary.
///
/// Aggregation and settlement are total: bad data degrades to numeric
/// defaults instead of failing. Only parsing a scanner payload can error.
#[derive(Error, Debug)]
pub enum LedgerError {
    /// The bill scanner's output was not a valid JSON item list
    #[error("scan output is not a valid item list: {0}")]
    Scan(#[from] serde_json::Error),
}
