use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum LedgerError {
    /// Increments must be finite and non-negative. The ledger is unchanged.
    #[error("Invalid ledger amount: {0}")]
    InvalidAmount(f64),

    /// The new total would not be a finite number. The ledger is unchanged.
    #[error("Adding {amount} to {total} overflows the ledger")]
    Overflow { total: f64, amount: f64 },

    #[error("Ledger file {path} unavailable: {reason}")]
    PersistenceUnavailable { path: PathBuf, reason: String },

    #[error("Ledger file {path} is corrupt: {reason}")]
    Corrupt { path: PathBuf, reason: String },
}
