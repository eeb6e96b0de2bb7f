use crate::ledger::LedgerError;
use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum SettlementError {
    #[error(transparent)]
    Ledger(#[from] LedgerError),
}
