//! # Revenue Ledger
//!
//! A single running revenue total shared by every kitchen worker, optionally persisted to a
//! small JSON file (`{"total": 123.5}`).
//!
//! All reads and writes go through one async mutex. An increment updates the total and
//! writes the file before the lock is released, so concurrent increments are never lost
//! and the file always holds the value of some completed increment.
//!
//! Persistence failures do not fail the increment: the in-memory total stays authoritative,
//! a warning is logged, and [`RevenueLedger::is_degraded`] reports `true` until a later
//! write succeeds.

mod error;

pub use error::LedgerError;

use serde::{Deserialize, Serialize};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::Mutex;
use tracing::{debug, info, instrument, warn};

#[derive(Debug, Serialize, Deserialize)]
struct LedgerFile {
    total: f64,
}

/// Accumulated revenue, safe to share behind an `Arc`.
#[derive(Debug)]
pub struct RevenueLedger {
    total: Mutex<f64>,
    path: Option<PathBuf>,
    degraded: AtomicBool,
}

impl RevenueLedger {
    /// A ledger that is never written to disk.
    ///
    /// Invalid starting values (negative, NaN, infinite) are replaced by zero.
    pub fn in_memory(initial: f64) -> Self {
        Self {
            total: Mutex::new(sanitize(initial)),
            path: None,
            degraded: AtomicBool::new(false),
        }
    }

    /// Opens the ledger backed by `path`, starting from the stored total.
    ///
    /// Never fails. A missing file starts at zero. A corrupt file starts at zero with a
    /// warning. Any other read error also starts at zero and marks the ledger degraded.
    pub async fn load(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let mut degraded = false;
        let total = match read_snapshot(&path).await {
            Ok(Some(total)) => {
                info!(path = %path.display(), total, "Loaded revenue ledger");
                total
            }
            Ok(None) => {
                info!(path = %path.display(), "No revenue ledger yet, starting at 0");
                0.0
            }
            Err(e @ LedgerError::Corrupt { .. }) => {
                warn!(error = %e, "Ignoring stored revenue, starting at 0");
                0.0
            }
            Err(e) => {
                warn!(error = %e, "Revenue ledger unreadable, starting at 0");
                degraded = true;
                0.0
            }
        };

        Self {
            total: Mutex::new(total),
            path: Some(path),
            degraded: AtomicBool::new(degraded),
        }
    }

    /// Adds `amount` and persists the new total. Returns the total after this increment.
    ///
    /// The whole read-modify-write-persist sequence is atomic with respect to other
    /// increments.
    #[instrument(skip(self))]
    pub async fn increment(&self, amount: f64) -> Result<f64, LedgerError> {
        if !amount.is_finite() || amount < 0.0 {
            return Err(LedgerError::InvalidAmount(amount));
        }

        let mut total = self.total.lock().await;
        let next = *total + amount;
        if !next.is_finite() {
            return Err(LedgerError::Overflow {
                total: *total,
                amount,
            });
        }
        *total = next;
        debug!(total = *total, "Revenue updated");
        self.write_through(*total).await;
        Ok(*total)
    }

    /// The total after the most recent completed increment.
    pub async fn current_value(&self) -> f64 {
        *self.total.lock().await
    }

    /// Writes the current total again. Useful after a degraded period.
    pub async fn persist(&self) -> Result<(), LedgerError> {
        let total = self.total.lock().await;
        let Some(path) = &self.path else {
            return Ok(());
        };
        let result = write_snapshot(path, *total).await;
        self.degraded.store(result.is_err(), Ordering::SeqCst);
        result
    }

    /// Whether the last persistence attempt failed.
    pub fn is_degraded(&self) -> bool {
        self.degraded.load(Ordering::SeqCst)
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    async fn write_through(&self, total: f64) {
        let Some(path) = &self.path else {
            return;
        };
        match write_snapshot(path, total).await {
            Ok(()) => {
                if self.degraded.swap(false, Ordering::SeqCst) {
                    info!(path = %path.display(), "Revenue ledger persistence recovered");
                }
            }
            Err(e) => {
                warn!(error = %e, total, "Revenue kept in memory only");
                self.degraded.store(true, Ordering::SeqCst);
            }
        }
    }
}

fn sanitize(value: f64) -> f64 {
    if value.is_finite() && value >= 0.0 {
        value
    } else {
        0.0
    }
}

async fn read_snapshot(path: &Path) -> Result<Option<f64>, LedgerError> {
    let bytes = match tokio::fs::read(path).await {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
        Err(e) => {
            return Err(LedgerError::PersistenceUnavailable {
                path: path.to_path_buf(),
                reason: e.to_string(),
            })
        }
    };

    let file: LedgerFile = serde_json::from_slice(&bytes).map_err(|e| LedgerError::Corrupt {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;

    if !file.total.is_finite() || file.total < 0.0 {
        return Err(LedgerError::Corrupt {
            path: path.to_path_buf(),
            reason: format!("invalid total {}", file.total),
        });
    }
    Ok(Some(file.total))
}

/// Writes to a sibling temp file and renames it over `path`, so a crash mid-write leaves
/// the previous snapshot intact.
async fn write_snapshot(path: &Path, total: f64) -> Result<(), LedgerError> {
    let unavailable = |e: std::io::Error| LedgerError::PersistenceUnavailable {
        path: path.to_path_buf(),
        reason: e.to_string(),
    };

    let body = serde_json::to_vec(&LedgerFile { total }).map_err(|e| {
        LedgerError::PersistenceUnavailable {
            path: path.to_path_buf(),
            reason: e.to_string(),
        }
    })?;

    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".tmp");
    let tmp = PathBuf::from(tmp);

    tokio::fs::write(&tmp, body).await.map_err(unavailable)?;
    tokio::fs::rename(&tmp, path).await.map_err(unavailable)
}
