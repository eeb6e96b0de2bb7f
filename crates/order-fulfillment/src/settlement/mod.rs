//! # Payment Settlement
//!
//! Credits an order's total to the [`RevenueLedger`] exactly once and keeps a [`Receipt`]
//! per settled order.
//!
//! The service is the Order actor's context, so `settle` is only ever called from inside
//! that actor, after it has checked the order is still `Preparing`. The receipt map is the
//! second guard: a repeated call for the same order never credits the ledger twice.

mod error;

pub use error::SettlementError;

use crate::ledger::RevenueLedger;
use crate::model::{CustomerRef, Order, OrderId, OrderStatus};
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{info, instrument};

/// Proof of payment for one order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Receipt {
    pub order_id: OrderId,
    pub customer: CustomerRef,
    pub amount: f64,
    pub item_count: usize,
    /// Ledger total right after this payment was credited.
    pub ledger_total: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SettlementOutcome {
    /// Payment was taken and the ledger credited.
    Settled(Receipt),
    /// The order had already been paid for; nothing changed.
    AlreadySettled,
    /// The order was cancelled before payment; nothing changed.
    SkippedCancelled,
}

impl SettlementOutcome {
    pub fn receipt(&self) -> Option<&Receipt> {
        match self {
            SettlementOutcome::Settled(receipt) => Some(receipt),
            _ => None,
        }
    }

    pub fn is_settled(&self) -> bool {
        matches!(self, SettlementOutcome::Settled(_))
    }
}

#[derive(Debug)]
pub struct PaymentSettlement {
    ledger: Arc<RevenueLedger>,
    receipts: Mutex<HashMap<OrderId, Receipt>>,
}

impl PaymentSettlement {
    pub fn new(ledger: Arc<RevenueLedger>) -> Self {
        Self {
            ledger,
            receipts: Mutex::new(HashMap::new()),
        }
    }

    /// Takes payment for `order`.
    ///
    /// Cancelled orders are skipped and orders with a receipt are reported as already
    /// settled; in both cases the ledger is untouched. If the ledger rejects the amount,
    /// no receipt is recorded and the call can be retried.
    #[instrument(skip(self, order), fields(order_id = %order.id()))]
    pub async fn settle(&self, order: &Order) -> Result<SettlementOutcome, SettlementError> {
        if order.status() == OrderStatus::Cancelled {
            return Ok(SettlementOutcome::SkippedCancelled);
        }

        let mut receipts = self.receipts.lock().await;
        if receipts.contains_key(&order.id()) {
            return Ok(SettlementOutcome::AlreadySettled);
        }

        let amount = order.total();
        let ledger_total = self.ledger.increment(amount).await?;
        let receipt = Receipt {
            order_id: order.id(),
            customer: order.customer().clone(),
            amount,
            item_count: order.items().len(),
            ledger_total,
        };
        receipts.insert(order.id(), receipt.clone());

        info!(
            customer = %receipt.customer,
            amount,
            ledger_total,
            "Payment settled"
        );
        Ok(SettlementOutcome::Settled(receipt))
    }

    pub async fn receipt_for(&self, id: OrderId) -> Option<Receipt> {
        self.receipts.lock().await.get(&id).cloned()
    }

    /// All receipts, ordered by order id.
    pub async fn receipts(&self) -> Vec<Receipt> {
        let mut all: Vec<Receipt> = self.receipts.lock().await.values().cloned().collect();
        all.sort_by_key(|r| r.order_id);
        all
    }

    pub fn ledger(&self) -> &Arc<RevenueLedger> {
        &self.ledger
    }
}
