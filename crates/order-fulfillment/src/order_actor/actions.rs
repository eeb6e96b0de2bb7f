//! Custom actions for the Order actor.
//!
//! Each variant maps onto one transition of [`Order`](crate::model::Order); results match
//! 1:1 with the actions.

use crate::model::MenuItem;
use crate::settlement::SettlementOutcome;

#[derive(Debug, Clone)]
pub enum OrderAction {
    AddItem(MenuItem),
    /// Add an item by name from the order's own menu snapshot.
    AddMenuItem(String),
    Cancel,
    /// `NotStarted -> Preparing`. The caller submits the kitchen ticket only after this
    /// succeeds.
    BeginDispatch,
    /// `Preparing -> NotStarted` when the kitchen closed before the ticket could be queued.
    RevertDispatch,
    /// Cancellation check plus payment, run by a kitchen worker after preparation.
    Settle,
    Deliver,
}

#[derive(Debug, Clone)]
pub enum OrderActionResult {
    ItemAdded { total: f64 },
    Cancelled,
    DispatchAccepted,
    DispatchReverted,
    Settled(SettlementOutcome),
    Delivered,
}
