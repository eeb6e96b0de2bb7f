use super::KitchenError;
use crate::model::OrderId;
use crate::settlement::SettlementOutcome;
use std::time::{Duration, Instant};

/// One unit of kitchen work: prepare and settle the referenced order.
#[derive(Debug, Clone)]
pub struct Ticket {
    pub order_id: OrderId,
    pub submitted_at: Instant,
}

impl Ticket {
    pub fn new(order_id: OrderId) -> Self {
        Self {
            order_id,
            submitted_at: Instant::now(),
        }
    }
}

/// Messages consumed by the worker pool.
#[derive(Debug)]
pub enum KitchenRequest {
    Prepare(Ticket),
    /// Stop accepting work. Tickets already queued are still prepared.
    Shutdown,
}

#[derive(Debug, Clone, PartialEq)]
pub enum PreparationOutcome {
    Completed(SettlementOutcome),
    Failed(KitchenError),
}

impl PreparationOutcome {
    pub fn settlement(&self) -> Option<&SettlementOutcome> {
        match self {
            PreparationOutcome::Completed(outcome) => Some(outcome),
            PreparationOutcome::Failed(_) => None,
        }
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, PreparationOutcome::Failed(_))
    }
}

/// Published on the kitchen's broadcast channel after every ticket.
#[derive(Debug, Clone)]
pub struct KitchenEvent {
    pub order_id: OrderId,
    pub worker: usize,
    pub outcome: PreparationOutcome,
    /// Time from submission to completion, queueing included.
    pub elapsed: Duration,
}
