//! Error types for the Order actor.

use crate::kitchen::KitchenError;
use crate::model::{OrderOperation, OrderStatus};
use crate::settlement::SettlementError;
use thiserror::Error;

/// Errors that can occur during order operations.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum OrderError {
    /// The operation is not allowed in the order's current status. The order is unchanged.
    #[error("Cannot {operation} an order that is {status}")]
    InvalidStateTransition {
        operation: OrderOperation,
        status: OrderStatus,
    },

    /// The requested order was not found.
    #[error("Order not found: {0}")]
    NotFound(String),

    /// The item name is not on the order's menu.
    #[error("Unknown menu item: {0}")]
    UnknownMenuItem(String),

    /// Payment could not be recorded; the order stays in `Preparing`.
    #[error("Settlement failed: {0}")]
    Settlement(#[from] SettlementError),

    /// The kitchen no longer accepts orders.
    #[error("Kitchen unavailable: {0}")]
    Kitchen(#[from] KitchenError),

    /// An error occurred while communicating with the actor system.
    #[error("Actor communication error: {0}")]
    ActorCommunicationError(String),
}

impl OrderError {
    pub fn is_invalid_transition(&self) -> bool {
        matches!(self, OrderError::InvalidStateTransition { .. })
    }
}
