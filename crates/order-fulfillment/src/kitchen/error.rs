use crate::model::OrderId;
use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum KitchenError {
    /// The kitchen is shutting down or has stopped; nothing was submitted.
    #[error("Kitchen is closed")]
    Closed,

    /// A ticket could not be completed. The order keeps its last valid status.
    #[error("Preparation of {order_id} failed: {reason}")]
    PreparationFailure { order_id: OrderId, reason: String },
}
