//! [`ActorEntity`] implementation for [`Order`].
//!
//! The injected context is the shared [`PaymentSettlement`] service. Settlement runs inside
//! the actor's message handler, so the cancellation check and the ledger credit cannot be
//! interleaved with a `Cancel` for the same order: whichever message the actor receives
//! first wins.

use super::actions::{OrderAction, OrderActionResult};
use super::error::OrderError;
use crate::model::{Order, OrderCreate, OrderId, OrderOperation, OrderStatus};
use crate::settlement::{PaymentSettlement, SettlementOutcome};
use actor_framework::ActorEntity;
use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, info};

#[async_trait]
impl ActorEntity for Order {
    type Id = OrderId;
    type Create = OrderCreate;
    type Action = OrderAction;
    type ActionResult = OrderActionResult;
    type Context = Arc<PaymentSettlement>;
    type Error = OrderError;

    fn from_create_params(id: OrderId, params: OrderCreate) -> Result<Self, Self::Error> {
        Ok(Self::new(id, params.customer, params.menu))
    }

    async fn handle_action(
        &mut self,
        action: OrderAction,
        settlement: &Arc<PaymentSettlement>,
    ) -> Result<OrderActionResult, OrderError> {
        match action {
            OrderAction::AddItem(item) => {
                self.add_item(item)?;
                Ok(OrderActionResult::ItemAdded {
                    total: self.total(),
                })
            }
            OrderAction::AddMenuItem(name) => {
                self.add_menu_item(&name)?;
                Ok(OrderActionResult::ItemAdded {
                    total: self.total(),
                })
            }
            OrderAction::Cancel => {
                self.cancel()?;
                info!(order_id = %self.id(), "Order cancelled");
                Ok(OrderActionResult::Cancelled)
            }
            OrderAction::BeginDispatch => {
                self.begin_dispatch()?;
                Ok(OrderActionResult::DispatchAccepted)
            }
            OrderAction::RevertDispatch => {
                self.revert_dispatch()?;
                info!(order_id = %self.id(), "Dispatch rolled back");
                Ok(OrderActionResult::DispatchReverted)
            }
            OrderAction::Settle => self.settle(settlement).await.map(OrderActionResult::Settled),
            OrderAction::Deliver => {
                self.deliver()?;
                Ok(OrderActionResult::Delivered)
            }
        }
    }
}

impl Order {
    /// The single cancellation check point, immediately followed by payment.
    ///
    /// Ledger credit and the `Ready` transition happen together or not at all: if payment
    /// fails the order stays in `Preparing`.
    async fn settle(
        &mut self,
        settlement: &PaymentSettlement,
    ) -> Result<SettlementOutcome, OrderError> {
        match self.status() {
            OrderStatus::Cancelled => {
                info!(order_id = %self.id(), "Cancelled during preparation, no payment taken");
                Ok(SettlementOutcome::SkippedCancelled)
            }
            OrderStatus::Ready | OrderStatus::Delivered => {
                debug!(order_id = %self.id(), "Already settled");
                Ok(SettlementOutcome::AlreadySettled)
            }
            OrderStatus::NotStarted => Err(OrderError::InvalidStateTransition {
                operation: OrderOperation::Settle,
                status: OrderStatus::NotStarted,
            }),
            OrderStatus::Preparing => {
                let outcome = settlement.settle(self).await?;
                self.mark_ready()?;
                Ok(outcome)
            }
        }
    }
}
