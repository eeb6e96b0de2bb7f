//! # Order Client
//!
//! High-level API for the Order actor. Wraps a `ResourceClient<Order>` and the
//! [`KitchenClient`], which it needs to hand dispatched orders to the kitchen.

use super::KitchenClient;
use crate::model::{CustomerRef, MenuItem, MenuSnapshot, Order, OrderCreate, OrderId, OrderStatus};
use crate::order_actor::{OrderAction, OrderActionResult, OrderError};
use crate::settlement::SettlementOutcome;
use actor_framework::{ActorClient, FrameworkError, ResourceClient};
use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn, Instrument};

/// Client for interacting with the Order actor.
#[derive(Clone)]
pub struct OrderClient {
    inner: ResourceClient<Order>,
    kitchen: KitchenClient,
}

impl OrderClient {
    pub fn new(inner: ResourceClient<Order>, kitchen: KitchenClient) -> Self {
        Self { inner, kitchen }
    }

    #[instrument(skip(self, customer, menu))]
    pub async fn create_order(
        &self,
        customer: impl Into<CustomerRef> + Send,
        menu: Arc<MenuSnapshot>,
    ) -> Result<OrderId, OrderError> {
        let customer = customer.into();
        debug!(%customer, "Sending request");
        self.inner
            .create(OrderCreate { customer, menu })
            .await
            .map_err(Self::map_error)
    }

    #[instrument(skip(self, item), fields(item = item.name()))]
    pub async fn add_item(&self, id: OrderId, item: MenuItem) -> Result<(), OrderError> {
        debug!("Sending request");
        match self.perform(id, OrderAction::AddItem(item)).await? {
            OrderActionResult::ItemAdded { total } => {
                debug!(total, "Item added");
                Ok(())
            }
            _ => unreachable!("AddItem action must return ItemAdded result"),
        }
    }

    /// Adds an item by name from the menu the order was created with.
    #[instrument(skip(self))]
    pub async fn add_menu_item(&self, id: OrderId, name: &str) -> Result<(), OrderError> {
        debug!("Sending request");
        match self
            .perform(id, OrderAction::AddMenuItem(name.to_string()))
            .await?
        {
            OrderActionResult::ItemAdded { .. } => Ok(()),
            _ => unreachable!("AddMenuItem action must return ItemAdded result"),
        }
    }

    #[instrument(skip(self))]
    pub async fn cancel(&self, id: OrderId) -> Result<(), OrderError> {
        debug!("Sending request");
        match self.perform(id, OrderAction::Cancel).await? {
            OrderActionResult::Cancelled => Ok(()),
            _ => unreachable!("Cancel action must return Cancelled result"),
        }
    }

    /// Moves the order to `Preparing` and queues exactly one kitchen ticket for it.
    ///
    /// The work runs on its own task, so dropping this future never separates the
    /// transition from the ticket. If the queue has room a slot is taken before the order is
    /// asked. If it is full the order decides first: a rejected dispatch returns at once
    /// and an accepted one waits for room. Fails with [`OrderError::Kitchen`] once the
    /// kitchen is shutting down, leaving the order `NotStarted`.
    #[instrument(skip(self))]
    pub async fn dispatch(&self, id: OrderId) -> Result<(), OrderError> {
        let orders = self.clone();
        tokio::spawn(async move { orders.queue_ticket(id).await }.in_current_span())
            .await
            .map_err(|e| OrderError::ActorCommunicationError(e.to_string()))?
    }

    async fn queue_ticket(&self, id: OrderId) -> Result<(), OrderError> {
        if let Some(slot) = self.kitchen.try_reserve()? {
            self.begin_dispatch(id).await?;
            slot.submit(id);
            info!("Order dispatched");
            return Ok(());
        }

        self.begin_dispatch(id).await?;
        debug!("Kitchen queue full, waiting");
        match self.kitchen.reserve().await {
            Ok(slot) => {
                slot.submit(id);
                info!("Order dispatched");
                Ok(())
            }
            Err(e) => {
                warn!(error = %e, "Kitchen closed before the ticket was queued");
                match self.perform(id, OrderAction::RevertDispatch).await? {
                    OrderActionResult::DispatchReverted => Err(e.into()),
                    _ => unreachable!("RevertDispatch action must return DispatchReverted result"),
                }
            }
        }
    }

    async fn begin_dispatch(&self, id: OrderId) -> Result<(), OrderError> {
        match self.perform(id, OrderAction::BeginDispatch).await? {
            OrderActionResult::DispatchAccepted => Ok(()),
            _ => unreachable!("BeginDispatch action must return DispatchAccepted result"),
        }
    }

    /// Takes payment and marks the order ready. Called by kitchen workers.
    #[instrument(skip(self))]
    pub async fn settle(&self, id: OrderId) -> Result<SettlementOutcome, OrderError> {
        match self.perform(id, OrderAction::Settle).await? {
            OrderActionResult::Settled(outcome) => Ok(outcome),
            _ => unreachable!("Settle action must return Settled result"),
        }
    }

    #[instrument(skip(self))]
    pub async fn deliver(&self, id: OrderId) -> Result<(), OrderError> {
        match self.perform(id, OrderAction::Deliver).await? {
            OrderActionResult::Delivered => Ok(()),
            _ => unreachable!("Deliver action must return Delivered result"),
        }
    }

    /// A copy of the order as the actor currently holds it.
    pub async fn snapshot(&self, id: OrderId) -> Result<Order, OrderError> {
        self.get(id)
            .await?
            .ok_or_else(|| OrderError::NotFound(id.to_string()))
    }

    pub async fn status(&self, id: OrderId) -> Result<OrderStatus, OrderError> {
        Ok(self.snapshot(id).await?.status())
    }

    pub async fn total(&self, id: OrderId) -> Result<f64, OrderError> {
        Ok(self.snapshot(id).await?.total())
    }

    pub fn kitchen(&self) -> &KitchenClient {
        &self.kitchen
    }

    async fn perform(
        &self,
        id: OrderId,
        action: OrderAction,
    ) -> Result<OrderActionResult, OrderError> {
        self.inner
            .perform_action(id, action)
            .await
            .map_err(Self::map_error)
    }
}

#[async_trait]
impl ActorClient<Order> for OrderClient {
    type Error = OrderError;

    fn inner(&self) -> &ResourceClient<Order> {
        &self.inner
    }

    /// Business errors come back boxed; unwrap them so callers can match on them.
    fn map_error(e: FrameworkError) -> Self::Error {
        match e {
            FrameworkError::EntityError(inner) => match inner.downcast::<OrderError>() {
                Ok(err) => *err,
                Err(other) => OrderError::ActorCommunicationError(other.to_string()),
            },
            FrameworkError::NotFound(id) => OrderError::NotFound(id),
            other => OrderError::ActorCommunicationError(other.to_string()),
        }
    }
}
