//! The order entity and its lifecycle state machine.
//!
//! ```text
//! NotStarted ──dispatch──▶ Preparing ──settle──▶ Ready ──deliver──▶ Delivered
//!     │                        │
//!     └────────cancel──────────┴──────▶ Cancelled
//! ```
//!
//! Every transition method either applies completely or returns
//! [`OrderError::InvalidStateTransition`] and leaves the order untouched.
//!
//! # Actor Framework
//! [`Order`] implements [`ActorEntity`](actor_framework::ActorEntity) (see
//! [`crate::order_actor`]); the actor is the only place these methods are called from at
//! runtime, which is what makes per-order transitions totally ordered.

use crate::model::{CustomerRef, MenuItem, MenuSnapshot};
use crate::order_actor::OrderError;
use serde::{Deserialize, Serialize};
use std::fmt::Display;
use std::sync::Arc;

/// Type-safe identifier for Orders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct OrderId(pub u32);

impl From<u32> for OrderId {
    fn from(id: u32) -> Self {
        Self(id)
    }
}

impl Display for OrderId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "order_{}", self.0)
    }
}

/// Where an order is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OrderStatus {
    NotStarted,
    Preparing,
    Ready,
    Delivered,
    Cancelled,
}

impl OrderStatus {
    pub const ALL: [OrderStatus; 5] = [
        OrderStatus::NotStarted,
        OrderStatus::Preparing,
        OrderStatus::Ready,
        OrderStatus::Delivered,
        OrderStatus::Cancelled,
    ];

    /// Items may be added, and the order cancelled, only before it is ready.
    pub fn is_open(self) -> bool {
        matches!(self, OrderStatus::NotStarted | OrderStatus::Preparing)
    }

    /// No further transition is driven by the core from here.
    pub fn is_final(self) -> bool {
        !self.is_open()
    }
}

impl Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            OrderStatus::NotStarted => "not started",
            OrderStatus::Preparing => "preparing",
            OrderStatus::Ready => "ready",
            OrderStatus::Delivered => "delivered",
            OrderStatus::Cancelled => "cancelled",
        };
        f.write_str(label)
    }
}

/// The operation that was attempted when a transition is rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderOperation {
    AddItem,
    Cancel,
    Dispatch,
    Settle,
    Deliver,
}

impl Display for OrderOperation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            OrderOperation::AddItem => "add an item to",
            OrderOperation::Cancel => "cancel",
            OrderOperation::Dispatch => "dispatch",
            OrderOperation::Settle => "settle",
            OrderOperation::Deliver => "deliver",
        };
        f.write_str(label)
    }
}

/// A customer order.
#[derive(Debug, Clone)]
pub struct Order {
    id: OrderId,
    customer: CustomerRef,
    menu: Arc<MenuSnapshot>,
    items: Vec<MenuItem>,
    status: OrderStatus,
}

/// Payload for creating a new order.
#[derive(Debug, Clone)]
pub struct OrderCreate {
    pub customer: CustomerRef,
    pub menu: Arc<MenuSnapshot>,
}

impl Order {
    /// Creates an empty order in [`OrderStatus::NotStarted`].
    pub fn new(id: OrderId, customer: CustomerRef, menu: Arc<MenuSnapshot>) -> Self {
        Self {
            id,
            customer,
            menu,
            items: Vec::new(),
            status: OrderStatus::NotStarted,
        }
    }

    pub fn id(&self) -> OrderId {
        self.id
    }

    pub fn customer(&self) -> &CustomerRef {
        &self.customer
    }

    pub fn menu(&self) -> &Arc<MenuSnapshot> {
        &self.menu
    }

    pub fn items(&self) -> &[MenuItem] {
        &self.items
    }

    pub fn status(&self) -> OrderStatus {
        self.status
    }

    /// Sum of the current items' prices, recomputed on every call.
    pub fn total(&self) -> f64 {
        self.items.iter().map(MenuItem::price).sum()
    }

    pub fn add_item(&mut self, item: MenuItem) -> Result<(), OrderError> {
        self.require(OrderOperation::AddItem, OrderStatus::is_open)?;
        self.items.push(item);
        Ok(())
    }

    /// Adds the item called `name` from this order's own menu snapshot.
    ///
    /// The status is checked first, so a closed order reports the rejected transition even
    /// for names that are not on the menu.
    pub fn add_menu_item(&mut self, name: &str) -> Result<&MenuItem, OrderError> {
        self.require(OrderOperation::AddItem, OrderStatus::is_open)?;
        let item = self
            .menu
            .find(name)
            .cloned()
            .ok_or_else(|| OrderError::UnknownMenuItem(name.to_string()))?;
        self.items.push(item);
        Ok(&self.items[self.items.len() - 1])
    }

    pub fn cancel(&mut self) -> Result<(), OrderError> {
        self.require(OrderOperation::Cancel, OrderStatus::is_open)?;
        self.status = OrderStatus::Cancelled;
        Ok(())
    }

    /// `NotStarted -> Preparing`. Succeeds at most once per order.
    pub fn begin_dispatch(&mut self) -> Result<(), OrderError> {
        self.require(OrderOperation::Dispatch, |s| s == OrderStatus::NotStarted)?;
        self.status = OrderStatus::Preparing;
        Ok(())
    }

    /// `Preparing -> NotStarted`, for a dispatch whose ticket never reached the kitchen.
    pub fn revert_dispatch(&mut self) -> Result<(), OrderError> {
        self.require(OrderOperation::Dispatch, |s| s == OrderStatus::Preparing)?;
        self.status = OrderStatus::NotStarted;
        Ok(())
    }

    /// `Preparing -> Ready`, applied once payment has been recorded.
    pub fn mark_ready(&mut self) -> Result<(), OrderError> {
        self.require(OrderOperation::Settle, |s| s == OrderStatus::Preparing)?;
        self.status = OrderStatus::Ready;
        Ok(())
    }

    /// `Ready -> Delivered`, the hand-off to the customer.
    pub fn deliver(&mut self) -> Result<(), OrderError> {
        self.require(OrderOperation::Deliver, |s| s == OrderStatus::Ready)?;
        self.status = OrderStatus::Delivered;
        Ok(())
    }

    fn require(
        &self,
        operation: OrderOperation,
        allowed: impl Fn(OrderStatus) -> bool,
    ) -> Result<(), OrderError> {
        if allowed(self.status) {
            Ok(())
        } else {
            Err(OrderError::InvalidStateTransition {
                operation,
                status: self.status,
            })
        }
    }

    #[cfg(test)]
    pub(crate) fn force_status(&mut self, status: OrderStatus) {
        self.status = status;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn item(name: &str, price: f64) -> MenuItem {
        MenuItem::new(name, price, Duration::from_secs(60), 1).unwrap()
    }

    fn order_in(status: OrderStatus) -> Order {
        let menu = Arc::new(MenuSnapshot::new(vec![item("Burger", 5.0)]));
        let mut order = Order::new(OrderId(1), CustomerRef::from("alice"), menu);
        order.add_item(item("Fries", 2.0)).unwrap();
        order.force_status(status);
        order
    }

    #[test]
    fn total_is_sum_of_current_items() {
        let mut order = order_in(OrderStatus::NotStarted);
        order.add_item(item("Burger", 5.0)).unwrap();
        order.add_item(item("Shake", 3.5)).unwrap();
        assert_eq!(order.total(), 10.5);

        let empty = Order::new(
            OrderId(2),
            CustomerRef::from("bob"),
            Arc::new(MenuSnapshot::default()),
        );
        assert_eq!(empty.total(), 0.0);
    }

    #[test]
    fn add_item_succeeds_only_while_open() {
        for status in OrderStatus::ALL {
            let mut order = order_in(status);
            let result = order.add_item(item("Soda", 1.5));
            if status.is_open() {
                assert!(result.is_ok(), "{status} should accept items");
                assert_eq!(order.items().len(), 2);
                assert_eq!(order.total(), 3.5);
            } else {
                assert!(matches!(
                    result,
                    Err(OrderError::InvalidStateTransition {
                        operation: OrderOperation::AddItem,
                        status: s,
                    }) if s == status
                ));
                assert_eq!(order.items().len(), 1);
                assert_eq!(order.total(), 2.0);
                assert_eq!(order.status(), status);
            }
        }
    }

    #[test]
    fn cancel_succeeds_only_while_open() {
        for status in OrderStatus::ALL {
            let mut order = order_in(status);
            match order.cancel() {
                Ok(()) => {
                    assert!(status.is_open());
                    assert_eq!(order.status(), OrderStatus::Cancelled);
                }
                Err(err) => {
                    assert!(status.is_final(), "{status} should be cancellable: {err}");
                    assert_eq!(order.status(), status);
                }
            }
        }
    }

    #[test]
    fn dispatch_is_accepted_once() {
        let mut order = order_in(OrderStatus::NotStarted);
        order.begin_dispatch().unwrap();
        assert_eq!(order.status(), OrderStatus::Preparing);

        let again = order.begin_dispatch().unwrap_err();
        assert!(matches!(
            again,
            OrderError::InvalidStateTransition {
                operation: OrderOperation::Dispatch,
                status: OrderStatus::Preparing,
            }
        ));

        for status in [OrderStatus::Ready, OrderStatus::Cancelled, OrderStatus::Delivered] {
            assert!(order_in(status).begin_dispatch().is_err());
        }
    }

    #[test]
    fn only_a_preparing_order_can_revert_dispatch() {
        let mut order = order_in(OrderStatus::NotStarted);
        assert!(order.revert_dispatch().is_err());

        order.begin_dispatch().unwrap();
        order.revert_dispatch().unwrap();
        assert_eq!(order.status(), OrderStatus::NotStarted);
        order.begin_dispatch().unwrap();

        for status in [OrderStatus::Ready, OrderStatus::Cancelled, OrderStatus::Delivered] {
            let mut order = order_in(status);
            assert!(order.revert_dispatch().is_err());
            assert_eq!(order.status(), status);
        }
    }

    #[test]
    fn ready_and_delivered_follow_preparation() {
        let mut order = order_in(OrderStatus::NotStarted);
        assert!(order.mark_ready().is_err());
        assert!(order.deliver().is_err());

        order.begin_dispatch().unwrap();
        order.mark_ready().unwrap();
        assert_eq!(order.status(), OrderStatus::Ready);
        assert!(order.mark_ready().is_err());

        order.deliver().unwrap();
        assert_eq!(order.status(), OrderStatus::Delivered);
        assert!(order.cancel().is_err());
    }

    #[test]
    fn add_menu_item_uses_order_menu() {
        let mut order = order_in(OrderStatus::NotStarted);
        assert_eq!(order.add_menu_item("burger").unwrap().price(), 5.0);
        assert_eq!(order.total(), 7.0);

        assert!(matches!(
            order.add_menu_item("Lobster"),
            Err(OrderError::UnknownMenuItem(name)) if name == "Lobster"
        ));

        let mut ready = order_in(OrderStatus::Ready);
        assert!(matches!(
            ready.add_menu_item("Lobster"),
            Err(OrderError::InvalidStateTransition { .. })
        ));
    }
}
