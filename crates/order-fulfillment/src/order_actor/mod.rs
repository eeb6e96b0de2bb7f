//! # Order Actor
//!
//! Hosts every [`Order`] in one [`ResourceActor`]. All transitions of all orders go through
//! this actor's message loop, one at a time.
//!
//! - [`entity`] - [`ActorEntity`](actor_framework::ActorEntity) implementation
//! - [`actions`] - [`OrderAction`] / [`OrderActionResult`]
//! - [`error`] - [`OrderError`]
//!
//! The actor's context is the shared [`PaymentSettlement`](crate::settlement::PaymentSettlement)
//! service:
//!
//! ```rust,ignore
//! let (actor, generic_client) = order_actor::new(32);
//! tokio::spawn(actor.run(settlement.clone()));
//! let orders = OrderClient::new(generic_client, kitchen_client);
//! ```

pub mod actions;
pub mod entity;
pub mod error;

pub use actions::*;
pub use error::*;

use crate::model::Order;
use actor_framework::{ResourceActor, ResourceClient};

/// Creates a new Order actor and its client.
pub fn new(buffer_size: usize) -> (ResourceActor<Order>, ResourceClient<Order>) {
    ResourceActor::new(buffer_size)
}
