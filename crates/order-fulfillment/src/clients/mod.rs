//! Typed handles for talking to the running components.
//!
//! - [`OrderClient`] - every order operation, including dispatch to the kitchen
//! - [`KitchenClient`] - queue submission, shutdown and completion events

pub mod kitchen_client;
pub mod order_client;

pub use kitchen_client::{KitchenClient, KitchenSlot};
pub use order_client::OrderClient;
