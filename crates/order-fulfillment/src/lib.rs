//! # Order Fulfillment
//!
//! The concurrent core of a small point-of-sale: an order lifecycle state machine, one
//! bounded kitchen worker pool, payment settlement, and a durable revenue ledger.
//!
//! ## Flow
//!
//! ```text
//! create_order ─▶ add_item* ─▶ dispatch ─▶ kitchen queue ─▶ worker: prepare ─▶ Settle
//!                                                                               │
//!                                    Order actor: still Preparing? ─ yes ─▶ ledger += total, Ready
//!                                                                 └─ cancelled ─▶ no payment
//! ```
//!
//! ## Components
//!
//! - [`model`] - [`Order`](model::Order), menu items, statuses
//! - [`order_actor`] - hosts every order in a `ResourceActor`, so per-order transitions
//!   are totally ordered
//! - [`kitchen`] - the shared worker pool and its preparation-time policy
//! - [`settlement`] - takes payment once per order and records receipts
//! - [`ledger`] - the revenue total, serialized behind one lock and persisted as JSON
//! - [`clients`] - [`OrderClient`](clients::OrderClient) and
//!   [`KitchenClient`](clients::KitchenClient)
//! - [`lifecycle`] - [`OrderSystem`](lifecycle::OrderSystem) wires and stops everything
//! - [`config`] - defaults, optional config file, `FULFILLMENT__*` overrides

pub mod clients;
pub mod config;
pub mod kitchen;
pub mod ledger;
pub mod lifecycle;
pub mod model;
pub mod order_actor;
pub mod settlement;
