//! Wiring and lifecycle of the running system.

pub mod order_system;

pub use order_system::{OrderSystem, SystemError};
