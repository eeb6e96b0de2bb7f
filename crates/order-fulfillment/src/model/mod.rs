//! Plain domain values. [`Order`] is also the entity hosted by the order actor.

pub mod customer;
pub mod menu;
pub mod order;

pub use customer::*;
pub use menu::*;
pub use order::*;
