//! # Actor Framework
//!
//! Small building blocks for running stateful entities inside Tokio tasks.
//!
//! An entity type implements [`ActorEntity`]; a [`ResourceActor`] owns every instance of
//! that type and processes requests for them one at a time; callers talk to it through a
//! cloneable [`ResourceClient`]. Because each actor handles its messages sequentially, all
//! mutations of a given entity are totally ordered without any locking on the entity itself.
//!
//! ## Layers
//!
//! 1. **Entity** ([`ActorEntity`]) - domain state plus the `handle_action` hook.
//! 2. **Runtime** ([`ResourceActor`]) - the message loop and the entity store.
//! 3. **Interface** ([`ResourceClient`], [`ActorClient`]) - typed request/response calls.
//!
//! ## Context injection
//!
//! Dependencies an entity needs while handling a message (another service, a shared
//! ledger, a client for a different actor) are passed to [`ResourceActor::run`] rather than
//! to the constructor. The actor can therefore be built before its collaborators exist, and
//! wiring happens once everything has been created.
//!
//! ```rust
//! use actor_framework::{ActorEntity, ResourceActor};
//! use async_trait::async_trait;
//!
//! #[derive(Clone, Debug)]
//! struct Counter { id: u32, hits: u64 }
//! #[derive(Debug)] struct CounterCreate;
//! #[derive(Debug)] enum CounterAction { Hit }
//! #[derive(Debug, thiserror::Error)] #[error("counter error")] struct CounterError;
//!
//! #[async_trait]
//! impl ActorEntity for Counter {
//!     type Id = u32;
//!     type Create = CounterCreate;
//!     type Action = CounterAction;
//!     type ActionResult = u64;
//!     type Context = ();
//!     type Error = CounterError;
//!
//!     fn from_create_params(id: u32, _: CounterCreate) -> Result<Self, Self::Error> {
//!         Ok(Self { id, hits: 0 })
//!     }
//!
//!     async fn handle_action(&mut self, action: CounterAction, _: &()) -> Result<u64, Self::Error> {
//!         match action {
//!             CounterAction::Hit => { self.hits += 1; Ok(self.hits) }
//!         }
//!     }
//! }
//!
//! #[tokio::main]
//! async fn main() {
//!     let (actor, client) = ResourceActor::<Counter>::new(8);
//!     tokio::spawn(actor.run(()));
//!
//!     let id = client.create(CounterCreate).await.unwrap();
//!     assert_eq!(client.perform_action(id, CounterAction::Hit).await.unwrap(), 1);
//! }
//! ```
//!
//! ## Testing
//!
//! [`mock::MockClient`] answers requests from a queue of expectations instead of a real
//! actor, which keeps client-wrapper tests deterministic.

pub mod actor;
pub mod client;
pub mod client_trait;
pub mod entity;
pub mod error;
pub mod message;
pub mod mock;
pub mod tracing;

pub use actor::ResourceActor;
pub use client::ResourceClient;
pub use client_trait::ActorClient;
pub use entity::ActorEntity;
pub use error::FrameworkError;
pub use message::{ResourceRequest, Response};
