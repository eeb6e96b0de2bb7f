//! # ActorEntity Trait
//!
//! The contract an entity type satisfies to be hosted by a [`ResourceActor`](crate::ResourceActor).
//!
//! Associated types pin down the identifier, the creation payload, the custom actions and
//! their results, the injected context and the error type, so a request meant for one entity
//! type cannot be sent to another.

use async_trait::async_trait;
use std::fmt::{Debug, Display};
use std::hash::Hash;

/// Trait that any entity must implement to be managed by a `ResourceActor`.
///
/// Entities are never removed by the actor: once created they stay addressable until the
/// actor shuts down. Callers own retention policy.
#[async_trait]
pub trait ActorEntity: Clone + Send + Sync + 'static {
    /// Identifier, generated by the actor from a `u32` counter starting at 1.
    type Id: Eq + Hash + Clone + Send + Sync + Display + Debug + From<u32>;

    /// Payload required to create a new instance.
    type Create: Send + Sync + Debug;

    /// Entity-specific operations.
    type Action: Send + Sync + Debug;

    /// Result returned by [`ActorEntity::handle_action`].
    type ActionResult: Send + Sync + Debug;

    /// Dependencies injected at `run()` time. Use `()` when there are none.
    type Context: Send + Sync;

    /// Per-entity error type. It crosses the actor boundary boxed inside
    /// [`FrameworkError::EntityError`](crate::FrameworkError::EntityError), so clients
    /// can downcast it back.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Build the entity from its freshly assigned id and the creation payload.
    fn from_create_params(id: Self::Id, params: Self::Create) -> Result<Self, Self::Error>;

    /// Called after construction, before the entity becomes visible.
    async fn on_create(&mut self, _ctx: &Self::Context) -> Result<(), Self::Error> {
        Ok(())
    }

    /// Handle an entity-specific action.
    ///
    /// The actor processes one message at a time, so the entity is never observed or
    /// mutated concurrently while this runs. Errors must leave the entity unchanged.
    async fn handle_action(
        &mut self,
        action: Self::Action,
        ctx: &Self::Context,
    ) -> Result<Self::ActionResult, Self::Error>;
}
