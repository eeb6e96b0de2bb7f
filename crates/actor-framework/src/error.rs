//! # Framework Errors
//!
//! Errors raised by the actor plumbing itself, as opposed to entity business rules.

use thiserror::Error;

/// Everything a [`ResourceClient`](crate::ResourceClient) call can fail with.
#[derive(Debug, Error)]
pub enum FrameworkError {
    /// The actor's loop has ended; the request was never delivered.
    #[error("Actor is no longer running")]
    ActorClosed,

    /// The request was delivered but the actor stopped before replying.
    #[error("Actor stopped before replying")]
    ActorDropped,

    #[error("No entity with id {0}")]
    NotFound(String),

    /// A business rule rejected the request. Downcast to the entity's own error type.
    #[error("Entity error: {0}")]
    EntityError(Box<dyn std::error::Error + Send + Sync>),
}

impl FrameworkError {
    /// Returns the entity error if it is of type `E`.
    pub fn entity_error<E: std::error::Error + 'static>(&self) -> Option<&E> {
        match self {
            FrameworkError::EntityError(inner) => inner.downcast_ref::<E>(),
            _ => None,
        }
    }
}
