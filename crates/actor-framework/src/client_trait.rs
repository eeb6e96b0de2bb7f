//! # ActorClient Trait
//!
//! Shared surface for domain-specific client wrappers around a [`ResourceClient`].
use crate::{ActorEntity, FrameworkError, ResourceClient};
use async_trait::async_trait;

/// Implemented by domain clients (e.g. an `OrderClient`) to inherit a typed `get` and a
/// single place where framework errors are translated into the domain error type.
#[async_trait]
pub trait ActorClient<T: ActorEntity>: Send + Sync {
    /// The domain error type returned by the wrapper.
    type Error: Send + Sync;

    /// Access the wrapped generic client.
    fn inner(&self) -> &ResourceClient<T>;

    /// Translate a framework error into the domain error type.
    fn map_error(e: FrameworkError) -> Self::Error;

    /// Fetch a snapshot of an entity by id.
    #[tracing::instrument(skip(self))]
    async fn get(&self, id: T::Id) -> Result<Option<T>, Self::Error> {
        tracing::debug!("Sending request");
        self.inner().get(id).await.map_err(Self::map_error)
    }
}
