//! # Generic Messages
//!
//! Requests sent from a [`ResourceClient`](crate::ResourceClient) to a
//! [`ResourceActor`](crate::ResourceActor).

use crate::entity::ActorEntity;
use crate::error::FrameworkError;
use tokio::sync::oneshot;

/// One-shot channel the actor answers on.
pub type Response<T> = oneshot::Sender<Result<T, FrameworkError>>;

/// A request to the actor.
///
/// - **Create**: build a new entity from [`ActorEntity::Create`] and return its id.
/// - **Get**: return a snapshot (clone) of the entity, or `None`.
/// - **Action**: run an [`ActorEntity::Action`] against one entity.
#[derive(Debug)]
pub enum ResourceRequest<T: ActorEntity> {
    Create {
        params: T::Create,
        respond_to: Response<T::Id>,
    },
    Get {
        id: T::Id,
        respond_to: Response<Option<T>>,
    },
    Action {
        id: T::Id,
        action: T::Action,
        respond_to: Response<T::ActionResult>,
    },
}
