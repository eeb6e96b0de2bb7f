//! # Generic Actor Server
//!
//! [`ResourceActor`] owns every entity of one type and processes requests for them
//! sequentially inside a single Tokio task.

use crate::client::ResourceClient;
use crate::entity::ActorEntity;
use crate::error::FrameworkError;
use crate::message::ResourceRequest;
use std::collections::HashMap;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

/// The server half of an actor: the entity store plus the receiving end of the request
/// channel.
///
/// Requests are handled one at a time, in arrival order. A slow `handle_action` therefore
/// delays every other request to this actor; hooks must not wait on anything that could
/// in turn wait on this actor.
///
/// Ids are assigned from a `u32` counter starting at 1 and converted with `T::Id::from`.
pub struct ResourceActor<T: ActorEntity> {
    receiver: mpsc::Receiver<ResourceRequest<T>>,
    store: HashMap<T::Id, T>,
    next_id: u32,
    entity_type: &'static str,
}

impl<T: ActorEntity> ResourceActor<T> {
    /// Creates the actor and a client bound to it.
    ///
    /// `buffer_size` bounds the request channel; senders wait once it is full.
    pub fn new(buffer_size: usize) -> (Self, ResourceClient<T>) {
        let (sender, receiver) = mpsc::channel(buffer_size);
        let entity_type = std::any::type_name::<T>()
            .rsplit("::")
            .next()
            .unwrap_or("Unknown");
        let actor = Self {
            receiver,
            store: HashMap::new(),
            next_id: 1,
            entity_type,
        };
        (actor, ResourceClient::new(sender))
    }

    /// Runs the message loop until every client has been dropped.
    ///
    /// `context` is handed to each entity hook.
    pub async fn run(mut self, context: T::Context) {
        let entity_type = self.entity_type;
        info!(entity_type, "Actor started");

        while let Some(request) = self.receiver.recv().await {
            match request {
                ResourceRequest::Create { params, respond_to } => {
                    let _ = respond_to.send(self.create(params, &context).await);
                }
                ResourceRequest::Get { id, respond_to } => {
                    let entity = self.store.get(&id).cloned();
                    debug!(entity_type, %id, found = entity.is_some(), "Get");
                    let _ = respond_to.send(Ok(entity));
                }
                ResourceRequest::Action {
                    id,
                    action,
                    respond_to,
                } => {
                    let _ = respond_to.send(self.act(id, action, &context).await);
                }
            }
        }

        info!(entity_type, size = self.store.len(), "Shutdown");
    }

    async fn create(
        &mut self,
        params: T::Create,
        context: &T::Context,
    ) -> Result<T::Id, FrameworkError> {
        let entity_type = self.entity_type;
        debug!(entity_type, ?params, "Create");

        let id = T::Id::from(self.next_id);
        self.next_id += 1;

        let mut entity = T::from_create_params(id.clone(), params).map_err(|e| {
            warn!(entity_type, error = %e, "Create rejected");
            FrameworkError::EntityError(Box::new(e))
        })?;
        entity.on_create(context).await.map_err(|e| {
            warn!(entity_type, %id, error = %e, "on_create failed");
            FrameworkError::EntityError(Box::new(e))
        })?;

        self.store.insert(id.clone(), entity);
        info!(entity_type, %id, size = self.store.len(), "Created");
        Ok(id)
    }

    async fn act(
        &mut self,
        id: T::Id,
        action: T::Action,
        context: &T::Context,
    ) -> Result<T::ActionResult, FrameworkError> {
        let entity_type = self.entity_type;
        debug!(entity_type, %id, ?action, "Action");

        let Some(entity) = self.store.get_mut(&id) else {
            warn!(entity_type, %id, "Not found");
            return Err(FrameworkError::NotFound(id.to_string()));
        };

        match entity.handle_action(action, context).await {
            Ok(result) => {
                debug!(entity_type, %id, ?result, "Action ok");
                Ok(result)
            }
            Err(e) => {
                info!(entity_type, %id, error = %e, "Action rejected");
                Err(FrameworkError::EntityError(Box::new(e)))
            }
        }
    }
}
