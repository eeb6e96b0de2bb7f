//! # Kitchen Client
//!
//! The submitting side of the kitchen queue. Cloned into every [`OrderClient`](super::OrderClient).

use crate::kitchen::{KitchenError, KitchenEvent, KitchenRequest, Ticket};
use crate::model::OrderId;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::{broadcast, mpsc};
use tracing::{debug, info, instrument};

#[derive(Clone)]
pub struct KitchenClient {
    sender: mpsc::Sender<KitchenRequest>,
    events: broadcast::Sender<KitchenEvent>,
    submitted: Arc<AtomicU64>,
    closing: Arc<AtomicBool>,
}

/// A reserved place in the kitchen queue.
///
/// Holding a slot guarantees the next [`KitchenSlot::submit`] cannot fail or wait. Dropping
/// it unused gives the place back. Slots own their permit, so they can move into a spawned
/// task.
pub struct KitchenSlot {
    permit: mpsc::OwnedPermit<KitchenRequest>,
    submitted: Arc<AtomicU64>,
}

impl KitchenSlot {
    pub fn submit(self, order_id: OrderId) {
        self.permit
            .send(KitchenRequest::Prepare(Ticket::new(order_id)));
        self.submitted.fetch_add(1, Ordering::SeqCst);
        debug!(%order_id, "Ticket queued");
    }
}

impl KitchenClient {
    pub fn new(sender: mpsc::Sender<KitchenRequest>, events: broadcast::Sender<KitchenEvent>) -> Self {
        Self {
            sender,
            events,
            submitted: Arc::new(AtomicU64::new(0)),
            closing: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Waits for room in the queue. This is the kitchen's backpressure point.
    pub async fn reserve(&self) -> Result<KitchenSlot, KitchenError> {
        if !self.is_accepting() {
            return Err(KitchenError::Closed);
        }
        let permit = self
            .sender
            .clone()
            .reserve_owned()
            .await
            .map_err(|_| KitchenError::Closed)?;
        Ok(self.slot(permit))
    }

    /// Takes a slot only if one is free right now. `Ok(None)` means the queue is full.
    pub fn try_reserve(&self) -> Result<Option<KitchenSlot>, KitchenError> {
        if !self.is_accepting() {
            return Err(KitchenError::Closed);
        }
        match self.sender.clone().try_reserve_owned() {
            Ok(permit) => Ok(Some(self.slot(permit))),
            Err(mpsc::error::TrySendError::Full(_)) => Ok(None),
            Err(mpsc::error::TrySendError::Closed(_)) => Err(KitchenError::Closed),
        }
    }

    /// Queues a ticket for `order_id`, waiting while the queue is full.
    pub async fn submit(&self, order_id: OrderId) -> Result<(), KitchenError> {
        self.reserve().await?.submit(order_id);
        Ok(())
    }

    fn slot(&self, permit: mpsc::OwnedPermit<KitchenRequest>) -> KitchenSlot {
        KitchenSlot {
            permit,
            submitted: self.submitted.clone(),
        }
    }

    /// Stops accepting tickets. Tickets already queued are still prepared; await the task
    /// running [`Kitchen::run`](crate::kitchen::Kitchen::run) to know when they are done.
    #[instrument(skip(self))]
    pub async fn shutdown(&self) -> Result<(), KitchenError> {
        if self.closing.swap(true, Ordering::SeqCst) {
            return Ok(());
        }
        info!("Kitchen shutting down");
        // A closed queue means the pool is already gone.
        let _ = self.sender.send(KitchenRequest::Shutdown).await;
        Ok(())
    }

    /// Receives a [`KitchenEvent`] for every ticket handled after this call.
    pub fn subscribe(&self) -> broadcast::Receiver<KitchenEvent> {
        self.events.subscribe()
    }

    pub fn is_accepting(&self) -> bool {
        !self.closing.load(Ordering::SeqCst) && !self.sender.is_closed()
    }

    /// Tickets queued since start.
    pub fn submitted(&self) -> u64 {
        self.submitted.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(capacity: usize) -> (KitchenClient, mpsc::Receiver<KitchenRequest>) {
        let (sender, receiver) = mpsc::channel(capacity);
        let (events, _) = broadcast::channel(4);
        (KitchenClient::new(sender, events), receiver)
    }

    #[tokio::test]
    async fn dropped_slot_submits_nothing() {
        let (kitchen, mut receiver) = client(1);

        let slot = kitchen.reserve().await.unwrap();
        drop(slot);
        kitchen.submit(OrderId(7)).await.unwrap();

        match receiver.recv().await {
            Some(KitchenRequest::Prepare(ticket)) => assert_eq!(ticket.order_id, OrderId(7)),
            other => panic!("Expected Prepare, got {other:?}"),
        }
        assert_eq!(kitchen.submitted(), 1);
    }

    #[tokio::test]
    async fn try_reserve_reports_a_full_queue_without_waiting() {
        let (kitchen, mut receiver) = client(1);

        let slot = kitchen.try_reserve().unwrap().expect("queue has room");
        assert!(kitchen.try_reserve().unwrap().is_none());
        slot.submit(OrderId(3));
        assert!(kitchen.try_reserve().unwrap().is_none());

        assert!(matches!(receiver.recv().await, Some(KitchenRequest::Prepare(_))));
        assert!(kitchen.try_reserve().unwrap().is_some());

        drop(receiver);
        assert!(matches!(kitchen.try_reserve(), Err(KitchenError::Closed)));
    }

    #[tokio::test]
    async fn shutdown_rejects_new_tickets() {
        let (kitchen, mut receiver) = client(4);

        kitchen.shutdown().await.unwrap();
        kitchen.shutdown().await.unwrap();
        assert!(!kitchen.is_accepting());
        assert!(matches!(receiver.recv().await, Some(KitchenRequest::Shutdown)));
        assert_eq!(kitchen.submit(OrderId(1)).await, Err(KitchenError::Closed));
        assert_eq!(kitchen.submitted(), 0);
    }

    #[tokio::test]
    async fn closed_queue_is_reported() {
        let (kitchen, receiver) = client(4);
        drop(receiver);

        assert!(!kitchen.is_accepting());
        assert_eq!(kitchen.submit(OrderId(1)).await, Err(KitchenError::Closed));
        assert!(kitchen.shutdown().await.is_ok());
    }
}
