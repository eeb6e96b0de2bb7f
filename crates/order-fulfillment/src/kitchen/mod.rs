//! # Kitchen Dispatcher
//!
//! One fixed-size pool of worker tasks per process, fed by a bounded queue. Each worker
//! takes a [`Ticket`], simulates preparation, then asks the Order actor to settle the
//! order. The outcome is published as a [`KitchenEvent`].
//!
//! ```text
//! OrderClient::dispatch ──reserve slot──▶ [ bounded queue ] ──▶ worker 0..N ──Settle──▶ Order actor
//!                                                                   │
//!                                                                   └──▶ KitchenEvent (broadcast)
//! ```
//!
//! Workers receive the [`OrderClient`] at [`Kitchen::run`], the same way the Order actor
//! receives its context. Because the `OrderClient` in turn holds a [`KitchenClient`], the
//! queue never closes by its senders being dropped; [`KitchenClient::shutdown`] stops the
//! pool explicitly instead.

mod error;
mod prep_time;
mod ticket;

pub use error::KitchenError;
pub use prep_time::{FixedPrepTime, HintedPrepTime, PrepTimePolicy};
pub use ticket::{KitchenEvent, KitchenRequest, PreparationOutcome, Ticket};

use crate::clients::{KitchenClient, OrderClient};
use crate::config::KitchenConfig;
use crate::model::{Order, OrderStatus};
use crate::settlement::SettlementOutcome;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{broadcast, mpsc, Mutex};
use tokio::task::JoinSet;
use tracing::{debug, error, info, instrument, warn};

type SharedQueue = Arc<Mutex<mpsc::Receiver<KitchenRequest>>>;

/// The worker pool. Build it with [`new`] and start it with [`Kitchen::run`].
pub struct Kitchen {
    queue: SharedQueue,
    events: broadcast::Sender<KitchenEvent>,
    policy: Arc<dyn PrepTimePolicy>,
    pool_size: usize,
    max_prep_time: Duration,
}

/// Creates the kitchen and the client used to submit tickets to it.
pub fn new(config: &KitchenConfig, policy: Arc<dyn PrepTimePolicy>) -> (Kitchen, KitchenClient) {
    let (sender, receiver) = mpsc::channel(config.queue_capacity);
    let (events, _) = broadcast::channel(config.event_capacity);
    let kitchen = Kitchen {
        queue: Arc::new(Mutex::new(receiver)),
        events: events.clone(),
        policy,
        pool_size: config.pool_size,
        max_prep_time: config.max_prep_time(),
    };
    (kitchen, KitchenClient::new(sender, events))
}

impl Kitchen {
    /// Runs the pool until [`KitchenClient::shutdown`] is called and every queued ticket
    /// has been handled. Returns the number of tickets handled.
    pub async fn run(self, orders: OrderClient) -> u64 {
        info!(pool_size = self.pool_size, "Kitchen open");

        let station = Arc::new(Station {
            orders,
            events: self.events,
            policy: self.policy,
            max_prep_time: self.max_prep_time,
        });

        let mut workers = JoinSet::new();
        for worker in 0..self.pool_size {
            workers.spawn(work(worker, self.queue.clone(), station.clone()));
        }

        let mut handled = 0;
        while let Some(result) = workers.join_next().await {
            match result {
                Ok(count) => handled += count,
                Err(e) => error!(error = %e, "Kitchen worker aborted"),
            }
        }

        info!(handled, "Kitchen drained");
        handled
    }
}

/// What every worker shares.
struct Station {
    orders: OrderClient,
    events: broadcast::Sender<KitchenEvent>,
    policy: Arc<dyn PrepTimePolicy>,
    max_prep_time: Duration,
}

async fn work(worker: usize, queue: SharedQueue, station: Arc<Station>) -> u64 {
    debug!(worker, "Worker started");
    let mut handled = 0;

    loop {
        let ticket = {
            let mut queue = queue.lock().await;
            match queue.recv().await {
                Some(KitchenRequest::Prepare(ticket)) => ticket,
                Some(KitchenRequest::Shutdown) => {
                    // Closed under the lock: the remaining buffer drains, then every worker
                    // sees `None`.
                    queue.close();
                    debug!(worker, "Kitchen closed to new tickets");
                    continue;
                }
                None => break,
            }
        };

        let outcome = station.handle(worker, &ticket).await;
        handled += 1;
        let _ = station.events.send(KitchenEvent {
            order_id: ticket.order_id,
            worker,
            outcome,
            elapsed: ticket.submitted_at.elapsed(),
        });
    }

    debug!(worker, handled, "Worker stopped");
    handled
}

impl Station {
    #[instrument(skip(self, ticket), fields(order_id = %ticket.order_id))]
    async fn handle(&self, worker: usize, ticket: &Ticket) -> PreparationOutcome {
        let outcome = match self.prepare(ticket).await {
            Ok(outcome) => PreparationOutcome::Completed(outcome),
            Err(e) => {
                warn!(error = %e, "Ticket failed");
                PreparationOutcome::Failed(e)
            }
        };
        if let PreparationOutcome::Completed(SettlementOutcome::Settled(receipt)) = &outcome {
            info!(amount = receipt.amount, "Order ready");
        }
        outcome
    }

    async fn prepare(&self, ticket: &Ticket) -> Result<SettlementOutcome, KitchenError> {
        let order_id = ticket.order_id;
        let failure = |reason: String| KitchenError::PreparationFailure { order_id, reason };

        let order = self
            .orders
            .snapshot(order_id)
            .await
            .map_err(|e| failure(e.to_string()))?;

        if order.status() == OrderStatus::Preparing {
            validate(&order).map_err(failure)?;
            let delay = self.preparation_time(order).await.map_err(failure)?;
            debug!(?delay, "Cooking");
            tokio::time::sleep(delay).await;
        } else {
            debug!(status = %order.status(), "Nothing to cook");
        }

        self.orders
            .settle(order_id)
            .await
            .map_err(|e| failure(e.to_string()))
    }

    /// Runs the policy on its own task so a panic fails this ticket only.
    async fn preparation_time(&self, order: Order) -> Result<Duration, String> {
        let policy = self.policy.clone();
        let delay = tokio::spawn(async move { policy.preparation_time(&order) })
            .await
            .map_err(|e| format!("preparation time policy failed: {e}"))?;
        Ok(delay.min(self.max_prep_time))
    }
}

fn validate(order: &Order) -> Result<(), String> {
    if order.items().is_empty() {
        return Err("order has no items".to_string());
    }
    let total = order.total();
    if !total.is_finite() || total < 0.0 {
        return Err(format!("order total {total} is not payable"));
    }
    Ok(())
}
