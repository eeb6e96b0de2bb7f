use crate::clients::{KitchenClient, OrderClient};
use crate::config::FulfillmentConfig;
use crate::kitchen::{self, HintedPrepTime, PrepTimePolicy};
use crate::ledger::RevenueLedger;
use crate::order_actor;
use crate::settlement::PaymentSettlement;
use std::sync::Arc;
use thiserror::Error;
use tokio::task::{JoinError, JoinHandle};
use tracing::{error, info, warn};

#[derive(Debug, Error)]
pub enum SystemError {
    #[error("{component} task failed: {source}")]
    TaskFailed {
        component: &'static str,
        #[source]
        source: JoinError,
    },
}

/// The running order-fulfillment core.
///
/// `OrderSystem` owns the lifecycle of every component:
/// - **Revenue ledger** and the **payment settlement** service built on it
/// - **Order actor**, with the settlement service as its context
/// - **Kitchen** worker pool, with an [`OrderClient`] as its context
///
/// Exactly one kitchen pool exists per system; it is created here and stopped by
/// [`OrderSystem::shutdown`].
///
/// # Example
///
/// ```ignore
/// let system = OrderSystem::start(FulfillmentConfig::load()?).await;
///
/// let id = system.order_client.create_order("alice", menu.clone()).await?;
/// system.order_client.add_menu_item(id, "Burger").await?;
/// system.order_client.dispatch(id).await?;
///
/// system.shutdown().await?;
/// ```
pub struct OrderSystem {
    pub order_client: OrderClient,
    pub kitchen_client: KitchenClient,
    pub ledger: Arc<RevenueLedger>,
    pub settlement: Arc<PaymentSettlement>,
    order_handle: JoinHandle<()>,
    kitchen_handle: JoinHandle<u64>,
}

impl OrderSystem {
    /// Loads the ledger from the configured path (if any) and starts every component with
    /// the menu-driven [`HintedPrepTime`] policy.
    pub async fn start(config: FulfillmentConfig) -> Self {
        let ledger = match &config.ledger.path {
            Some(path) => RevenueLedger::load(path).await,
            None => RevenueLedger::in_memory(0.0),
        };
        let policy = HintedPrepTime::new(config.kitchen.prep_time_scale);
        Self::with_components(&config, Arc::new(ledger), Arc::new(policy))
    }

    /// Starts the system around an existing ledger and preparation policy.
    ///
    /// Must be called inside a Tokio runtime.
    pub fn with_components(
        config: &FulfillmentConfig,
        ledger: Arc<RevenueLedger>,
        policy: Arc<dyn PrepTimePolicy>,
    ) -> Self {
        // 1. Create components (no dependencies yet)
        let settlement = Arc::new(PaymentSettlement::new(ledger.clone()));
        let (kitchen, kitchen_client) = kitchen::new(&config.kitchen, policy);
        let (order_actor, order_resource) = order_actor::new(config.orders.buffer_size);
        let order_client = OrderClient::new(order_resource, kitchen_client.clone());

        // 2. Start them with injected context
        let order_handle = tokio::spawn(order_actor.run(settlement.clone()));
        let kitchen_handle = tokio::spawn(kitchen.run(order_client.clone()));

        info!(
            pool_size = config.kitchen.pool_size,
            queue_capacity = config.kitchen.queue_capacity,
            "Order system started"
        );

        Self {
            order_client,
            kitchen_client,
            ledger,
            settlement,
            order_handle,
            kitchen_handle,
        }
    }

    /// Gracefully shuts down the system.
    ///
    /// 1. The kitchen stops accepting tickets and finishes everything already queued
    /// 2. The Order actor stops once the last client is gone
    /// 3. A degraded ledger gets one more persistence attempt
    ///
    /// Every `OrderClient` clone handed out must be dropped first, otherwise step 2 waits
    /// for it.
    pub async fn shutdown(self) -> Result<(), SystemError> {
        info!("Shutting down order system");

        if let Err(e) = self.kitchen_client.shutdown().await {
            warn!(error = %e, "Kitchen already closed");
        }
        match self.kitchen_handle.await {
            Ok(handled) => info!(handled, "Kitchen stopped"),
            Err(source) => {
                error!(error = %source, "Kitchen task failed");
                return Err(SystemError::TaskFailed {
                    component: "kitchen",
                    source,
                });
            }
        }

        // The workers' OrderClient went away with the kitchen task; these are the last.
        drop(self.order_client);
        drop(self.kitchen_client);

        if let Err(source) = self.order_handle.await {
            error!(error = %source, "Order actor failed");
            return Err(SystemError::TaskFailed {
                component: "order actor",
                source,
            });
        }

        if self.ledger.is_degraded() {
            if let Err(e) = self.ledger.persist().await {
                warn!(error = %e, "Final revenue could not be persisted");
            }
        }

        info!(revenue = self.ledger.current_value().await, "Order system stopped");
        Ok(())
    }
}
