//! Demo run of the order-fulfillment core: a few orders go through the kitchen, one is
//! cancelled while cooking, and the revenue total is reported before a graceful shutdown.

use actor_framework::tracing::setup_tracing;
use order_fulfillment::config::FulfillmentConfig;
use order_fulfillment::kitchen::PreparationOutcome;
use order_fulfillment::lifecycle::OrderSystem;
use order_fulfillment::model::{MenuItem, MenuSnapshot, OrderId};
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info, warn, Instrument};

fn demo_menu() -> Result<MenuSnapshot, String> {
    let items = [
        ("Burger", 5.0, 240, 2),
        ("Fries", 2.0, 120, 1),
        ("Milkshake", 3.5, 90, 0),
        ("Salad", 4.25, 60, 1),
    ]
    .into_iter()
    .map(|(name, price, secs, complexity)| {
        MenuItem::new(name, price, Duration::from_secs(secs), complexity)
    })
    .collect::<Result<Vec<_>, _>>()
    .map_err(|e| e.to_string())?;
    Ok(MenuSnapshot::new(items))
}

#[tokio::main]
async fn main() -> Result<(), String> {
    setup_tracing();

    let config = FulfillmentConfig::load().map_err(|e| e.to_string())?;
    let system = OrderSystem::start(config).await;
    if system.ledger.is_degraded() {
        warn!("Revenue ledger is not being persisted");
    }
    let starting_revenue = system.ledger.current_value().await;
    let menu = Arc::new(demo_menu()?);
    let mut events = system.kitchen_client.subscribe();

    let orders = [
        ("alice", vec!["Burger", "Fries", "Milkshake"]),
        ("bob", vec!["Salad", "Milkshake"]),
        ("carol", vec!["Burger", "Burger", "Fries"]),
    ];

    let mut dispatched = HashSet::new();
    let mut changed_mind = None;
    for (customer, items) in orders {
        let span = tracing::info_span!("order_entry", customer);
        let result: Result<OrderId, String> = async {
            let id = system
                .order_client
                .create_order(customer, menu.clone())
                .await
                .map_err(|e| e.to_string())?;
            for item in items {
                system
                    .order_client
                    .add_menu_item(id, item)
                    .await
                    .map_err(|e| e.to_string())?;
            }
            let total = system
                .order_client
                .total(id)
                .await
                .map_err(|e| e.to_string())?;
            system
                .order_client
                .dispatch(id)
                .await
                .map_err(|e| e.to_string())?;
            info!(order_id = %id, total, "Order placed");
            Ok(id)
        }
        .instrument(span)
        .await;

        match result {
            Ok(id) => {
                dispatched.insert(id);
                if customer == "bob" {
                    changed_mind = Some(id);
                }
            }
            Err(e) => error!(error = %e, "Order entry failed"),
        }
    }

    // Bob changes his mind while the kitchen is busy.
    if let Some(id) = changed_mind {
        match system.order_client.cancel(id).await {
            Ok(()) => info!(order_id = %id, "Cancelled during preparation"),
            Err(e) => warn!(order_id = %id, error = %e, "Too late to cancel"),
        }
    }

    while !dispatched.is_empty() {
        match tokio::time::timeout(Duration::from_secs(30), events.recv()).await {
            Ok(Ok(event)) => {
                dispatched.remove(&event.order_id);
                match event.outcome {
                    PreparationOutcome::Completed(outcome) => info!(
                        order_id = %event.order_id,
                        worker = event.worker,
                        elapsed_ms = event.elapsed.as_millis() as u64,
                        ?outcome,
                        "Kitchen finished"
                    ),
                    PreparationOutcome::Failed(e) => {
                        error!(order_id = %event.order_id, error = %e, "Kitchen failed")
                    }
                }
            }
            Ok(Err(e)) => {
                warn!(error = %e, "Missed kitchen events");
                break;
            }
            Err(_) => {
                warn!(pending = dispatched.len(), "Gave up waiting for the kitchen");
                break;
            }
        }
    }

    for receipt in system.settlement.receipts().await {
        info!(
            order_id = %receipt.order_id,
            customer = %receipt.customer,
            amount = receipt.amount,
            "Receipt"
        );
    }
    let revenue = system.ledger.current_value().await;
    info!(
        earned = revenue - starting_revenue,
        revenue,
        "Revenue updated"
    );

    system.shutdown().await.map_err(|e| e.to_string())?;
    info!("Application completed successfully");
    Ok(())
}
