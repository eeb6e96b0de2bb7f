use actor_framework::ActorClient;
use order_fulfillment::config::FulfillmentConfig;
use order_fulfillment::kitchen::{FixedPrepTime, KitchenEvent, PreparationOutcome};
use order_fulfillment::ledger::RevenueLedger;
use order_fulfillment::lifecycle::OrderSystem;
use order_fulfillment::model::{MenuItem, MenuSnapshot, OrderId, OrderOperation, OrderStatus};
use order_fulfillment::order_actor::OrderError;
use order_fulfillment::settlement::SettlementOutcome;
use std::collections::HashSet;
use std::future::{poll_fn, Future};
use std::sync::Arc;
use std::task::Poll;
use std::time::Duration;
use tempfile::TempDir;
use tokio::sync::broadcast;
use tokio::time::timeout;

fn item(name: &str, price: f64) -> MenuItem {
    MenuItem::new(name, price, Duration::from_secs(60), 1).unwrap()
}

fn menu() -> Arc<MenuSnapshot> {
    Arc::new(MenuSnapshot::new(vec![
        item("Burger", 5.0),
        item("Milkshake", 3.5),
        item("Fries", 2.0),
    ]))
}

fn start(prep: Duration) -> OrderSystem {
    OrderSystem::with_components(
        &FulfillmentConfig::in_memory(),
        Arc::new(RevenueLedger::in_memory(0.0)),
        Arc::new(FixedPrepTime(prep)),
    )
}

async fn outcome_for(
    events: &mut broadcast::Receiver<KitchenEvent>,
    id: OrderId,
) -> PreparationOutcome {
    timeout(Duration::from_secs(5), async {
        loop {
            let event = events.recv().await.expect("kitchen event stream closed");
            if event.order_id == id {
                return event.outcome;
            }
        }
    })
    .await
    .expect("Timed out waiting for the kitchen")
}

#[tokio::test]
async fn test_total_tracks_items() {
    let system = start(Duration::ZERO);
    let orders = &system.order_client;

    let id = orders.create_order("alice", menu()).await.unwrap();
    assert_eq!(orders.total(id).await.unwrap(), 0.0);
    assert_eq!(orders.status(id).await.unwrap(), OrderStatus::NotStarted);

    orders.add_item(id, item("Burger", 5.0)).await.unwrap();
    orders.add_menu_item(id, "milkshake").await.unwrap();
    orders.add_menu_item(id, "Fries").await.unwrap();
    assert_eq!(orders.total(id).await.unwrap(), 10.5);

    let err = orders.add_menu_item(id, "Lobster").await.unwrap_err();
    assert_eq!(err, OrderError::UnknownMenuItem("Lobster".to_string()));
    assert_eq!(orders.snapshot(id).await.unwrap().items().len(), 3);

    system.shutdown().await.unwrap();
}

/// A dispatched order of 12.0 becomes Ready and credits exactly 12.0.
#[tokio::test]
async fn test_dispatch_settles_and_credits_ledger() {
    let system = start(Duration::from_millis(10));
    let mut events = system.kitchen_client.subscribe();
    let orders = &system.order_client;

    let id = orders.create_order("bob", menu()).await.unwrap();
    orders.add_item(id, item("Platter", 12.0)).await.unwrap();
    orders.dispatch(id).await.unwrap();

    let outcome = outcome_for(&mut events, id).await;
    let receipt = outcome
        .settlement()
        .and_then(SettlementOutcome::receipt)
        .cloned()
        .expect("order should have been paid for");
    assert_eq!(receipt.amount, 12.0);
    assert_eq!(receipt.customer.to_string(), "bob");
    assert_eq!(receipt.item_count, 1);

    assert_eq!(orders.status(id).await.unwrap(), OrderStatus::Ready);
    assert_eq!(system.ledger.current_value().await, 12.0);

    // Settling again is a no-op.
    assert_eq!(
        orders.settle(id).await.unwrap(),
        SettlementOutcome::AlreadySettled
    );
    assert_eq!(system.ledger.current_value().await, 12.0);

    system.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_double_dispatch_submits_once() {
    let system = start(Duration::from_millis(10));
    let mut events = system.kitchen_client.subscribe();
    let orders = &system.order_client;

    let id = orders.create_order("carol", menu()).await.unwrap();
    orders.add_menu_item(id, "Burger").await.unwrap();
    orders.dispatch(id).await.unwrap();

    let err = orders.dispatch(id).await.unwrap_err();
    assert!(err.is_invalid_transition());
    assert_eq!(system.kitchen_client.submitted(), 1);

    outcome_for(&mut events, id).await;
    let err = orders.dispatch(id).await.unwrap_err();
    assert_eq!(
        err,
        OrderError::InvalidStateTransition {
            operation: OrderOperation::Dispatch,
            status: OrderStatus::Ready,
        }
    );
    assert_eq!(system.kitchen_client.submitted(), 1);
    assert_eq!(system.ledger.current_value().await, 5.0);

    system.shutdown().await.unwrap();
}

/// Cancel a Preparing order, then dispatch again: rejected, and no payment is ever taken.
#[tokio::test]
async fn test_cancel_during_preparation_skips_payment() {
    let system = start(Duration::from_millis(200));
    let mut events = system.kitchen_client.subscribe();
    let orders = &system.order_client;

    let id = orders.create_order("dave", menu()).await.unwrap();
    orders.add_menu_item(id, "Burger").await.unwrap();
    orders.add_menu_item(id, "Fries").await.unwrap();
    orders.dispatch(id).await.unwrap();
    assert_eq!(orders.status(id).await.unwrap(), OrderStatus::Preparing);

    orders.cancel(id).await.unwrap();
    let err = orders.dispatch(id).await.unwrap_err();
    assert_eq!(
        err,
        OrderError::InvalidStateTransition {
            operation: OrderOperation::Dispatch,
            status: OrderStatus::Cancelled,
        }
    );

    assert_eq!(
        outcome_for(&mut events, id).await,
        PreparationOutcome::Completed(SettlementOutcome::SkippedCancelled)
    );
    assert_eq!(orders.status(id).await.unwrap(), OrderStatus::Cancelled);
    assert_eq!(system.ledger.current_value().await, 0.0);
    assert!(system.settlement.receipt_for(id).await.is_none());
    assert_eq!(system.kitchen_client.submitted(), 1);

    system.shutdown().await.unwrap();
}

/// A caller that gives up on `dispatch` after the first poll still gets its order cooked.
#[tokio::test]
async fn test_abandoned_dispatch_still_reaches_the_kitchen() {
    let system = start(Duration::from_millis(10));
    let mut events = system.kitchen_client.subscribe();
    let orders = &system.order_client;

    let id = orders.create_order("hana", menu()).await.unwrap();
    orders.add_menu_item(id, "Burger").await.unwrap();

    let mut dispatch = Box::pin(orders.dispatch(id));
    poll_fn(|cx| {
        let _ = dispatch.as_mut().poll(cx);
        Poll::Ready(())
    })
    .await;
    drop(dispatch);

    assert!(outcome_for(&mut events, id)
        .await
        .settlement()
        .is_some_and(SettlementOutcome::is_settled));
    assert_eq!(orders.status(id).await.unwrap(), OrderStatus::Ready);
    assert_eq!(system.kitchen_client.submitted(), 1);
    assert_eq!(system.ledger.current_value().await, 5.0);

    system.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_ready_order_is_closed_to_changes() {
    let system = start(Duration::ZERO);
    let mut events = system.kitchen_client.subscribe();
    let orders = &system.order_client;

    let id = orders.create_order("erin", menu()).await.unwrap();
    orders.add_menu_item(id, "Fries").await.unwrap();
    orders.dispatch(id).await.unwrap();
    outcome_for(&mut events, id).await;

    let err = orders.add_item(id, item("Burger", 5.0)).await.unwrap_err();
    assert_eq!(
        err,
        OrderError::InvalidStateTransition {
            operation: OrderOperation::AddItem,
            status: OrderStatus::Ready,
        }
    );
    assert!(orders.cancel(id).await.unwrap_err().is_invalid_transition());

    let order = orders.snapshot(id).await.unwrap();
    assert_eq!(order.items().len(), 1);
    assert_eq!(order.status(), OrderStatus::Ready);

    orders.deliver(id).await.unwrap();
    assert_eq!(orders.status(id).await.unwrap(), OrderStatus::Delivered);
    assert!(orders.deliver(id).await.unwrap_err().is_invalid_transition());
    assert_eq!(system.ledger.current_value().await, 2.0);

    system.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_items_can_be_added_while_preparing() {
    let system = start(Duration::from_millis(150));
    let mut events = system.kitchen_client.subscribe();
    let orders = &system.order_client;

    let id = orders.create_order("frank", menu()).await.unwrap();
    orders.add_menu_item(id, "Burger").await.unwrap();
    orders.dispatch(id).await.unwrap();
    orders.add_menu_item(id, "Milkshake").await.unwrap();

    outcome_for(&mut events, id).await;
    // Payment covers the items present at settlement time.
    assert_eq!(system.ledger.current_value().await, 8.5);

    system.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_unknown_order_is_reported() {
    let system = start(Duration::ZERO);
    let orders = &system.order_client;
    let missing = OrderId(404);

    assert!(orders.get(missing).await.unwrap().is_none());
    assert!(matches!(
        orders.status(missing).await,
        Err(OrderError::NotFound(_))
    ));
    assert!(matches!(
        orders.cancel(missing).await,
        Err(OrderError::NotFound(_))
    ));
    assert!(matches!(
        orders.dispatch(missing).await,
        Err(OrderError::NotFound(_))
    ));
    assert_eq!(system.kitchen_client.submitted(), 0);

    system.shutdown().await.unwrap();
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_orders_all_settle() {
    let system = start(Duration::from_millis(5));
    let mut events = system.kitchen_client.subscribe();

    let mut tasks = Vec::new();
    for n in 0..20 {
        let orders = system.order_client.clone();
        tasks.push(tokio::spawn(async move {
            let id = orders
                .create_order(format!("guest{n}"), menu())
                .await
                .unwrap();
            orders.add_menu_item(id, "Milkshake").await.unwrap();
            orders.dispatch(id).await.unwrap();
            id
        }));
    }
    let mut ids = Vec::new();
    for task in tasks {
        ids.push(task.await.unwrap());
    }

    let mut pending: HashSet<OrderId> = ids.into_iter().collect();
    timeout(Duration::from_secs(5), async {
        while !pending.is_empty() {
            let event = events.recv().await.expect("kitchen event stream closed");
            assert!(event
                .outcome
                .settlement()
                .is_some_and(SettlementOutcome::is_settled));
            pending.remove(&event.order_id);
        }
    })
    .await
    .expect("Timed out waiting for the kitchen");
    assert_eq!(system.ledger.current_value().await, 70.0);
    assert_eq!(system.settlement.receipts().await.len(), 20);

    system.shutdown().await.unwrap();
}

/// Revenue from one run is the starting point of the next.
#[tokio::test]
async fn test_revenue_persists_across_systems() {
    let dir = TempDir::new().unwrap();
    let mut config = FulfillmentConfig::in_memory();
    config.kitchen.prep_time_scale = 0.0;
    config.ledger.path = Some(dir.path().join("revenue.json"));

    for run in 1..=2 {
        let system = OrderSystem::start(config.clone()).await;
        let mut events = system.kitchen_client.subscribe();
        let orders = &system.order_client;

        let id = orders.create_order("gina", menu()).await.unwrap();
        orders.add_menu_item(id, "Burger").await.unwrap();
        orders.dispatch(id).await.unwrap();
        outcome_for(&mut events, id).await;

        assert_eq!(system.ledger.current_value().await, 5.0 * run as f64);
        system.shutdown().await.unwrap();
    }
}
