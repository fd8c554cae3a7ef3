/// Payment bus demo - publishes a liveness test message and a sample order
/// over the in-memory transport and lets the payment handlers consume them.
use std::sync::Arc;
use std::thread;

use serde_json::json;

use payment_bus::bus::InMemoryQueue;
use payment_bus::dispatch::{self, Dispatcher};
use payment_bus::{payments, telemetry, BusConfig, Publisher};

fn main() -> Result<(), payment_bus::Error> {
    let config = BusConfig::from_env()?;
    telemetry::init();

    tracing::info!(
        topic = %config.destination,
        group = %config.group,
        service = %config.source,
        "starting payment bus"
    );

    let queue = InMemoryQueue::new();

    // Handlers are fixed before the first message is consumed
    let dispatcher = Arc::new(Dispatcher::new(payments::registry()?));
    let consumer = dispatch::subscribe(
        Arc::clone(&dispatcher),
        queue.clone(),
        &config.destination,
        &config.group,
        config.poll_interval,
    );

    let publisher = Publisher::new(queue.clone(), &config);
    let test = publisher.publish_test()?;
    tracing::info!(test_id = test.test_id().unwrap_or_default(), "liveness check sent");

    publisher.publish_new(
        payments::ORDER_CREATED,
        json!({ "orderId": "order-1001", "amount": 4999, "currency": "INR" }),
    )?;
    publisher.publish_new("inventory_reserved", json!({ "orderId": "order-1001" }))?;

    while queue.offset(&config.destination, &config.group) < queue.len(&config.destination) {
        thread::sleep(config.poll_interval);
    }

    let stats = consumer.stop();
    tracing::info!(
        handled = stats.handled,
        unhandled = stats.unhandled,
        failed = stats.failed,
        "payment bus stopped"
    );
    Ok(())
}
