//! Build → publish → consume → dispatch.

use std::sync::Arc;
use std::time::Duration;

use payment_bus::bus::InMemoryQueue;
use payment_bus::dispatch::{self, Dispatcher, HandlerRegistry};
use payment_bus::{BusConfig, Publisher};
use serde_json::json;

use crate::support::{wait_until, Recorder, GROUP, TOPIC};

#[test]
fn published_envelope_reaches_its_handler() {
    let recorder = Recorder::new();
    let registry = HandlerRegistry::new()
        .with_handler("test", recorder.handler())
        .unwrap();
    let dispatcher = Arc::new(Dispatcher::new(registry));

    let queue = InMemoryQueue::new();
    let consumer = dispatch::subscribe(
        dispatcher,
        queue.clone(),
        TOPIC,
        GROUP,
        Duration::from_millis(10),
    );

    let publisher = Publisher::new(queue.clone(), &BusConfig::default());
    publisher.publish_new("test", "x").unwrap();

    assert!(wait_until(|| recorder.len() == 1));
    let stats = consumer.stop();

    assert_eq!(recorder.seen(), vec![("test".to_string(), json!("x"))]);
    assert_eq!(stats.handled, 1);
    assert_eq!(queue.acknowledged().len(), 1);
}

#[test]
fn liveness_test_message_round_trips() {
    let recorder = Recorder::new();
    let registry = HandlerRegistry::new()
        .with_handler("test", recorder.handler())
        .unwrap();
    let dispatcher = Arc::new(Dispatcher::new(registry));
    let queue = InMemoryQueue::new();
    let consumer = dispatch::subscribe(dispatcher, queue.clone(), TOPIC, GROUP, Duration::from_millis(10));

    let envelope = Publisher::new(queue.clone(), &BusConfig::default())
        .publish_test()
        .unwrap();

    assert!(wait_until(|| recorder.len() == 1));
    consumer.stop();

    assert_eq!(queue.acknowledged(), vec![envelope.id().to_string()]);
    assert_eq!(recorder.seen()[0].1, envelope.payload().clone());
}

#[test]
fn unknown_type_is_acked_without_handler() {
    let recorder = Recorder::new();
    let registry = HandlerRegistry::new()
        .with_handler("order_created", recorder.handler())
        .unwrap();
    let dispatcher = Arc::new(Dispatcher::new(registry));
    let queue = InMemoryQueue::new();
    let consumer = dispatch::subscribe(
        Arc::clone(&dispatcher),
        queue.clone(),
        TOPIC,
        GROUP,
        Duration::from_millis(10),
    );

    let publisher = Publisher::new(queue.clone(), &BusConfig::default());
    publisher.publish_new("unregistered_xyz", json!({})).unwrap();

    assert!(wait_until(|| queue.acknowledged().len() == 1));
    let stats = consumer.stop();

    assert_eq!(recorder.len(), 0);
    assert_eq!(stats.unhandled, 1);
    assert_eq!(dispatcher.stats().unhandled, 1);
}

#[test]
fn separate_groups_each_see_every_message() {
    let billing = Recorder::new();
    let audit = Recorder::new();
    let queue = InMemoryQueue::new();

    let billing_consumer = dispatch::subscribe(
        Arc::new(Dispatcher::new(
            HandlerRegistry::new().with_handler("order_created", billing.handler()).unwrap(),
        )),
        queue.clone(),
        TOPIC,
        "billing",
        Duration::from_millis(10),
    );
    let audit_consumer = dispatch::subscribe(
        Arc::new(Dispatcher::new(
            HandlerRegistry::new().with_handler("order_created", audit.handler()).unwrap(),
        )),
        queue.clone(),
        TOPIC,
        "audit",
        Duration::from_millis(10),
    );

    let publisher = Publisher::new(queue, &BusConfig::default());
    publisher.publish_new("order_created", json!({ "orderId": "o-1" })).unwrap();
    publisher.publish_new("order_created", json!({ "orderId": "o-2" })).unwrap();

    assert!(wait_until(|| billing.len() == 2 && audit.len() == 2));
    billing_consumer.stop();
    audit_consumer.stop();

    assert_eq!(billing.seen(), audit.seen());
}
