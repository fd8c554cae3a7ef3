//! One failing message must not affect the next one.

use std::sync::Arc;
use std::time::Duration;

use payment_bus::bus::{Event, InMemoryQueue, Sender};
use payment_bus::dispatch::{self, Dispatcher, HandlerError, HandlerRegistry};
use payment_bus::{BusConfig, Publisher};
use serde_json::json;

use crate::support::{wait_until, Recorder, GROUP, TOPIC};

fn dispatcher(recorder: &Recorder) -> Arc<Dispatcher> {
    let registry = HandlerRegistry::new()
        .with_handler("order_created", |_| {
            Err(HandlerError::Rejected("payment gateway unavailable".into()))
        })
        .unwrap()
        .with_handler("order_cancelled", |_| panic!("refund handler crashed"))
        .unwrap()
        .with_handler("test", recorder.handler())
        .unwrap();
    Arc::new(Dispatcher::new(registry))
}

#[test]
fn failing_handler_does_not_block_next_message() {
    let recorder = Recorder::new();
    let queue = InMemoryQueue::new();
    let consumer = dispatch::subscribe(
        dispatcher(&recorder),
        queue.clone(),
        TOPIC,
        GROUP,
        Duration::from_millis(10),
    );

    let publisher = Publisher::new(queue.clone(), &BusConfig::default());
    let failed = publisher.publish_new("order_created", json!({ "orderId": "o-1" })).unwrap();
    publisher.publish_new("test", "still alive").unwrap();

    assert!(wait_until(|| recorder.len() == 1));
    let stats = consumer.stop();

    assert_eq!(recorder.seen(), vec![("test".to_string(), json!("still alive"))]);
    assert_eq!(stats.failed, 1);
    assert_eq!(stats.handled, 1);
    assert_eq!(queue.rejected()[0].0, failed.envelope.id());
}

#[test]
fn panicking_and_malformed_messages_are_contained() {
    let recorder = Recorder::new();
    let queue = InMemoryQueue::new();
    let consumer = dispatch::subscribe(
        dispatcher(&recorder),
        queue.clone(),
        TOPIC,
        GROUP,
        Duration::from_millis(10),
    );

    let publisher = Publisher::new(queue.clone(), &BusConfig::default());
    publisher.publish_new("order_cancelled", json!({ "orderId": "o-2" })).unwrap();
    queue
        .send(TOPIC, Event::with_string_payload("raw-1", "test", "not an envelope"))
        .unwrap();
    publisher.publish_new("test", 1).unwrap();

    assert!(wait_until(|| recorder.len() == 1));
    let stats = consumer.stop();

    assert_eq!(stats.failed, 1);
    assert_eq!(stats.rejected, 1);
    assert_eq!(stats.handled, 1);
    assert_eq!(queue.rejected().len(), 2);
}
