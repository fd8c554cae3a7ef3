//! Concurrent publishers and a shared dispatcher.

use std::collections::HashSet;
use std::sync::Arc;
use std::thread;

use payment_bus::bus::InMemoryQueue;
use payment_bus::dispatch::{DispatchOutcome, Dispatcher, HandlerRegistry};
use payment_bus::{BusConfig, Envelope, Publisher};
use serde_json::json;

use crate::support::{Recorder, TOPIC};

#[test]
fn concurrent_publishes_get_independent_acks_and_unique_ids() {
    let queue = InMemoryQueue::new();
    let publisher = Arc::new(Publisher::new(queue.clone(), &BusConfig::default()));

    let handles: Vec<_> = (0..16)
        .map(|n| {
            let publisher = Arc::clone(&publisher);
            thread::spawn(move || {
                (0..25)
                    .map(|i| {
                        publisher
                            .publish_new("order_created", json!({ "thread": n, "seq": i }))
                            .unwrap()
                    })
                    .collect::<Vec<_>>()
            })
        })
        .collect();

    let published: Vec<_> = handles
        .into_iter()
        .flat_map(|h| h.join().unwrap())
        .collect();

    assert_eq!(published.len(), 400);

    let ids: HashSet<_> = published.iter().map(|p| p.envelope.id().to_string()).collect();
    assert_eq!(ids.len(), 400);

    let offsets: HashSet<_> = published.iter().map(|p| p.ack.offset).collect();
    assert_eq!(offsets.len(), 400);

    assert_eq!(queue.len(TOPIC), 400);
}

#[test]
fn dispatcher_is_shared_across_threads() {
    let recorder = Recorder::new();
    let registry = HandlerRegistry::new()
        .with_handler("payment_required", recorder.handler())
        .unwrap();
    let dispatcher = Arc::new(Dispatcher::new(registry));
    let publisher = Publisher::new(InMemoryQueue::new(), &BusConfig::default());

    let envelopes: Vec<Envelope> = (0..64)
        .map(|i| {
            publisher
                .builder()
                .build("payment_required", json!({ "orderId": i }))
                .unwrap()
        })
        .collect();

    let handles: Vec<_> = envelopes
        .chunks(8)
        .map(|chunk| {
            let dispatcher = Arc::clone(&dispatcher);
            let chunk = chunk.to_vec();
            thread::spawn(move || {
                chunk
                    .iter()
                    .all(|e| matches!(dispatcher.dispatch(e), DispatchOutcome::Handled))
            })
        })
        .collect();

    for handle in handles {
        assert!(handle.join().unwrap());
    }
    assert_eq!(recorder.len(), 64);
    assert_eq!(dispatcher.stats().handled, 64);
}
