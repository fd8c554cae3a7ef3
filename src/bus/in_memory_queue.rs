//! In-memory transport for testing and single-process scenarios.
//!
//! This module provides a thread-safe in-memory queue that implements
//! both `Sender` and `Subscriber`, useful for:
//! - Unit and integration testing without a broker
//! - Single-process deployments
//! - Development and prototyping

use std::collections::HashMap;
use std::sync::{Arc, Mutex, RwLock};
use std::time::{Duration, Instant};

use super::{Ack, Event, Sender, Subscriber, TransportError};

/// In-memory transport with topic logs and consumer-group offsets.
///
/// Features:
/// - Thread-safe (can be shared across threads via `Clone`)
/// - Each destination is a single append-only log (one partition)
/// - Each `(destination, group)` pair tracks its own read offset, so
///   consumers in one group compete and separate groups fan out
///
/// ## Example
///
/// ```
/// use payment_bus::bus::{Event, InMemoryQueue, Sender, Subscriber};
///
/// let queue = InMemoryQueue::new();
///
/// let ack = queue
///     .send("payments", Event::with_string_payload("m-1", "order_created", "{}"))
///     .unwrap();
/// assert_eq!(ack.offset, 0);
///
/// let event = queue.poll("payments", "billing", 100).unwrap();
/// assert_eq!(event.unwrap().event_type, "order_created");
///
/// // another group starts from the beginning of the log
/// let event = queue.poll("payments", "audit", 100).unwrap();
/// assert!(event.is_some());
/// ```
#[derive(Clone, Default)]
pub struct InMemoryQueue {
    /// Append-only log per destination
    topics: Arc<RwLock<HashMap<String, Vec<Event>>>>,
    /// Read offset per (destination, group)
    offsets: Arc<Mutex<HashMap<(String, String), usize>>>,
    /// Acknowledged event IDs
    acked: Arc<Mutex<Vec<String>>>,
    /// Rejected event IDs with reasons
    nacked: Arc<Mutex<Vec<(String, String)>>>,
}

impl InMemoryQueue {
    /// Create a new in-memory queue.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get all events sent to a destination, in order.
    pub fn events(&self, destination: &str) -> Vec<Event> {
        self.topics
            .read()
            .unwrap()
            .get(destination)
            .cloned()
            .unwrap_or_default()
    }

    /// Get all event types sent to a destination, in order.
    pub fn event_types(&self, destination: &str) -> Vec<String> {
        self.events(destination)
            .into_iter()
            .map(|e| e.event_type)
            .collect()
    }

    /// Number of events sent to a destination.
    pub fn len(&self, destination: &str) -> usize {
        self.topics
            .read()
            .unwrap()
            .get(destination)
            .map_or(0, Vec::len)
    }

    /// Check whether a destination has received no events.
    pub fn is_empty(&self, destination: &str) -> bool {
        self.len(destination) == 0
    }

    /// Current read offset of a consumer group on a destination.
    pub fn offset(&self, destination: &str, group: &str) -> usize {
        self.offsets
            .lock()
            .unwrap()
            .get(&(destination.to_string(), group.to_string()))
            .copied()
            .unwrap_or(0)
    }

    /// Get acknowledged event IDs.
    pub fn acknowledged(&self) -> Vec<String> {
        self.acked.lock().unwrap().clone()
    }

    /// Get rejected event IDs with the reason given.
    pub fn rejected(&self) -> Vec<(String, String)> {
        self.nacked.lock().unwrap().clone()
    }

    /// Clear all logs, offsets and acknowledgements.
    pub fn clear(&self) {
        self.topics.write().unwrap().clear();
        self.offsets.lock().unwrap().clear();
        self.acked.lock().unwrap().clear();
        self.nacked.lock().unwrap().clear();
    }
}

impl Sender for InMemoryQueue {
    fn send(&self, destination: &str, event: Event) -> Result<Ack, TransportError> {
        let mut topics = self.topics.write().unwrap();
        let log = topics.entry(destination.to_string()).or_default();
        let offset = log.len() as u64;
        log.push(event);
        Ok(Ack {
            destination: destination.to_string(),
            offset,
        })
    }
}

impl Subscriber for InMemoryQueue {
    fn poll(
        &self,
        destination: &str,
        group: &str,
        timeout_ms: u64,
    ) -> Result<Option<Event>, TransportError> {
        let deadline = Instant::now() + Duration::from_millis(timeout_ms);
        let key = (destination.to_string(), group.to_string());

        loop {
            {
                let topics = self.topics.read().unwrap();
                let mut offsets = self.offsets.lock().unwrap();

                if let Some(log) = topics.get(destination) {
                    let pos = offsets.entry(key.clone()).or_insert(0);
                    if *pos < log.len() {
                        let event = log[*pos].clone();
                        *pos += 1;
                        return Ok(Some(event));
                    }
                }
            }

            if Instant::now() >= deadline {
                return Ok(None);
            }

            // Small sleep to avoid busy-waiting
            std::thread::sleep(Duration::from_millis(1));
        }
    }

    fn ack(&self, event_id: &str) -> Result<(), TransportError> {
        self.acked.lock().unwrap().push(event_id.to_string());
        Ok(())
    }

    fn nack(&self, event_id: &str, reason: &str) -> Result<(), TransportError> {
        // No redelivery in memory; the event stays in the log
        self.nacked
            .lock()
            .unwrap()
            .push((event_id.to_string(), reason.to_string()));
        Ok(())
    }
}
