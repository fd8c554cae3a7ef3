//! Sender trait for handing messages to the transport.

use super::event::{Ack, Event, TransportError};

/// Trait for sending events to a named destination (topic).
///
/// Implementations might include:
/// - `InMemoryQueue` - For testing and single-process scenarios
/// - a Kafka producer
/// - a NATS JetStream context
///
/// Implementations must be safe to call from several threads at once;
/// the transport connection is the only state shared between callers.
pub trait Sender: Send + Sync {
    /// Send a single event to a destination and wait for the broker's ack.
    fn send(&self, destination: &str, event: Event) -> Result<Ack, TransportError>;
}

impl<T: Sender + ?Sized> Sender for std::sync::Arc<T> {
    fn send(&self, destination: &str, event: Event) -> Result<Ack, TransportError> {
        (**self).send(destination, event)
    }
}
