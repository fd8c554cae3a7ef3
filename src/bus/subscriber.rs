//! Subscriber trait for receiving messages from the transport.

use super::event::{Event, TransportError};

/// Trait for consuming events from a destination as part of a consumer group.
///
/// This is a pull-based interface. Consumers in the same group compete for
/// events; each group sees every event on the destination. The consumer loop
/// in `dispatch::subscribe` turns it into a push-style delivery callback.
pub trait Subscriber: Send + Sync {
    /// Poll for the next event, blocking until one is available or timeout.
    fn poll(
        &self,
        destination: &str,
        group: &str,
        timeout_ms: u64,
    ) -> Result<Option<Event>, TransportError>;

    /// Acknowledge that an event has been processed.
    fn ack(&self, event_id: &str) -> Result<(), TransportError>;

    /// Reject an event (will be redelivered or sent to dead letter queue).
    fn nack(&self, event_id: &str, reason: &str) -> Result<(), TransportError>;
}
