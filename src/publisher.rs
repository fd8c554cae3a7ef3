//! Publisher - builds envelopes and hands them to the transport.
//!
//! One call, one send. There is no retry, buffering or batching here; a
//! failed send comes back to the caller as a [`PublishError`] and whatever
//! resilience policy wraps the publisher decides what to do next.
//!
//! ## Example
//!
//! ```
//! use payment_bus::bus::InMemoryQueue;
//! use payment_bus::{BusConfig, Publisher};
//! use serde_json::json;
//!
//! let queue = InMemoryQueue::new();
//! let publisher = Publisher::new(queue.clone(), &BusConfig::default());
//!
//! let published = publisher
//!     .publish_new("order_created", json!({ "orderId": "o-1" }))
//!     .unwrap();
//! assert_eq!(published.ack.offset, 0);
//!
//! let test = publisher.publish_test().unwrap();
//! assert_eq!(test.kind(), "test");
//! assert_eq!(queue.len("payment-events"), 2);
//! ```

use std::error::Error;
use std::fmt;

use serde_json::Value;

use crate::bus::{Ack, Sender, TransportError};
use crate::config::BusConfig;
use crate::envelope::{Envelope, EnvelopeBuilder, EnvelopeError};

/// Error type for publish operations.
#[derive(Debug)]
pub enum PublishError {
    /// The message type was empty or whitespace; nothing was sent.
    InvalidArgument(String),
    /// The envelope could not be encoded; nothing was sent.
    Encode(String),
    /// The transport failed to accept the event.
    Transport {
        destination: String,
        cause: TransportError,
    },
}

impl fmt::Display for PublishError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PublishError::InvalidArgument(msg) => write!(f, "invalid argument: {}", msg),
            PublishError::Encode(msg) => write!(f, "encode failed: {}", msg),
            PublishError::Transport { destination, cause } => {
                write!(f, "failed to send to '{}': {}", destination, cause)
            }
        }
    }
}

impl Error for PublishError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            PublishError::Transport { cause, .. } => Some(cause),
            _ => None,
        }
    }
}

impl From<EnvelopeError> for PublishError {
    fn from(err: EnvelopeError) -> Self {
        match err {
            EnvelopeError::InvalidArgument(msg) => PublishError::InvalidArgument(msg),
            EnvelopeError::Encode(msg) | EnvelopeError::Decode(msg) => PublishError::Encode(msg),
        }
    }
}

/// An envelope that the transport has accepted.
#[derive(Clone, Debug)]
pub struct Published {
    pub envelope: Envelope,
    pub ack: Ack,
}

/// Publishes envelopes to a single configured destination.
///
/// The transport handle is injected at construction; the publisher holds no
/// other mutable state, so `&Publisher` can be shared across threads when the
/// sender allows it.
pub struct Publisher<S: Sender> {
    sender: S,
    builder: EnvelopeBuilder,
    destination: String,
}

impl<S: Sender> Publisher<S> {
    /// Create a publisher sending to `config.destination` and stamping
    /// envelopes with `config.source`.
    pub fn new(sender: S, config: &BusConfig) -> Self {
        Self {
            sender,
            builder: EnvelopeBuilder::new(config.source.clone()),
            destination: config.destination.clone(),
        }
    }

    pub fn destination(&self) -> &str {
        &self.destination
    }

    pub fn builder(&self) -> &EnvelopeBuilder {
        &self.builder
    }

    /// Get a reference to the underlying sender.
    pub fn sender(&self) -> &S {
        &self.sender
    }

    /// Send an already built envelope.
    pub fn publish(&self, envelope: &Envelope) -> Result<Ack, PublishError> {
        let event = envelope.to_event()?;
        match self.sender.send(&self.destination, event) {
            Ok(ack) => {
                tracing::info!(
                    topic = %self.destination,
                    message_type = envelope.kind(),
                    message_id = envelope.id(),
                    test_id = envelope.test_id(),
                    offset = ack.offset,
                    "message sent"
                );
                Ok(ack)
            }
            Err(cause) => {
                tracing::error!(
                    topic = %self.destination,
                    message_type = envelope.kind(),
                    message_id = envelope.id(),
                    error = %cause,
                    "error sending message"
                );
                Err(PublishError::Transport {
                    destination: self.destination.clone(),
                    cause,
                })
            }
        }
    }

    /// Build an envelope for `kind` and send it.
    ///
    /// An empty type is rejected before anything reaches the transport.
    pub fn publish_new(
        &self,
        kind: &str,
        payload: impl Into<Value>,
    ) -> Result<Published, PublishError> {
        let envelope = self.builder.build(kind, payload)?;
        let ack = self.publish(&envelope)?;
        Ok(Published { envelope, ack })
    }

    /// Send the canonical `"test"` envelope and return it for inspection.
    pub fn publish_test(&self) -> Result<Envelope, PublishError> {
        let envelope = self.builder.build_test();
        self.publish(&envelope)?;
        Ok(envelope)
    }
}
