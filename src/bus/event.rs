//! Transport-level message, acknowledgement and error types.

use std::error::Error;
use std::fmt;

/// A message as it travels over the transport.
///
/// The transport never looks inside `payload`; it only needs the id for
/// acknowledgement and the type for logging and filtering.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Event {
    /// Unique identifier for this message
    pub id: String,
    /// Message type (e.g., "order_created", "test")
    pub event_type: String,
    /// Serialized payload (JSON for envelopes)
    pub payload: Vec<u8>,
    /// Optional transport headers
    pub metadata: Option<Vec<(String, String)>>,
}

impl Event {
    /// Create a new event with the given type and payload.
    pub fn new(id: impl Into<String>, event_type: impl Into<String>, payload: Vec<u8>) -> Self {
        Self {
            id: id.into(),
            event_type: event_type.into(),
            payload,
            metadata: None,
        }
    }

    /// Create an event with a string payload.
    pub fn with_string_payload(
        id: impl Into<String>,
        event_type: impl Into<String>,
        payload: impl Into<String>,
    ) -> Self {
        Self::new(id, event_type, payload.into().into_bytes())
    }

    /// Add a header to the event.
    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata
            .get_or_insert_with(Vec::new)
            .push((key.into(), value.into()));
        self
    }

    /// Look up a header by key.
    pub fn metadata_value(&self, key: &str) -> Option<&str> {
        self.metadata
            .as_ref()?
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Get the payload as a string (if valid UTF-8).
    pub fn payload_str(&self) -> Option<&str> {
        std::str::from_utf8(&self.payload).ok()
    }
}

/// Acknowledgement returned by the transport for an accepted send.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Ack {
    /// Destination the event was appended to.
    pub destination: String,
    /// Position of the event within the destination's log.
    pub offset: u64,
}

/// Error type for transport operations.
#[derive(Debug)]
pub enum TransportError {
    /// Connection to the broker failed
    ConnectionFailed(String),
    /// The broker rejected the event
    Rejected(String),
    /// Timeout waiting for acknowledgment
    Timeout,
    /// Other error
    Other(Box<dyn Error + Send + Sync>),
}

impl fmt::Display for TransportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransportError::ConnectionFailed(msg) => write!(f, "connection failed: {}", msg),
            TransportError::Rejected(msg) => write!(f, "event rejected: {}", msg),
            TransportError::Timeout => write!(f, "transport timeout"),
            TransportError::Other(e) => write!(f, "transport error: {}", e),
        }
    }
}

impl Error for TransportError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            TransportError::Other(e) => Some(e.as_ref()),
            _ => None,
        }
    }
}
