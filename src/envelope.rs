//! Envelope - the immutable unit of data exchanged over the bus.
//!
//! An envelope carries a type tag, an opaque JSON payload and the metadata
//! every consumer can rely on: when it was produced, by whom, and a unique id.
//!
//! On the wire an envelope is a JSON object:
//!
//! ```json
//! {
//!   "type": "order_created",
//!   "data": { "orderId": "o-1", "amount": 4200 },
//!   "timestamp": "2024-05-01T09:30:00.000+00:00",
//!   "service": "payment-service",
//!   "messageId": "0d9c1a0e-4f47-4c43-9f0b-6c1f3f2d8d21"
//! }
//! ```

use std::error::Error;
use std::fmt;

use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::bus::Event;

/// Type tag of the liveness test envelope.
pub const TEST_TYPE: &str = "test";

/// Payload carried by the liveness test envelope.
pub const TEST_PAYLOAD: &str = "Testing kafka message from payment service";

/// Metadata key under which the producing service is attached to a bus event.
pub const SOURCE_HEADER: &str = "source";

/// Error type for building and decoding envelopes.
#[derive(Debug)]
pub enum EnvelopeError {
    /// The type tag was empty or whitespace.
    InvalidArgument(String),
    /// The envelope could not be serialized.
    Encode(String),
    /// The bytes on the wire were not an envelope.
    Decode(String),
}

impl fmt::Display for EnvelopeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EnvelopeError::InvalidArgument(msg) => write!(f, "invalid argument: {}", msg),
            EnvelopeError::Encode(msg) => write!(f, "encode failed: {}", msg),
            EnvelopeError::Decode(msg) => write!(f, "decode failed: {}", msg),
        }
    }
}

impl Error for EnvelopeError {}

/// A typed message with its metadata.
///
/// Fields are private: an envelope is fixed once built. Use
/// [`EnvelopeBuilder`] to create one and [`Envelope::from_json`] to read one
/// off the wire.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Envelope {
    #[serde(rename = "type")]
    kind: String,
    #[serde(rename = "data")]
    payload: Value,
    timestamp: String,
    #[serde(rename = "service")]
    source: String,
    #[serde(rename = "messageId")]
    id: String,
    #[serde(rename = "testId", skip_serializing_if = "Option::is_none")]
    test_id: Option<String>,
}

#[derive(Deserialize)]
struct WireEnvelope {
    #[serde(rename = "type")]
    kind: String,
    #[serde(rename = "data", default)]
    payload: Value,
    #[serde(default)]
    timestamp: String,
    #[serde(rename = "service", default)]
    source: String,
    #[serde(rename = "messageId", default)]
    id: String,
    #[serde(rename = "testId", default)]
    test_id: Option<String>,
}

impl Envelope {
    /// Type tag identifying what this message means.
    pub fn kind(&self) -> &str {
        &self.kind
    }

    pub fn payload(&self) -> &Value {
        &self.payload
    }

    /// Creation time, RFC 3339 in UTC with an explicit `+00:00` offset.
    pub fn timestamp(&self) -> &str {
        &self.timestamp
    }

    /// Identifier of the producing service.
    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// Test identifier, present only on liveness test envelopes.
    pub fn test_id(&self) -> Option<&str> {
        self.test_id.as_deref()
    }

    /// Serialize to the JSON wire format.
    pub fn to_json(&self) -> Result<Vec<u8>, EnvelopeError> {
        serde_json::to_vec(self).map_err(|e| EnvelopeError::Encode(e.to_string()))
    }

    /// Parse an envelope from the JSON wire format.
    ///
    /// The type tag is checked again and the id must be present: a decoded
    /// envelope upholds the same invariants as a built one.
    pub fn from_json(bytes: &[u8]) -> Result<Self, EnvelopeError> {
        Self::from_wire(bytes, None, None)
    }

    /// Wrap the envelope in a bus event ready for the transport.
    pub fn to_event(&self) -> Result<Event, EnvelopeError> {
        let bytes = self.to_json()?;
        Ok(Event::new(self.id.clone(), self.kind.clone(), bytes)
            .with_metadata(SOURCE_HEADER, self.source.clone()))
    }

    /// Unwrap an envelope from a bus event.
    ///
    /// A message without `messageId` or `service` takes the event id and the
    /// `source` header instead.
    pub fn from_event(event: &Event) -> Result<Self, EnvelopeError> {
        Self::from_wire(
            &event.payload,
            Some(event.id.as_str()),
            event.metadata_value(SOURCE_HEADER),
        )
    }

    fn from_wire(
        bytes: &[u8],
        fallback_id: Option<&str>,
        fallback_source: Option<&str>,
    ) -> Result<Self, EnvelopeError> {
        let wire: WireEnvelope =
            serde_json::from_slice(bytes).map_err(|e| EnvelopeError::Decode(e.to_string()))?;
        validate_kind(&wire.kind)?;

        let id = or_fallback(wire.id, fallback_id);
        if id.trim().is_empty() {
            return Err(EnvelopeError::Decode("message id is missing".to_string()));
        }

        Ok(Self {
            kind: wire.kind,
            payload: wire.payload,
            timestamp: wire.timestamp,
            source: or_fallback(wire.source, fallback_source),
            id,
            test_id: wire.test_id,
        })
    }
}

fn or_fallback(value: String, fallback: Option<&str>) -> String {
    match fallback {
        Some(f) if value.trim().is_empty() => f.to_string(),
        _ => value,
    }
}

/// Builds envelopes stamped with a fixed source identifier.
#[derive(Clone, Debug)]
pub struct EnvelopeBuilder {
    source: String,
}

impl EnvelopeBuilder {
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
        }
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    /// Build an envelope for `kind` around `payload`.
    ///
    /// Fails with `InvalidArgument` if `kind` is empty or whitespace. The
    /// payload is taken as-is.
    pub fn build(&self, kind: &str, payload: impl Into<Value>) -> Result<Envelope, EnvelopeError> {
        validate_kind(kind)?;
        Ok(Envelope {
            kind: kind.to_string(),
            payload: payload.into(),
            timestamp: now_timestamp(),
            source: self.source.clone(),
            id: Uuid::new_v4().to_string(),
            test_id: None,
        })
    }

    /// Build the canonical liveness test envelope.
    pub fn build_test(&self) -> Envelope {
        Envelope {
            kind: TEST_TYPE.to_string(),
            payload: Value::String(TEST_PAYLOAD.to_string()),
            timestamp: now_timestamp(),
            source: self.source.clone(),
            id: Uuid::new_v4().to_string(),
            test_id: Some(test_id()),
        }
    }
}

fn validate_kind(kind: &str) -> Result<(), EnvelopeError> {
    if kind.trim().is_empty() {
        return Err(EnvelopeError::InvalidArgument(
            "message type is required".to_string(),
        ));
    }
    Ok(())
}

fn now_timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, false)
}

fn test_id() -> String {
    format!("test_{}", Utc::now().timestamp_millis() % 1_000_000)
}
