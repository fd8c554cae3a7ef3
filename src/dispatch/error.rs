//! Error types for handler registration and handler execution.

use std::error::Error;
use std::fmt;

/// Error type for registering handlers. Fatal at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistrationError {
    /// A handler is already registered for this type.
    DuplicateType(String),
    /// The type tag was empty or whitespace.
    InvalidType(String),
}

impl fmt::Display for RegistrationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RegistrationError::DuplicateType(kind) => {
                write!(f, "handler already registered for type: {}", kind)
            }
            RegistrationError::InvalidType(kind) => write!(f, "invalid message type: {:?}", kind),
        }
    }
}

impl Error for RegistrationError {}

/// Error type for handler execution.
///
/// Never leaves the dispatcher: it is logged and reported in the dispatch
/// outcome.
#[derive(Debug)]
pub enum HandlerError {
    /// Payload decode / deserialization failed.
    DecodeFailed(String),
    /// Business logic rejected the message.
    Rejected(String),
    /// The handler panicked.
    Panicked(String),
    /// Other error.
    Other(Box<dyn Error + Send + Sync>),
}

impl fmt::Display for HandlerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HandlerError::DecodeFailed(msg) => write!(f, "decode failed: {}", msg),
            HandlerError::Rejected(msg) => write!(f, "rejected: {}", msg),
            HandlerError::Panicked(msg) => write!(f, "handler panicked: {}", msg),
            HandlerError::Other(e) => write!(f, "handler error: {}", e),
        }
    }
}

impl Error for HandlerError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            HandlerError::Other(e) => Some(e.as_ref()),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for HandlerError {
    fn from(err: serde_json::Error) -> Self {
        HandlerError::DecodeFailed(err.to_string())
    }
}
