//! Configuration errors and the crate-level error returned to binaries.

use std::fmt;

use crate::dispatch::RegistrationError;
use crate::envelope::EnvelopeError;
use crate::publisher::PublishError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    InvalidValue { key: String, message: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidValue { key, message } => {
                write!(f, "invalid value for {}: {}", key, message)
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// Any error the core surfaces to a caller.
///
/// Handler failures are absent on purpose: they stop at the dispatcher.
#[derive(Debug)]
pub enum Error {
    Config(ConfigError),
    Envelope(EnvelopeError),
    Publish(PublishError),
    Registration(RegistrationError),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Config(e) => write!(f, "configuration error: {}", e),
            Error::Envelope(e) => write!(f, "envelope error: {}", e),
            Error::Publish(e) => write!(f, "publish error: {}", e),
            Error::Registration(e) => write!(f, "registration error: {}", e),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Config(e) => Some(e),
            Error::Envelope(e) => Some(e),
            Error::Publish(e) => Some(e),
            Error::Registration(e) => Some(e),
        }
    }
}

impl From<ConfigError> for Error {
    fn from(err: ConfigError) -> Self {
        Error::Config(err)
    }
}

impl From<EnvelopeError> for Error {
    fn from(err: EnvelopeError) -> Self {
        Error::Envelope(err)
    }
}

impl From<PublishError> for Error {
    fn from(err: PublishError) -> Self {
        Error::Publish(err)
    }
}

impl From<RegistrationError> for Error {
    fn from(err: RegistrationError) -> Self {
        Error::Registration(err)
    }
}
