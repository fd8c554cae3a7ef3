//! Handler registry - maps message types to handler functions.
//!
//! Populated at startup, then moved into a [`Dispatcher`](super::Dispatcher)
//! which only ever reads it. Registering the same type twice is an error;
//! the first handler stays in place.
//!
//! ## Example
//!
//! ```
//! use payment_bus::dispatch::{HandlerRegistry, RegistrationError};
//!
//! let mut registry = HandlerRegistry::new();
//! registry.register("order_created", |_envelope| Ok(())).unwrap();
//!
//! let duplicate = registry.register("order_created", |_envelope| Ok(()));
//! assert!(matches!(duplicate, Err(RegistrationError::DuplicateType(_))));
//! ```

use std::collections::HashMap;
use std::fmt;

use serde::de::DeserializeOwned;

use super::error::{HandlerError, RegistrationError};
use crate::envelope::Envelope;

type HandlerFn = dyn Fn(&Envelope) -> Result<(), HandlerError> + Send + Sync;

/// A registered message handler.
pub struct Handler {
    kind: String,
    handle: Box<HandlerFn>,
}

impl Handler {
    /// The type this handler was registered for.
    pub fn kind(&self) -> &str {
        &self.kind
    }

    /// Run the handler on an envelope.
    pub fn call(&self, envelope: &Envelope) -> Result<(), HandlerError> {
        (self.handle)(envelope)
    }
}

impl fmt::Debug for Handler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Handler").field("kind", &self.kind).finish()
    }
}

/// Mapping from message type to handler.
#[derive(Default)]
pub struct HandlerRegistry {
    handlers: HashMap<String, Handler>,
}

impl HandlerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a handler for `kind`.
    ///
    /// Fails with `DuplicateType` if `kind` already has a handler and with
    /// `InvalidType` if `kind` is empty or whitespace.
    pub fn register<F>(&mut self, kind: &str, handler: F) -> Result<(), RegistrationError>
    where
        F: Fn(&Envelope) -> Result<(), HandlerError> + Send + Sync + 'static,
    {
        if kind.trim().is_empty() {
            return Err(RegistrationError::InvalidType(kind.to_string()));
        }
        if self.handlers.contains_key(kind) {
            return Err(RegistrationError::DuplicateType(kind.to_string()));
        }
        self.handlers.insert(
            kind.to_string(),
            Handler {
                kind: kind.to_string(),
                handle: Box::new(handler),
            },
        );
        tracing::debug!(message_type = kind, "handler registered");
        Ok(())
    }

    /// Register a handler whose payload is deserialized into `T` first.
    ///
    /// A payload that does not fit `T` fails the handler with `DecodeFailed`.
    pub fn register_typed<T, F>(&mut self, kind: &str, handler: F) -> Result<(), RegistrationError>
    where
        T: DeserializeOwned,
        F: Fn(T, &Envelope) -> Result<(), HandlerError> + Send + Sync + 'static,
    {
        self.register(kind, move |envelope| {
            let input = serde_json::from_value::<T>(envelope.payload().clone())?;
            handler(input, envelope)
        })
    }

    /// Register a handler, builder style.
    pub fn with_handler<F>(mut self, kind: &str, handler: F) -> Result<Self, RegistrationError>
    where
        F: Fn(&Envelope) -> Result<(), HandlerError> + Send + Sync + 'static,
    {
        self.register(kind, handler)?;
        Ok(self)
    }

    /// Find the handler for `kind`. Absence is a normal outcome.
    pub fn lookup(&self, kind: &str) -> Option<&Handler> {
        self.handlers.get(kind)
    }

    /// List registered types.
    pub fn types(&self) -> Vec<&str> {
        self.handlers.keys().map(|s| s.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}

impl fmt::Debug for HandlerRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut types = self.types();
        types.sort_unstable();
        f.debug_struct("HandlerRegistry").field("types", &types).finish()
    }
}
