//! Dispatcher - routes inbound envelopes to handlers by type.
//!
//! Routing is stateless per message. Whatever a handler does, including
//! returning an error or panicking, stays inside [`Dispatcher::dispatch`]:
//! the next message is processed as if nothing happened.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicU64, Ordering};

use super::error::HandlerError;
use super::registry::HandlerRegistry;
use crate::bus::Event;
use crate::envelope::{Envelope, EnvelopeError};

/// What happened to a dispatched message.
#[derive(Debug)]
pub enum DispatchOutcome {
    /// A handler ran and succeeded.
    Handled,
    /// No handler is registered for the type; the message was dropped.
    Unhandled,
    /// The handler returned an error or panicked.
    Failed(HandlerError),
    /// The event could not be decoded into an envelope.
    Rejected(EnvelopeError),
}

impl DispatchOutcome {
    /// Whether the message should be acknowledged to the transport.
    ///
    /// Unknown types are a normal outcome and are acked like handled ones.
    pub fn is_ack(&self) -> bool {
        matches!(self, DispatchOutcome::Handled | DispatchOutcome::Unhandled)
    }
}

/// Snapshot of dispatcher counters.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct DispatchStats {
    pub handled: u64,
    pub unhandled: u64,
    pub failed: u64,
    pub rejected: u64,
}

/// Routes envelopes to the handlers in a frozen registry.
///
/// Safe to share across threads (`Arc<Dispatcher>`); dispatch only reads
/// the registry and bumps atomic counters.
#[derive(Debug)]
pub struct Dispatcher {
    registry: HandlerRegistry,
    handled: AtomicU64,
    unhandled: AtomicU64,
    failed: AtomicU64,
    rejected: AtomicU64,
}

impl Dispatcher {
    /// Take ownership of a populated registry. No handlers can be added
    /// afterwards.
    pub fn new(registry: HandlerRegistry) -> Self {
        Self {
            registry,
            handled: AtomicU64::new(0),
            unhandled: AtomicU64::new(0),
            failed: AtomicU64::new(0),
            rejected: AtomicU64::new(0),
        }
    }

    pub fn registry(&self) -> &HandlerRegistry {
        &self.registry
    }

    /// Route one envelope to its handler.
    pub fn dispatch(&self, envelope: &Envelope) -> DispatchOutcome {
        let Some(handler) = self.registry.lookup(envelope.kind()) else {
            tracing::info!(
                message_type = envelope.kind(),
                message_id = envelope.id(),
                "unknown message type"
            );
            self.unhandled.fetch_add(1, Ordering::Relaxed);
            return DispatchOutcome::Unhandled;
        };

        let result = panic::catch_unwind(AssertUnwindSafe(|| handler.call(envelope)))
            .unwrap_or_else(|panic| Err(HandlerError::Panicked(panic_message(panic))));

        match result {
            Ok(()) => {
                self.handled.fetch_add(1, Ordering::Relaxed);
                DispatchOutcome::Handled
            }
            Err(e) => {
                tracing::error!(
                    message_type = envelope.kind(),
                    message_id = envelope.id(),
                    error = %e,
                    "error processing message"
                );
                self.failed.fetch_add(1, Ordering::Relaxed);
                DispatchOutcome::Failed(e)
            }
        }
    }

    /// Decode a transport event and route it.
    pub fn dispatch_event(&self, event: &Event) -> DispatchOutcome {
        match Envelope::from_event(event) {
            Ok(envelope) => self.dispatch(&envelope),
            Err(e) => {
                tracing::warn!(event_id = %event.id, error = %e, "dropping malformed message");
                self.rejected.fetch_add(1, Ordering::Relaxed);
                DispatchOutcome::Rejected(e)
            }
        }
    }

    pub fn stats(&self) -> DispatchStats {
        DispatchStats {
            handled: self.handled.load(Ordering::Relaxed),
            unhandled: self.unhandled.load(Ordering::Relaxed),
            failed: self.failed.load(Ordering::Relaxed),
            rejected: self.rejected.load(Ordering::Relaxed),
        }
    }
}

fn panic_message(panic: Box<dyn Any + Send>) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
