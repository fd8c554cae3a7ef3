//! Consumer loop - delivers events from a subscriber to a dispatcher.
//!
//! This is the `onMessage(destination, group, callback)` side of the
//! transport: a background thread polls the subscriber and hands every event
//! to the dispatcher.
//!
//! ## Example
//!
//! ```
//! use std::sync::Arc;
//! use std::time::Duration;
//! use payment_bus::bus::InMemoryQueue;
//! use payment_bus::dispatch::{self, Dispatcher, HandlerRegistry};
//!
//! let registry = HandlerRegistry::new().with_handler("test", |_| Ok(())).unwrap();
//! let dispatcher = Arc::new(Dispatcher::new(registry));
//!
//! let queue = InMemoryQueue::new();
//! let handle = dispatch::subscribe(
//!     dispatcher,
//!     queue.clone(),
//!     "payment-events",
//!     "payment-service-group",
//!     Duration::from_millis(10),
//! );
//!
//! let stats = handle.stop();
//! assert_eq!(stats.handled, 0);
//! ```

use std::sync::mpsc::{self, TryRecvError};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use super::dispatcher::{DispatchOutcome, Dispatcher};
use crate::bus::Subscriber;

/// Statistics from a consumer thread.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ConsumerStats {
    /// Number of messages a handler processed successfully.
    pub handled: usize,
    /// Number of messages with no registered handler.
    pub unhandled: usize,
    /// Number of messages whose handler failed.
    pub failed: usize,
    /// Number of messages that could not be decoded.
    pub rejected: usize,
    /// Number of poll cycles completed.
    pub polls: usize,
    /// Number of poll cycles that ended in a transport error.
    pub poll_errors: usize,
}

/// Handle to a background consumer thread. Drop or call `stop()` to shut down.
pub struct ConsumerHandle {
    stop_tx: mpsc::Sender<()>,
    handle: Option<JoinHandle<ConsumerStats>>,
}

impl ConsumerHandle {
    /// Stop the consumer and wait for it to finish. Returns stats.
    pub fn stop(mut self) -> ConsumerStats {
        let _ = self.stop_tx.send(());
        match self.handle.take() {
            Some(handle) => handle.join().unwrap_or_default(),
            None => ConsumerStats::default(),
        }
    }

    /// Signal stop without waiting.
    pub fn signal_stop(&self) {
        let _ = self.stop_tx.send(());
    }
}

impl Drop for ConsumerHandle {
    fn drop(&mut self) {
        let _ = self.stop_tx.send(());
    }
}

/// Start consuming `destination` as a member of `group`.
///
/// Handled and unhandled messages are acknowledged; failed and malformed
/// ones are nacked. Transport errors are logged and polling continues.
pub fn subscribe<S>(
    dispatcher: Arc<Dispatcher>,
    subscriber: S,
    destination: &str,
    group: &str,
    poll_interval: Duration,
) -> ConsumerHandle
where
    S: Subscriber + 'static,
{
    let destination = destination.to_string();
    let group = group.to_string();
    let (stop_tx, stop_rx) = mpsc::channel();

    tracing::info!(topic = %destination, group = %group, "consumer started");

    let handle = thread::spawn(move || {
        let mut stats = ConsumerStats::default();
        // A zero timeout would make an idle loop spin.
        let timeout_ms = u64::try_from(poll_interval.as_millis())
            .unwrap_or(u64::MAX)
            .max(1);

        loop {
            match stop_rx.try_recv() {
                Ok(()) | Err(TryRecvError::Disconnected) => break,
                Err(TryRecvError::Empty) => {}
            }

            stats.polls += 1;

            let event = match subscriber.poll(&destination, &group, timeout_ms) {
                Ok(Some(event)) => event,
                Ok(None) => continue,
                Err(e) => {
                    tracing::error!(topic = %destination, error = %e, "poll failed");
                    stats.poll_errors += 1;
                    continue;
                }
            };

            tracing::info!(
                topic = %destination,
                message_type = %event.event_type,
                "received message"
            );

            let outcome = dispatcher.dispatch_event(&event);
            let settled = if outcome.is_ack() {
                subscriber.ack(&event.id)
            } else {
                subscriber.nack(&event.id, &nack_reason(&outcome))
            };
            if let Err(e) = settled {
                tracing::error!(event_id = %event.id, error = %e, "failed to settle message");
            }

            match outcome {
                DispatchOutcome::Handled => stats.handled += 1,
                DispatchOutcome::Unhandled => stats.unhandled += 1,
                DispatchOutcome::Failed(_) => stats.failed += 1,
                DispatchOutcome::Rejected(_) => stats.rejected += 1,
            }
        }

        tracing::info!(topic = %destination, group = %group, ?stats, "consumer stopped");
        stats
    });

    ConsumerHandle {
        stop_tx,
        handle: Some(handle),
    }
}

fn nack_reason(outcome: &DispatchOutcome) -> String {
    match outcome {
        DispatchOutcome::Failed(e) => format!("handler error: {}", e),
        DispatchOutcome::Rejected(e) => format!("malformed message: {}", e),
        DispatchOutcome::Handled | DispatchOutcome::Unhandled => String::new(),
    }
}
