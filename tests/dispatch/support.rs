//! Shared helpers: a handler that records what it sees, and polling waits.

use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

use payment_bus::dispatch::HandlerError;
use payment_bus::Envelope;
use serde_json::Value;

pub const TOPIC: &str = "payment-events";
pub const GROUP: &str = "payment-service-group";

/// Collects `(type, payload)` pairs seen by handlers.
#[derive(Clone, Default)]
pub struct Recorder {
    seen: Arc<Mutex<Vec<(String, Value)>>>,
}

impl Recorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn handler(&self) -> impl Fn(&Envelope) -> Result<(), HandlerError> + Send + Sync + 'static {
        let seen = Arc::clone(&self.seen);
        move |envelope: &Envelope| {
            seen.lock()
                .unwrap()
                .push((envelope.kind().to_string(), envelope.payload().clone()));
            Ok(())
        }
    }

    pub fn seen(&self) -> Vec<(String, Value)> {
        self.seen.lock().unwrap().clone()
    }

    pub fn len(&self) -> usize {
        self.seen.lock().unwrap().len()
    }
}

/// Poll `done` until it holds or two seconds pass.
pub fn wait_until(mut done: impl FnMut() -> bool) -> bool {
    for _ in 0..400 {
        if done() {
            return true;
        }
        thread::sleep(Duration::from_millis(5));
    }
    done()
}
