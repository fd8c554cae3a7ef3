//! # payment_bus
//!
//! Event publishing and type-routed dispatch for a payment service.
//!
//! - [`EnvelopeBuilder`] stamps a type tag and payload with an id, timestamp
//!   and source.
//! - [`Publisher`] sends envelopes to a topic through an injected
//!   [`bus::Sender`].
//! - [`dispatch::HandlerRegistry`] maps types to handlers at startup;
//!   [`dispatch::Dispatcher`] routes inbound envelopes to them.
//! - [`dispatch::subscribe`] drives a dispatcher from a [`bus::Subscriber`].
//!
//! ```
//! use std::sync::Arc;
//! use std::time::Duration;
//! use payment_bus::bus::InMemoryQueue;
//! use payment_bus::dispatch::{self, Dispatcher};
//! use payment_bus::{payments, BusConfig, Publisher};
//!
//! let config = BusConfig::default().with_poll_interval(Duration::from_millis(10));
//! let queue = InMemoryQueue::new();
//!
//! let dispatcher = Arc::new(Dispatcher::new(payments::registry().unwrap()));
//! let consumer = dispatch::subscribe(
//!     dispatcher,
//!     queue.clone(),
//!     &config.destination,
//!     &config.group,
//!     config.poll_interval,
//! );
//!
//! let publisher = Publisher::new(queue, &config);
//! publisher.publish_test().unwrap();
//!
//! consumer.stop();
//! ```

pub mod bus;
pub mod config;
pub mod dispatch;
pub mod envelope;
mod error;
pub mod payments;
pub mod publisher;
pub mod telemetry;

pub use config::BusConfig;
pub use envelope::{Envelope, EnvelopeBuilder, EnvelopeError};
pub use error::{ConfigError, Error};
pub use publisher::{PublishError, Published, Publisher};
