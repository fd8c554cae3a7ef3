//! Transport boundary - the broker as seen by the publisher and dispatcher.
//!
//! This module defines the two traits the core depends on and an in-process
//! implementation of both.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────┐          ┌───────────────────────────┐
//! │      Publisher       │          │   dispatch::subscribe     │
//! │ envelope -> Event    │          │ Event -> envelope         │
//! └──────────────────────┘          └───────────────────────────┘
//!            │                                   ▲
//!            ▼                                   │
//! ┌─────────────────────────────────────────────────────────────┐
//! │                  Sender + Subscriber Traits                  │
//! │  Sender: send(destination, event) -> Ack                    │
//! │  Subscriber: poll(destination, group) / ack(id) / nack(id)  │
//! └─────────────────────────────────────────────────────────────┘
//!          │                  │                     │
//!          ▼                  ▼                     ▼
//! ┌─────────────┐    ┌─────────────┐    ┌─────────────────────┐
//! │InMemoryQueue│    │    Kafka    │    │   NATS JetStream    │
//! │ (included)  │    │ (external)  │    │     (external)      │
//! └─────────────┘    └─────────────┘    └─────────────────────┘
//! ```
//!
//! The core relies on the broker for durability, at-least-once delivery and
//! per-partition ordering; none of that is reimplemented here.

mod event;
mod in_memory_queue;
mod sender;
mod subscriber;

pub use event::{Ack, Event, TransportError};
pub use in_memory_queue::InMemoryQueue;
pub use sender::Sender;
pub use subscriber::Subscriber;
