//! dispatch - type-routed handling of inbound envelopes.
//!
//! Handlers are registered by message type on a [`HandlerRegistry`] at
//! startup. The registry is then moved into a [`Dispatcher`], which looks up
//! each inbound envelope's type and runs the matching handler. Unknown types
//! are logged and dropped; handler failures are logged and contained.
//!
//! ## Quick Start
//!
//! ```
//! use payment_bus::dispatch::{DispatchOutcome, Dispatcher, HandlerRegistry};
//! use payment_bus::EnvelopeBuilder;
//!
//! let registry = HandlerRegistry::new()
//!     .with_handler("order_created", |envelope| {
//!         tracing::info!(payload = %envelope.payload(), "processing payment");
//!         Ok(())
//!     })
//!     .unwrap();
//! let dispatcher = Dispatcher::new(registry);
//!
//! let envelope = EnvelopeBuilder::new("payment-service")
//!     .build("order_created", serde_json::json!({ "orderId": "o-1" }))
//!     .unwrap();
//! assert!(matches!(dispatcher.dispatch(&envelope), DispatchOutcome::Handled));
//! ```

mod dispatcher;
mod error;
mod registry;

pub use dispatcher::{DispatchOutcome, DispatchStats, Dispatcher};
pub use error::{HandlerError, RegistrationError};
pub use registry::{Handler, HandlerRegistry};

// Bus consumer loop (requires "bus" feature)
#[cfg(feature = "bus")]
mod consumer;
#[cfg(feature = "bus")]
pub use consumer::{subscribe, ConsumerHandle, ConsumerStats};
