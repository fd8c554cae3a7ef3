//! Handlers for the message types the payment service understands.
//!
//! Each handler records the message in the log; the actual payment, refund
//! and charge flows hang off these entry points.

use crate::dispatch::{HandlerRegistry, RegistrationError};
use crate::envelope::{Envelope, TEST_TYPE};

pub const ORDER_CREATED: &str = "order_created";
pub const ORDER_CANCELLED: &str = "order_cancelled";
pub const PAYMENT_REQUIRED: &str = "payment_required";

/// All types registered by [`register`].
pub const TYPES: [&str; 4] = [TEST_TYPE, ORDER_CREATED, ORDER_CANCELLED, PAYMENT_REQUIRED];

/// Register the payment handlers on `registry`.
///
/// Fails if any of the types already has a handler.
pub fn register(registry: &mut HandlerRegistry) -> Result<(), RegistrationError> {
    registry.register(TEST_TYPE, |e: &Envelope| {
        tracing::info!(source = e.source(), data = %e.payload(), "received test message");
        Ok(())
    })?;
    registry.register(ORDER_CREATED, |e: &Envelope| {
        tracing::info!(data = %e.payload(), "order created - processing payment");
        Ok(())
    })?;
    registry.register(ORDER_CANCELLED, |e: &Envelope| {
        tracing::info!(data = %e.payload(), "order cancelled - processing refund");
        Ok(())
    })?;
    registry.register(PAYMENT_REQUIRED, |e: &Envelope| {
        tracing::info!(data = %e.payload(), "payment required for order");
        Ok(())
    })?;
    Ok(())
}

/// A registry holding only the payment handlers.
pub fn registry() -> Result<HandlerRegistry, RegistrationError> {
    let mut registry = HandlerRegistry::new();
    register(&mut registry)?;
    Ok(registry)
}
