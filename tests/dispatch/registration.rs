//! Startup registration rules.

use payment_bus::dispatch::{HandlerRegistry, RegistrationError};
use payment_bus::payments;

#[test]
fn duplicate_registration_fails() {
    let mut registry = HandlerRegistry::new();
    registry.register("order_created", |_| Ok(())).unwrap();

    let result = registry.register("order_created", |_| Ok(()));

    assert_eq!(
        result,
        Err(RegistrationError::DuplicateType("order_created".to_string()))
    );
}

#[test]
fn custom_types_extend_payment_handlers() {
    let mut registry = payments::registry().unwrap();
    registry.register("refund_issued", |_| Ok(())).unwrap();

    assert!(registry.lookup("refund_issued").is_some());
    assert!(registry.lookup(payments::ORDER_CREATED).is_some());
}

#[test]
fn payment_types_cannot_be_overridden() {
    let mut registry = payments::registry().unwrap();
    let result = registry.register(payments::PAYMENT_REQUIRED, |_| Ok(()));
    assert!(matches!(result, Err(RegistrationError::DuplicateType(_))));
}
