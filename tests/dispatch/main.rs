//! Publish/dispatch integration tests over the in-memory transport.

mod support;
mod concurrency;
mod isolation;
mod registration;
mod round_trip;
