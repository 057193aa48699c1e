//! Request handlers.
//!
//! Handlers extract the member and request payload, delegate to the flows in
//! [`crate::subscriptions`] and wrap results in the `{ "data": ... }` envelope.

pub mod subscription;
