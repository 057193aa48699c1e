//! Domain types and pure logic for the Pioneer notifier backend.
//!
//! Nothing in this crate performs I/O. The database and HTTP crates build on
//! the notification-kind catalogue, mention parsing, and subscription
//! reconciliation defined here.

pub mod error;
pub mod mentions;
pub mod notification_kinds;
pub mod subscriptions;
pub mod types;
