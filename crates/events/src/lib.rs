//! Pioneer notification event derivation.
//!
//! This crate turns indexer events into notification intents:
//!
//! - [`DomainEvent`] — typed forum events decoded from the indexer feed.
//! - [`mapper`] — one pure mapping function per event kind, plus the
//!   discriminator dispatch that rejects kinds without a mapper.
//! - [`PotentialNotification`] / [`NotificationEvent`] — unresolved
//!   notification intents, grouped per source event.
//! - [`EventBus`] — in-process broadcast of notification events to the
//!   delivery stage.
//! - [`IndexerClient`] and [`Notifier`] — the polling loop feeding the bus.

pub mod bus;
pub mod event;
pub mod indexer;
pub mod mapper;
pub mod notification;
pub mod notifier;

pub use bus::EventBus;
pub use event::{DomainEvent, EventKind};
pub use indexer::{FeedCursor, IndexerClient, IndexerError};
pub use mapper::{map_event, to_notification_event, MapError};
pub use notification::{MapContext, NotificationEvent, PotentialNotification, Recipients};
pub use notifier::{Notifier, NotifierConfig};
