//! Event-to-notification mapping.
//!
//! Every implemented [`EventKind`] has a dedicated pure mapper. Raw indexer
//! records go through [`to_notification_event`], which reads the
//! `__typename` discriminator and refuses kinds that have no mapper instead
//! of dropping them.

pub mod forum;

use crate::event::{DomainEvent, EventKind};
use crate::notification::{NotificationEvent, PotentialNotification};

// ---------------------------------------------------------------------------
// Error
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum MapError {
    /// The record carries no `__typename` discriminator.
    #[error("Event record has no __typename discriminator")]
    MissingDiscriminator,

    /// No mapper is registered for the discriminator.
    #[error("Unimplemented event kind: {0}")]
    UnimplementedEventKind(String),

    /// The discriminator is known but the payload does not decode.
    #[error("Malformed {kind} payload: {source}")]
    MalformedEvent {
        kind: EventKind,
        #[source]
        source: serde_json::Error,
    },
}

// ---------------------------------------------------------------------------
// Dispatch
// ---------------------------------------------------------------------------

/// Map a typed event to its notification intents.
pub fn map_event(event: &DomainEvent) -> Vec<PotentialNotification> {
    match event {
        DomainEvent::PostAdded(e) => forum::from_post_added(e),
        DomainEvent::ThreadCreated(e) => forum::from_thread_created(e),
    }
}

/// Decode and map one raw indexer record.
pub fn to_notification_event(raw: &serde_json::Value) -> Result<NotificationEvent, MapError> {
    let typename = raw
        .get("__typename")
        .and_then(serde_json::Value::as_str)
        .ok_or(MapError::MissingDiscriminator)?;

    let kind = EventKind::from_typename(typename)
        .ok_or_else(|| MapError::UnimplementedEventKind(typename.to_string()))?;

    let event: DomainEvent = serde::Deserialize::deserialize(raw)
        .map_err(|source| MapError::MalformedEvent { kind, source })?;

    let block = event.block();
    let entity_id = match &event {
        DomainEvent::PostAdded(e) => e.post.id.clone(),
        DomainEvent::ThreadCreated(e) => e.thread.id.clone(),
    };

    Ok(NotificationEvent {
        event_id: block.id.clone(),
        event_kind: event.kind(),
        in_block: block.in_block,
        created_at: block.created_at,
        entity_id,
        potential_notifications: map_event(&event),
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
