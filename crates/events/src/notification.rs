//! Unresolved notification intents produced by the mappers.

use std::collections::BTreeSet;

use pioneer_core::notification_kinds::NotificationKind;
use pioneer_core::types::{MemberId, Timestamp};
use serde::{Serialize, Serializer};

use crate::event::EventKind;

/// Wire token standing for every known member.
pub const ALL_MEMBERS: &str = "ALL-MEMBERS";

// ---------------------------------------------------------------------------
// Recipients
// ---------------------------------------------------------------------------

/// Audience of a general notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Recipients {
    /// An explicit, deduplicated set of members. May be empty, in which case
    /// delivery is a no-op.
    Members(BTreeSet<MemberId>),
    /// Every member known at resolution time.
    AllMembers,
}

impl Recipients {
    pub fn members(ids: impl IntoIterator<Item = MemberId>) -> Self {
        Self::Members(ids.into_iter().collect())
    }

    /// Expand to concrete member ids using the members known right now.
    ///
    /// The acting member is not removed from [`Recipients::AllMembers`];
    /// filtering the actor out is up to the delivery stage.
    pub fn resolve(&self, context: &MapContext) -> BTreeSet<MemberId> {
        match self {
            Self::Members(ids) => ids.clone(),
            Self::AllMembers => context.all_member_ids.clone(),
        }
    }
}

impl Serialize for Recipients {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Members(ids) => ids.serialize(serializer),
            Self::AllMembers => serializer.serialize_str(ALL_MEMBERS),
        }
    }
}

/// Per-invocation facts needed to resolve recipients.
#[derive(Debug, Clone, Default)]
pub struct MapContext {
    pub all_member_ids: BTreeSet<MemberId>,
}

impl MapContext {
    pub fn new(all_member_ids: impl IntoIterator<Item = MemberId>) -> Self {
        Self {
            all_member_ids: all_member_ids.into_iter().collect(),
        }
    }
}

// ---------------------------------------------------------------------------
// PotentialNotification
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PotentialNotification {
    /// Addressed to explicit members or to everyone.
    General {
        kind: NotificationKind,
        recipients: Recipients,
    },
    /// Addressed to whoever watches `entity_id`; resolved downstream.
    Entity {
        kind: NotificationKind,
        entity_id: String,
    },
}

impl PotentialNotification {
    pub fn general(kind: NotificationKind, recipients: Recipients) -> Self {
        Self::General { kind, recipients }
    }

    pub fn entity(kind: NotificationKind, entity_id: impl Into<String>) -> Self {
        Self::Entity {
            kind,
            entity_id: entity_id.into(),
        }
    }

    pub fn kind(&self) -> NotificationKind {
        match self {
            Self::General { kind, .. } | Self::Entity { kind, .. } => *kind,
        }
    }
}

// ---------------------------------------------------------------------------
// NotificationEvent
// ---------------------------------------------------------------------------

/// All notification intents derived from one indexer event.
#[derive(Debug, Clone, Serialize)]
pub struct NotificationEvent {
    /// Indexer event id.
    pub event_id: String,
    #[serde(serialize_with = "serialize_event_kind")]
    pub event_kind: EventKind,
    pub in_block: i64,
    pub created_at: Timestamp,
    /// Id of the forum entity the event is about (post or thread).
    pub entity_id: String,
    pub potential_notifications: Vec<PotentialNotification>,
}

fn serialize_event_kind<S: Serializer>(kind: &EventKind, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(kind.typename())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
