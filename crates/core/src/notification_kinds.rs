//! Closed catalogue of notification kinds and their default policies.
//!
//! Kinds split into two families:
//!
//! - **General** kinds are addressed to explicit members (or everyone) and
//!   can be overridden per member through a subscription row.
//! - **Entity** kinds are addressed to whoever watches an entity (a thread,
//!   a category) and are resolved by the delivery stage.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

// ---------------------------------------------------------------------------
// NotificationPolicy
// ---------------------------------------------------------------------------

/// Channel switches for one notification kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationPolicy {
    pub should_notify: bool,
    pub should_notify_by_email: bool,
}

impl NotificationPolicy {
    pub const fn new(should_notify: bool, should_notify_by_email: bool) -> Self {
        Self {
            should_notify,
            should_notify_by_email,
        }
    }
}

// ---------------------------------------------------------------------------
// NotificationKind
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NotificationKind {
    ForumPostMention,
    ForumThreadCreator,
    ForumThreadContributor,
    ForumThreadMention,
    ForumPostAll,
    ForumThreadAll,
    ForumWatchedThread,
    ForumWatchedCategory,
}

/// Kinds a member can override with a general subscription row.
pub const GENERAL_KINDS: &[NotificationKind] = &[
    NotificationKind::ForumPostMention,
    NotificationKind::ForumThreadCreator,
    NotificationKind::ForumThreadContributor,
    NotificationKind::ForumThreadMention,
    NotificationKind::ForumPostAll,
    NotificationKind::ForumThreadAll,
];

/// Kinds whose recipients are the watchers of an entity.
pub const ENTITY_KINDS: &[NotificationKind] = &[
    NotificationKind::ForumWatchedThread,
    NotificationKind::ForumWatchedCategory,
];

impl NotificationKind {
    /// Wire and storage representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ForumPostMention => "FORUM_POST_MENTION",
            Self::ForumThreadCreator => "FORUM_THREAD_CREATOR",
            Self::ForumThreadContributor => "FORUM_THREAD_CONTRIBUTOR",
            Self::ForumThreadMention => "FORUM_THREAD_MENTION",
            Self::ForumPostAll => "FORUM_POST_ALL",
            Self::ForumThreadAll => "FORUM_THREAD_ALL",
            Self::ForumWatchedThread => "FORUM_WATCHED_THREAD",
            Self::ForumWatchedCategory => "FORUM_WATCHED_CATEGORY",
        }
    }

    /// Whether a member without a subscription row is notified.
    ///
    /// One switch per kind covers both channels.
    pub fn notify_by_default(&self) -> bool {
        match self {
            Self::ForumPostMention
            | Self::ForumThreadCreator
            | Self::ForumThreadContributor
            | Self::ForumThreadMention
            | Self::ForumPostAll
            | Self::ForumThreadAll
            | Self::ForumWatchedThread
            | Self::ForumWatchedCategory => true,
        }
    }

    /// Policy that applies when the member has no subscription row.
    pub fn default_policy(&self) -> NotificationPolicy {
        let notify = self.notify_by_default();
        NotificationPolicy::new(notify, notify)
    }

    pub fn is_general(&self) -> bool {
        GENERAL_KINDS.contains(self)
    }

    /// Parse a kind that must belong to the general family.
    ///
    /// Entity kinds are rejected the same way as unknown strings: they cannot
    /// be stored as general subscriptions.
    pub fn parse_general(value: &str) -> Result<Self, CoreError> {
        let kind: Self = value.parse()?;
        if kind.is_general() {
            Ok(kind)
        } else {
            Err(CoreError::InvalidSubscriptionKind(value.to_string()))
        }
    }
}

impl FromStr for NotificationKind {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        GENERAL_KINDS
            .iter()
            .chain(ENTITY_KINDS)
            .find(|kind| kind.as_str() == s)
            .copied()
            .ok_or_else(|| CoreError::InvalidSubscriptionKind(s.to_string()))
    }
}

impl std::fmt::Display for NotificationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
