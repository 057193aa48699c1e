//! Domain events as reported by the chain indexer.
//!
//! Events arrive as JSON objects carrying a `__typename` discriminator and
//! nested entity fragments in camelCase. Only the fields the mappers read are
//! modelled; anything else in the payload is ignored on decode.

use pioneer_core::types::{MemberId, Timestamp};
use serde::{Deserialize, Deserializer};

// ---------------------------------------------------------------------------
// EventKind
// ---------------------------------------------------------------------------

/// Event kinds that have a notification mapper.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    PostAdded,
    ThreadCreated,
}

/// Dispatch table from indexer discriminator to implemented kind.
const IMPLEMENTED_EVENT_KINDS: &[(&str, EventKind)] = &[
    ("PostAddedEvent", EventKind::PostAdded),
    ("ThreadCreatedEvent", EventKind::ThreadCreated),
];

impl EventKind {
    /// Look up the kind registered for an indexer `__typename`.
    pub fn from_typename(typename: &str) -> Option<Self> {
        IMPLEMENTED_EVENT_KINDS
            .iter()
            .find(|(name, _)| *name == typename)
            .map(|(_, kind)| *kind)
    }

    pub fn typename(&self) -> &'static str {
        match self {
            Self::PostAdded => "PostAddedEvent",
            Self::ThreadCreated => "ThreadCreatedEvent",
        }
    }
}

impl std::fmt::Display for EventKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.typename())
    }
}

// ---------------------------------------------------------------------------
// DomainEvent
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "__typename")]
pub enum DomainEvent {
    #[serde(rename = "PostAddedEvent")]
    PostAdded(PostAddedEvent),
    #[serde(rename = "ThreadCreatedEvent")]
    ThreadCreated(ThreadCreatedEvent),
}

impl DomainEvent {
    pub fn kind(&self) -> EventKind {
        match self {
            Self::PostAdded(_) => EventKind::PostAdded,
            Self::ThreadCreated(_) => EventKind::ThreadCreated,
        }
    }

    pub fn block(&self) -> &BlockRef {
        match self {
            Self::PostAdded(e) => &e.block,
            Self::ThreadCreated(e) => &e.block,
        }
    }
}

/// Event id plus the block it was indexed in.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockRef {
    pub id: String,
    pub in_block: i64,
    pub created_at: Timestamp,
}

// ---------------------------------------------------------------------------
// PostAddedEvent
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
pub struct PostAddedEvent {
    #[serde(flatten)]
    pub block: BlockRef,
    pub post: ForumPost,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ForumPost {
    pub id: String,
    #[serde(deserialize_with = "member_id")]
    pub author_id: MemberId,
    pub text: String,
    pub created_at: Timestamp,
    pub thread: PostThread,
}

/// The thread a post belongs to, with every post it contains.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostThread {
    pub id: String,
    #[serde(deserialize_with = "member_id")]
    pub author_id: MemberId,
    #[serde(default)]
    pub posts: Vec<ThreadPost>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThreadPost {
    pub id: String,
    #[serde(deserialize_with = "member_id")]
    pub author_id: MemberId,
    pub created_at: Timestamp,
}

// ---------------------------------------------------------------------------
// ThreadCreatedEvent
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
pub struct ThreadCreatedEvent {
    #[serde(flatten)]
    pub block: BlockRef,
    pub thread: ForumThread,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ForumThread {
    pub id: String,
    #[serde(deserialize_with = "member_id")]
    pub author_id: MemberId,
    pub title: String,
    pub category: ThreadCategory,
    #[serde(default)]
    pub initial_post: Option<InitialPost>,
}

/// Category of a thread with its ancestors, nearest parent first.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThreadCategory {
    pub id: String,
    #[serde(default)]
    pub ancestor_ids: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct InitialPost {
    pub id: String,
    pub text: String,
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Accept member ids encoded either as JSON numbers or numeric strings.
fn member_id<'de, D>(deserializer: D) -> Result<MemberId, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Number(MemberId),
        Text(String),
    }

    match RawId::deserialize(deserializer)? {
        RawId::Number(id) => Ok(id),
        RawId::Text(text) => text
            .parse()
            .map_err(|_| serde::de::Error::custom(format!("invalid member id '{text}'"))),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
