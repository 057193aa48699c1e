//! GraphQL client for the chain indexer's event feed.

use serde::Deserialize;

/// Number of events requested per page.
pub const DEFAULT_PAGE_SIZE: u32 = 100;

/// Event feed query. Every implemented event kind needs a fragment here,
/// otherwise the indexer returns it without the fields the mapper decodes.
///
/// Pages are keyed on `(inBlock, id)` so a block split across two pages is
/// resumed from the last event seen, not from the next block.
pub const EVENTS_QUERY: &str = r#"
query GetNotificationEvents($fromBlock: Int!, $fromId: String!, $limit: Int!) {
  events(
    where: { OR: [{ inBlock_gt: $fromBlock }, { inBlock_eq: $fromBlock, id_gt: $fromId }] }
    orderBy: [inBlock_ASC, id_ASC]
    limit: $limit
  ) {
    __typename
    id
    inBlock
    createdAt
    ... on PostAddedEvent {
      post {
        id
        authorId
        text
        createdAt
        thread {
          id
          authorId
          posts { id authorId createdAt }
        }
      }
    }
    ... on ThreadCreatedEvent {
      thread {
        id
        authorId
        title
        category { id ancestorIds }
        initialPost { id text }
      }
    }
  }
}
"#;

// ---------------------------------------------------------------------------
// Cursor
// ---------------------------------------------------------------------------

/// Position in the event feed: the last `(inBlock, id)` processed.
///
/// Ordering is the feed order, block first and then id.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct FeedCursor {
    pub block: i64,
    pub id: String,
}

impl FeedCursor {
    /// Cursor placed before every event of `block`.
    pub fn start_of(block: i64) -> Self {
        Self {
            block,
            id: String::new(),
        }
    }

    /// Cursor of a raw feed record, when it carries both keys.
    pub fn of_record(raw: &serde_json::Value) -> Option<Self> {
        Some(Self {
            block: raw.get("inBlock")?.as_i64()?,
            id: raw.get("id")?.as_str()?.to_string(),
        })
    }

    fn variables(&self, limit: u32) -> serde_json::Value {
        serde_json::json!({
            "fromBlock": self.block,
            "fromId": self.id,
            "limit": limit,
        })
    }
}

// ---------------------------------------------------------------------------
// Client
// ---------------------------------------------------------------------------

/// Errors from talking to the indexer.
#[derive(Debug, thiserror::Error)]
pub enum IndexerError {
    /// The HTTP request itself failed (network, DNS, TLS, status, decode).
    #[error("Indexer request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The indexer answered with GraphQL errors or without data.
    #[error("Indexer query failed: {0}")]
    GraphQl(String),
}

#[derive(Debug, Deserialize)]
struct GraphQlResponse {
    data: Option<EventsData>,
    #[serde(default)]
    errors: Vec<GraphQlError>,
}

#[derive(Debug, Deserialize)]
struct EventsData {
    events: Vec<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct GraphQlError {
    message: String,
}

/// HTTP client for a single indexer endpoint.
pub struct IndexerClient {
    client: reqwest::Client,
    url: String,
}

impl IndexerClient {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            url: url.into(),
        }
    }

    /// Fetch up to `limit` raw events that come after `cursor` in feed
    /// order, oldest first.
    ///
    /// Records are returned undecoded so that an event the mapper cannot
    /// handle fails on its own instead of failing the whole batch.
    pub async fn events_after(
        &self,
        cursor: &FeedCursor,
        limit: u32,
    ) -> Result<Vec<serde_json::Value>, IndexerError> {
        let body = serde_json::json!({
            "query": EVENTS_QUERY,
            "variables": cursor.variables(limit),
        });

        let response: GraphQlResponse = self
            .client
            .post(&self.url)
            .json(&body)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        extract_events(response)
    }
}

fn extract_events(response: GraphQlResponse) -> Result<Vec<serde_json::Value>, IndexerError> {
    if !response.errors.is_empty() {
        let messages: Vec<_> = response.errors.into_iter().map(|e| e.message).collect();
        return Err(IndexerError::GraphQl(messages.join("; ")));
    }

    response
        .data
        .map(|data| data.events)
        .ok_or_else(|| IndexerError::GraphQl("response has no data".to_string()))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
