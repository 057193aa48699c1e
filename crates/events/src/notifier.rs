//! Background loop that polls the indexer and publishes notification events.
//!
//! Each tick pages through the events indexed after the last processed
//! `(inBlock, id)`, maps them, and publishes the results on the [`EventBus`]. Events that cannot be
//! mapped are logged at error level and skipped; they never stall the feed.

use std::sync::Arc;
use std::time::Duration;

use pioneer_db::repositories::MemberRepo;
use pioneer_db::DbPool;
use tokio_util::sync::CancellationToken;

use crate::bus::EventBus;
use crate::indexer::{FeedCursor, IndexerClient, IndexerError, DEFAULT_PAGE_SIZE};
use crate::mapper::to_notification_event;
use crate::notification::{MapContext, PotentialNotification};

/// Default poll interval in seconds.
const DEFAULT_POLL_INTERVAL_SECS: u64 = 60;

// ---------------------------------------------------------------------------
// Config
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct NotifierConfig {
    pub indexer_url: String,
    pub poll_interval: Duration,
    /// Events in earlier blocks are never fetched.
    pub start_block: i64,
    pub page_size: u32,
}

impl NotifierConfig {
    /// Load from environment variables.
    ///
    /// Returns `None` when `INDEXER_URL` is not set, which disables the
    /// notifier.
    ///
    /// | Env var                        | Default |
    /// |--------------------------------|---------|
    /// | `INDEXER_URL`                  | (none)  |
    /// | `NOTIFIER_POLL_INTERVAL_SECS`  | `60`    |
    /// | `NOTIFIER_START_BLOCK`         | `0`     |
    /// | `NOTIFIER_PAGE_SIZE`           | `100`   |
    pub fn from_env() -> Option<Self> {
        let indexer_url = std::env::var("INDEXER_URL").ok().filter(|s| !s.is_empty())?;

        let poll_interval_secs: u64 = std::env::var("NOTIFIER_POLL_INTERVAL_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_POLL_INTERVAL_SECS);

        let start_block: i64 = std::env::var("NOTIFIER_START_BLOCK")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(0);

        let page_size: u32 = std::env::var("NOTIFIER_PAGE_SIZE")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_PAGE_SIZE);

        Some(Self {
            indexer_url,
            poll_interval: Duration::from_secs(poll_interval_secs.max(1)),
            start_block,
            page_size: page_size.max(1),
        })
    }
}

// ---------------------------------------------------------------------------
// Notifier
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
enum TickError {
    #[error(transparent)]
    Indexer(#[from] IndexerError),

    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

pub struct Notifier {
    pool: DbPool,
    client: IndexerClient,
    bus: Arc<EventBus>,
    poll_interval: Duration,
    page_size: u32,
    cursor: FeedCursor,
}

impl Notifier {
    pub fn new(pool: DbPool, bus: Arc<EventBus>, config: NotifierConfig) -> Self {
        Self {
            pool,
            client: IndexerClient::new(config.indexer_url),
            bus,
            poll_interval: config.poll_interval,
            page_size: config.page_size,
            cursor: FeedCursor::start_of(config.start_block),
        }
    }

    /// Run until `cancel` is triggered.
    pub async fn run(mut self, cancel: CancellationToken) {
        tracing::info!(
            interval_secs = self.poll_interval.as_secs(),
            start_block = self.cursor.block,
            page_size = self.page_size,
            "Notifier started"
        );

        let mut interval = tokio::time::interval(self.poll_interval);

        loop {
            tokio::select! {
                _ = cancel.cancelled() => {
                    tracing::info!(block = self.cursor.block, event_id = %self.cursor.id, "Notifier stopping");
                    break;
                }
                _ = interval.tick() => {
                    if let Err(e) = self.tick().await {
                        tracing::error!(
                            error = %e,
                            block = self.cursor.block,
                            event_id = %self.cursor.id,
                            "Notifier: poll failed"
                        );
                    }
                }
            }
        }
    }

    /// Drain every page available after the cursor. A page shorter than
    /// `page_size` ends the tick.
    async fn tick(&mut self) -> Result<(), TickError> {
        let mut page = self.client.events_after(&self.cursor, self.page_size).await?;
        if page.is_empty() {
            tracing::debug!(block = self.cursor.block, "Notifier: no new events");
            return Ok(());
        }

        let context = MapContext::new(MemberRepo::list_ids(&self.pool).await?);

        loop {
            let full_page = page.len() >= self.page_size as usize;
            match process_batch(&page, &self.bus, &context) {
                Some(last) if last > self.cursor => self.cursor = last,
                // No record carried a usable key; stop rather than refetch it.
                _ => return Ok(()),
            }
            if !full_page {
                return Ok(());
            }

            page = self.client.events_after(&self.cursor, self.page_size).await?;
            if page.is_empty() {
                return Ok(());
            }
        }
    }
}

/// Map and publish a batch of raw events. Returns the cursor of the last
/// event in feed order, counting events that failed to map.
fn process_batch(
    raw_events: &[serde_json::Value],
    bus: &EventBus,
    context: &MapContext,
) -> Option<FeedCursor> {
    let mut last = None;

    for raw in raw_events {
        last = last.max(FeedCursor::of_record(raw));

        match to_notification_event(raw) {
            Ok(event) => {
                let audience: usize = event
                    .potential_notifications
                    .iter()
                    .map(|n| match n {
                        PotentialNotification::General { recipients, .. } => {
                            recipients.resolve(context).len()
                        }
                        PotentialNotification::Entity { .. } => 0,
                    })
                    .sum();
                tracing::debug!(
                    event_id = %event.event_id,
                    event_kind = %event.event_kind,
                    in_block = event.in_block,
                    audience,
                    "Notifier: publishing notification event"
                );
                bus.publish(event);
            }
            Err(e) => {
                let event_id = raw.get("id").and_then(serde_json::Value::as_str).unwrap_or("?");
                tracing::error!(error = %e, event_id, "Notifier: failed to map event");
            }
        }
    }

    last
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
