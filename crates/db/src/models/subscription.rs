//! Subscription entity model.

use pioneer_core::notification_kinds::NotificationKind;
use pioneer_core::subscriptions::GeneralSubscription;
use pioneer_core::types::{DbId, MemberId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `subscriptions` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Subscription {
    pub id: DbId,
    pub member_id: MemberId,
    pub kind: String,
    pub entity_id: Option<String>,
    pub should_notify: bool,
    pub should_notify_by_email: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Subscription {
    /// Convert a general-kind row into its domain form.
    ///
    /// Fails with [`sqlx::Error::Decode`] when the stored kind is not part of
    /// the general catalogue.
    pub fn into_general(self) -> Result<GeneralSubscription, sqlx::Error> {
        let kind = NotificationKind::parse_general(&self.kind)
            .map_err(|e| sqlx::Error::Decode(Box::new(e)))?;
        Ok(GeneralSubscription {
            id: self.id,
            kind,
            should_notify: self.should_notify,
            should_notify_by_email: self.should_notify_by_email,
        })
    }
}
