//! Query parameter types for API handlers.

use pioneer_core::error::CoreError;
use pioneer_core::notification_kinds::NotificationKind;
use pioneer_core::subscriptions::SubscriptionFilter;
use pioneer_core::types::DbId;
use serde::Deserialize;

/// Filters for `GET /subscriptions/general`
/// (`?id=&kind=&should_notify=&should_notify_by_email=`).
#[derive(Debug, Default, Deserialize)]
pub struct GeneralSubscriptionParams {
    pub id: Option<DbId>,
    pub kind: Option<String>,
    pub should_notify: Option<bool>,
    pub should_notify_by_email: Option<bool>,
}

impl GeneralSubscriptionParams {
    /// Validate into a store filter. A kind outside the general catalogue is
    /// rejected.
    pub fn to_filter(&self) -> Result<SubscriptionFilter, CoreError> {
        let kind = self
            .kind
            .as_deref()
            .map(NotificationKind::parse_general)
            .transpose()?;

        Ok(SubscriptionFilter {
            id: self.id,
            kind,
            should_notify: self.should_notify,
            should_notify_by_email: self.should_notify_by_email,
        })
    }
}
