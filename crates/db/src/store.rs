//! Storage seam for general subscriptions.
//!
//! Request handling talks to [`SubscriptionStore`] rather than to
//! [`SubscriptionRepo`] directly, so the query and mutation flows can be
//! exercised against an in-memory store in tests.

use std::future::Future;

use pioneer_core::subscriptions::{GeneralSubscription, SubscriptionFilter, SubscriptionOp};
use pioneer_core::types::MemberId;

use crate::models::subscription::Subscription;
use crate::repositories::SubscriptionRepo;
use crate::DbPool;

/// Read and atomically rewrite a member's general subscriptions.
pub trait SubscriptionStore: Send + Sync {
    /// List the member's general subscriptions matching `filter`.
    fn general_subscriptions(
        &self,
        member_id: MemberId,
        filter: &SubscriptionFilter,
    ) -> impl Future<Output = Result<Vec<GeneralSubscription>, sqlx::Error>> + Send;

    /// Apply every op in one all-or-nothing unit and return the member's
    /// general subscriptions afterwards.
    fn apply_subscription_ops(
        &self,
        member_id: MemberId,
        ops: &[SubscriptionOp],
    ) -> impl Future<Output = Result<Vec<GeneralSubscription>, sqlx::Error>> + Send;
}

impl SubscriptionStore for DbPool {
    async fn general_subscriptions(
        &self,
        member_id: MemberId,
        filter: &SubscriptionFilter,
    ) -> Result<Vec<GeneralSubscription>, sqlx::Error> {
        SubscriptionRepo::list_general(self, member_id, filter)
            .await?
            .into_iter()
            .map(Subscription::into_general)
            .collect()
    }

    async fn apply_subscription_ops(
        &self,
        member_id: MemberId,
        ops: &[SubscriptionOp],
    ) -> Result<Vec<GeneralSubscription>, sqlx::Error> {
        SubscriptionRepo::apply_ops(self, member_id, ops)
            .await?
            .into_iter()
            .map(Subscription::into_general)
            .collect()
    }
}
