//! General subscription query and reconciliation flows.
//!
//! Both flows are generic over [`SubscriptionStore`] so they can run against
//! the database pool in production and a counting in-memory store in tests.
//! Input is validated before the member check, and neither an invalid
//! request nor a missing member ever reaches the store.

use pioneer_core::subscriptions::{
    plan_reconciliation, validate_inputs, GeneralSubscription, GeneralSubscriptionInput,
    SubscriptionFilter,
};
use pioneer_core::types::MemberId;
use pioneer_db::SubscriptionStore;

use crate::error::AppResult;
use crate::query::GeneralSubscriptionParams;

/// List the member's general subscriptions matching `params`.
///
/// Returns `Ok(None)` when there is no authenticated member.
pub async fn query_general_subscriptions<S: SubscriptionStore>(
    store: &S,
    member_id: Option<MemberId>,
    params: &GeneralSubscriptionParams,
) -> AppResult<Option<Vec<GeneralSubscription>>> {
    let filter = params.to_filter()?;
    let Some(member_id) = member_id else {
        return Ok(None);
    };

    let rows = store.general_subscriptions(member_id, &filter).await?;
    Ok(Some(rows))
}

/// Make the member's stored general subscriptions match `inputs` and return
/// the rows afterwards.
///
/// Returns `Ok(None)` when there is no authenticated member. When storage
/// already matches, nothing is written.
pub async fn update_general_subscriptions<S: SubscriptionStore>(
    store: &S,
    member_id: Option<MemberId>,
    inputs: &[GeneralSubscriptionInput],
) -> AppResult<Option<Vec<GeneralSubscription>>> {
    let desired = validate_inputs(inputs)?;
    let Some(member_id) = member_id else {
        return Ok(None);
    };

    let current = store
        .general_subscriptions(member_id, &SubscriptionFilter::default())
        .await?;

    let ops = plan_reconciliation(&desired, &current);
    if ops.is_empty() {
        tracing::debug!(member_id, "General subscriptions already up to date");
        return Ok(Some(current));
    }

    let rows = store.apply_subscription_ops(member_id, &ops).await?;
    tracing::info!(
        member_id,
        ops = ops.len(),
        rows = rows.len(),
        "General subscriptions reconciled"
    );
    Ok(Some(rows))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
