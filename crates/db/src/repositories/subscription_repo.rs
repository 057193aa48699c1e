//! Repository for the `subscriptions` table.

use pioneer_core::notification_kinds::GENERAL_KINDS;
use pioneer_core::subscriptions::{SubscriptionFilter, SubscriptionOp};
use pioneer_core::types::{DbId, MemberId};
use sqlx::postgres::PgExecutor;
use sqlx::PgPool;

use crate::models::subscription::Subscription;

/// Column list for `subscriptions` queries.
const COLUMNS: &str = "id, member_id, kind, entity_id, should_notify, should_notify_by_email, \
    created_at, updated_at";

/// Provides access to general (non-entity) subscriptions.
pub struct SubscriptionRepo;

impl SubscriptionRepo {
    /// List a member's general subscriptions, narrowed by `filter`.
    ///
    /// Only rows whose kind belongs to the general catalogue are returned,
    /// ordered by id.
    pub async fn list_general<'e>(
        executor: impl PgExecutor<'e>,
        member_id: MemberId,
        filter: &SubscriptionFilter,
    ) -> Result<Vec<Subscription>, sqlx::Error> {
        let kinds: Vec<String> = match filter.kind {
            Some(kind) => vec![kind.as_str().to_string()],
            None => GENERAL_KINDS.iter().map(|k| k.as_str().to_string()).collect(),
        };
        let query = format!(
            "SELECT {COLUMNS} FROM subscriptions \
             WHERE member_id = $1 \
               AND entity_id IS NULL \
               AND kind = ANY($2) \
               AND ($3::BIGINT IS NULL OR id = $3) \
               AND ($4::BOOLEAN IS NULL OR should_notify = $4) \
               AND ($5::BOOLEAN IS NULL OR should_notify_by_email = $5) \
             ORDER BY id"
        );
        sqlx::query_as::<_, Subscription>(&query)
            .bind(member_id)
            .bind(kinds)
            .bind(filter.id)
            .bind(filter.should_notify)
            .bind(filter.should_notify_by_email)
            .fetch_all(executor)
            .await
    }

    /// Apply a reconciliation plan for one member in a single transaction.
    ///
    /// Deletes run first as one statement, then creates and updates in plan
    /// order. An update that matches no row of this member aborts the whole
    /// transaction with [`sqlx::Error::RowNotFound`]. Returns the member's
    /// general rows as they stand after the commit.
    pub async fn apply_ops(
        pool: &PgPool,
        member_id: MemberId,
        ops: &[SubscriptionOp],
    ) -> Result<Vec<Subscription>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let delete_ids: Vec<DbId> = ops
            .iter()
            .filter_map(|op| match op {
                SubscriptionOp::Delete { id } => Some(*id),
                _ => None,
            })
            .collect();

        if !delete_ids.is_empty() {
            sqlx::query("DELETE FROM subscriptions WHERE member_id = $1 AND id = ANY($2)")
                .bind(member_id)
                .bind(&delete_ids)
                .execute(&mut *tx)
                .await?;
        }

        for op in ops {
            match op {
                SubscriptionOp::Create { kind, policy } => {
                    sqlx::query(
                        "INSERT INTO subscriptions \
                            (member_id, kind, should_notify, should_notify_by_email) \
                         VALUES ($1, $2, $3, $4)",
                    )
                    .bind(member_id)
                    .bind(kind.as_str())
                    .bind(policy.should_notify)
                    .bind(policy.should_notify_by_email)
                    .execute(&mut *tx)
                    .await?;
                }
                SubscriptionOp::Update { id, policy } => {
                    let result = sqlx::query(
                        "UPDATE subscriptions \
                         SET should_notify = $3, should_notify_by_email = $4, updated_at = NOW() \
                         WHERE id = $1 AND member_id = $2",
                    )
                    .bind(id)
                    .bind(member_id)
                    .bind(policy.should_notify)
                    .bind(policy.should_notify_by_email)
                    .execute(&mut *tx)
                    .await?;

                    if result.rows_affected() == 0 {
                        return Err(sqlx::Error::RowNotFound);
                    }
                }
                SubscriptionOp::Delete { .. } => {}
            }
        }

        let rows = Self::list_general(&mut *tx, member_id, &SubscriptionFilter::default()).await?;
        tx.commit().await?;

        tracing::debug!(
            member_id,
            deleted = delete_ids.len(),
            written = ops.len() - delete_ids.len(),
            "Applied subscription changes"
        );

        Ok(rows)
    }
}
