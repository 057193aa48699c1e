//! Integration tests for the subscription repository and store.
//!
//! Exercises transactional application of reconciliation plans against a
//! real database:
//! - Create / update / delete in one call
//! - Filtering of listed rows
//! - Rollback when any operation fails
//! - Uniqueness of general rows per (member, kind)

use pioneer_core::notification_kinds::{NotificationKind, NotificationPolicy};
use pioneer_core::subscriptions::{plan_reconciliation, DesiredSubscription, SubscriptionFilter, SubscriptionOp};
use pioneer_db::repositories::{MemberRepo, SubscriptionRepo};
use pioneer_db::SubscriptionStore;
use sqlx::PgPool;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn create(kind: NotificationKind, notify: bool, email: bool) -> SubscriptionOp {
    SubscriptionOp::Create {
        kind,
        policy: NotificationPolicy::new(notify, email),
    }
}

async fn seed_member(pool: &PgPool, id: i64) {
    MemberRepo::create(pool, id, &format!("member{id}"))
        .await
        .expect("member creation should succeed");
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_apply_creates_rows(pool: PgPool) {
    seed_member(&pool, 1).await;

    let rows = pool
        .apply_subscription_ops(1, &[create(NotificationKind::ForumPostAll, false, true)])
        .await
        .unwrap();

    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].kind, NotificationKind::ForumPostAll);
    assert!(!rows[0].should_notify);
    assert!(rows[0].should_notify_by_email);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_apply_mixed_ops_returns_final_state(pool: PgPool) {
    seed_member(&pool, 1).await;
    let initial = pool
        .apply_subscription_ops(
            1,
            &[
                create(NotificationKind::ForumThreadCreator, false, false),
                create(NotificationKind::ForumPostMention, false, true),
            ],
        )
        .await
        .unwrap();
    let creator_id = initial[0].id;
    let mention_id = initial[1].id;

    let rows = pool
        .apply_subscription_ops(
            1,
            &[
                SubscriptionOp::Delete { id: creator_id },
                SubscriptionOp::Update {
                    id: mention_id,
                    policy: NotificationPolicy::new(true, false),
                },
                create(NotificationKind::ForumThreadAll, false, false),
            ],
        )
        .await
        .unwrap();

    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].id, mention_id);
    assert!(rows[0].should_notify);
    assert!(!rows[0].should_notify_by_email);
    assert_eq!(rows[1].kind, NotificationKind::ForumThreadAll);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_failed_op_rolls_back_everything(pool: PgPool) {
    seed_member(&pool, 1).await;
    let initial = pool
        .apply_subscription_ops(1, &[create(NotificationKind::ForumThreadCreator, false, false)])
        .await
        .unwrap();

    let result = pool
        .apply_subscription_ops(
            1,
            &[
                SubscriptionOp::Delete { id: initial[0].id },
                create(NotificationKind::ForumPostAll, false, false),
                SubscriptionOp::Update {
                    id: 999_999,
                    policy: NotificationPolicy::new(false, false),
                },
            ],
        )
        .await;

    assert!(matches!(result, Err(sqlx::Error::RowNotFound)));

    let rows = pool
        .general_subscriptions(1, &SubscriptionFilter::default())
        .await
        .unwrap();
    assert_eq!(rows, initial, "no partial writes may survive");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_duplicate_general_kind_violates_unique_index(pool: PgPool) {
    seed_member(&pool, 1).await;

    let result = pool
        .apply_subscription_ops(
            1,
            &[
                create(NotificationKind::ForumPostAll, false, false),
                create(NotificationKind::ForumPostAll, false, true),
            ],
        )
        .await;

    let err = result.expect_err("second create must hit the unique index");
    let db_err = err.as_database_error().expect("database error");
    assert_eq!(db_err.constraint(), Some("uq_subscriptions_member_kind"));

    let rows = pool
        .general_subscriptions(1, &SubscriptionFilter::default())
        .await
        .unwrap();
    assert!(rows.is_empty());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_update_cannot_touch_another_members_row(pool: PgPool) {
    seed_member(&pool, 1).await;
    seed_member(&pool, 2).await;
    let theirs = pool
        .apply_subscription_ops(2, &[create(NotificationKind::ForumPostAll, false, false)])
        .await
        .unwrap();

    let result = pool
        .apply_subscription_ops(
            1,
            &[SubscriptionOp::Update {
                id: theirs[0].id,
                policy: NotificationPolicy::new(true, false),
            }],
        )
        .await;
    assert!(result.is_err());

    let rows = pool
        .general_subscriptions(2, &SubscriptionFilter::default())
        .await
        .unwrap();
    assert_eq!(rows, theirs);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_list_general_filters(pool: PgPool) {
    seed_member(&pool, 1).await;
    pool.apply_subscription_ops(
        1,
        &[
            create(NotificationKind::ForumPostAll, false, true),
            create(NotificationKind::ForumThreadCreator, false, false),
            create(NotificationKind::ForumThreadAll, true, true),
        ],
    )
    .await
    .unwrap();

    let by_kind = SubscriptionFilter {
        kind: Some(NotificationKind::ForumThreadCreator),
        ..Default::default()
    };
    let rows = SubscriptionRepo::list_general(&pool, 1, &by_kind).await.unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].kind, "FORUM_THREAD_CREATOR");

    let by_email = SubscriptionFilter {
        should_notify_by_email: Some(true),
        ..Default::default()
    };
    let rows = SubscriptionRepo::list_general(&pool, 1, &by_email).await.unwrap();
    assert_eq!(rows.len(), 2);

    let by_both = SubscriptionFilter {
        should_notify: Some(false),
        should_notify_by_email: Some(false),
        ..Default::default()
    };
    let rows = SubscriptionRepo::list_general(&pool, 1, &by_both).await.unwrap();
    assert_eq!(rows.len(), 1);

    let by_id = SubscriptionFilter {
        id: Some(rows[0].id),
        ..Default::default()
    };
    let rows = SubscriptionRepo::list_general(&pool, 1, &by_id).await.unwrap();
    assert_eq!(rows.len(), 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_entity_rows_are_not_general_subscriptions(pool: PgPool) {
    seed_member(&pool, 1).await;
    sqlx::query(
        "INSERT INTO subscriptions (member_id, kind, entity_id, should_notify) \
         VALUES (1, 'FORUM_WATCHED_THREAD', '42', true)",
    )
    .execute(&pool)
    .await
    .unwrap();

    let rows = pool
        .general_subscriptions(1, &SubscriptionFilter::default())
        .await
        .unwrap();
    assert!(rows.is_empty());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_planned_reconciliation_round_trip(pool: PgPool) {
    seed_member(&pool, 1).await;
    let request = vec![
        DesiredSubscription {
            kind: NotificationKind::ForumPostAll,
            policy: NotificationPolicy::new(false, true),
        },
        DesiredSubscription {
            kind: NotificationKind::ForumThreadMention,
            policy: NotificationPolicy::new(true, true),
        },
    ];

    let current = pool
        .general_subscriptions(1, &SubscriptionFilter::default())
        .await
        .unwrap();
    let ops = plan_reconciliation(&request, &current);
    let after = pool.apply_subscription_ops(1, &ops).await.unwrap();

    assert_eq!(after.len(), 1);
    assert!(plan_reconciliation(&request, &after).is_empty());
}
