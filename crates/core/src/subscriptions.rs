//! General subscription reconciliation.
//!
//! A member's general subscriptions are stored sparsely: a row exists only
//! for a kind whose policy differs from that kind's default. Given the state
//! a client asks for, [`plan_reconciliation`] computes the minimal list of
//! [`SubscriptionOp`]s that brings the stored rows in line. The caller applies
//! the whole list as one transaction.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::notification_kinds::{NotificationKind, NotificationPolicy, GENERAL_KINDS};
use crate::types::DbId;

// ---------------------------------------------------------------------------
// Stored and requested state
// ---------------------------------------------------------------------------

/// A persisted general subscription as exposed to clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GeneralSubscription {
    pub id: DbId,
    pub kind: NotificationKind,
    pub should_notify: bool,
    pub should_notify_by_email: bool,
}

impl GeneralSubscription {
    pub fn policy(&self) -> NotificationPolicy {
        NotificationPolicy::new(self.should_notify, self.should_notify_by_email)
    }
}

/// One entry of a client's desired state, as received on the wire.
#[derive(Debug, Clone, Deserialize)]
pub struct GeneralSubscriptionInput {
    pub kind: String,
    pub should_notify: Option<bool>,
    pub should_notify_by_email: Option<bool>,
}

/// A validated desired entry with missing switches defaulted to `true`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DesiredSubscription {
    pub kind: NotificationKind,
    pub policy: NotificationPolicy,
}

impl GeneralSubscriptionInput {
    pub fn validate(&self) -> Result<DesiredSubscription, CoreError> {
        Ok(DesiredSubscription {
            kind: NotificationKind::parse_general(&self.kind)?,
            policy: NotificationPolicy::new(
                self.should_notify.unwrap_or(true),
                self.should_notify_by_email.unwrap_or(true),
            ),
        })
    }
}

/// Validate a whole request. The first invalid kind rejects everything.
pub fn validate_inputs(
    inputs: &[GeneralSubscriptionInput],
) -> Result<Vec<DesiredSubscription>, CoreError> {
    inputs.iter().map(GeneralSubscriptionInput::validate).collect()
}

/// Optional filters for listing a member's general subscriptions.
#[derive(Debug, Clone, Default)]
pub struct SubscriptionFilter {
    pub id: Option<DbId>,
    pub kind: Option<NotificationKind>,
    pub should_notify: Option<bool>,
    pub should_notify_by_email: Option<bool>,
}

// ---------------------------------------------------------------------------
// Current preference lookup
// ---------------------------------------------------------------------------

/// Where a member's effective policy for one kind comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CurrentPreference {
    ExplicitRow { id: DbId, policy: NotificationPolicy },
    ImplicitDefault(NotificationPolicy),
}

impl CurrentPreference {
    pub fn policy(&self) -> NotificationPolicy {
        match self {
            Self::ExplicitRow { policy, .. } | Self::ImplicitDefault(policy) => *policy,
        }
    }
}

/// Resolve the effective preference of every general kind.
///
/// If storage somehow holds several rows for one kind, the first one wins;
/// the others are not referenced here and get deleted by the reconciler.
pub fn current_preferences(
    current: &[GeneralSubscription],
) -> BTreeMap<NotificationKind, CurrentPreference> {
    GENERAL_KINDS
        .iter()
        .map(|kind| {
            let preference = match current.iter().find(|row| row.kind == *kind) {
                Some(row) => CurrentPreference::ExplicitRow {
                    id: row.id,
                    policy: row.policy(),
                },
                None => CurrentPreference::ImplicitDefault(kind.default_policy()),
            };
            (*kind, preference)
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Reconciliation plan
// ---------------------------------------------------------------------------

/// A single write against the subscription store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubscriptionOp {
    Create {
        kind: NotificationKind,
        policy: NotificationPolicy,
    },
    Update {
        id: DbId,
        policy: NotificationPolicy,
    },
    Delete {
        id: DbId,
    },
}

/// Compute the writes needed to move `current` to `desired`.
///
/// Kinds absent from `desired` fall back to their default, so their rows are
/// deleted. When a kind appears more than once, the last entry wins. Deletes
/// come first in the returned list, followed by updates and creates in kind
/// order. An empty list means storage already matches.
pub fn plan_reconciliation(
    desired: &[DesiredSubscription],
    current: &[GeneralSubscription],
) -> Vec<SubscriptionOp> {
    let mut requested: BTreeMap<NotificationKind, NotificationPolicy> = BTreeMap::new();
    for entry in desired {
        requested.insert(entry.kind, entry.policy);
    }

    let changes: BTreeMap<NotificationKind, NotificationPolicy> = requested
        .into_iter()
        .filter(|(kind, policy)| *policy != kind.default_policy())
        .collect();

    let preferences = current_preferences(current);

    let kept_rows: BTreeSet<DbId> = changes
        .keys()
        .filter_map(|kind| match preferences.get(kind) {
            Some(CurrentPreference::ExplicitRow { id, .. }) => Some(*id),
            _ => None,
        })
        .collect();

    let mut ops: Vec<SubscriptionOp> = current
        .iter()
        .filter(|row| !kept_rows.contains(&row.id))
        .map(|row| SubscriptionOp::Delete { id: row.id })
        .collect();

    for (kind, policy) in changes {
        match preferences.get(&kind) {
            Some(CurrentPreference::ExplicitRow { id, policy: stored }) => {
                if *stored != policy {
                    ops.push(SubscriptionOp::Update { id: *id, policy });
                }
            }
            Some(CurrentPreference::ImplicitDefault(_)) | None => {
                ops.push(SubscriptionOp::Create { kind, policy });
            }
        }
    }

    ops
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    fn row(id: DbId, kind: NotificationKind, notify: bool, email: bool) -> GeneralSubscription {
        GeneralSubscription {
            id,
            kind,
            should_notify: notify,
            should_notify_by_email: email,
        }
    }

    fn desired(kind: NotificationKind, notify: bool, email: bool) -> DesiredSubscription {
        DesiredSubscription {
            kind,
            policy: NotificationPolicy::new(notify, email),
        }
    }

    fn input(kind: &str, notify: Option<bool>, email: Option<bool>) -> GeneralSubscriptionInput {
        GeneralSubscriptionInput {
            kind: kind.to_string(),
            should_notify: notify,
            should_notify_by_email: email,
        }
    }

    /// Apply ops to an in-memory row set the way the database store does.
    fn apply(current: &[GeneralSubscription], ops: &[SubscriptionOp]) -> Vec<GeneralSubscription> {
        let mut rows = current.to_vec();
        let mut next_id = rows.iter().map(|r| r.id).max().unwrap_or(0) + 1;
        for op in ops {
            match *op {
                SubscriptionOp::Delete { id } => rows.retain(|r| r.id != id),
                SubscriptionOp::Update { id, policy } => {
                    let r = rows.iter_mut().find(|r| r.id == id).unwrap();
                    r.should_notify = policy.should_notify;
                    r.should_notify_by_email = policy.should_notify_by_email;
                }
                SubscriptionOp::Create { kind, policy } => {
                    rows.push(row(next_id, kind, policy.should_notify, policy.should_notify_by_email));
                    next_id += 1;
                }
            }
        }
        rows
    }

    // -- validation ----------------------------------------------------------

    #[test]
    fn missing_switches_default_to_true() {
        let d = input("FORUM_POST_ALL", Some(false), None).validate().unwrap();
        assert_eq!(d.kind, NotificationKind::ForumPostAll);
        assert_eq!(d.policy, NotificationPolicy::new(false, true));
    }

    #[test]
    fn invalid_kind_rejects_whole_request() {
        let inputs = vec![
            input("FORUM_POST_ALL", Some(false), None),
            input("NOT_A_KIND", None, None),
        ];
        assert_matches!(
            validate_inputs(&inputs),
            Err(CoreError::InvalidSubscriptionKind(k)) if k == "NOT_A_KIND"
        );
    }

    #[test]
    fn entity_kind_is_rejected_as_general_input() {
        assert!(validate_inputs(&[input("FORUM_WATCHED_THREAD", None, None)]).is_err());
    }

    // -- current preferences -------------------------------------------------

    #[test]
    fn preferences_cover_every_general_kind() {
        let current = vec![row(3, NotificationKind::ForumThreadCreator, false, false)];
        let prefs = current_preferences(&current);

        assert_eq!(prefs.len(), GENERAL_KINDS.len());
        assert_eq!(
            prefs[&NotificationKind::ForumThreadCreator],
            CurrentPreference::ExplicitRow {
                id: 3,
                policy: NotificationPolicy::new(false, false)
            }
        );
        assert_eq!(
            prefs[&NotificationKind::ForumThreadAll],
            CurrentPreference::ImplicitDefault(NotificationPolicy::new(true, true))
        );
    }

    // -- planning ------------------------------------------------------------

    #[test]
    fn creates_row_for_non_default_request() {
        let ops = plan_reconciliation(&[desired(NotificationKind::ForumPostAll, false, true)], &[]);
        assert_eq!(
            ops,
            vec![SubscriptionOp::Create {
                kind: NotificationKind::ForumPostAll,
                policy: NotificationPolicy::new(false, true),
            }]
        );
    }

    #[test]
    fn omitted_kind_row_is_deleted() {
        let current = vec![row(9, NotificationKind::ForumThreadCreator, false, false)];
        let ops = plan_reconciliation(&[], &current);
        assert_eq!(ops, vec![SubscriptionOp::Delete { id: 9 }]);
    }

    #[test]
    fn request_equal_to_default_deletes_row() {
        let current = vec![row(4, NotificationKind::ForumThreadAll, false, false)];
        let ops = plan_reconciliation(&[desired(NotificationKind::ForumThreadAll, true, true)], &current);
        assert_eq!(ops, vec![SubscriptionOp::Delete { id: 4 }]);
    }

    #[test]
    fn differing_values_update_existing_row() {
        let current = vec![row(2, NotificationKind::ForumPostMention, false, false)];
        let ops =
            plan_reconciliation(&[desired(NotificationKind::ForumPostMention, true, false)], &current);
        assert_eq!(
            ops,
            vec![SubscriptionOp::Update {
                id: 2,
                policy: NotificationPolicy::new(true, false),
            }]
        );
    }

    #[test]
    fn identical_values_produce_no_write() {
        let current = vec![row(2, NotificationKind::ForumPostMention, false, false)];
        let ops =
            plan_reconciliation(&[desired(NotificationKind::ForumPostMention, false, false)], &current);
        assert!(ops.is_empty());
    }

    #[test]
    fn last_entry_for_a_kind_wins() {
        let ops = plan_reconciliation(
            &[
                desired(NotificationKind::ForumPostAll, false, false),
                desired(NotificationKind::ForumPostAll, true, true),
            ],
            &[],
        );
        assert!(ops.is_empty(), "final request equals the default");

        let ops = plan_reconciliation(
            &[
                desired(NotificationKind::ForumPostAll, true, true),
                desired(NotificationKind::ForumPostAll, false, true),
            ],
            &[],
        );
        assert_eq!(ops.len(), 1);
    }

    #[test]
    fn duplicate_stored_rows_collapse_to_one() {
        let current = vec![
            row(1, NotificationKind::ForumPostAll, false, true),
            row(2, NotificationKind::ForumPostAll, false, false),
        ];
        let ops = plan_reconciliation(&[desired(NotificationKind::ForumPostAll, false, true)], &current);
        assert_eq!(ops, vec![SubscriptionOp::Delete { id: 2 }]);
    }

    #[test]
    fn deletes_are_ordered_before_other_writes() {
        let current = vec![row(5, NotificationKind::ForumThreadMention, false, true)];
        let ops = plan_reconciliation(&[desired(NotificationKind::ForumPostAll, false, false)], &current);
        assert_matches!(ops.as_slice(), [SubscriptionOp::Delete { id: 5 }, SubscriptionOp::Create { .. }]);
    }

    #[test]
    fn reconciliation_is_idempotent() {
        let current = vec![
            row(1, NotificationKind::ForumThreadCreator, false, false),
            row(2, NotificationKind::ForumPostMention, true, false),
        ];
        let request = vec![
            desired(NotificationKind::ForumPostMention, false, false),
            desired(NotificationKind::ForumPostAll, false, true),
            desired(NotificationKind::ForumThreadAll, true, true),
        ];

        let first = plan_reconciliation(&request, &current);
        let after_first = apply(&current, &first);
        let second = plan_reconciliation(&request, &after_first);

        assert!(!first.is_empty());
        assert!(second.is_empty(), "second run must not write: {second:?}");
    }

    #[test]
    fn stored_rows_are_exactly_the_non_default_kinds() {
        let policies = [
            NotificationPolicy::new(true, true),
            NotificationPolicy::new(true, false),
            NotificationPolicy::new(false, true),
            NotificationPolicy::new(false, false),
        ];
        let starting_points = vec![
            vec![],
            vec![row(10, NotificationKind::ForumThreadAll, false, false)],
            vec![
                row(11, NotificationKind::ForumPostAll, false, true),
                row(12, NotificationKind::ForumPostMention, true, true),
            ],
        ];

        for kind in GENERAL_KINDS {
            for policy in policies {
                for current in &starting_points {
                    let request = vec![DesiredSubscription { kind: *kind, policy }];
                    let rows = apply(current, &plan_reconciliation(&request, current));

                    for r in &rows {
                        assert_ne!(r.policy(), r.kind.default_policy(), "default-equal row kept");
                    }
                    let kinds: BTreeSet<_> = rows.iter().map(|r| r.kind).collect();
                    assert_eq!(kinds.len(), rows.len(), "duplicate rows for a kind");

                    if policy == kind.default_policy() {
                        assert!(rows.is_empty());
                    } else {
                        assert_eq!(rows.len(), 1);
                        assert_eq!(rows[0].kind, *kind);
                        assert_eq!(rows[0].policy(), policy);
                    }
                }
            }
        }
    }
}
