//! Mappers for forum events.

use std::collections::BTreeSet;

use pioneer_core::mentions::mentioned_member_ids;
use pioneer_core::notification_kinds::NotificationKind;
use pioneer_core::types::MemberId;

use crate::event::{PostAddedEvent, ThreadCreatedEvent};
use crate::notification::{PotentialNotification, Recipients};

/// A new post notifies mentioned members, the thread author, earlier
/// contributors, thread watchers, and everyone following all posts.
///
/// Always yields exactly five entries; empty audiences are kept so the
/// shape of the output does not depend on the post.
pub fn from_post_added(event: &PostAddedEvent) -> Vec<PotentialNotification> {
    let post = &event.post;

    let mentioned = mentioned_member_ids(&post.text);

    let earlier_authors: BTreeSet<MemberId> = post
        .thread
        .posts
        .iter()
        .filter(|earlier| earlier.created_at < post.created_at)
        .map(|earlier| earlier.author_id)
        .filter(|author| *author != post.author_id)
        .collect();

    vec![
        PotentialNotification::general(
            NotificationKind::ForumPostMention,
            Recipients::Members(mentioned),
        ),
        PotentialNotification::general(
            NotificationKind::ForumThreadCreator,
            Recipients::members([post.thread.author_id]),
        ),
        PotentialNotification::general(
            NotificationKind::ForumThreadContributor,
            Recipients::Members(earlier_authors),
        ),
        PotentialNotification::entity(
            NotificationKind::ForumWatchedThread,
            post.thread.id.as_str(),
        ),
        PotentialNotification::general(NotificationKind::ForumPostAll, Recipients::AllMembers),
    ]
}

/// A new thread notifies members mentioned in its opening post, watchers of
/// its category and of every ancestor category, and everyone following all
/// threads.
pub fn from_thread_created(event: &ThreadCreatedEvent) -> Vec<PotentialNotification> {
    let thread = &event.thread;

    let mentioned = thread
        .initial_post
        .as_ref()
        .map(|post| mentioned_member_ids(&post.text))
        .unwrap_or_default();

    let mut notifications = vec![PotentialNotification::general(
        NotificationKind::ForumThreadMention,
        Recipients::Members(mentioned),
    )];

    notifications.extend(
        std::iter::once(&thread.category.id)
            .chain(&thread.category.ancestor_ids)
            .map(|category_id| {
                PotentialNotification::entity(
                    NotificationKind::ForumWatchedCategory,
                    category_id.as_str(),
                )
            }),
    );

    notifications.push(PotentialNotification::general(
        NotificationKind::ForumThreadAll,
        Recipients::AllMembers,
    ));

    notifications
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
