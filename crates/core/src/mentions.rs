//! Member mention extraction from forum post markup.
//!
//! The UI serialises a mention as a Markdown link pointing at a fragment:
//! `[@alice](#mention?member-id=42)`. Anything that does not match this shape
//! exactly is plain text.

use std::collections::BTreeSet;
use std::sync::LazyLock;

use regex::Regex;

use crate::types::MemberId;

/// Handle in brackets, member id in the fragment query.
const MENTION_PATTERN: &str = r"\[@\w+\]\(#mention\?member-id=(\d+)\)";

static MENTION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(MENTION_PATTERN).expect("valid regex"));

/// Extract the set of member ids mentioned in `text`.
///
/// Repeated mentions of the same member collapse to one entry. Ids that do
/// not fit a [`MemberId`] are treated as plain text.
pub fn mentioned_member_ids(text: &str) -> BTreeSet<MemberId> {
    MENTION_RE
        .captures_iter(text)
        .filter_map(|caps| caps.get(1)?.as_str().parse().ok())
        .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
