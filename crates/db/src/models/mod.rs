//! Row structs for the `members` and `subscriptions` tables.

pub mod member;
pub mod subscription;
