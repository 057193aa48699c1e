//! Request extractors.
//!
//! - [`auth::OptionalMember`] -- the member behind a Bearer token, if any.

pub mod auth;
