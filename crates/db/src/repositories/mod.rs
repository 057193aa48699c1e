//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async methods that take
//! a pool (or, for composable reads, any Postgres executor) as the first
//! argument.

pub mod member_repo;
pub mod subscription_repo;

pub use member_repo::MemberRepo;
pub use subscription_repo::SubscriptionRepo;
