use pioneer_core::types::{MemberId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `members` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Member {
    pub id: MemberId,
    pub handle: String,
    pub created_at: Timestamp,
}
