//! Repository for the `members` table.

use pioneer_core::types::MemberId;
use sqlx::PgPool;

use crate::models::member::Member;

/// Column list for `members` queries.
const COLUMNS: &str = "id, handle, created_at";

/// Provides access to forum members.
pub struct MemberRepo;

impl MemberRepo {
    /// Insert a member mirrored from the chain, returning the stored row.
    pub async fn create(pool: &PgPool, id: MemberId, handle: &str) -> Result<Member, sqlx::Error> {
        let query = format!(
            "INSERT INTO members (id, handle) \
             VALUES ($1, $2) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Member>(&query)
            .bind(id)
            .bind(handle)
            .fetch_one(pool)
            .await
    }

    /// Whether a member with `id` is stored.
    pub async fn exists(pool: &PgPool, id: MemberId) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM members WHERE id = $1)")
            .bind(id)
            .fetch_one(pool)
            .await
    }

    /// Ids of every known member, used to expand "all members" audiences.
    pub async fn list_ids(pool: &PgPool) -> Result<Vec<MemberId>, sqlx::Error> {
        sqlx::query_scalar("SELECT id FROM members ORDER BY id")
            .fetch_all(pool)
            .await
    }
}
