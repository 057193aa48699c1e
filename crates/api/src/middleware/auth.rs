//! JWT-based member extractor for Axum handlers.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use pioneer_core::types::MemberId;
use pioneer_db::repositories::MemberRepo;

use crate::auth::jwt::validate_token;
use crate::error::AppError;
use crate::state::AppState;

/// The member identified by the `Authorization: Bearer <token>` header.
///
/// A missing header, a malformed header, an invalid or expired token and a
/// token for a member that is not stored all yield `OptionalMember(None)`,
/// and handlers answer such requests with a `null` result. Only a failed
/// member lookup rejects the request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OptionalMember(pub Option<MemberId>);

impl FromRequestParts<AppState> for OptionalMember {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = parts
            .headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.strip_prefix("Bearer "))
            .map(str::trim)
            .filter(|t| !t.is_empty());

        let Some(token) = token else {
            return Ok(Self(None));
        };

        let member_id = match validate_token(token, &state.config.jwt) {
            Ok(claims) => claims.sub,
            Err(e) => {
                tracing::debug!(error = %e, "Ignoring invalid bearer token");
                return Ok(Self(None));
            }
        };

        if !MemberRepo::exists(&state.pool, member_id).await? {
            tracing::debug!(member_id, "Ignoring bearer token for unknown member");
            return Ok(Self(None));
        }

        Ok(Self(Some(member_id)))
    }
}
