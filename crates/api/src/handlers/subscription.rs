//! Handlers for the `/subscriptions/general` resource.
//!
//! Requests without a valid member token succeed with `{ "data": null }`.

use axum::extract::{Query, State};
use axum::Json;
use pioneer_core::subscriptions::{GeneralSubscription, GeneralSubscriptionInput};
use serde::Deserialize;

use crate::error::AppResult;
use crate::middleware::auth::OptionalMember;
use crate::query::GeneralSubscriptionParams;
use crate::response::DataResponse;
use crate::state::AppState;
use crate::subscriptions::{query_general_subscriptions, update_general_subscriptions};

/// Body of `PUT /subscriptions/general`: the complete desired state.
#[derive(Debug, Deserialize)]
pub struct UpdateGeneralSubscriptions {
    #[serde(default)]
    pub data: Vec<GeneralSubscriptionInput>,
}

/// GET /api/v1/subscriptions/general
pub async fn list_general_subscriptions(
    OptionalMember(member_id): OptionalMember,
    State(state): State<AppState>,
    Query(params): Query<GeneralSubscriptionParams>,
) -> AppResult<Json<DataResponse<Option<Vec<GeneralSubscription>>>>> {
    let data = query_general_subscriptions(&state.pool, member_id, &params).await?;
    Ok(Json(DataResponse { data }))
}

/// PUT /api/v1/subscriptions/general
///
/// Kinds left out of the body fall back to their defaults.
pub async fn put_general_subscriptions(
    OptionalMember(member_id): OptionalMember,
    State(state): State<AppState>,
    Json(body): Json<UpdateGeneralSubscriptions>,
) -> AppResult<Json<DataResponse<Option<Vec<GeneralSubscription>>>>> {
    let data = update_general_subscriptions(&state.pool, member_id, &body.data).await?;
    Ok(Json(DataResponse { data }))
}
