//! Route definitions for the `/subscriptions` resource.
//!
//! Authentication is optional; see [`OptionalMember`](crate::middleware::auth::OptionalMember).

use axum::routing::get;
use axum::Router;

use crate::handlers::subscription;
use crate::state::AppState;

/// Routes mounted at `/subscriptions`.
///
/// ```text
/// GET    /general    -> list_general_subscriptions
/// PUT    /general    -> put_general_subscriptions
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route(
        "/general",
        get(subscription::list_general_subscriptions)
            .put(subscription::put_general_subscriptions),
    )
}
