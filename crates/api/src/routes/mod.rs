pub mod health;
pub mod subscription;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// ```text
/// /subscriptions/general        list (GET), reconcile (PUT)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new().nest("/subscriptions", subscription::router())
}
