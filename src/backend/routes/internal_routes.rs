//! Internal routes, called by the scheduler and by billing.
//!
//! Each handler takes the `InternalAccess` guard, which checks the
//! `X-Internal-Secret` header or `internal_secret` query parameter.

use axum::{
    routing::{get, post},
    Router,
};

use crate::backend::notifications::handlers::{cleanup_old_tokens, cleanup_tokens, get_metrics, run_scan};
use crate::backend::server::state::AppState;
use crate::backend::subscription::api::grant_subscription;

pub fn configure_internal_routes(router: Router<AppState>) -> Router<AppState> {
    router
        .route("/notifications/run-scan/", post(run_scan))
        .route("/notifications/cleanup/", post(cleanup_tokens))
        .route("/notifications/cleanup-old/", post(cleanup_old_tokens))
        .route("/notifications/metrics/", get(get_metrics))
        .route("/subscription/grant", post(grant_subscription))
}
