/**
 * Router Configuration
 *
 * Combines the public API routes and the internal (cron/admin) routes into a
 * single Axum router, then applies the shared layers.
 *
 * # Layers
 *
 * - `CorsLayer::permissive()` - the mobile and web clients call from any origin
 * - `TraceLayer` - one span per request
 *
 * Unknown routes fall through to a JSON 404 in the same shape as handler errors.
 */

use axum::Router;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::backend::error::BackendError;
use crate::backend::routes::api_routes::configure_api_routes;
use crate::backend::routes::internal_routes::configure_internal_routes;
use crate::backend::server::state::AppState;

/// Create the Axum router with all routes configured
///
/// # Arguments
///
/// * `app_state` - Shared pool, configuration, verifier and push sender
///
/// # Returns
///
/// Router ready to serve requests
pub fn create_router(app_state: AppState) -> Router<()> {
    let router = Router::new();
    let router = configure_api_routes(router);
    let router = configure_internal_routes(router);

    router
        .fallback(|| async { BackendError::not_found("Not found") })
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive()),
        )
        .with_state(app_state)
}
