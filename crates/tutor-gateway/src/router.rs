use std::time::Duration;

use axum::Router;
use axum::routing::{get, post};
use tower_governor::GovernorLayer;
use tower_governor::governor::GovernorConfigBuilder;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::warn;

use crate::api;
use crate::state::SharedState;

/// Build the application router with all routes and layers.
pub fn build_router(state: SharedState) -> Router {
    let rate_limit = state.config.gateway.rate_limit.clone();

    let router = Router::new()
        .route("/", get(api::root))
        .route("/health", get(api::health))
        .route("/tools", get(api::list_tools))
        .route("/orchestrate", post(api::orchestrate))
        .route("/validate", post(api::validate))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    if !rate_limit.enabled {
        return router;
    }

    // Per-IP rate limit (default: 1 req/sec, burst 60).
    let Some(governor_conf) = GovernorConfigBuilder::default()
        .per_second(rate_limit.per_second)
        .burst_size(rate_limit.burst_size)
        .finish()
    else {
        warn!(
            per_second = rate_limit.per_second,
            burst_size = rate_limit.burst_size,
            "invalid rate limit settings, rate limiting disabled"
        );
        return router;
    };
    let governor_limiter = governor_conf.limiter().clone();

    // Clean up rate-limiter state for inactive IPs.
    tokio::spawn(async move {
        let interval = Duration::from_secs(60);
        loop {
            tokio::time::sleep(interval).await;
            governor_limiter.retain_recent();
        }
    });

    router.layer(GovernorLayer::new(governor_conf))
}
