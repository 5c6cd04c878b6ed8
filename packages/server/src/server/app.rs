//! Application setup and router configuration.

use std::sync::Arc;

use axum::{
    extract::Extension,
    http::{
        header::{AUTHORIZATION, CONTENT_TYPE},
        HeaderValue, Method,
    },
    middleware,
    routing::{get, post},
    Router,
};
use tower_governor::{governor::GovernorConfigBuilder, GovernorLayer};
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::warn;

use crate::kernel::ServerDeps;
use crate::server::middleware::jwt_auth_middleware;
use crate::server::routes::{admin, authorities, citizens, health_handler, incidents, notifications};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub deps: ServerDeps,
}

/// HTTP-level options that are not domain dependencies
#[derive(Debug, Clone, Default)]
pub struct HttpOptions {
    /// Empty means any origin
    pub allowed_origins: Vec<String>,
    pub rate_limit_enabled: bool,
}

fn cors_layer(allowed_origins: &[String]) -> CorsLayer {
    let origin = if allowed_origins.is_empty() {
        AllowOrigin::any()
    } else {
        let origins: Vec<HeaderValue> = allowed_origins
            .iter()
            .filter_map(|o| match o.parse::<HeaderValue>() {
                Ok(value) => Some(value),
                Err(_) => {
                    warn!(origin = %o, "Ignoring invalid CORS origin");
                    None
                }
            })
            .collect();
        AllowOrigin::list(origins)
    };

    CorsLayer::new()
        .allow_origin(origin)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([AUTHORIZATION, CONTENT_TYPE])
}

fn api_routes() -> Router {
    Router::new()
        // Citizen
        .route("/api/me", get(citizens::me_handler))
        .route("/api/incidents", post(incidents::submit_report_handler))
        .route("/api/incidents/analyze", post(incidents::analyze_handler))
        .route("/api/incidents/mine", get(incidents::my_incidents_handler))
        .route("/api/notifications", get(notifications::list_notifications_handler))
        .route(
            "/api/notifications/:id/read",
            post(notifications::mark_read_handler),
        )
        // Admin
        .route("/api/admin/queue", get(admin::queue_handler))
        .route("/api/admin/stats", get(admin::stats_handler))
        .route("/api/admin/incidents", get(admin::list_incidents_handler))
        .route("/api/admin/incidents/search", get(admin::search_handler))
        .route(
            "/api/admin/incidents/:id/status",
            post(admin::update_status_handler),
        )
        .route(
            "/api/admin/incidents/:id/authorities",
            get(admin::authorities_handler),
        )
        .route(
            "/api/admin/incidents/:id/dispatch",
            post(admin::dispatch_handler),
        )
        .route(
            "/api/admin/incidents/:id/dispatches",
            get(admin::dispatches_handler),
        )
        .route(
            "/api/admin/citizens/recommended",
            get(citizens::recommended_citizens_handler),
        )
        .route(
            "/api/admin/citizens/sync-report-counts",
            post(citizens::sync_report_counts_handler),
        )
        // Public
        .route(
            "/api/authorities/contacts",
            get(authorities::emergency_contacts_handler),
        )
}

/// Build the Axum application router
pub fn build_app(deps: ServerDeps, options: HttpOptions) -> Router {
    let jwt_service = deps.jwt_service.clone();
    let app_state = AppState { deps };

    let mut router = api_routes();

    // 10 req/s per IP with bursts of 20, keyed on X-Forwarded-For when present
    if options.rate_limit_enabled {
        match GovernorConfigBuilder::default()
            .per_second(10)
            .burst_size(20)
            .use_headers()
            .finish()
        {
            Some(config) => {
                router = router.layer(GovernorLayer {
                    config: Arc::new(config),
                });
            }
            None => warn!("Invalid rate limit configuration, rate limiting disabled"),
        }
    }

    router
        // Health check (no rate limit, no auth)
        .route("/health", get(health_handler))
        // Middleware layers (applied in reverse order - last added runs first)
        .layer(middleware::from_fn(move |req, next| {
            jwt_auth_middleware(jwt_service.clone(), req, next)
        }))
        .layer(Extension(app_state))
        .layer(cors_layer(&options.allowed_origins))
        .layer(TraceLayer::new_for_http())
}
