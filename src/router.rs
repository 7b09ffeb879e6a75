use axum::http::{HeaderValue, Method, header};
use axum::{Router, middleware, routing::get};
use bearergate_config::CorsConfig;
use metrics_exporter_prometheus::PrometheusHandle;
use tower_http::cors::CorsLayer;

use crate::logging::logging_middleware;
use crate::metrics::{metrics_middleware, metrics_router};
use crate::middleware::jwt::AuthGate;
use crate::modules::profile::{AccessClaims, init_profile_router};

async fn health() -> &'static str {
    "ok"
}

/// Every route sits behind the gate; the gate's skip predicate decides
/// which paths (e.g. `/health`) go through unauthenticated. CORS is layered
/// outside the gate so preflight requests never need a token.
pub fn init_router(
    gate: AuthGate<AccessClaims>,
    cors_config: &CorsConfig,
    metrics: Option<PrometheusHandle>,
) -> Router {
    let mut router = Router::new()
        .route("/health", get(health))
        .nest("/api/profile", init_profile_router());

    if let Some(handle) = metrics {
        router = router.merge(metrics_router(handle));
    }

    router
        .layer(gate.into_layer())
        .layer(cors_layer(cors_config))
        .layer(middleware::from_fn(metrics_middleware))
        .layer(middleware::from_fn(logging_middleware))
}

fn cors_layer(config: &CorsConfig) -> CorsLayer {
    let allowed_origins: Vec<HeaderValue> = config
        .allowed_origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    CorsLayer::new()
        .allow_origin(allowed_origins)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE, header::ACCEPT])
        .allow_credentials(true)
}
