use axum::{
    extract::DefaultBodyLimit,
    http::HeaderValue,
    routing::{get, post},
    Router,
};
use tower_http::{
    catch_panic::CatchPanicLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::config::SecurityConfig;
use crate::handlers;
use crate::middleware::error_handler;
use crate::state::AppState;

/// Build the full router: routes, 404 fallback, panic catcher and global layers
pub fn app(state: AppState) -> Router {
    let config = state.config().clone();

    let mut router = Router::new()
        .route("/health", get(handlers::health_get))
        .merge(student_routes());

    if config.api.enable_seed_route {
        router = router.merge(seed_routes());
    }

    let mut router = router
        .fallback(error_handler::fallback)
        .with_state(state)
        // Global middleware
        .layer(CatchPanicLayer::custom(error_handler::panic_response))
        .layer(DefaultBodyLimit::max(config.api.max_request_size_bytes));

    if let Some(cors) = cors_layer(&config.security) {
        router = router.layer(cors);
    }
    if config.api.enable_request_logging {
        router = router.layer(TraceLayer::new_for_http());
    }

    router
}

fn student_routes() -> Router<AppState> {
    Router::new()
        // Collection
        .route(
            "/api",
            get(handlers::student_list)
                .post(handlers::student_create)
                .fallback(error_handler::fallback),
        )
        // Single record
        .route(
            "/api/:id",
            get(handlers::student_get)
                .patch(handlers::student_edit)
                .delete(handlers::student_delete)
                .fallback(error_handler::fallback),
        )
}

fn seed_routes() -> Router<AppState> {
    Router::new().route(
        "/api/seed-students",
        post(handlers::seed_post).fallback(error_handler::fallback),
    )
}

fn cors_layer(security: &SecurityConfig) -> Option<CorsLayer> {
    if !security.enable_cors {
        return None;
    }

    let layer = CorsLayer::new().allow_methods(Any).allow_headers(Any);
    if security.cors_origins.iter().any(|o| o == "*") {
        return Some(layer.allow_origin(Any));
    }

    let origins: Vec<HeaderValue> = security
        .cors_origins
        .iter()
        .filter_map(|o| match o.parse::<HeaderValue>() {
            Ok(v) => Some(v),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin: {}", o);
                None
            }
        })
        .collect();
    Some(layer.allow_origin(origins))
}
