pub mod api_client;
pub mod config;
pub mod handlers;
pub mod openapi;

use axum::{
    Router,
    http::{HeaderValue, header},
    middleware as axum_middleware,
    routing::get,
};
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::trace::TraceLayer;

/// Build the proxy router. Swagger UI is only mounted when `enable_docs` is set.
pub fn create_router(state: handlers::AppState, enable_docs: bool) -> Router {
    let mut router = Router::new().route("/weather", get(handlers::get_weather));

    if enable_docs {
        router = router.merge(openapi::swagger_ui());
    }

    router
        .fallback(handlers::not_found)
        .layer(axum_middleware::from_fn(handlers::require_get))
        .layer(SetResponseHeaderLayer::overriding(
            header::ACCESS_CONTROL_ALLOW_ORIGIN,
            HeaderValue::from_static("*"),
        ))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
