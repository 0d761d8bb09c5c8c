use axum::{
    Json, Router,
    extract::{Request, State},
    http::{HeaderName, HeaderValue, Method, header},
    middleware::{self, Next},
    response::Response,
    routing::get,
};
use routine_config::Config;
use serde_json::{Value, json};
use tower::ServiceExt;
use tower_http::{
    cors::{AllowHeaders, AllowMethods, AllowOrigin, CorsLayer},
    trace::TraceLayer,
};

use crate::{AppState, handlers::pagination::X_PAGINATION, routes};

/// CORS policy: permissive in dev mode, allow-list otherwise.
///
/// Methods and headers were validated during config load; anything that
/// still fails to parse is skipped.
pub fn cors_layer(config: &Config) -> CorsLayer {
    if config.dev_mode {
        return CorsLayer::permissive();
    }

    let cors = &config.cors;
    let allow_origin = if cors.is_wildcard_included() || cors.allowed_origins.is_empty() {
        AllowOrigin::any()
    } else {
        AllowOrigin::list(
            cors.allowed_origins
                .iter()
                .filter_map(|origin| HeaderValue::from_str(origin.trim()).ok()),
        )
    };

    let methods: Vec<Method> = cors
        .allowed_methods
        .iter()
        .filter_map(|m| Method::from_bytes(m.as_bytes()).ok())
        .collect();
    let headers: Vec<HeaderName> = cors
        .allowed_headers
        .iter()
        .filter_map(|h| HeaderName::from_bytes(h.as_bytes()).ok())
        .collect();

    let mut layer = CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods(AllowMethods::list(methods))
        .allow_headers(AllowHeaders::list(headers))
        .expose_headers([X_PAGINATION, header::LOCATION]);

    if cors.allow_credentials && !cors.is_wildcard_included() {
        layer = layer.allow_credentials(true);
    }

    layer
}

/// Full application router with state applied and middleware attached.
///
/// Only requests carrying an `Origin` header pass through the CORS layer,
/// which answers every OPTIONS request itself; a plain OPTIONS therefore
/// still reaches the route's own handler.
pub fn build_router(state: AppState) -> Router {
    let cors = cors_layer(state.config());

    let app = Router::new()
        .route("/ping", get(ping_handler))
        .route("/health", get(health_handler))
        .nest("/api", routes::create_api_router())
        .with_state(state);
    let cross_origin = app.clone().layer(cors);

    app.layer(middleware::from_fn(move |req: Request, next: Next| {
        let cross_origin = cross_origin.clone();
        async move { route_by_origin(cross_origin, req, next).await }
    }))
    .layer(TraceLayer::new_for_http())
}

async fn route_by_origin(cross_origin: Router, req: Request, next: Next) -> Response {
    if !req.headers().contains_key(header::ORIGIN) {
        return next.run(req).await;
    }
    match cross_origin.oneshot(req).await {
        Ok(response) => response,
        Err(never) => match never {},
    }
}

async fn ping_handler() -> &'static str {
    "pong"
}

async fn health_handler(State(state): State<AppState>) -> Json<Value> {
    let config = state.config();
    Json(json!({
        "status": "ok",
        "storage": config.storage.to_string(),
        "maxPageSize": config.paging.max_page_size,
    }))
}
