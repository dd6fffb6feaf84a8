use axum::{
    extract::{DefaultBodyLimit, State},
    http::{header, HeaderValue, Method, StatusCode},
    middleware::{from_fn, from_fn_with_state},
    response::{IntoResponse, Json},
    routing::{delete, get, post},
    Router,
};
use serde_json::json;
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    trace::TraceLayer,
};

use crate::config::AppConfig;
use crate::error::{ApiError, ErrorCode};
use crate::handlers::{protected, public};
use crate::middleware::{jwt_auth_middleware, render_error_response};
use crate::AppState;

/// Full router with middleware, ready to serve
pub fn app(state: AppState, config: &AppConfig) -> Router {
    let protected_routes = Router::new()
        .merge(session_routes())
        .merge(correction_routes())
        .merge(photo_book_routes())
        .route_layer(from_fn_with_state(state.clone(), jwt_auth_middleware));

    Router::new()
        // Public
        .route("/", get(root))
        .route("/health", get(health))
        .merge(auth_public_routes())
        // Protected
        .merge(protected_routes)
        .fallback(not_found)
        .with_state(state)
        // Global middleware; the last layer added runs first
        .layer(DefaultBodyLimit::max(config.api.max_request_size_bytes))
        .layer(from_fn(render_error_response))
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(config))
}

fn auth_public_routes() -> Router<AppState> {
    use public::auth;

    Router::new()
        .route("/signup", post(auth::signup_post))
        .route("/login", post(auth::login_post))
        .route("/token/refresh", post(auth::refresh_post))
}

fn session_routes() -> Router<AppState> {
    use protected::auth;

    Router::new()
        .route("/users/me", get(auth::whoami))
        .route("/users/me/session", delete(auth::logout))
}

fn correction_routes() -> Router<AppState> {
    use protected::correction;

    Router::new()
        .route("/corrections", post(correction::create).get(correction::list))
        .route(
            "/corrections/:id",
            get(correction::get)
                .put(correction::update)
                .delete(correction::delete),
        )
}

fn photo_book_routes() -> Router<AppState> {
    use protected::photo_book;

    Router::new()
        .route("/photobooks", post(photo_book::create).get(photo_book::list))
        .route("/photobooks/:id", get(photo_book::get).delete(photo_book::delete))
}

/// Disabled CORS still installs the layer, just with no allowed origins
fn cors_layer(config: &AppConfig) -> CorsLayer {
    if !config.security.enable_cors {
        return CorsLayer::new();
    }

    let origins: Vec<HeaderValue> = config
        .security
        .cors_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
}

async fn root() -> Json<serde_json::Value> {
    Json(json!({
        "name": "Photoism API",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

async fn health(State(state): State<AppState>) -> impl IntoResponse {
    match state.health.ping().await {
        Ok(()) => (
            StatusCode::OK,
            Json(json!({
                "status": "ok",
                "database": "ok"
            })),
        ),
        Err(e) => {
            tracing::error!(error = %e, "Health check failed");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({
                    "status": "degraded",
                    "database": "unavailable"
                })),
            )
        }
    }
}

async fn not_found() -> ApiError {
    ErrorCode::ResourceNotFound.into()
}
