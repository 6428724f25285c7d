use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::middleware;
use axum::routing::{get, post};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

use crate::infrastructure::observability::request_id_middleware;
use crate::presentation::auth::api_key_middleware;
use crate::presentation::handlers::{
    create_text_file_handler, health_handler, transcribe_handler,
};
use crate::presentation::state::AppState;

pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
        .on_response(DefaultOnResponse::new().level(Level::INFO));

    let mut api = Router::new()
        .route(
            "/transcribe",
            post(transcribe_handler).layer(DefaultBodyLimit::max(state.max_upload_bytes)),
        )
        .route("/create-text-file", post(create_text_file_handler));

    if let Some(key) = state.api_key.clone() {
        api = api.route_layer(middleware::from_fn_with_state(key, api_key_middleware));
    }

    Router::new()
        .route("/health", get(health_handler))
        .merge(api)
        .layer(middleware::from_fn(request_id_middleware))
        .layer(trace_layer)
        .layer(cors)
        .with_state(state)
}
