//! API Routes
//!
//! Configures the Axum router with all petition server endpoints.

use std::any::Any as PanicPayload;

use axum::{
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use tower_http::{
    catch_panic::CatchPanicLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::error::PetitionError;

use super::handlers::{
    donation_total_handler, health_handler, list_donations_handler, list_signatures_handler,
    not_found_handler, sign_petition_handler, signature_count_handler, stats_handler,
    track_donation_handler, AppState,
};

/// Creates the main router with all endpoints configured.
///
/// # Middleware
/// - CORS: Allows any origin, the front-end is served from elsewhere
/// - Tracing: Logs all requests
/// - Panics: Become a generic 500 without detail
pub fn create_router(state: AppState) -> Router {
    with_middleware(endpoints(state))
}

fn endpoints(state: AppState) -> Router {
    Router::new()
        .route("/api/petition/sign", post(sign_petition_handler))
        .route("/api/petition/signatures/count", get(signature_count_handler))
        .route("/api/petition/signatures", get(list_signatures_handler))
        .route("/api/donation/track", post(track_donation_handler))
        .route("/api/donation/total", get(donation_total_handler))
        .route("/api/donation/list", get(list_donations_handler))
        .route("/api/stats", get(stats_handler))
        .route("/health", get(health_handler))
        .fallback(not_found_handler)
        .with_state(state)
}

fn with_middleware(router: Router) -> Router {
    // Configure CORS middleware
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    router
        .layer(CatchPanicLayer::custom(panic_response))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

/// Turns a handler panic into the same 500 body as any internal error.
fn panic_response(payload: Box<dyn PanicPayload + Send + 'static>) -> Response {
    let detail = if let Some(msg) = payload.downcast_ref::<&str>() {
        msg.to_string()
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg.clone()
    } else {
        "handler panicked".to_string()
    };
    PetitionError::Internal(detail).into_response()
}
