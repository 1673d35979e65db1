//! HTTP route handlers.

pub mod admin;
pub mod consultation;
pub mod lab;

use axum::{
    routing::{get, put},
    Router,
};
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// Build the full application router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(|| async { "ok" }))
        .route("/api/labrequests/to-be-tested", get(lab::to_be_tested))
        .route("/api/labrequests", get(lab::for_tester))
        .route("/api/labrequests/assign/:id", put(lab::assign))
        .route("/api/labrequests/update/:id", put(lab::update))
        .route("/api/consultations/in-queue", get(consultation::in_queue))
        .route("/api/consultations", get(consultation::for_doctor))
        .route("/api/consultations/assign/:id", put(consultation::assign))
        .route("/api/consultations/update/:id", put(consultation::update))
        .route("/api/requests", get(admin::list_all))
        .route("/api/requests/:id/flow", get(admin::flow))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
