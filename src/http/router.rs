use axum::routing::{delete, get, post};
use axum::Router;
use tower_http::trace::TraceLayer;

use crate::http::handlers::{core, grades, students};
use crate::http::types::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(students::list).post(students::create))
        .route("/student/:id", delete(students::remove))
        .route("/studentInformation/:id", get(students::profile))
        .route("/grades", post(grades::create))
        .route("/grades/:id/:grade_type", delete(grades::remove))
        .route("/health", get(core::health))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}
