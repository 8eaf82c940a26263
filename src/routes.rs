// src/routes.rs

use axum::{Router, http::Method, routing::get};
use tower::ServiceBuilder;
use tower_http::{catch_panic::CatchPanicLayer, cors::CorsLayer, trace::TraceLayer};

use crate::{error::handle_panic, handlers::dashboard, state::AppState};

/// Assembles the main application router.
///
/// * Mounts the teacher dashboard under `/api/teacher/dashboard`.
/// * Applies global middleware (Trace, CORS, panic catching).
/// * Injects global state (dashboard service, config).
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin([
            "http://localhost:3000".parse().unwrap(),
            "http://127.0.0.1:3000".parse().unwrap(),
        ])
        .allow_methods([Method::GET])
        .allow_headers([
            axum::http::header::AUTHORIZATION,
            axum::http::header::CONTENT_TYPE,
        ]);

    let dashboard_routes = Router::new()
        .route("/students", get(dashboard::list_students))
        .route(
            "/students/{id}/attempts",
            get(dashboard::list_student_attempts),
        )
        .route("/charts/top-attempts", get(dashboard::top_by_attempts))
        .route("/charts/top-passed", get(dashboard::top_by_passed));

    Router::new()
        .nest("/api/teacher/dashboard", dashboard_routes)
        // Global Middleware (applied from outside in)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors)
                .layer(CatchPanicLayer::custom(handle_panic)),
        )
        .with_state(state)
}
