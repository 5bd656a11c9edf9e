//! # Tutorhub API
//!
//! Axum surface over the coordination engine. Routers are grouped by
//! audience and merged into one application router; every handler gets a
//! clone of [`AppState`].

pub mod error;
pub mod extractors;
pub mod openapi;
pub mod routes;
pub mod state;

use axum::routing::get;
use axum::Router;
use tower_http::trace::TraceLayer;

pub use state::AppState;

/// Build the full application router.
pub fn app(state: AppState) -> Router {
    Router::new()
        .merge(routes::offerings::router())
        .merge(routes::students::router())
        .merge(routes::tutors::router())
        .merge(routes::reports::router())
        .merge(routes::rooms::router())
        .route("/openapi.json", get(openapi::openapi_json))
        .route("/health", get(health))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// GET /health
async fn health() -> &'static str {
    "ok"
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use tempfile::TempDir;
    use tower::ServiceExt;

    #[tokio::test]
    async fn health_and_openapi_are_served() {
        let dir = TempDir::new().unwrap();
        let app = app(AppState::open(dir.path()).unwrap());

        let resp = app
            .clone()
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);

        let resp = app
            .oneshot(Request::builder().uri("/openapi.json").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn unknown_route_is_404() {
        let dir = TempDir::new().unwrap();
        let app = app(AppState::open(dir.path()).unwrap());
        let resp = app
            .oneshot(Request::builder().uri("/v1/nope").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }
}
