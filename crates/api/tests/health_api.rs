//! Integration tests for the health check endpoint.

mod common;

use axum::http::{Method, StatusCode};

use common::{build_test_app, request, setup_db, StubGenerator};

#[tokio::test]
async fn health_reports_ok_with_healthy_database() {
    let pool = setup_db().await;
    let app = build_test_app(pool, StubGenerator::success("unused"));

    let (status, body) = request(app, Method::GET, "/health", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["db_healthy"], true);
    assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
}

#[tokio::test]
async fn health_reports_degraded_with_closed_database() {
    let pool = setup_db().await;
    pool.close().await;
    let app = build_test_app(pool, StubGenerator::success("unused"));

    let (status, body) = request(app, Method::GET, "/health", None).await;

    // Health never fails the request; it reports the degradation instead.
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "degraded");
    assert_eq!(body["db_healthy"], false);
}
