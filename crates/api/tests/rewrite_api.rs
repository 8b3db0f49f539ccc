//! Integration tests for the rewrite endpoint.

mod common;

use axum::http::{Method, StatusCode};
use serde_json::json;

use common::{build_test_app, request, setup_db, StubGenerator};
use redraft_db::repositories::RewriteHistoryRepo;

#[tokio::test]
async fn rewrite_returns_generated_text_and_appends_history() {
    let pool = setup_db().await;
    let generator = StubGenerator::success("Dear team, please find attached...");
    let app = build_test_app(pool.clone(), generator.clone());

    let (status, body) = request(
        app,
        Method::POST,
        "/rewrite",
        Some(json!({"email": "yo, send me the files", "tone": "professional"})),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["original"], "yo, send me the files");
    assert_eq!(body["tone"], "professional");
    assert_eq!(body["rewritten"], "Dear team, please find attached...");

    // The assembled prompt carries the seeded base prompt, the tone
    // guidance, and the original email.
    let prompt = generator.last_prompt().unwrap();
    assert!(prompt.contains("AcmeHR"));
    assert!(prompt.contains("Tone Guidance (Professional):"));
    assert!(prompt.contains("yo, send me the files"));

    // One audit record, carrying the full exchange.
    let records = RewriteHistoryRepo::list(&pool, 10, 0).await.unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].original_email, "yo, send me the files");
    assert_eq!(records[0].tone, "professional");
    assert_eq!(records[0].final_prompt, prompt);
    assert_eq!(
        records[0].generated_response,
        "Dear team, please find attached..."
    );
}

#[tokio::test]
async fn rewrite_defaults_to_professional_tone() {
    let pool = setup_db().await;
    let generator = StubGenerator::success("rewritten");
    let app = build_test_app(pool, generator.clone());

    let (status, body) = request(
        app,
        Method::POST,
        "/rewrite",
        Some(json!({"email": "hello there"})),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["tone"], "professional");
    assert!(generator
        .last_prompt()
        .unwrap()
        .contains("Tone Guidance (Professional):"));
}

#[tokio::test]
async fn rewrite_with_unknown_tone_omits_tone_guidance() {
    let pool = setup_db().await;
    let generator = StubGenerator::success("rewritten");
    let app = build_test_app(pool.clone(), generator.clone());

    let (status, body) = request(
        app,
        Method::POST,
        "/rewrite",
        Some(json!({"email": "hello there", "tone": "sarcastic"})),
    )
    .await;

    // Unknown tones degrade gracefully: the rewrite proceeds without
    // tone guidance rather than failing.
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["tone"], "sarcastic");

    let prompt = generator.last_prompt().unwrap();
    assert!(!prompt.contains("Tone Guidance"));
    assert!(prompt.contains("hello there"));
}

#[tokio::test]
async fn rewrite_rejects_empty_email_before_calling_generator() {
    let pool = setup_db().await;
    let generator = StubGenerator::success("never used");
    let app = build_test_app(pool.clone(), generator.clone());

    let (status, body) = request(
        app,
        Method::POST,
        "/rewrite",
        Some(json!({"email": "   ", "tone": "professional"})),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_ERROR");

    // Validation fails before any upstream call or audit write.
    assert_eq!(generator.call_count(), 0);
    assert_eq!(RewriteHistoryRepo::count(&pool).await.unwrap(), 0);
}

#[tokio::test]
async fn rewrite_maps_unreachable_generator_to_502() {
    let pool = setup_db().await;
    let generator = StubGenerator::unreachable();
    let app = build_test_app(pool.clone(), generator);

    let (status, body) = request(
        app,
        Method::POST,
        "/rewrite",
        Some(json!({"email": "hello", "tone": "friendly"})),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(body["code"], "UPSTREAM_UNREACHABLE");

    // Failed rewrites leave no audit record.
    assert_eq!(RewriteHistoryRepo::count(&pool).await.unwrap(), 0);
}

#[tokio::test]
async fn rewrite_maps_upstream_error_to_502() {
    let pool = setup_db().await;
    let generator = StubGenerator::upstream_error(429, "Rate limit exceeded");
    let app = build_test_app(pool, generator);

    let (status, body) = request(
        app,
        Method::POST,
        "/rewrite",
        Some(json!({"email": "hello", "tone": "friendly"})),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(body["code"], "GENERATION_ERROR");
    assert_eq!(body["error"], "Rate limit exceeded");
}
