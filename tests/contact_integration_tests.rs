//! End-to-end tests for the submission endpoint: the full router is driven
//! through `tower::ServiceExt::oneshot`, with only the outermost adapters
//! (mailer, bot verifier) replaced by test doubles.

mod helpers;

use std::sync::Arc;

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{Request, StatusCode, header},
};
use helpers::{
    body_json, lead_count, post_json, spawn_app, spawn_app_with, spawn_unconfigured_app,
    valid_payload,
};
use intake::botcheck::{BotCheckError, BotVerifier};
use intake_notification::MockMailer;
use serde_json::json;
use tower::ServiceExt;

#[tokio::test]
async fn submission_succeeds_end_to_end() {
    let test_app = spawn_app().await;

    let response = test_app
        .app
        .oneshot(post_json("/api/contact", &valid_payload()))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response
            .headers()
            .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
            .and_then(|v| v.to_str().ok()),
        Some("*"),
        "success responses must be readable cross-origin"
    );
    assert_eq!(
        body_json(response).await,
        json!({ "message": "Thank you for your message. We will be in touch soon." })
    );

    let sent = test_app.mailer.sent();
    assert_eq!(sent.len(), 1, "exactly one notification per submission");
    assert!(sent[0].subject.contains("Jane Doe"));
    assert_eq!(lead_count(&test_app.pool).await, 1);
}

#[tokio::test]
async fn both_historical_paths_serve_the_pipeline() {
    for uri in ["/", "/api/contact"] {
        let test_app = spawn_app().await;
        let response = test_app
            .app
            .oneshot(post_json(uri, &valid_payload()))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK, "POST {uri} should succeed");
    }
}

#[tokio::test]
async fn missing_required_fields_return_400() {
    let payloads = [
        json!({}),
        json!({ "email": "jane@example.com", "message": "Hello" }),
        json!({ "name": "Jane", "message": "Hello" }),
        json!({ "name": "Jane", "email": "jane@example.com" }),
        json!({ "name": "", "email": "jane@example.com", "message": "Hello" }),
    ];

    for payload in payloads {
        let test_app = spawn_app().await;
        let response = test_app
            .app
            .oneshot(post_json("/api/contact", &payload))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "payload: {payload}");
        assert_eq!(
            body_json(response).await,
            json!({ "error": "Missing required fields" })
        );
        assert!(test_app.mailer.sent().is_empty(), "client errors have no side effects");
        assert_eq!(lead_count(&test_app.pool).await, 0);
    }
}

#[tokio::test]
async fn malformed_emails_return_400() {
    for email in ["foo", "foo@bar", "@bar.com", "foo@bar.c om"] {
        let test_app = spawn_app().await;
        let mut payload = valid_payload();
        payload["email"] = json!(email);

        let response = test_app
            .app
            .oneshot(post_json("/api/contact", &payload))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "email: {email}");
        assert_eq!(
            body_json(response).await,
            json!({ "error": "Invalid email format" })
        );
    }
}

#[tokio::test]
async fn plausible_emails_are_accepted() {
    for email in ["a@b.co", "first.last+tag@sub.domain.org"] {
        let test_app = spawn_app().await;
        let mut payload = valid_payload();
        payload["email"] = json!(email);

        let response = test_app
            .app
            .oneshot(post_json("/api/contact", &payload))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK, "email: {email}");
    }
}

#[tokio::test]
async fn non_json_body_is_a_generic_server_error() {
    let test_app = spawn_app().await;

    let request = Request::builder()
        .method("POST")
        .uri("/api/contact")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("this is not json"))
        .unwrap();

    let response = test_app.app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        body_json(response).await,
        json!({ "error": "Internal server error" })
    );
}

#[tokio::test]
async fn wrong_method_is_rejected() {
    let test_app = spawn_app().await;

    let request = Request::builder()
        .method("GET")
        .uri("/api/contact")
        .body(Body::empty())
        .unwrap();

    let response = test_app.app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
}

#[tokio::test]
async fn notification_failure_reports_500_but_keeps_the_lead() {
    let test_app = spawn_app_with(MockMailer::failing(), None).await;

    let response = test_app
        .app
        .oneshot(post_json("/api/contact", &valid_payload()))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = body_json(response).await;
    let message = body["error"].as_str().unwrap();
    assert!(
        message.contains("was received"),
        "caller must learn the submission survived: {message}"
    );
    assert_eq!(
        lead_count(&test_app.pool).await,
        1,
        "a failed notification must not roll back the stored lead"
    );
}

#[tokio::test]
async fn missing_provider_key_reports_500_after_storing() {
    let test_app = spawn_unconfigured_app().await;

    let response = test_app
        .app
        .oneshot(post_json("/api/contact", &valid_payload()))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        body_json(response).await,
        json!({ "error": "Email service is not configured" })
    );
    assert!(test_app.mailer.sent().is_empty());
    assert_eq!(lead_count(&test_app.pool).await, 1);
}

struct StaticVerifier(bool);

#[async_trait]
impl BotVerifier for StaticVerifier {
    async fn verify(&self, _token: &str) -> Result<bool, BotCheckError> {
        Ok(self.0)
    }
}

#[tokio::test]
async fn enabled_bot_check_rejects_failed_tokens() {
    let verifier: Arc<dyn BotVerifier> = Arc::new(StaticVerifier(false));
    let test_app = spawn_app_with(MockMailer::new(), Some(verifier)).await;

    let mut payload = valid_payload();
    payload["turnstileToken"] = json!("tok-bad");
    let response = test_app
        .app
        .oneshot(post_json("/api/contact", &payload))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        body_json(response).await,
        json!({ "error": "Bot verification failed" })
    );
    assert_eq!(lead_count(&test_app.pool).await, 0);
}

#[tokio::test]
async fn enabled_bot_check_passes_verified_tokens() {
    let verifier: Arc<dyn BotVerifier> = Arc::new(StaticVerifier(true));
    let test_app = spawn_app_with(MockMailer::new(), Some(verifier)).await;

    let mut payload = valid_payload();
    payload["turnstileToken"] = json!("tok-good");
    let response = test_app
        .app
        .oneshot(post_json("/api/contact", &payload))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(test_app.mailer.sent().len(), 1);
}

#[tokio::test]
async fn disabled_bot_check_ignores_the_token() {
    // Default deployment: the token is parsed but unenforced.
    let test_app = spawn_app().await;

    let mut payload = valid_payload();
    payload["turnstileToken"] = json!("");
    let response = test_app
        .app
        .oneshot(post_json("/api/contact", &payload))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn error_responses_carry_cors_headers() {
    let test_app = spawn_app().await;

    let response = test_app
        .app
        .oneshot(post_json("/api/contact", &json!({})))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        response
            .headers()
            .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
            .and_then(|v| v.to_str().ok()),
        Some("*")
    );
}
