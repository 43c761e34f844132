//! Shared setup for endpoint tests: a real router over an in-memory lead
//! store and a recording mailer.

#![allow(dead_code)]

use std::sync::Arc;

use axum::{
    Router,
    body::Body,
    http::{Request, Response, header},
};
use http_body_util::BodyExt;
use intake::AppState;
use intake::botcheck::BotVerifier;
use intake_notification::{LeadNotifier, MockMailer};
use intake_store::SqliteStore;
use sqlx::SqlitePool;
use sqlx::sqlite::SqlitePoolOptions;

pub const TEST_FROM: &str = "Meridian Advisory <website@meridianadvisory.com>";
pub const TEST_TO: &str = "hello@meridianadvisory.com";

pub struct TestApp {
    pub app: Router,
    pub mailer: MockMailer,
    pub pool: SqlitePool,
}

async fn lead_store() -> (Arc<SqliteStore>, SqlitePool) {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .expect("failed to open in-memory database");

    let store = SqliteStore::new(pool.clone());
    store.migrate().await.expect("failed to run migrations");

    (Arc::new(store), pool)
}

pub async fn spawn_app() -> TestApp {
    spawn_app_with(MockMailer::new(), None).await
}

pub async fn spawn_app_with(
    mailer: MockMailer,
    bot_verifier: Option<Arc<dyn BotVerifier>>,
) -> TestApp {
    let (store, pool) = lead_store().await;

    let state = AppState {
        store,
        notifier: LeadNotifier::new(Arc::new(mailer.clone()), TEST_FROM, TEST_TO),
        bot_verifier,
        pool: Some(pool.clone()),
    };

    TestApp {
        app: intake::create_app(state),
        mailer,
        pool,
    }
}

/// App whose email provider key is absent: the notifier is disabled.
pub async fn spawn_unconfigured_app() -> TestApp {
    let (store, pool) = lead_store().await;

    let state = AppState {
        store,
        notifier: LeadNotifier::disabled(TEST_FROM, TEST_TO),
        bot_verifier: None,
        pool: Some(pool.clone()),
    };

    TestApp {
        app: intake::create_app(state),
        mailer: MockMailer::new(),
        pool,
    }
}

pub fn valid_payload() -> serde_json::Value {
    serde_json::json!({
        "name": "Jane Doe",
        "email": "jane@example.com",
        "organization": "Acme",
        "message": "Hello"
    })
}

pub fn post_json(uri: &str, body: &serde_json::Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::ORIGIN, "https://www.meridianadvisory.com")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("failed to read body")
        .to_bytes();
    serde_json::from_slice(&bytes).expect("body was not JSON")
}

pub async fn lead_count(pool: &SqlitePool) -> i64 {
    sqlx::query_scalar("SELECT COUNT(*) FROM leads")
        .fetch_one(pool)
        .await
        .expect("failed to count leads")
}
