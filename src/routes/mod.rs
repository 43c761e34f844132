use std::sync::Arc;

use axum::{
    Router,
    http::{Method, header},
    routing::get,
};
use intake_notification::LeadNotifier;
use intake_store::SubmissionStore;
use sqlx::SqlitePool;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::botcheck::BotVerifier;

mod contact;
mod health;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn SubmissionStore>,
    pub notifier: LeadNotifier,
    pub bot_verifier: Option<Arc<dyn BotVerifier>>,
    /// Present when a database is bound; used by the readiness probe.
    pub pool: Option<SqlitePool>,
}

pub fn router(state: AppState) -> Router {
    // The endpoint is called cross-origin straight from the marketing site,
    // so every response carries a permissive CORS policy.
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE]);

    Router::new()
        .route("/health", get(health::health))
        .route("/ready", get(health::ready))
        // The submission endpoint under both of its historical paths
        .route("/", contact::method_router())
        .route("/api/contact", contact::method_router())
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
