use axum::{
    Json,
    body::Bytes,
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::{MethodRouter, post},
};
use intake_contact::ContactSubmission;
use serde_json::json;

use crate::{error::ApiError, pipeline, routes::AppState};

pub fn method_router() -> MethodRouter<AppState> {
    post(action).options(preflight)
}

/// POST / and POST /api/contact - accept one contact-form submission.
///
/// The body is deserialized by hand: a payload that is not valid JSON is an
/// unexpected error (500), while a missing field inside valid JSON is a
/// validation error (400).
pub async fn action(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<impl IntoResponse, ApiError> {
    let submission: ContactSubmission =
        serde_json::from_slice(&body).map_err(|err| ApiError::Internal(err.into()))?;

    let message = pipeline::process_submission(
        submission,
        state.store.as_ref(),
        &state.notifier,
        state.bot_verifier.as_ref(),
    )
    .await?;

    Ok(Json(json!({ "message": message })))
}

/// Browsers preflight the cross-origin POST; the CORS layer answers real
/// preflights, this handler covers bare OPTIONS probes.
pub async fn preflight() -> StatusCode {
    StatusCode::OK
}
