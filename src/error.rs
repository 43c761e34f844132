use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use intake_contact::SubmissionError;
use intake_notification::NotifyError;
use intake_store::StoreError;
use serde_json::json;
use thiserror::Error;

/// Everything the submission endpoint can answer with, mapped onto the wire
/// contract. The `#[error]` text is exactly what the caller sees in the
/// `error` field; underlying causes stay in the logs.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Missing required fields")]
    MissingFields,

    #[error("Invalid email format")]
    InvalidEmail,

    #[error("Bot verification failed")]
    BotCheckFailed,

    #[error("Failed to store submission")]
    Storage(#[source] StoreError),

    #[error("Email service is not configured")]
    EmailNotConfigured,

    #[error(
        "Your message was received, but the notification email could not be sent. Please contact us directly."
    )]
    EmailFailed(#[source] NotifyError),

    #[error("Internal server error")]
    Internal(#[source] anyhow::Error),
}

impl From<SubmissionError> for ApiError {
    fn from(err: SubmissionError) -> Self {
        match err {
            SubmissionError::MissingFields => ApiError::MissingFields,
            SubmissionError::InvalidEmailFormat => ApiError::InvalidEmail,
        }
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        ApiError::Storage(err)
    }
}

impl From<NotifyError> for ApiError {
    fn from(err: NotifyError) -> Self {
        match err {
            NotifyError::NotConfigured => ApiError::EmailNotConfigured,
            other => ApiError::EmailFailed(other),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match self {
            ApiError::MissingFields | ApiError::InvalidEmail | ApiError::BotCheckFailed => {
                StatusCode::BAD_REQUEST
            }
            ApiError::Storage(_)
            | ApiError::EmailNotConfigured
            | ApiError::EmailFailed(_)
            | ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        match &self {
            ApiError::Storage(err) => {
                tracing::error!(error = %err, "failed to store submission");
            }
            ApiError::EmailNotConfigured => {
                tracing::error!("email provider API key is not configured");
            }
            ApiError::EmailFailed(err) => {
                tracing::error!(error = %err, "failed to send lead notification");
            }
            ApiError::Internal(err) => {
                tracing::error!(error = %err, "unhandled error while processing submission");
            }
            _ => {}
        }

        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}
