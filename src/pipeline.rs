use std::sync::Arc;

use intake_contact::{ContactSubmission, LeadRecord};
use intake_notification::LeadNotifier;
use intake_store::SubmissionStore;

use crate::{botcheck::BotVerifier, error::ApiError};

pub const ACK_MESSAGE: &str = "Thank you for your message. We will be in touch soon.";

/// The submission pipeline both public endpoints share: validate, bot-check,
/// store, notify. Storage failure aborts the request; a stored lead is never
/// rolled back when the notification afterwards fails.
#[tracing::instrument(skip_all, fields(email = %submission.email))]
pub async fn process_submission(
    submission: ContactSubmission,
    store: &dyn SubmissionStore,
    notifier: &LeadNotifier,
    bot_verifier: Option<&Arc<dyn BotVerifier>>,
) -> Result<&'static str, ApiError> {
    submission.check()?;

    if let Some(verifier) = bot_verifier {
        let passed = verifier
            .verify(&submission.turnstile_token)
            .await
            .map_err(|err| ApiError::Internal(err.into()))?;
        if !passed {
            return Err(ApiError::BotCheckFailed);
        }
    }

    let record = LeadRecord::new(submission);
    store.put(&record).await?;
    tracing::info!(lead = %record.id, "lead stored");

    notifier.notify(&record).await?;

    Ok(ACK_MESSAGE)
}
