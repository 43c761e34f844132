use std::sync::Arc;

use askama::Template;
use intake_contact::LeadRecord;
use thiserror::Error;

use crate::{Mailer, MailerError, OutboundEmail};

#[derive(Template)]
#[template(path = "lead.html")]
struct LeadHtmlTemplate<'a> {
    record: &'a LeadRecord,
}

#[derive(Template)]
#[template(path = "lead.txt")]
struct LeadTextTemplate<'a> {
    record: &'a LeadRecord,
}

#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("email provider API key is not configured")]
    NotConfigured,
    #[error("failed to render notification body: {0}")]
    Render(#[from] askama::Error),
    #[error(transparent)]
    Send(#[from] MailerError),
}

/// Formats and dispatches the operator notification for one lead.
///
/// The HTML variant is rendered through askama, which escapes every
/// interpolated field; the text variant is left verbatim.
#[derive(Clone)]
pub struct LeadNotifier {
    mailer: Option<Arc<dyn Mailer>>,
    from: String,
    to: String,
}

impl LeadNotifier {
    pub fn new(mailer: Arc<dyn Mailer>, from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            mailer: Some(mailer),
            from: from.into(),
            to: to.into(),
        }
    }

    /// Notifier for deployments with no provider API key. `notify` fails
    /// immediately without touching the network.
    pub fn disabled(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            mailer: None,
            from: from.into(),
            to: to.into(),
        }
    }

    #[tracing::instrument(skip_all, fields(lead = %record.id, to = %self.to))]
    pub async fn notify(&self, record: &LeadRecord) -> Result<(), NotifyError> {
        let Some(mailer) = &self.mailer else {
            return Err(NotifyError::NotConfigured);
        };

        let email = OutboundEmail {
            from: self.from.clone(),
            to: self.to.clone(),
            subject: format!("New inquiry from {}", record.name),
            html: LeadHtmlTemplate { record }.render()?,
            text: LeadTextTemplate { record }.render()?,
        };

        tracing::info!("sending lead notification");
        mailer.send(&email).await?;

        Ok(())
    }
}
