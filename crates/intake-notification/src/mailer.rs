use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;

/// One fully-formatted message, ready for the provider.
#[derive(Debug, Clone, Serialize)]
pub struct OutboundEmail {
    pub from: String,
    pub to: String,
    pub subject: String,
    pub html: String,
    pub text: String,
}

#[derive(Debug, Error)]
pub enum MailerError {
    #[error("email provider request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("email provider rejected the message (status {status})")]
    Provider { status: u16, body: String },
}

/// The "send email" seam of the submission pipeline.
#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, email: &OutboundEmail) -> Result<(), MailerError>;
}

/// Transactional email provider client. Posts the message as JSON with a
/// bearer API key; one attempt per message, no retry or queuing.
pub struct ProviderClient {
    client: reqwest::Client,
    url: String,
    api_key: String,
}

impl ProviderClient {
    pub fn new(url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            url: url.into(),
            api_key: api_key.into(),
        }
    }
}

#[async_trait]
impl Mailer for ProviderClient {
    async fn send(&self, email: &OutboundEmail) -> Result<(), MailerError> {
        let response = self
            .client
            .post(&self.url)
            .bearer_auth(&self.api_key)
            .json(email)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::error!(
                status = status.as_u16(),
                %body,
                "email provider rejected the message"
            );
            return Err(MailerError::Provider {
                status: status.as_u16(),
                body,
            });
        }

        Ok(())
    }
}

/// Recording mailer for tests: keeps every message it is handed and can be
/// told to fail instead.
#[derive(Clone, Default)]
pub struct MockMailer {
    sent: Arc<Mutex<Vec<OutboundEmail>>>,
    fail: bool,
}

impl MockMailer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn sent(&self) -> Vec<OutboundEmail> {
        self.sent.lock().expect("mock mailer lock poisoned").clone()
    }
}

#[async_trait]
impl Mailer for MockMailer {
    async fn send(&self, email: &OutboundEmail) -> Result<(), MailerError> {
        if self.fail {
            return Err(MailerError::Provider {
                status: 500,
                body: "mock failure".to_string(),
            });
        }

        self.sent
            .lock()
            .expect("mock mailer lock poisoned")
            .push(email.clone());
        Ok(())
    }
}
