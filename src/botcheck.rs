use async_trait::async_trait;
use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum BotCheckError {
    #[error("bot verification request failed: {0}")]
    Transport(#[from] reqwest::Error),
}

/// Capability-gated bot verification. The pipeline only consults a verifier
/// when one is configured; with none, tokens are carried through unenforced.
#[async_trait]
pub trait BotVerifier: Send + Sync {
    async fn verify(&self, token: &str) -> Result<bool, BotCheckError>;
}

/// Cloudflare Turnstile server-side verification.
pub struct TurnstileVerifier {
    client: reqwest::Client,
    verify_url: String,
    secret_key: String,
}

impl TurnstileVerifier {
    pub fn new(verify_url: impl Into<String>, secret_key: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            verify_url: verify_url.into(),
            secret_key: secret_key.into(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct SiteverifyResponse {
    success: bool,
    #[serde(default, rename = "error-codes")]
    error_codes: Vec<String>,
}

#[async_trait]
impl BotVerifier for TurnstileVerifier {
    async fn verify(&self, token: &str) -> Result<bool, BotCheckError> {
        if token.is_empty() {
            tracing::warn!("submission without a turnstile token while verification is enabled");
            return Ok(false);
        }

        let response = self
            .client
            .post(&self.verify_url)
            .form(&[("secret", self.secret_key.as_str()), ("response", token)])
            .send()
            .await?;

        let body: SiteverifyResponse = response.json().await?;
        if !body.success {
            tracing::warn!(codes = ?body.error_codes, "turnstile rejected token");
        }

        Ok(body.success)
    }
}
