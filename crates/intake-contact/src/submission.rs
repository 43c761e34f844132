use std::sync::LazyLock;

use regex::Regex;
use serde::Deserialize;
use thiserror::Error;
use validator::Validate;

static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap());

/// One contact-form payload as posted by the website.
///
/// Every field defaults to empty on deserialization so that an absent JSON
/// key is rejected by [`ContactSubmission::check`], not by the parser.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ContactSubmission {
    #[serde(default)]
    #[validate(length(min = 1))]
    pub name: String,
    #[serde(default)]
    #[validate(length(min = 1), regex(path = *EMAIL_RE))]
    pub email: String,
    /// Marked required on the client form but accepted empty here. The form
    /// keeps prompting for it; the server does not turn it away.
    #[serde(default)]
    pub organization: String,
    #[serde(default)]
    #[validate(length(min = 1))]
    pub message: String,
    /// Comma-joined list of selected service interests.
    #[serde(default)]
    pub service: Option<String>,
    #[serde(default, rename = "turnstileToken")]
    pub turnstile_token: String,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SubmissionError {
    #[error("Missing required fields")]
    MissingFields,
    #[error("Invalid email format")]
    InvalidEmailFormat,
}

impl ContactSubmission {
    /// Validate the payload without normalizing it.
    ///
    /// Missing or empty `name`/`email`/`message` is reported before a
    /// malformed email, so an empty email reads as a missing field.
    pub fn check(&self) -> Result<(), SubmissionError> {
        let Err(errors) = self.validate() else {
            return Ok(());
        };

        let fields = errors.field_errors();
        let missing = ["name", "email", "message"].iter().any(|field| {
            fields
                .get(*field)
                .is_some_and(|errs| errs.iter().any(|e| e.code == "length"))
        });

        if missing {
            return Err(SubmissionError::MissingFields);
        }

        Err(SubmissionError::InvalidEmailFormat)
    }
}
