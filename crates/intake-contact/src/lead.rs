use serde::Serialize;
use ulid::Ulid;

use crate::ContactSubmission;

/// The durable form of an accepted submission. Immutable once created; there
/// is no update, delete, or read-back path anywhere in the service.
#[derive(Debug, Clone, Serialize)]
pub struct LeadRecord {
    pub id: String,
    pub name: String,
    pub email: String,
    pub organization: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub service: Option<String>,
    pub submitted_at: String,
}

impl LeadRecord {
    /// Stamp a validated submission with its storage key and creation time.
    ///
    /// Keys are `lead:<ULID>`: the ULID keeps the epoch-millis ordering of a
    /// plain timestamp key while staying unique for submissions that land in
    /// the same millisecond.
    pub fn new(submission: ContactSubmission) -> Self {
        Self {
            id: format!("lead:{}", Ulid::new()),
            name: submission.name,
            email: submission.email,
            organization: submission.organization,
            message: submission.message,
            service: submission.service,
            submitted_at: chrono::Utc::now().to_rfc3339(),
        }
    }
}
