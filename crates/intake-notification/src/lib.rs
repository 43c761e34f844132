//! Lead notification emails: formatting and provider dispatch.

mod mailer;
mod notifier;

pub use mailer::*;
pub use notifier::*;
