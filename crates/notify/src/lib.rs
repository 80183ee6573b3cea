//! `trackline-notify` — injected notifier interface.
//!
//! Issue status changes fan out through [`Notifier`]. The side effect is
//! fire-and-forget: callers spawn the send off the request path, log a
//! failure at warn, and never surface it to the client.

pub mod smtp;

pub use smtp::SmtpNotifier;

use async_trait::async_trait;
use thiserror::Error;

use trackline_core::{IssueId, ProjectId};

/// Payload for a status-change email. Carries the *pre-update* status
/// alongside the new one for display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusChangeNotice {
    pub issue_id: IssueId,
    pub project_id: ProjectId,
    pub from_status: String,
    pub to_status: String,
    /// Project owner's email.
    pub recipient: String,
}

impl StatusChangeNotice {
    pub fn subject(&self) -> &'static str {
        "Status issue"
    }

    pub fn body(&self) -> String {
        format!(
            "Issue #{} for Project #{} has changed status from {} to {}",
            self.issue_id, self.project_id, self.from_status, self.to_status
        )
    }
}

#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("invalid mail address: {0}")]
    Address(#[from] lettre::address::AddressError),

    #[error("failed to build message: {0}")]
    Message(#[from] lettre::error::Error),

    #[error("smtp delivery failed: {0}")]
    Smtp(#[from] lettre::transport::smtp::Error),
}

#[async_trait]
pub trait Notifier: Send + Sync {
    async fn status_changed(&self, notice: StatusChangeNotice) -> Result<(), NotifyError>;
}

/// Discards notices. Used in tests and when no SMTP endpoint is configured.
#[derive(Debug, Default)]
pub struct NoopNotifier;

#[async_trait]
impl Notifier for NoopNotifier {
    async fn status_changed(&self, notice: StatusChangeNotice) -> Result<(), NotifyError> {
        tracing::debug!(
            issue_id = %notice.issue_id,
            to = %notice.recipient,
            "dropping status-change notice (noop notifier)"
        );
        Ok(())
    }
}
