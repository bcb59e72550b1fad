pub mod template;
pub mod webhook;

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::task::JoinHandle;

use crate::config::AppConfig;
use crate::document::Document;
use crate::error::{transport_detail, DispatchError};
use crate::model::{JournalEntry, WorkItem};
use crate::projector;

pub use webhook::{resolve_endpoint, WebhookDispatcher};

/// Result of one notification attempt. Never an error for the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Sent,
    Skipped(SkipReason),
    Failed(FailureReason),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    InvalidEndpoint,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureReason {
    Transport(String),
    NonSuccessStatus(u16),
}

impl Outcome {
    pub fn is_sent(&self) -> bool {
        matches!(self, Outcome::Sent)
    }
}

impl From<DispatchError> for Outcome {
    fn from(err: DispatchError) -> Self {
        match err {
            DispatchError::Configuration(_) => Outcome::Skipped(SkipReason::InvalidEndpoint),
            DispatchError::Transport(e) => {
                Outcome::Failed(FailureReason::Transport(transport_detail(&e)))
            }
            DispatchError::Protocol { status } => {
                Outcome::Failed(FailureReason::NonSuccessStatus(status))
            }
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Sent => f.write_str("sent"),
            Outcome::Skipped(SkipReason::InvalidEndpoint) => {
                f.write_str("skipped: invalid or missing endpoint")
            }
            Outcome::Failed(FailureReason::Transport(e)) => write!(f, "failed: transport: {e}"),
            Outcome::Failed(FailureReason::NonSuccessStatus(status)) => {
                write!(f, "failed: non-200 response ({status})")
            }
        }
    }
}

/// Something that can deliver an event document to a chat endpoint.
#[async_trait]
pub trait Notifier: Send + Sync {
    fn name(&self) -> &str;

    /// Deliver `document` (an `{"issue": ...}` envelope) for `event`.
    /// At most one attempt; failures are logged, never returned as errors.
    async fn notify(&self, event: &str, document: &Document) -> Outcome;
}


pub fn create_notifier(config: &AppConfig) -> Result<Box<dyn Notifier>, DispatchError> {
    Ok(Box::new(WebhookDispatcher::new(config.dispatch_settings())?))
}

/// Project a work item and hand it to `notifier`.
pub async fn notify_issue(
    notifier: &dyn Notifier,
    event: &str,
    item: &WorkItem,
    journals: Option<&[JournalEntry]>,
) -> Outcome {
    let document = projector::issue_event(projector::project(item, journals));
    notifier.notify(event, &document).await
}

/// Project now, deliver on a background task. The triggering action does not
/// wait on the network; await the handle only if the outcome matters.
///
/// # Panics
///
/// Panics when called outside a Tokio runtime, like [`tokio::spawn`].
pub fn spawn_notify_issue(
    notifier: Arc<dyn Notifier>,
    event: impl Into<String>,
    item: &WorkItem,
    journals: Option<&[JournalEntry]>,
) -> JoinHandle<Outcome> {
    let event = event.into();
    let document = projector::issue_event(projector::project(item, journals));
    tokio::spawn(async move { notifier.notify(&event, &document).await })
}
