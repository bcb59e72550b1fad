use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};

use super::template;
use super::{Notifier, Outcome};
use crate::config::DispatchSettings;
use crate::document::Document;
use crate::error::DispatchError;

/// Project custom field that overrides the configured endpoint.
pub const ENDPOINT_OVERRIDE_FIELD: &str = "notifications_endpoint";

/// Pick the first present, non-empty candidate and validate it as an
/// absolute `http`/`https` URL. Candidates are ordered by precedence; an
/// invalid winner does not fall through to the next candidate.
pub fn resolve_endpoint(candidates: &[Option<&str>]) -> Result<Url, DispatchError> {
    let raw = candidates
        .iter()
        .flatten()
        .map(|c| c.trim())
        .find(|c| !c.is_empty())
        .ok_or_else(|| DispatchError::Configuration("no endpoint configured".into()))?;

    let url = Url::parse(raw)
        .map_err(|e| DispatchError::Configuration(format!("cannot parse {raw:?}: {e}")))?;

    let supported = matches!(url.scheme(), "http" | "https") && url.has_host();
    if !supported {
        return Err(DispatchError::Configuration(format!(
            "unsupported endpoint {raw:?}"
        )));
    }
    Ok(url)
}

pub struct WebhookDispatcher {
    client: Client,
    settings: DispatchSettings,
}

impl WebhookDispatcher {
    pub fn new(settings: DispatchSettings) -> Result<Self, DispatchError> {
        if settings.timeout_secs == 0 {
            return Err(DispatchError::Configuration(
                "timeout_secs must be at least 1".into(),
            ));
        }

        let mut builder = Client::builder().timeout(Duration::from_secs(settings.timeout_secs));

        if settings.ssl_verify_none {
            tracing::warn!("TLS certificate verification is disabled for webhook delivery");
            builder = builder.danger_accept_invalid_certs(true);
        }

        let client = builder.build()?;
        Ok(Self { client, settings })
    }

    pub fn settings(&self) -> &DispatchSettings {
        &self.settings
    }

    /// Destination for `document`: the project's override field, then the
    /// configured default.
    pub fn endpoint_for(&self, document: &Document) -> Result<Url, DispatchError> {
        let project_override = document
            .pointer(&["issue", "project", ENDPOINT_OVERRIDE_FIELD])
            .and_then(Document::as_str);
        resolve_endpoint(&[
            project_override,
            self.settings.default_endpoint.as_deref(),
        ])
    }

    async fn deliver(&self, endpoint: &Url, body: &str) -> Result<(), DispatchError> {
        let response = self
            .client
            .post(endpoint.clone())
            .header("Content-Type", "application/json")
            .body(body.to_string())
            .send()
            .await?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(DispatchError::Protocol {
                status: status.as_u16(),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl Notifier for WebhookDispatcher {
    fn name(&self) -> &str {
        "webhook"
    }

    async fn notify(&self, event: &str, document: &Document) -> Outcome {
        let endpoint = match self.endpoint_for(document) {
            Ok(url) => url,
            Err(e) => {
                tracing::warn!(event, error = %e, "Notification skipped");
                return e.into();
            }
        };

        let message = template::render(event, document, &self.settings.issue_url_base);
        let body = serde_json::to_string(&message).unwrap_or_default();

        match self.deliver(&endpoint, &body).await {
            Ok(()) => {
                tracing::info!(
                    event,
                    endpoint = %endpoint,
                    request = %body,
                    status = 200,
                    "Notification has been sent"
                );
                Outcome::Sent
            }
            Err(DispatchError::Protocol { status }) => {
                tracing::error!(event, endpoint = %endpoint, status, "Sending notification failed");
                DispatchError::Protocol { status }.into()
            }
            Err(e) => {
                tracing::error!(event, endpoint = %endpoint, error = %e, "Sending notification failed");
                e.into()
            }
        }
    }
}
