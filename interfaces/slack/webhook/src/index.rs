use std::fmt;
use std::time::Duration;

use reqwest::{Client, StatusCode};
use thiserror::Error;
use tracing::debug;

use crate::message::NotificationMessage;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum WebhookUrlError {
    #[error("Slack webhook URL is empty")]
    Empty,

    #[error("Slack webhook URL must start with http:// or https://")]
    NotHttp,
}

/// Incoming-webhook URL. The path is the credential, so it is never printed.
#[derive(Clone)]
pub struct WebhookUrl(String);

impl WebhookUrl {
    pub fn new(url: impl AsRef<str>) -> Result<Self, WebhookUrlError> {
        let trimmed = url.as_ref().trim();
        if trimmed.is_empty() {
            return Err(WebhookUrlError::Empty);
        }
        if !(trimmed.starts_with("https://") || trimmed.starts_with("http://")) {
            return Err(WebhookUrlError::NotHttp);
        }
        Ok(Self(trimmed.to_owned()))
    }

    pub(crate) fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for WebhookUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("WebhookUrl([redacted])")
    }
}

#[derive(Debug, Error)]
pub enum SendMessageError {
    #[error("BuildClient: {source}")]
    BuildClient { source: reqwest::Error },

    #[error("RequestSend: {source}")]
    RequestSend { source: reqwest::Error },

    #[error("ResponseRead: {source}")]
    ResponseRead { source: reqwest::Error },

    #[error("Rejected: {status}: {body}")]
    Rejected { status: StatusCode, body: String },
}

/// Posts block messages to a single Slack incoming webhook.
#[derive(Debug, Clone)]
pub struct SlackWebhookClient {
    http: Client,
    url: WebhookUrl,
}

impl SlackWebhookClient {
    pub fn new(url: WebhookUrl, timeout: Duration) -> Result<Self, SendMessageError> {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|source| SendMessageError::BuildClient { source })?;

        Ok(Self { http, url })
    }

    pub async fn send(&self, message: &NotificationMessage) -> Result<(), SendMessageError> {
        let response = self
            .http
            .post(self.url.expose())
            .json(message)
            .send()
            .await
            .map_err(|source| SendMessageError::RequestSend {
                source: source.without_url(),
            })?;

        let status = response.status();

        let body = response
            .text()
            .await
            .map_err(|source| SendMessageError::ResponseRead {
                source: source.without_url(),
            })?;

        if !status.is_success() {
            return Err(SendMessageError::Rejected { status, body });
        }

        debug!(%status, "slack accepted message");
        Ok(())
    }
}
