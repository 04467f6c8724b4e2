//! Outbound email relay for new contact messages

use async_trait::async_trait;
use serde::Serialize;
use std::time::Duration;
use thiserror::Error;

use super::store::Message;
use crate::config::MailConfig;

/// Errors from handing a message to the relay
#[derive(Error, Debug)]
pub enum NotifyError {
    #[error("relay request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("relay rejected the message with status {0}")]
    Rejected(u16),
}

/// Something that can pass a stored message on to the site owner
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn notify(&self, message: &Message) -> Result<(), NotifyError>;
}

/// JSON body posted to the relay
#[derive(Debug, Serialize)]
struct RelayMail<'a> {
    from: &'a str,
    to: &'a str,
    reply_to: &'a str,
    subject: String,
    text: String,
}

/// HTTP mail relay: POSTs a JSON envelope, optionally with a bearer token
#[derive(Debug, Clone)]
pub struct MailRelay {
    client: reqwest::Client,
    url: String,
    token: Option<String>,
    from: String,
    to: String,
}

impl MailRelay {
    /// Build a relay from configuration, or `None` when mail is not configured
    pub fn from_config(config: &MailConfig) -> Result<Option<Self>, NotifyError> {
        let (Some(url), Some(to)) = (&config.relay_url, &config.to) else {
            return Ok(None);
        };

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Some(Self {
            client,
            url: url.clone(),
            token: config.token.clone(),
            from: config.from.clone(),
            to: to.clone(),
        }))
    }

    fn envelope<'a>(&'a self, message: &'a Message) -> RelayMail<'a> {
        RelayMail {
            from: &self.from,
            to: &self.to,
            reply_to: &message.email,
            subject: format!("Portfolio contact from {}", message.name),
            text: format!(
                "Name: {}\nEmail: {}\nSent: {}\n\n{}",
                message.name, message.email, message.timestamp, message.message
            ),
        }
    }
}

#[async_trait]
impl Notifier for MailRelay {
    async fn notify(&self, message: &Message) -> Result<(), NotifyError> {
        let mut request = self.client.post(&self.url).json(&self.envelope(message));
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(NotifyError::Rejected(status.as_u16()));
        }

        tracing::debug!("Relayed contact message to {}", self.to);
        Ok(())
    }
}
