//! Discord webhook delivery.
//!
//! [`DiscordWebhook`] renders an [`ExternalNotice`] as a Discord webhook message
//! (one embed, role mention in the content) and sends it via HTTP POST. A single
//! attempt is made; HTTP 200 and 204 count as delivered.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Serialize;

use crate::{
    clock::{format_time, format_timestamp},
    error::NotifyError,
    notify::sink::{ExternalNotice, ExternalSink},
};

/// HTTP request timeout for a single delivery attempt.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

const USERNAME: &str = "RebootScheduler";
const ICON_URL: &str = "https://i.imgur.com/O7s0Z1i.png";

// ---------------------------------------------------------------------------
// Payload
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct WebhookMessage {
    pub username: String,
    pub avatar_url: String,
    pub content: String,
    pub embeds: Vec<Embed>,
}

#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct Embed {
    pub title: String,
    pub description: String,
    pub color: u32,
    pub thumbnail: EmbedImage,
    pub fields: Vec<EmbedField>,
    pub footer: EmbedFooter,
}

#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct EmbedImage {
    pub url: String,
}

#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct EmbedField {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    pub inline: bool,
}

#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct EmbedFooter {
    pub text: String,
    pub icon_url: String,
}

impl WebhookMessage {
    /// Renders a notice, mentioning `role` when set.
    pub fn render(notice: &ExternalNotice, role: Option<u64>) -> Self {
        let content = role.map(|r| format!("<@&{r}>")).unwrap_or_default();
        let duration = format_time(notice.seconds_left);

        Self {
            username: USERNAME.to_string(),
            avatar_url: ICON_URL.to_string(),
            content,
            embeds: vec![Embed {
                title: notice.title.clone(),
                description: notice.status.description(&duration),
                color: notice.status.color(),
                thumbnail: EmbedImage {
                    url: ICON_URL.to_string(),
                },
                fields: vec![
                    EmbedField {
                        name: "Restart time".to_string(),
                        value: notice.scheduled_at.map(format_timestamp),
                        inline: true,
                    },
                    EmbedField {
                        name: "Reason".to_string(),
                        value: notice.reason.map(|r| r.to_string()),
                        inline: true,
                    },
                ],
                footer: EmbedFooter {
                    text: USERNAME.to_string(),
                    icon_url: ICON_URL.to_string(),
                },
            }],
        }
    }
}

// ---------------------------------------------------------------------------
// DiscordWebhook
// ---------------------------------------------------------------------------

/// Delivers notices to a Discord webhook URL.
pub struct DiscordWebhook {
    client: reqwest::Client,
    url: String,
    role: Option<u64>,
}

impl DiscordWebhook {
    /// Creates a sink with a pre-configured HTTP client.
    pub fn new(url: impl Into<String>, role: Option<u64>) -> Result<Self, NotifyError> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        Ok(Self {
            client,
            url: url.into(),
            role,
        })
    }
}

#[async_trait]
impl ExternalSink for DiscordWebhook {
    async fn deliver(&self, notice: &ExternalNotice) -> Result<(), NotifyError> {
        let payload = WebhookMessage::render(notice, self.role);
        let response = self.client.post(&self.url).json(&payload).send().await?;
        match response.status() {
            StatusCode::OK | StatusCode::NO_CONTENT => Ok(()),
            other => Err(NotifyError::HttpStatus(other.as_u16())),
        }
    }

    fn name(&self) -> &'static str {
        "discord-webhook"
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
