//! Outbound alert delivery.

use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use std::time::Duration;
use tracing::{debug, info};

use crate::config::Settings;
use crate::error::NotifyError;
use crate::models::AlertEvent;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

#[async_trait]
pub trait Notifier: Send + Sync {
    async fn notify(&self, alert: &AlertEvent) -> Result<(), NotifyError>;
}

#[derive(Debug, Serialize)]
struct SendMessage<'a> {
    chat_id: &'a str,
    text: String,
}

/// Sends alerts to a Telegram chat through the Bot API.
#[derive(Debug, Clone)]
pub struct TelegramNotifier {
    client: Client,
    api_base: String,
    token: String,
    chat_id: String,
}

impl TelegramNotifier {
    pub fn new(
        api_base: impl Into<String>,
        token: impl Into<String>,
        chat_id: impl Into<String>,
    ) -> Result<Self, NotifyError> {
        let client = Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self {
            client,
            api_base: api_base.into().trim_end_matches('/').to_string(),
            token: token.into(),
            chat_id: chat_id.into(),
        })
    }

    /// `None` unless both the bot token and the chat id are configured.
    pub fn from_settings(settings: &Settings) -> Option<Result<Self, NotifyError>> {
        let token = settings.telegram_bot_token.as_deref()?;
        let chat_id = settings.telegram_chat_id.as_deref()?;
        Some(Self::new(&settings.telegram_api_base, token, chat_id))
    }

    fn endpoint(&self) -> String {
        format!("{}/bot{}/sendMessage", self.api_base, self.token)
    }
}

#[async_trait]
impl Notifier for TelegramNotifier {
    async fn notify(&self, alert: &AlertEvent) -> Result<(), NotifyError> {
        let body = SendMessage {
            chat_id: &self.chat_id,
            text: alert.to_text(),
        };
        let response = self.client.post(self.endpoint()).json(&body).send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(NotifyError::Rejected {
                status: status.as_u16(),
                body,
            });
        }
        debug!(alert_id = %alert.id, "telegram message sent");
        Ok(())
    }
}

/// Fallback that only writes alerts to the log.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    async fn notify(&self, alert: &AlertEvent) -> Result<(), NotifyError> {
        info!(
            symbol = %alert.symbol,
            interval = %alert.interval,
            kind = alert.kind.as_str(),
            severity = ?alert.severity,
            price = alert.price,
            "{}: {}",
            alert.title,
            alert.message
        );
        Ok(())
    }
}
