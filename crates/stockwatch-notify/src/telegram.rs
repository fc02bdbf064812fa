//! Telegram Bot API `sendMessage` sink.

use std::time::Duration;

use reqwest::{Client, Url};
use serde::Serialize;

use stockwatch_core::TelegramConfig;

use crate::error::NotifyError;
use crate::notifier::Notifier;

/// Longest message body the Bot API accepts.
pub const TELEGRAM_MAX_MESSAGE_CHARS: usize = 4096;

/// Characters of a rejection body kept in the error.
const REJECTION_BODY_CHARS: usize = 500;

#[derive(Serialize)]
struct SendMessage<'a> {
    chat_id: &'a str,
    text: &'a str,
    disable_web_page_preview: bool,
}

/// Pushes messages to one Telegram chat.
pub struct TelegramNotifier {
    client: Client,
    /// Carries the bot token; never logged.
    send_url: Url,
    chat_id: String,
}

impl std::fmt::Debug for TelegramNotifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TelegramNotifier")
            .field("api_host", &self.send_url.host_str())
            .field("bot_token", &"[redacted]")
            .field("chat_id", &self.chat_id)
            .finish_non_exhaustive()
    }
}

impl TelegramNotifier {
    /// Creates a notifier for the configured bot and chat.
    ///
    /// # Errors
    ///
    /// Returns [`NotifyError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed, or [`NotifyError::InvalidEndpoint`] if the API
    /// base URL is not an absolute http(s) URL.
    pub fn new(config: &TelegramConfig, timeout_secs: u64) -> Result<Self, NotifyError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(timeout_secs.min(10)))
            .build()?;

        let base = config.api_base_url.trim_end_matches('/');
        let base_url = Url::parse(base).map_err(|e| NotifyError::InvalidEndpoint {
            endpoint: base.to_owned(),
            reason: e.to_string(),
        })?;
        if !matches!(base_url.scheme(), "http" | "https") {
            return Err(NotifyError::InvalidEndpoint {
                endpoint: base.to_owned(),
                reason: format!("unsupported scheme '{}'", base_url.scheme()),
            });
        }

        // The token contains ':' so it cannot go through Url::join as a
        // relative reference.
        let send_url = Url::parse(&format!("{base}/bot{}/sendMessage", config.bot_token))
            .map_err(|_| NotifyError::InvalidEndpoint {
                endpoint: base.to_owned(),
                reason: "bot token does not form a valid URL path".to_owned(),
            })?;

        Ok(Self {
            client,
            send_url,
            chat_id: config.chat_id.clone(),
        })
    }
}

impl Notifier for TelegramNotifier {
    async fn notify(&self, message: &str) -> Result<(), NotifyError> {
        let text = truncate_message(message);
        let form = SendMessage {
            chat_id: &self.chat_id,
            text: &text,
            disable_web_page_preview: true,
        };

        let response = self
            .client
            .post(self.send_url.clone())
            .form(&form)
            .send()
            .await?;
        let status = response.status();

        if !status.is_success() {
            let body: String = response
                .text()
                .await
                .unwrap_or_default()
                .chars()
                .take(REJECTION_BODY_CHARS)
                .collect();
            tracing::warn!(
                status = status.as_u16(),
                body = %body,
                "telegram rejected message"
            );
            return Err(NotifyError::Rejected {
                status: status.as_u16(),
                body,
            });
        }

        tracing::debug!(
            chat_id = %self.chat_id,
            chars = text.chars().count(),
            "telegram message sent"
        );
        Ok(())
    }

    fn name(&self) -> &'static str {
        "telegram"
    }
}

/// Cuts `message` to the Bot API limit, marking the cut with an ellipsis.
fn truncate_message(message: &str) -> String {
    if message.chars().count() <= TELEGRAM_MAX_MESSAGE_CHARS {
        return message.to_owned();
    }
    let mut cut: String = message
        .chars()
        .take(TELEGRAM_MAX_MESSAGE_CHARS - 1)
        .collect();
    cut.push('…');
    cut
}
