use std::path::PathBuf;

use crate::detector::DetectorPolicy;

/// Settings for the availability endpoint client.
#[derive(Clone, PartialEq, Eq)]
pub struct FetchConfig {
    pub endpoint_url: String,
    pub request_timeout_secs: u64,
    pub user_agent: String,
    pub referer: Option<String>,
    pub cookie: Option<String>,
    pub search_nearby: bool,
    pub inter_request_delay_ms: u64,
}

impl std::fmt::Debug for FetchConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FetchConfig")
            .field("endpoint_url", &self.endpoint_url)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("user_agent", &self.user_agent)
            .field("referer", &self.referer)
            .field("cookie", &self.cookie.as_ref().map(|_| "[redacted]"))
            .field("search_nearby", &self.search_nearby)
            .field("inter_request_delay_ms", &self.inter_request_delay_ms)
            .finish()
    }
}

/// Telegram Bot API credentials. Present only when both the token and the
/// chat id are configured.
#[derive(Clone, PartialEq, Eq)]
pub struct TelegramConfig {
    pub bot_token: String,
    pub chat_id: String,
    pub api_base_url: String,
}

impl std::fmt::Debug for TelegramConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TelegramConfig")
            .field("bot_token", &"[redacted]")
            .field("chat_id", &self.chat_id)
            .field("api_base_url", &self.api_base_url)
            .finish()
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub watchlist_path: PathBuf,
    pub state_path: PathBuf,
    pub log_level: String,
    pub fetch: FetchConfig,
    pub detector: DetectorPolicy,
    pub telegram: Option<TelegramConfig>,
}
