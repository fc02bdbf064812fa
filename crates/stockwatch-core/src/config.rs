use std::path::PathBuf;

use crate::app_config::{AppConfig, FetchConfig, TelegramConfig};
use crate::detector::DetectorPolicy;
use crate::ConfigError;

pub(crate) const DEFAULT_ENDPOINT_URL: &str = "https://www.apple.com/sg/shop/fulfillment-messages";

pub(crate) const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/140.0.0.0 Safari/537.36";

pub(crate) const DEFAULT_TELEGRAM_API_URL: &str = "https://api.telegram.org";

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if a value is invalid or the Telegram credentials
/// are only partially configured.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if a value is invalid or the Telegram credentials
/// are only partially configured.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Decoupled from the real environment so tests can drive it with a plain
/// `HashMap` instead of `set_var`/`remove_var`.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    // Blank values are treated as unset so `FOO=` in a `.env` file or an
    // absent CI input falls back to the default instead of failing the run.
    let optional = |var: &str| -> Option<String> {
        lookup(var)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    };

    let or_default = |var: &str, default: &str| -> String {
        optional(var).unwrap_or_else(|| default.to_string())
    };

    let parse_u32 = |var: &str, default: &str| -> Result<u32, ConfigError> {
        let raw = or_default(var, default);
        raw.trim()
            .parse::<u32>()
            .map_err(|e| ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: e.to_string(),
            })
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        raw.trim()
            .parse::<u64>()
            .map_err(|e| ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: e.to_string(),
            })
    };

    let parse_flag = |var: &str, default: bool| -> Result<bool, ConfigError> {
        match optional(var) {
            Some(raw) => parse_bool(var, &raw),
            None => Ok(default),
        }
    };

    let watchlist_path = PathBuf::from(or_default(
        "STOCKWATCH_WATCHLIST_PATH",
        "./config/watchlist.yaml",
    ));
    let state_path = PathBuf::from(or_default(
        "STOCKWATCH_STATE_PATH",
        "./state/stock_state.json",
    ));
    let log_level = or_default("STOCKWATCH_LOG_LEVEL", "info");

    let request_timeout_secs = parse_u64("STOCKWATCH_REQUEST_TIMEOUT_SECS", "10")?;
    if request_timeout_secs == 0 {
        return Err(ConfigError::InvalidEnvVar {
            var: "STOCKWATCH_REQUEST_TIMEOUT_SECS".to_string(),
            reason: "timeout must be at least 1 second".to_string(),
        });
    }

    let fetch = FetchConfig {
        endpoint_url: or_default("STOCKWATCH_ENDPOINT_URL", DEFAULT_ENDPOINT_URL),
        request_timeout_secs,
        user_agent: or_default("STOCKWATCH_USER_AGENT", DEFAULT_USER_AGENT),
        referer: optional("STOCKWATCH_REFERER"),
        cookie: optional("STOCKWATCH_COOKIE"),
        search_nearby: parse_flag("STOCKWATCH_SEARCH_NEARBY", true)?,
        inter_request_delay_ms: parse_u64("STOCKWATCH_INTER_REQUEST_DELAY_MS", "1500")?,
    };

    let detector = DetectorPolicy {
        failure_alert_threshold: parse_u32("STOCKWATCH_FAILURE_ALERT_THRESHOLD", "3")?,
        notify_first_run: parse_flag("STOCKWATCH_NOTIFY_FIRST_RUN", true)?,
        notify_empty_stock: parse_flag("STOCKWATCH_NOTIFY_EMPTY_STOCK", false)?,
    };

    let telegram = match (optional("TELEGRAM_BOT_TOKEN"), optional("TELEGRAM_CHAT_ID")) {
        (Some(bot_token), Some(chat_id)) => Some(TelegramConfig {
            bot_token,
            chat_id,
            api_base_url: or_default("STOCKWATCH_TELEGRAM_API_URL", DEFAULT_TELEGRAM_API_URL),
        }),
        (None, None) => None,
        (Some(_), None) => {
            return Err(ConfigError::MissingEnvVar("TELEGRAM_CHAT_ID".to_string()));
        }
        (None, Some(_)) => {
            return Err(ConfigError::MissingEnvVar("TELEGRAM_BOT_TOKEN".to_string()));
        }
    };

    Ok(AppConfig {
        watchlist_path,
        state_path,
        log_level,
        fetch,
        detector,
        telegram,
    })
}

/// Parse a boolean flag. Accepts `true/false`, `1/0`, `yes/no`, `on/off`
/// in any case.
fn parse_bool(var: &str, raw: &str) -> Result<bool, ConfigError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Ok(true),
        "false" | "0" | "no" | "off" => Ok(false),
        other => Err(ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: format!("expected a boolean, got '{other}'"),
        }),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
