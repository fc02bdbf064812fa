pub mod app_config;
pub mod availability;
pub mod config;
pub mod detector;
pub mod state;
pub mod watchlist;

pub use app_config::{AppConfig, FetchConfig, TelegramConfig};
pub use availability::{AvailabilityFact, StockSnapshot, DELIVERY_STORE_ID};
pub use config::{load_app_config, load_app_config_from_env};
pub use detector::{ChangeDetector, Decision, DetectorPolicy, Notification, Transition};
pub use state::{PersistedState, RunOutcome};
pub use watchlist::{load_watchlist, PartConfig, WatchList};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },

    #[error("failed to read watch list {path}: {source}")]
    WatchListIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse watch list: {0}")]
    WatchListParse(#[from] serde_yaml::Error),

    #[error("watch list validation failed: {0}")]
    Validation(String),
}
