use thiserror::Error;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("request to {url} timed out")]
    Timeout { url: String },

    #[error("unexpected HTTP status {status} from {url}")]
    UnexpectedStatus { status: u16, url: String },

    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("unrecognized availability payload from {url}: {reason}")]
    UnrecognizedSchema { url: String, reason: String },

    #[error("invalid endpoint URL \"{endpoint}\": {reason}")]
    InvalidEndpoint { endpoint: String, reason: String },
}

impl FetchError {
    /// Short category used as a structured log field.
    ///
    /// Every variant folds into the same failed-run outcome; the category
    /// only tells an operator where to look.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            FetchError::Http(_) | FetchError::UnexpectedStatus { .. } => "http",
            FetchError::Timeout { .. } => "timeout",
            FetchError::Deserialize { .. } | FetchError::UnrecognizedSchema { .. } => "parse",
            FetchError::InvalidEndpoint { .. } => "config",
        }
    }
}
