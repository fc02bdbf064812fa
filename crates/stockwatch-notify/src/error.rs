use thiserror::Error;

/// Errors returned by notification sinks.
///
/// Bot tokens are part of the request URL, so transport errors are stored
/// with the URL stripped and never echo credentials.
#[derive(Debug, Error)]
pub enum NotifyError {
    /// Network or TLS failure from the underlying HTTP client.
    #[error("HTTP error: {0}")]
    Http(#[source] reqwest::Error),

    /// The notification API answered with a non-2xx status.
    #[error("notification rejected with status {status}: {body}")]
    Rejected { status: u16, body: String },

    #[error("invalid notification endpoint '{endpoint}': {reason}")]
    InvalidEndpoint { endpoint: String, reason: String },
}

impl From<reqwest::Error> for NotifyError {
    fn from(err: reqwest::Error) -> Self {
        NotifyError::Http(err.without_url())
    }
}
