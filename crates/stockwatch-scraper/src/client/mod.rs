//! HTTP client for the vendor's `fulfillment-messages` availability endpoint.

mod fetch_all;

use std::time::Duration;

use reqwest::{Client, Url};
use serde_json::Value;

use stockwatch_core::FetchConfig;

use crate::error::FetchError;

pub use fetch_all::{FetchReport, RequestFailure};

/// Characters of a non-2xx body kept in the warning log.
const BODY_PREVIEW_CHARS: usize = 300;

/// Client for the availability endpoint.
///
/// Performs exactly one timed GET per call. There is no retry here: retry
/// policy lives across scheduled runs, in the failure counter.
pub struct FulfillmentClient {
    client: Client,
    base_url: Url,
    referer: Option<String>,
    cookie: Option<String>,
    search_nearby: bool,
}

impl FulfillmentClient {
    /// Creates a client pointed at the configured endpoint.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed, or [`FetchError::InvalidEndpoint`] if the
    /// endpoint is not an absolute http(s) URL.
    pub fn new(config: &FetchConfig) -> Result<Self, FetchError> {
        Self::with_base_url(config, &config.endpoint_url)
    }

    /// Creates a client with a custom endpoint (for testing with wiremock).
    ///
    /// # Errors
    ///
    /// Same as [`FulfillmentClient::new`].
    pub fn with_base_url(config: &FetchConfig, base_url: &str) -> Result<Self, FetchError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .connect_timeout(Duration::from_secs(config.request_timeout_secs.min(10)))
            .user_agent(config.user_agent.as_str())
            .build()?;

        let base_url = Url::parse(base_url).map_err(|e| FetchError::InvalidEndpoint {
            endpoint: base_url.to_owned(),
            reason: e.to_string(),
        })?;
        if !matches!(base_url.scheme(), "http" | "https") {
            return Err(FetchError::InvalidEndpoint {
                endpoint: base_url.to_string(),
                reason: format!("unsupported scheme '{}'", base_url.scheme()),
            });
        }

        Ok(Self {
            client,
            base_url,
            referer: config.referer.clone(),
            cookie: config.cookie.clone(),
            search_nearby: config.search_nearby,
        })
    }

    /// Fetches the availability document for one part at one store.
    ///
    /// # Errors
    ///
    /// - [`FetchError::Timeout`] if the request exceeds the configured timeout.
    /// - [`FetchError::Http`] on any other network failure.
    /// - [`FetchError::UnexpectedStatus`] on a non-2xx status.
    /// - [`FetchError::Deserialize`] if the body is not JSON.
    /// - [`FetchError::UnrecognizedSchema`] if the JSON is not an object.
    pub async fn fetch_availability(
        &self,
        part_number: &str,
        store: &str,
    ) -> Result<Value, FetchError> {
        let url = self.availability_url(part_number, store);
        let url_str = url.to_string();

        let mut request = self
            .client
            .get(url)
            .header(reqwest::header::ACCEPT, "application/json,*/*;q=0.8")
            .header(reqwest::header::ACCEPT_LANGUAGE, "en-SG,en;q=0.9")
            .header(reqwest::header::CACHE_CONTROL, "no-cache");
        if let Some(referer) = &self.referer {
            request = request.header(reqwest::header::REFERER, referer);
        }
        if let Some(cookie) = &self.cookie {
            request = request.header(reqwest::header::COOKIE, cookie);
        }

        let response = request
            .send()
            .await
            .map_err(|e| classify_transport_error(e, &url_str))?;
        let status = response.status();

        if !status.is_success() {
            let preview = response
                .text()
                .await
                .map(|body| preview(&body))
                .unwrap_or_default();
            tracing::warn!(
                status = status.as_u16(),
                url = %url_str,
                body_preview = %preview,
                "availability endpoint returned non-success status"
            );
            return Err(FetchError::UnexpectedStatus {
                status: status.as_u16(),
                url: url_str,
            });
        }

        let body = response
            .text()
            .await
            .map_err(|e| classify_transport_error(e, &url_str))?;
        let doc: Value = serde_json::from_str(&body).map_err(|e| FetchError::Deserialize {
            context: format!("availability of {part_number} at {store}"),
            source: e,
        })?;

        if !doc.is_object() {
            return Err(FetchError::UnrecognizedSchema {
                url: url_str,
                reason: "top-level JSON value is not an object".to_owned(),
            });
        }

        Ok(doc)
    }

    /// Builds the request URL with properly percent-encoded query parameters.
    fn availability_url(&self, part_number: &str, store: &str) -> Url {
        let mut url = self.base_url.clone();
        {
            let mut pairs = url.query_pairs_mut();
            pairs.append_pair("fae", "true");
            pairs.append_pair("pl", "true");
            pairs.append_pair("mts.0", "regular");
            pairs.append_pair("mts.1", "compact");
            pairs.append_pair("parts.0", part_number);
            pairs.append_pair(
                "searchNearby",
                if self.search_nearby { "true" } else { "false" },
            );
            pairs.append_pair("store", store);
        }
        url
    }
}

fn classify_transport_error(err: reqwest::Error, url: &str) -> FetchError {
    if err.is_timeout() {
        FetchError::Timeout {
            url: url.to_owned(),
        }
    } else {
        FetchError::Http(err)
    }
}

/// First [`BODY_PREVIEW_CHARS`] characters of a body, on one line.
fn preview(body: &str) -> String {
    body.chars()
        .take(BODY_PREVIEW_CHARS)
        .map(|c| if c == '\n' || c == '\r' { ' ' } else { c })
        .collect()
}

#[cfg(test)]
#[path = "../client_test.rs"]
mod tests;
