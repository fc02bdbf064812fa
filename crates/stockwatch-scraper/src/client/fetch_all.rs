use std::time::Duration;

use stockwatch_core::{AvailabilityFact, RunOutcome, StockSnapshot, WatchList};

use super::FulfillmentClient;
use crate::error::FetchError;
use crate::extract::extract_availability;

/// One part/store request that did not produce a usable document.
#[derive(Debug)]
pub struct RequestFailure {
    pub part_number: String,
    pub store: String,
    pub error: FetchError,
}

/// Everything one sweep over the watch list produced.
#[derive(Debug, Default)]
pub struct FetchReport {
    /// Facts from every successful request, in request order.
    pub facts: Vec<AvailabilityFact>,
    pub failures: Vec<RequestFailure>,
    pub requests: usize,
}

impl FetchReport {
    /// One-line description of every failed request, for logs and alerts.
    #[must_use]
    pub fn failure_summary(&self) -> String {
        self.failures
            .iter()
            .map(|f| format!("{} @ {}: {}", f.part_number, f.store, f.error))
            .collect::<Vec<_>>()
            .join("; ")
    }

    /// Folds the sweep into a run outcome.
    ///
    /// Any failed request fails the whole run, so a baseline is never
    /// replaced by a snapshot built from partial data.
    #[must_use]
    pub fn into_outcome(self, watchlist: &WatchList) -> RunOutcome {
        if self.failures.is_empty() {
            RunOutcome::Success(StockSnapshot::from_facts(self.facts, watchlist))
        } else {
            RunOutcome::Failure(format!(
                "{} of {} requests failed: {}",
                self.failures.len(),
                self.requests,
                self.failure_summary()
            ))
        }
    }
}

impl FulfillmentClient {
    /// Fetches every part at every store in the watch list, in configured
    /// order (parts outer, stores inner).
    ///
    /// `inter_request_delay_ms` is slept between consecutive requests. A
    /// failed request is recorded and the sweep continues.
    pub async fn fetch_all(
        &self,
        watchlist: &WatchList,
        inter_request_delay_ms: u64,
    ) -> FetchReport {
        let mut report = FetchReport::default();

        for part in &watchlist.parts {
            for store in &watchlist.stores {
                if report.requests > 0 && inter_request_delay_ms > 0 {
                    tokio::time::sleep(Duration::from_millis(inter_request_delay_ms)).await;
                }
                report.requests += 1;

                let part_number = part.part_number.as_str();
                match self.fetch_availability(part_number, store).await {
                    Ok(doc) => {
                        let facts = extract_availability(&doc, &[part_number]);
                        tracing::debug!(
                            part = part_number,
                            store = %store,
                            facts = facts.len(),
                            buyable = facts.iter().filter(|f| f.is_buyable).count(),
                            "fetched availability"
                        );
                        report.facts.extend(facts);
                    }
                    Err(error) => {
                        tracing::warn!(
                            part = part_number,
                            store = %store,
                            kind = error.kind(),
                            error = %error,
                            "availability request failed"
                        );
                        report.failures.push(RequestFailure {
                            part_number: part_number.to_owned(),
                            store: store.clone(),
                            error,
                        });
                    }
                }
            }
        }

        report
    }
}
