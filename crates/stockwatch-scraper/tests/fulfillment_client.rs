//! Integration tests for `FulfillmentClient` against a wiremock server.
//!
//! Covers the single-request error taxonomy (status, timeout, parse) and the
//! watch-list sweep that folds results into a run outcome.

use std::time::Duration;

use serde_json::json;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use stockwatch_core::{FetchConfig, PartConfig, RunOutcome, WatchList};
use stockwatch_scraper::{FetchError, FulfillmentClient};

const ORANGE: &str = "MFYN4X/A";
const BLUE: &str = "MG8J4X/A";

fn test_config(timeout_secs: u64) -> FetchConfig {
    FetchConfig {
        endpoint_url: "http://unused.invalid/".to_owned(),
        request_timeout_secs: timeout_secs,
        user_agent: "stockwatch-test/0.1".to_owned(),
        referer: Some("https://www.apple.com/sg/shop/buy-iphone".to_owned()),
        cookie: Some("dssid2=abc".to_owned()),
        search_nearby: true,
        inter_request_delay_ms: 0,
    }
}

fn test_client(server: &MockServer) -> FulfillmentClient {
    FulfillmentClient::with_base_url(
        &test_config(5),
        &format!("{}/sg/shop/fulfillment-messages", server.uri()),
    )
    .expect("failed to build test FulfillmentClient")
}

fn watchlist(parts: &[&str], stores: &[&str]) -> WatchList {
    WatchList {
        parts: parts
            .iter()
            .map(|p| PartConfig {
                name: None,
                part_number: (*p).to_owned(),
            })
            .collect(),
        stores: stores.iter().map(|s| (*s).to_owned()).collect(),
    }
}

/// Pickup payload for a single store and part.
fn pickup_body(store: &str, store_name: &str, part: &str, buyable: bool) -> serde_json::Value {
    let display = if buyable { "available" } else { "unavailable" };
    json!({
        "body": {
            "content": {
                "pickupMessage": {
                    "stores": [{
                        "storeNumber": store,
                        "storeName": store_name,
                        "partsAvailability": {
                            part: {
                                "pickupDisplay": display,
                                "buyability": { "isBuyable": buyable }
                            }
                        }
                    }]
                }
            }
        }
    })
}

// ---------------------------------------------------------------------------
// fetch_availability
// ---------------------------------------------------------------------------

#[tokio::test]
async fn fetch_availability_sends_query_and_headers() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/sg/shop/fulfillment-messages"))
        .and(query_param("parts.0", ORANGE))
        .and(query_param("store", "R633"))
        .and(query_param("searchNearby", "true"))
        .and(header("cookie", "dssid2=abc"))
        .and(header("referer", "https://www.apple.com/sg/shop/buy-iphone"))
        .and(header("user-agent", "stockwatch-test/0.1"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(pickup_body(
                "R633",
                "Orchard Road",
                ORANGE,
                true,
            )),
        )
        .expect(1)
        .mount(&server)
        .await;

    let doc = test_client(&server)
        .fetch_availability(ORANGE, "R633")
        .await
        .expect("should fetch availability");

    assert_eq!(
        doc.pointer("/body/content/pickupMessage/stores/0/storeNumber")
            .and_then(serde_json::Value::as_str),
        Some("R633")
    );
}

#[tokio::test]
async fn fetch_availability_maps_non_success_status() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(541).set_body_string("<html>blocked</html>"))
        .mount(&server)
        .await;

    let err = test_client(&server)
        .fetch_availability(ORANGE, "R633")
        .await
        .unwrap_err();

    assert!(
        matches!(err, FetchError::UnexpectedStatus { status: 541, .. }),
        "expected UnexpectedStatus(541), got: {err:?}"
    );
    assert_eq!(err.kind(), "http");
}

#[tokio::test]
async fn fetch_availability_maps_timeout() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({}))
                .set_delay(Duration::from_secs(3)),
        )
        .mount(&server)
        .await;

    let client = FulfillmentClient::with_base_url(&test_config(1), &server.uri())
        .expect("failed to build test FulfillmentClient");
    let err = client.fetch_availability(ORANGE, "R633").await.unwrap_err();

    assert!(
        matches!(err, FetchError::Timeout { .. }),
        "expected Timeout, got: {err:?}"
    );
    assert_eq!(err.kind(), "timeout");
}

#[tokio::test]
async fn fetch_availability_rejects_non_json_body() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>Access Denied</html>"))
        .mount(&server)
        .await;

    let err = test_client(&server)
        .fetch_availability(ORANGE, "R633")
        .await
        .unwrap_err();

    assert!(
        matches!(err, FetchError::Deserialize { .. }),
        "expected Deserialize, got: {err:?}"
    );
    assert_eq!(err.kind(), "parse");
}

#[tokio::test]
async fn fetch_availability_rejects_non_object_json() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([1, 2, 3])))
        .mount(&server)
        .await;

    let err = test_client(&server)
        .fetch_availability(ORANGE, "R633")
        .await
        .unwrap_err();

    assert!(
        matches!(err, FetchError::UnrecognizedSchema { .. }),
        "expected UnrecognizedSchema, got: {err:?}"
    );
}

#[tokio::test]
async fn fetch_availability_accepts_object_without_known_sections() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "head": {} })))
        .mount(&server)
        .await;

    let doc = test_client(&server)
        .fetch_availability(ORANGE, "R633")
        .await
        .expect("an object with no known sections is still a valid document");
    assert!(doc.is_object());
}

// ---------------------------------------------------------------------------
// fetch_all
// ---------------------------------------------------------------------------

#[tokio::test]
async fn fetch_all_sweeps_parts_by_stores_and_builds_snapshot() {
    let server = MockServer::start().await;

    for (part, store, name, buyable) in [
        (ORANGE, "R633", "Orchard Road", true),
        (ORANGE, "R641", "Marina Bay Sands", false),
        (BLUE, "R633", "Orchard Road", false),
        (BLUE, "R641", "Marina Bay Sands", true),
    ] {
        Mock::given(method("GET"))
            .and(query_param("parts.0", part))
            .and(query_param("store", store))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(pickup_body(store, name, part, buyable)),
            )
            .expect(1)
            .mount(&server)
            .await;
    }

    let list = watchlist(&[ORANGE, BLUE], &["R633", "R641"]);
    let report = test_client(&server).fetch_all(&list, 0).await;

    assert_eq!(report.requests, 4);
    assert!(report.failures.is_empty());
    assert_eq!(report.facts.len(), 4);

    match report.into_outcome(&list) {
        RunOutcome::Success(snapshot) => assert_eq!(
            snapshot.rendered(),
            "Orchard Road - MFYN4X/A: available\nMarina Bay Sands - MG8J4X/A: available"
        ),
        RunOutcome::Failure(reason) => panic!("expected success, got failure: {reason}"),
    }
}

#[tokio::test]
async fn fetch_all_records_failures_and_fails_the_run() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(query_param("store", "R633"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(pickup_body(
                "R633",
                "Orchard Road",
                ORANGE,
                true,
            )),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(query_param("store", "R641"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let list = watchlist(&[ORANGE], &["R633", "R641"]);
    let report = test_client(&server).fetch_all(&list, 0).await;

    assert_eq!(report.requests, 2);
    assert_eq!(report.facts.len(), 1, "successful request still extracted");
    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.failures[0].store, "R641");
    assert!(report.failure_summary().contains("503"));

    match report.into_outcome(&list) {
        RunOutcome::Failure(reason) => {
            assert!(reason.starts_with("1 of 2 requests failed"), "{reason}");
        }
        RunOutcome::Success(_) => panic!("partial sweep must not count as success"),
    }
}

#[tokio::test]
async fn fetch_all_with_no_stock_yields_empty_snapshot() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(pickup_body(
                "R633",
                "Orchard Road",
                ORANGE,
                false,
            )),
        )
        .mount(&server)
        .await;

    let list = watchlist(&[ORANGE], &["R633"]);
    let outcome = test_client(&server)
        .fetch_all(&list, 0)
        .await
        .into_outcome(&list);

    match outcome {
        RunOutcome::Success(snapshot) => assert!(snapshot.is_empty()),
        RunOutcome::Failure(reason) => panic!("expected success, got failure: {reason}"),
    }
}
