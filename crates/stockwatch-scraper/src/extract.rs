//! Availability extraction from the vendor's `fulfillment-messages` payload.
//!
//! The payload schema is an external contract and only partially known.
//! Every lookup here goes through optional accessors: a missing or
//! wrongly-typed key yields nothing for that entry and extraction carries on
//! with the rest. Extraction never fails; an unrecognizable document is
//! rejected earlier, at the fetch boundary.

use serde_json::Value;

use stockwatch_core::{AvailabilityFact, DELIVERY_STORE_ID};

const PICKUP_STORES: &str = "/body/content/pickupMessage/stores";
const DELIVERY_MESSAGE: &str = "/body/content/deliveryMessage";

/// Extracts pickup and delivery facts for the requested part numbers.
///
/// Pickup facts come first, in the order the vendor listed its stores;
/// delivery facts (at most one per part) come last. Part numbers the payload
/// does not mention produce no facts.
#[must_use]
pub fn extract_availability(doc: &Value, parts: &[&str]) -> Vec<AvailabilityFact> {
    let mut facts = pickup_facts(doc, parts);
    facts.extend(delivery_facts(doc, parts));
    facts
}

fn pickup_facts(doc: &Value, parts: &[&str]) -> Vec<AvailabilityFact> {
    let Some(stores) = doc.pointer(PICKUP_STORES).and_then(Value::as_array) else {
        return Vec::new();
    };

    let mut facts = Vec::new();
    for store in stores {
        let Some(store_identifier) = text_at(store, "/storeNumber") else {
            continue;
        };
        let store_name =
            text_at(store, "/storeName").or_else(|| text_at(store, "/retailStore/name"));
        let Some(availability) = store.get("partsAvailability").and_then(Value::as_object) else {
            continue;
        };

        for part in parts {
            let Some(entry) = availability.get(*part).filter(|v| v.is_object()) else {
                continue;
            };
            let display_text = text_at(entry, "/pickupDisplay")
                .or_else(|| text_at(entry, "/pickupSearchQuote"))
                .or_else(|| text_at(entry, "/storePickupQuote"))
                .unwrap_or_default();

            facts.push(AvailabilityFact {
                store_identifier: store_identifier.to_owned(),
                store_name: store_name.map(str::to_owned),
                part_identifier: (*part).to_owned(),
                is_buyable: flag_at(entry, "/buyability/isBuyable"),
                display_text: display_text.to_owned(),
            });
        }
    }
    facts
}

fn delivery_facts(doc: &Value, parts: &[&str]) -> Vec<AvailabilityFact> {
    let Some(delivery) = doc.pointer(DELIVERY_MESSAGE).and_then(Value::as_object) else {
        return Vec::new();
    };

    parts
        .iter()
        .filter_map(|part| {
            let entry = delivery.get(*part).filter(|v| v.is_object())?;
            let display_text = text_at(entry, "/regular/stickyMessageSTH")
                .or_else(|| text_at(entry, "/compact/quote"))
                .or_else(|| text_at(entry, "/regular/deliveryOptionMessages/0/displayName"))
                .unwrap_or_default();

            Some(AvailabilityFact {
                store_identifier: DELIVERY_STORE_ID.to_owned(),
                store_name: None,
                part_identifier: (*part).to_owned(),
                is_buyable: flag_at(entry, "/regular/buyability/isBuyable"),
                display_text: display_text.to_owned(),
            })
        })
        .collect()
}

/// Non-blank string at a JSON pointer, trimmed.
fn text_at<'a>(value: &'a Value, pointer: &str) -> Option<&'a str> {
    value
        .pointer(pointer)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
}

/// Boolean at a JSON pointer; anything other than `true` reads as `false`.
fn flag_at(value: &Value, pointer: &str) -> bool {
    value
        .pointer(pointer)
        .and_then(Value::as_bool)
        .unwrap_or(false)
}

#[cfg(test)]
#[path = "extract_test.rs"]
mod tests;
