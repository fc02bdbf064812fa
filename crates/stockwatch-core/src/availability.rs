//! Normalized availability facts and the comparable snapshot rendered from them.
//!
//! A [`StockSnapshot`] is compared across runs purely by its rendered string:
//! two snapshots are equal iff [`StockSnapshot::rendered`] returns the same
//! text. No semantic diffing happens anywhere.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::watchlist::WatchList;

/// Store identifier used for the synthetic delivery fact of each part.
pub const DELIVERY_STORE_ID: &str = "delivery";

/// Text rendered for a buyable fact whose payload carried no display string.
const FALLBACK_DISPLAY_TEXT: &str = "available";

/// One store/part availability reading extracted from a vendor payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AvailabilityFact {
    pub store_identifier: String,
    pub store_name: Option<String>,
    pub part_identifier: String,
    pub is_buyable: bool,
    pub display_text: String,
}

impl AvailabilityFact {
    /// `true` for the synthetic per-part delivery fact.
    #[must_use]
    pub fn is_delivery(&self) -> bool {
        self.store_identifier == DELIVERY_STORE_ID
    }

    fn store_label(&self) -> &str {
        self.store_name
            .as_deref()
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .unwrap_or(&self.store_identifier)
    }

    fn render(&self, watchlist: &WatchList) -> String {
        let text = self.display_text.trim();
        let text = if text.is_empty() {
            FALLBACK_DISPLAY_TEXT
        } else {
            text
        };
        format!(
            "{} - {}: {}",
            self.store_label(),
            watchlist.label_for(&self.part_identifier),
            text
        )
    }
}

/// The buyable subset of one run's facts, rendered for comparison.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StockSnapshot {
    facts: Vec<AvailabilityFact>,
    rendered: String,
}

impl StockSnapshot {
    /// Builds a snapshot from facts in source order.
    ///
    /// Non-buyable facts are dropped. When several requests report the same
    /// (store, part) pair, only the first occurrence is kept, so overlapping
    /// nearby-store results do not duplicate lines.
    #[must_use]
    pub fn from_facts(facts: Vec<AvailabilityFact>, watchlist: &WatchList) -> Self {
        let mut seen = HashSet::new();
        let facts: Vec<AvailabilityFact> = facts
            .into_iter()
            .filter(|f| f.is_buyable)
            .filter(|f| seen.insert((f.store_identifier.clone(), f.part_identifier.clone())))
            .collect();

        let rendered = facts
            .iter()
            .map(|f| f.render(watchlist))
            .collect::<Vec<_>>()
            .join("\n");

        Self { facts, rendered }
    }

    /// A snapshot with no offers.
    #[cfg(test)]
    pub(crate) fn empty() -> Self {
        Self {
            facts: Vec::new(),
            rendered: String::new(),
        }
    }

    #[must_use]
    pub fn facts(&self) -> &[AvailabilityFact] {
        &self.facts
    }

    #[must_use]
    pub fn rendered(&self) -> &str {
        &self.rendered
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rendered.is_empty()
    }
}
