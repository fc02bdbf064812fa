use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::availability::StockSnapshot;

/// State carried between independent invocations.
///
/// `last_snapshot` is the baseline: the rendered snapshot of the most recent
/// successful run, `None` before the first one. An empty string is a valid
/// baseline meaning "nothing was available".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersistedState {
    #[serde(default)]
    pub last_snapshot: Option<String>,
    #[serde(default)]
    pub consecutive_failures: u32,
    /// When the state was last written. Informational only.
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Result of the fetch phase of one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    Success(StockSnapshot),
    Failure(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_state_has_no_baseline() {
        let state = PersistedState::default();
        assert!(state.last_snapshot.is_none());
        assert_eq!(state.consecutive_failures, 0);
        assert!(state.updated_at.is_none());
    }

    #[test]
    fn missing_fields_deserialize_to_defaults() {
        let state: PersistedState = serde_json::from_str("{}").expect("parse");
        assert_eq!(state, PersistedState::default());
    }

    #[test]
    fn empty_baseline_is_distinct_from_absent() {
        let state: PersistedState =
            serde_json::from_str(r#"{"last_snapshot": "", "consecutive_failures": 2}"#)
                .expect("parse");
        assert_eq!(state.last_snapshot.as_deref(), Some(""));
        assert_eq!(state.consecutive_failures, 2);
    }
}
