//! Stock-state change detection.
//!
//! [`ChangeDetector::evaluate`] is a pure function of the persisted state,
//! the run outcome, and the manual-run flag. It never performs I/O: the
//! caller delivers the returned [`Notification`] (if any) and persists
//! [`Decision::next_state`].
//!
//! Rules:
//! - A failed run increments the failure counter and never touches the
//!   baseline. Reaching the alert threshold emits one alert and resets the
//!   counter.
//! - A successful run resets the counter and always replaces the baseline.
//! - Stock appearing (or changing while non-empty) notifies; stock
//!   disappearing does not.

use crate::state::{PersistedState, RunOutcome};

/// Notification policy knobs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DetectorPolicy {
    /// Consecutive failures that trigger an alert. `0` disables alerts.
    pub failure_alert_threshold: u32,
    /// Notify on the very first successful run when stock is available.
    pub notify_first_run: bool,
    /// Send a "no stock" message on first-run and manual-run events whose
    /// snapshot is empty.
    pub notify_empty_stock: bool,
}

impl Default for DetectorPolicy {
    fn default() -> Self {
        Self {
            failure_alert_threshold: 3,
            notify_first_run: true,
            notify_empty_stock: false,
        }
    }
}

/// Which branch of the state machine a run took.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    FirstRun,
    Unchanged,
    Changed,
    FetchFailed,
}

impl std::fmt::Display for Transition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Transition::FirstRun => write!(f, "first_run"),
            Transition::Unchanged => write!(f, "unchanged"),
            Transition::Changed => write!(f, "changed"),
            Transition::FetchFailed => write!(f, "fetch_failed"),
        }
    }
}

/// A message the caller should deliver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notification {
    /// Stock is available. `resend` marks a manual-run confirmation of an
    /// unchanged snapshot.
    StockAvailable { snapshot: String, resend: bool },
    /// No stock is available (only sent when the policy asks for it).
    NoStock { resend: bool },
    /// The failure threshold was reached.
    FailureAlert { failures: u32, reason: String },
}

impl Notification {
    /// Renders the plain-text message body.
    #[must_use]
    pub fn message(&self) -> String {
        match self {
            Notification::StockAvailable {
                snapshot,
                resend: false,
            } => format!("✅ Stock available!\n{snapshot}"),
            Notification::StockAvailable {
                snapshot,
                resend: true,
            } => format!("🔁 Manual check, stock unchanged:\n{snapshot}"),
            Notification::NoStock { resend: false } => {
                "ℹ️ No stock currently available.".to_string()
            }
            Notification::NoStock { resend: true } => {
                "🔁 Manual check, still no stock available.".to_string()
            }
            Notification::FailureAlert { failures, reason } => format!(
                "⚠️ {failures} consecutive failures — possible block or network issue\nLast error: {reason}"
            ),
        }
    }
}

/// Outcome of evaluating one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decision {
    pub transition: Transition,
    pub next_state: PersistedState,
    pub notification: Option<Notification>,
}

#[derive(Debug, Clone, Default)]
pub struct ChangeDetector {
    policy: DetectorPolicy,
}

impl ChangeDetector {
    #[must_use]
    pub fn new(policy: DetectorPolicy) -> Self {
        Self { policy }
    }

    /// Decides the next persisted state and whether to notify.
    ///
    /// `manual` is the out-of-band flag set when an operator triggered the
    /// run by hand; it only matters when nothing changed.
    #[must_use]
    pub fn evaluate(
        &self,
        state: &PersistedState,
        outcome: &RunOutcome,
        manual: bool,
    ) -> Decision {
        match outcome {
            RunOutcome::Failure(reason) => self.on_failure(state, reason),
            RunOutcome::Success(snapshot) => {
                self.on_success(state, snapshot.rendered(), manual)
            }
        }
    }

    fn on_failure(&self, state: &PersistedState, reason: &str) -> Decision {
        let mut next_state = state.clone();
        next_state.consecutive_failures = state.consecutive_failures.saturating_add(1);

        let threshold = self.policy.failure_alert_threshold;
        let notification = if threshold > 0 && next_state.consecutive_failures >= threshold {
            let failures = next_state.consecutive_failures;
            next_state.consecutive_failures = 0;
            Some(Notification::FailureAlert {
                failures,
                reason: reason.to_string(),
            })
        } else {
            None
        };

        Decision {
            transition: Transition::FetchFailed,
            next_state,
            notification,
        }
    }

    fn on_success(&self, state: &PersistedState, rendered: &str, manual: bool) -> Decision {
        let next_state = PersistedState {
            last_snapshot: Some(rendered.to_string()),
            consecutive_failures: 0,
            updated_at: state.updated_at,
        };
        let in_stock = !rendered.is_empty();

        let (transition, notification) = match state.last_snapshot.as_deref() {
            None => {
                let notification = if in_stock {
                    self.policy
                        .notify_first_run
                        .then(|| Notification::StockAvailable {
                            snapshot: rendered.to_string(),
                            resend: false,
                        })
                } else {
                    self.policy
                        .notify_empty_stock
                        .then_some(Notification::NoStock { resend: false })
                };
                (Transition::FirstRun, notification)
            }
            Some(previous) if previous != rendered => {
                let notification = in_stock.then(|| Notification::StockAvailable {
                    snapshot: rendered.to_string(),
                    resend: false,
                });
                (Transition::Changed, notification)
            }
            Some(_) => {
                let notification = if !manual {
                    None
                } else if in_stock {
                    Some(Notification::StockAvailable {
                        snapshot: rendered.to_string(),
                        resend: true,
                    })
                } else {
                    self.policy
                        .notify_empty_stock
                        .then_some(Notification::NoStock { resend: true })
                };
                (Transition::Unchanged, notification)
            }
        };

        Decision {
            transition,
            next_state,
            notification,
        }
    }
}

#[cfg(test)]
#[path = "detector_test.rs"]
mod tests;
