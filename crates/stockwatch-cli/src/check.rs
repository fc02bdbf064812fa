//! One availability check: fetch, compare with the baseline, notify, persist.
//!
//! Nothing that goes wrong after the watch list is loaded aborts the run.
//! Fetch failures become a failed outcome, notifier and state errors are
//! logged, and the process exits 0 so the scheduler keeps firing.

use stockwatch_core::{
    AppConfig, ChangeDetector, Notification, PersistedState, RunOutcome, Transition, WatchList,
};
use stockwatch_notify::{AnyNotifier, LogNotifier, Notifier, RecordingNotifier, TelegramNotifier};
use stockwatch_scraper::FulfillmentClient;
use stockwatch_store::StateStore;

/// How the current invocation was triggered.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct RunMode {
    /// Operator-triggered: an unchanged result is reported again.
    pub manual: bool,
    /// Leave the state file untouched. `run_check_command` also swaps the
    /// configured notifier for an in-memory recorder, so nothing is sent.
    pub dry_run: bool,
}

/// What a single check did, for the closing log line and for tests.
#[derive(Debug)]
pub(crate) struct RunReport {
    pub transition: Transition,
    pub requests: usize,
    pub failed_requests: usize,
    /// The rendered message, if the detector asked for one.
    pub message: Option<String>,
    pub notified: bool,
    pub state: PersistedState,
    pub saved: bool,
}

/// Builds the notifier selected by configuration.
///
/// Without Telegram credentials messages are written to the log.
///
/// # Errors
///
/// Returns an error if the Telegram client cannot be constructed.
pub(crate) fn build_notifier(config: &AppConfig) -> anyhow::Result<AnyNotifier> {
    match &config.telegram {
        Some(telegram) => {
            let notifier = TelegramNotifier::new(telegram, config.fetch.request_timeout_secs)
                .map_err(|e| anyhow::anyhow!("failed to build Telegram notifier: {e}"))?;
            Ok(AnyNotifier::Telegram(notifier))
        }
        None => {
            tracing::warn!(
                "TELEGRAM_BOT_TOKEN / TELEGRAM_CHAT_ID not set; notifications go to the log only"
            );
            Ok(AnyNotifier::Log(LogNotifier))
        }
    }
}

/// Entry point for `check`: wires configuration into [`run_check`].
///
/// # Errors
///
/// Returns an error only if the watch list cannot be loaded or a client
/// cannot be constructed. Everything after that is logged, not propagated.
pub(crate) async fn run_check_command(config: &AppConfig, mode: RunMode) -> anyhow::Result<()> {
    let watchlist = stockwatch_core::load_watchlist(&config.watchlist_path)?;
    let client = FulfillmentClient::new(&config.fetch)
        .map_err(|e| anyhow::anyhow!("failed to build availability client: {e}"))?;
    let store = StateStore::new(&config.state_path);
    let notifier = if mode.dry_run {
        AnyNotifier::Recording(RecordingNotifier::new())
    } else {
        build_notifier(config)?
    };

    tracing::info!(
        parts = watchlist.parts.len(),
        stores = watchlist.stores.len(),
        manual = mode.manual,
        dry_run = mode.dry_run,
        notifier = notifier.name(),
        "starting availability check"
    );

    let report = run_check(config, &watchlist, &client, &store, &notifier, mode).await;

    tracing::info!(
        transition = %report.transition,
        requests = report.requests,
        failed_requests = report.failed_requests,
        consecutive_failures = report.state.consecutive_failures,
        has_message = report.message.is_some(),
        notified = report.notified,
        saved = report.saved,
        "availability check finished"
    );
    if let AnyNotifier::Recording(recorder) = &notifier {
        for message in recorder.messages() {
            println!("dry-run: would send:\n{message}");
        }
    }
    Ok(())
}

/// Runs one check against already-built collaborators.
pub(crate) async fn run_check<N: Notifier>(
    config: &AppConfig,
    watchlist: &WatchList,
    client: &FulfillmentClient,
    store: &StateStore,
    notifier: &N,
    mode: RunMode,
) -> RunReport {
    let prior = match store.load() {
        Ok(state) => state,
        Err(e) => {
            tracing::error!(
                path = %store.path().display(),
                error = %e,
                "failed to load state; continuing from defaults"
            );
            PersistedState::default()
        }
    };

    let fetch = client
        .fetch_all(watchlist, config.fetch.inter_request_delay_ms)
        .await;
    let requests = fetch.requests;
    let failed_requests = fetch.failures.len();
    let outcome = fetch.into_outcome(watchlist);

    match &outcome {
        RunOutcome::Success(snapshot) => {
            let facts = snapshot.facts();
            tracing::info!(
                buyable = facts.len(),
                delivery = facts.iter().filter(|f| f.is_delivery()).count(),
                "availability sweep succeeded"
            );
        }
        RunOutcome::Failure(reason) => {
            tracing::warn!(reason = %reason, "availability sweep failed");
        }
    }

    let decision = ChangeDetector::new(config.detector).evaluate(&prior, &outcome, mode.manual);
    let message = decision.notification.as_ref().map(Notification::message);

    let mut notified = false;
    match &message {
        Some(text) => match notifier.notify(text).await {
            Ok(()) => {
                notified = true;
                tracing::info!(notifier = notifier.name(), "notification delivered");
            }
            Err(e) => {
                tracing::error!(
                    notifier = notifier.name(),
                    error = %e,
                    "failed to deliver notification"
                );
            }
        },
        None => {
            tracing::debug!(transition = %decision.transition, "nothing to notify");
        }
    }

    let mut state = decision.next_state;
    state.updated_at = Some(chrono::Utc::now());

    let saved = if mode.dry_run {
        false
    } else {
        match store.save(&state) {
            Ok(()) => true,
            Err(e) => {
                tracing::error!(
                    path = %store.path().display(),
                    error = %e,
                    "failed to save state"
                );
                false
            }
        }
    };

    RunReport {
        transition: decision.transition,
        requests,
        failed_requests,
        message,
        notified,
        state,
        saved,
    }
}

#[cfg(test)]
#[path = "check_test.rs"]
mod tests;
