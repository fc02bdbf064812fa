//! `notify` command handlers.

use stockwatch_core::AppConfig;
use stockwatch_notify::Notifier;

use crate::check::build_notifier;

const DEFAULT_TEST_MESSAGE: &str = "stockwatch test notification";

/// Sends a one-off message through the configured notifier.
///
/// Unlike a scheduled check, a delivery failure here is an error: the
/// operator asked for this message explicitly.
///
/// # Errors
///
/// Returns an error if the notifier cannot be built or delivery fails.
pub(crate) async fn run_notify_test(
    config: &AppConfig,
    message: Option<&str>,
) -> anyhow::Result<()> {
    let notifier = build_notifier(config)?;
    let message = message.unwrap_or(DEFAULT_TEST_MESSAGE);

    notifier
        .notify(message)
        .await
        .map_err(|e| anyhow::anyhow!("{} notifier failed: {e}", notifier.name()))?;

    println!("test notification sent via {}", notifier.name());
    Ok(())
}
