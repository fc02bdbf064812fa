//! The notification seam and the sinks that do not talk to a remote API.

use std::future::Future;
use std::sync::{Mutex, PoisonError};

use crate::error::NotifyError;
use crate::telegram::TelegramNotifier;

/// A destination for human-readable notification messages.
///
/// Delivery is best effort from the caller's point of view: scheduled runs
/// log a returned error and carry on.
pub trait Notifier {
    /// Delivers one message.
    fn notify(&self, message: &str) -> impl Future<Output = Result<(), NotifyError>> + Send;

    /// Short sink name for logs.
    fn name(&self) -> &'static str;
}

/// Writes messages to the log instead of pushing them anywhere.
///
/// Used when no push credentials are configured.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    async fn notify(&self, message: &str) -> Result<(), NotifyError> {
        tracing::info!(notifier = "log", message = %message, "notification");
        Ok(())
    }

    fn name(&self) -> &'static str {
        "log"
    }
}

/// Keeps every message in memory.
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    messages: Mutex<Vec<String>>,
}

impl RecordingNotifier {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Messages delivered so far, oldest first.
    #[must_use]
    pub fn messages(&self) -> Vec<String> {
        self.messages
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl Notifier for RecordingNotifier {
    async fn notify(&self, message: &str) -> Result<(), NotifyError> {
        self.messages
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(message.to_owned());
        Ok(())
    }

    fn name(&self) -> &'static str {
        "recording"
    }
}

/// The notifier chosen from configuration at startup.
#[derive(Debug)]
pub enum AnyNotifier {
    Telegram(TelegramNotifier),
    Log(LogNotifier),
    Recording(RecordingNotifier),
}

impl Notifier for AnyNotifier {
    async fn notify(&self, message: &str) -> Result<(), NotifyError> {
        match self {
            AnyNotifier::Telegram(n) => n.notify(message).await,
            AnyNotifier::Log(n) => n.notify(message).await,
            AnyNotifier::Recording(n) => n.notify(message).await,
        }
    }

    fn name(&self) -> &'static str {
        match self {
            AnyNotifier::Telegram(n) => n.name(),
            AnyNotifier::Log(n) => n.name(),
            AnyNotifier::Recording(n) => n.name(),
        }
    }
}
