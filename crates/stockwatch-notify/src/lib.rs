//! Delivery of change notifications to the operator.

pub mod error;
pub mod notifier;
pub mod telegram;

pub use error::NotifyError;
pub use notifier::{AnyNotifier, LogNotifier, Notifier, RecordingNotifier};
pub use telegram::{TelegramNotifier, TELEGRAM_MAX_MESSAGE_CHARS};
