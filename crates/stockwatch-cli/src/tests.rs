use std::sync::{Mutex, PoisonError};

use super::*;

/// Serializes tests that read or write `STOCKWATCH_MANUAL_RUN`.
static MANUAL_ENV: Mutex<()> = Mutex::new(());

fn parse_check_with_manual_env(value: Option<&str>) -> Result<bool, clap::Error> {
    let _guard = MANUAL_ENV.lock().unwrap_or_else(PoisonError::into_inner);
    match value {
        Some(v) => std::env::set_var("STOCKWATCH_MANUAL_RUN", v),
        None => std::env::remove_var("STOCKWATCH_MANUAL_RUN"),
    }
    let parsed = Cli::try_parse_from(["stockwatch-cli", "check"]);
    std::env::remove_var("STOCKWATCH_MANUAL_RUN");

    match parsed?.command {
        Some(Commands::Check { manual, .. }) => Ok(manual),
        other => panic!("expected check command, got: {other:?}"),
    }
}

#[test]
fn parses_check_command_with_defaults() {
    let _guard = MANUAL_ENV.lock().unwrap_or_else(PoisonError::into_inner);
    let cli =
        Cli::try_parse_from(["stockwatch-cli", "check"]).expect("expected valid cli args");

    assert!(matches!(
        cli.command,
        Some(Commands::Check {
            manual: false,
            dry_run: false
        })
    ));
}

#[test]
fn manual_env_accepts_truthy_spellings() {
    for value in ["true", "1", "yes", "on", "TRUE"] {
        let manual = parse_check_with_manual_env(Some(value))
            .unwrap_or_else(|e| panic!("STOCKWATCH_MANUAL_RUN={value:?} rejected: {e}"));
        assert!(manual, "STOCKWATCH_MANUAL_RUN={value:?} should enable --manual");
    }
}

#[test]
fn manual_env_blank_or_falsey_means_scheduled_run() {
    for value in ["", "false", "0", "no", "off"] {
        let manual = parse_check_with_manual_env(Some(value))
            .unwrap_or_else(|e| panic!("STOCKWATCH_MANUAL_RUN={value:?} rejected: {e}"));
        assert!(!manual, "STOCKWATCH_MANUAL_RUN={value:?} should leave --manual off");
    }
    assert!(!parse_check_with_manual_env(None).unwrap());
}

#[test]
fn parses_check_manual_and_dry_run() {
    let cli = Cli::try_parse_from(["stockwatch-cli", "check", "--manual", "--dry-run"])
        .expect("expected valid cli args");

    assert!(matches!(
        cli.command,
        Some(Commands::Check {
            manual: true,
            dry_run: true
        })
    ));
}

#[test]
fn parses_state_show_command() {
    let cli = Cli::try_parse_from(["stockwatch-cli", "state", "show"])
        .expect("expected valid cli args");

    assert!(matches!(
        cli.command,
        Some(Commands::State {
            command: StateCommands::Show
        })
    ));
}

#[test]
fn parses_state_reset_command() {
    let cli = Cli::try_parse_from(["stockwatch-cli", "state", "reset"])
        .expect("expected valid cli args");

    assert!(matches!(
        cli.command,
        Some(Commands::State {
            command: StateCommands::Reset
        })
    ));
}

#[test]
fn parses_notify_test_with_message() {
    let cli = Cli::try_parse_from(["stockwatch-cli", "notify", "test", "--message", "hello"])
        .expect("expected valid cli args");

    assert!(matches!(
        cli.command,
        Some(Commands::Notify {
            command: NotifyCommands::Test { message: Some(ref m) }
        }) if m == "hello"
    ));
}

#[test]
fn parses_notify_test_without_message() {
    let cli = Cli::try_parse_from(["stockwatch-cli", "notify", "test"])
        .expect("expected valid cli args");

    assert!(matches!(
        cli.command,
        Some(Commands::Notify {
            command: NotifyCommands::Test { message: None }
        })
    ));
}

#[test]
fn no_command_is_none() {
    let cli = Cli::try_parse_from(["stockwatch-cli"]).expect("expected valid cli args");
    assert!(cli.command.is_none());
}

#[test]
fn state_requires_a_subcommand() {
    assert!(Cli::try_parse_from(["stockwatch-cli", "state"]).is_err());
}

#[test]
fn unknown_command_is_rejected() {
    assert!(Cli::try_parse_from(["stockwatch-cli", "collect"]).is_err());
}
