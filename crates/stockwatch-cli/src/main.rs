use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod check;
mod notify;
mod state;

#[derive(Debug, Parser)]
#[command(name = "stockwatch-cli")]
#[command(about = "Watch retail stock for configured parts and push a message when it changes")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Run one availability check (the scheduled job)
    Check {
        /// Operator-triggered run: resend the current result even if unchanged.
        /// An empty env value, `0`, `no`, `off` or `false` leaves it unset.
        #[arg(
            long,
            env = "STOCKWATCH_MANUAL_RUN",
            value_parser = clap::builder::FalseyValueParser::new()
        )]
        manual: bool,
        /// Compute and log the decision without notifying or saving state
        #[arg(long)]
        dry_run: bool,
    },
    /// Inspect or clear the persisted state
    State {
        #[command(subcommand)]
        command: StateCommands,
    },
    /// Exercise the configured notifier
    Notify {
        #[command(subcommand)]
        command: NotifyCommands,
    },
}

#[derive(Debug, Subcommand)]
enum StateCommands {
    /// Print the persisted state as JSON
    Show,
    /// Delete the state file so the next check is a first run
    Reset,
}

#[derive(Debug, Subcommand)]
enum NotifyCommands {
    /// Send a test message
    Test {
        #[arg(long)]
        message: Option<String>,
    },
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let config = stockwatch_core::load_app_config_from_env()?;

    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    match cli.command {
        Some(Commands::Check { manual, dry_run }) => {
            check::run_check_command(&config, check::RunMode { manual, dry_run }).await?;
        }
        Some(Commands::State { command }) => match command {
            StateCommands::Show => state::run_state_show(&config)?,
            StateCommands::Reset => state::run_state_reset(&config)?,
        },
        Some(Commands::Notify { command }) => match command {
            NotifyCommands::Test { message } => {
                notify::run_notify_test(&config, message.as_deref()).await?;
            }
        },
        None => {
            // Bare invocation behaves like the scheduled job.
            check::run_check_command(&config, check::RunMode::default()).await?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests;
