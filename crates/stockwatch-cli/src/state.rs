//! `state` command handlers.

use stockwatch_core::AppConfig;
use stockwatch_store::StateStore;

/// Prints the persisted state as pretty JSON.
///
/// # Errors
///
/// Returns an error if the state file exists but cannot be read or decoded.
pub(crate) fn run_state_show(config: &AppConfig) -> anyhow::Result<()> {
    let store = StateStore::new(&config.state_path);
    let state = store.load()?;
    println!("{}", serde_json::to_string_pretty(&state)?);
    Ok(())
}

/// Deletes the state file.
///
/// # Errors
///
/// Returns an error if the file exists but cannot be removed.
pub(crate) fn run_state_reset(config: &AppConfig) -> anyhow::Result<()> {
    let store = StateStore::new(&config.state_path);
    if store.reset()? {
        println!("state reset: removed {}", store.path().display());
    } else {
        println!("state reset: nothing to remove at {}", store.path().display());
    }
    Ok(())
}
