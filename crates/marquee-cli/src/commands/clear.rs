use crate::output::Output;
use color_eyre::eyre::eyre;
use color_eyre::Result;
use media_browse_config::{PathManager, StateStore};
use std::fs;

pub fn run_clear(all: bool, watchlist: bool, theme: bool, output: &Output) -> Result<()> {
    let path_manager = PathManager::default();

    if all {
        let state_file = path_manager.state_file();
        if state_file.exists() {
            fs::remove_file(&state_file).map_err(|e| {
                eyre!(
                    "Failed to remove state file at {}: {}",
                    state_file.display(),
                    e
                )
            })?;
            output.success(format!("Cleared saved state: {}", state_file.display()));
        } else {
            output.info("No saved state found to clear");
        }
        return Ok(());
    }

    let mut cleared_anything = false;

    if watchlist {
        clear_watchlist(&path_manager, output)?;
        cleared_anything = true;
    }

    if theme {
        clear_theme(&path_manager, output)?;
        cleared_anything = true;
    }

    if !cleared_anything {
        output.warn("No clear option specified. Use --watchlist, --theme, or --all");
        output.println("\nExample: marquee clear --watchlist");
    }

    Ok(())
}

fn clear_watchlist(path_manager: &PathManager, output: &Output) -> Result<()> {
    let mut store = match loaded_state(path_manager)? {
        Some(store) => store,
        None => {
            output.info("No saved state found, nothing to clear");
            return Ok(());
        }
    };
    store.clear_watchlist();
    store
        .save()
        .map_err(|e| eyre!("Failed to save state: {}", e))?;
    output.success("Watchlist cleared");
    Ok(())
}

fn clear_theme(path_manager: &PathManager, output: &Output) -> Result<()> {
    let mut store = match loaded_state(path_manager)? {
        Some(store) => store,
        None => {
            output.info("No saved state found, nothing to clear");
            return Ok(());
        }
    };
    store.reset_theme();
    store
        .save()
        .map_err(|e| eyre!("Failed to save state: {}", e))?;
    output.success("Theme reset to default");
    Ok(())
}

/// `None` when there is no state file yet; clearing should not create
/// one.
fn loaded_state(path_manager: &PathManager) -> Result<Option<StateStore>> {
    let state_file = path_manager.state_file();
    if !state_file.exists() {
        return Ok(None);
    }
    let mut store = StateStore::new(state_file.clone());
    store
        .load()
        .map_err(|e| eyre!("Failed to load state from {}: {}", state_file.display(), e))?;
    Ok(Some(store))
}
