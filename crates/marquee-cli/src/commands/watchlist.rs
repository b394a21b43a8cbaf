use super::{load_config, metadata_source, open_state};
use crate::output::Output;
use crate::render;
use color_eyre::eyre::eyre;
use color_eyre::Result;
use futures::future::join_all;
use media_browse_core::Watchlist;
use media_browse_models::{MediaKind, WatchlistEntry};
use media_browse_sources::{MetadataSource, PrimaryDetail};
use tracing::warn;

pub async fn run_watchlist(cmd: crate::WatchlistCommands, output: &Output) -> Result<()> {
    match cmd {
        crate::WatchlistCommands::Show => show(output).await,
        crate::WatchlistCommands::Add { id, tv } => add(id, crate::kind_of(tv), output),
        crate::WatchlistCommands::Remove { id, tv } => remove(id, crate::kind_of(tv), output),
    }
}

async fn show(output: &Output) -> Result<()> {
    let watchlist = Watchlist::load(open_state()?);
    if watchlist.is_empty() {
        render::print_watchlist(&[], output);
        return Ok(());
    }

    let config = load_config()?;
    let client = metadata_source(&config)?;

    let spinner = render::spinner("Fetching watchlist details...");
    let lookups = watchlist.entries().iter().map(|entry| {
        let client = client.clone();
        let entry = *entry;
        async move { (entry, client.detail(entry.kind, entry.id).await) }
    });
    let results = join_all(lookups).await;
    spinner.finish_and_clear();

    // One failed lookup dims its own row; the rest of the list still
    // renders.
    let rows: Vec<(WatchlistEntry, Option<PrimaryDetail>)> = results
        .into_iter()
        .map(|(entry, result)| match result {
            Ok(detail) => (entry, Some(detail)),
            Err(e) => {
                warn!("Watchlist lookup for {} {} failed: {}", entry.kind, entry.id, e);
                (entry, None)
            }
        })
        .collect();

    render::print_watchlist(&rows, output);
    Ok(())
}

// Add and remove are local edits: ids are not validated against the
// network, so the watchlist stays usable without an API key.

fn add(id: u64, kind: MediaKind, output: &Output) -> Result<()> {
    let mut watchlist = Watchlist::load(open_state()?);
    let changed = watchlist
        .add(id, kind)
        .map_err(|e| eyre!("Failed to save the watchlist: {}", e))?;
    if changed {
        output.success(&format!("Added {} {} to the watchlist", kind, id));
    } else {
        output.info(&format!("{} {} is already on the watchlist", kind, id));
    }
    Ok(())
}

fn remove(id: u64, kind: MediaKind, output: &Output) -> Result<()> {
    let mut watchlist = Watchlist::load(open_state()?);
    let changed = watchlist
        .remove(id, kind)
        .map_err(|e| eyre!("Failed to save the watchlist: {}", e))?;
    if changed {
        output.success(&format!("Removed {} {} from the watchlist", kind, id));
    } else {
        output.info(&format!("{} {} is not on the watchlist", kind, id));
    }
    Ok(())
}
