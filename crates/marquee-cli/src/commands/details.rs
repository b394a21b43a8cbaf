use super::{build_aggregator, load_config, open_state};
use crate::output::Output;
use crate::render;
use color_eyre::Result;
use media_browse_core::{DetailOutcome, Watchlist};
use media_browse_models::MediaKind;

pub async fn run_details(kind: MediaKind, id: u64, output: &Output) -> Result<()> {
    let config = load_config()?;
    let aggregator = build_aggregator(&config)?;

    let spinner = render::spinner("Fetching details...");
    let outcome = aggregator.open(kind, id).await;
    spinner.finish_and_clear();

    match outcome? {
        DetailOutcome::Ready(detail) => {
            let watchlist = Watchlist::load(open_state()?);
            render::print_detail(&detail, watchlist.contains(id, kind), output);
        }
        // A one-shot command has nothing racing it, but the contract
        // stands: a superseded aggregation renders nothing.
        DetailOutcome::Superseded => {}
    }
    Ok(())
}
