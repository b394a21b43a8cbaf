use super::{load_config, metadata_source};
use crate::output::Output;
use crate::render;
use color_eyre::Result;
use media_browse_models::MediaKind;
use media_browse_sources::MetadataSource;

pub async fn run_popular(kind: MediaKind, page: u32, output: &Output) -> Result<()> {
    let config = load_config()?;
    let client = metadata_source(&config)?;

    let spinner = render::spinner("Fetching popular titles...");
    let titles = client.popular(kind, page).await;
    spinner.finish_and_clear();
    let titles = titles?;

    let heading = match kind {
        MediaKind::Movie => "Popular movies",
        MediaKind::Tv => "Popular TV shows",
    };
    render::print_summaries(&titles, heading, output);
    Ok(())
}

pub async fn run_search(
    query: &str,
    kind: MediaKind,
    all: bool,
    page: u32,
    output: &Output,
) -> Result<()> {
    // An all-whitespace query cannot match anything; fall back to the
    // popular listing, the same way a cleared search box does in browse.
    if query.trim().is_empty() {
        output.warn("Empty query; showing popular titles instead.");
        return run_popular(kind, page, output).await;
    }

    let config = load_config()?;
    let client = metadata_source(&config)?;

    let spinner = render::spinner("Searching...");
    let titles = if all {
        client.search_multi(query, page).await
    } else {
        client.search(kind, query, page).await
    };
    spinner.finish_and_clear();
    let titles = titles?;

    let heading = if all {
        format!("Titles matching \"{}\"", query)
    } else {
        match kind {
            MediaKind::Movie => format!("Movies matching \"{}\"", query),
            MediaKind::Tv => format!("TV shows matching \"{}\"", query),
        }
    };
    render::print_summaries(&titles, &heading, output);
    Ok(())
}
