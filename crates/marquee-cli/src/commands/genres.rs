use super::{load_config, metadata_source};
use crate::output::Output;
use crate::render;
use color_eyre::Result;
use media_browse_models::MediaKind;
use media_browse_sources::MetadataSource;

pub async fn run_genres(kind: MediaKind, output: &Output) -> Result<()> {
    let config = load_config()?;
    let client = metadata_source(&config)?;

    let spinner = render::spinner("Fetching genres...");
    let genres = client.genres(kind).await;
    spinner.finish_and_clear();
    let genres = genres?;

    let heading = match kind {
        MediaKind::Movie => "Movie genres",
        MediaKind::Tv => "TV genres",
    };
    render::print_genres(&genres, heading, output);
    Ok(())
}
