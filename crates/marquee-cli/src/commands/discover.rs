use super::{load_config, metadata_source};
use crate::output::Output;
use crate::render;
use color_eyre::eyre::eyre;
use color_eyre::Result;
use media_browse_models::{Genre, MediaKind};
use media_browse_sources::MetadataSource;

pub async fn run_discover(genre: &str, kind: MediaKind, page: u32, output: &Output) -> Result<()> {
    let config = load_config()?;
    let client = metadata_source(&config)?;

    let spinner = render::spinner("Fetching genres...");
    let genres = client.genres(kind).await;
    spinner.finish_and_clear();
    let genres = genres?;

    let matched = resolve_genre(genre, &genres).ok_or_else(|| {
        eyre!(
            "Unknown genre '{}'. Run 'marquee genres{}' to list the available ones.",
            genre,
            if kind == MediaKind::Tv { " --tv" } else { "" }
        )
    })?;

    let spinner = render::spinner(&format!("Fetching {} titles...", matched.name));
    let titles = client.discover(kind, matched.id, page).await;
    spinner.finish_and_clear();
    let titles = titles?;

    let heading = match kind {
        MediaKind::Movie => format!("{} movies", matched.name),
        MediaKind::Tv => format!("{} TV shows", matched.name),
    };
    render::print_summaries(&titles, &heading, output);
    Ok(())
}

/// A numeric argument is taken as a genre id; anything else is matched
/// case-insensitively against the genre names of the requested kind.
fn resolve_genre<'a>(arg: &str, genres: &'a [Genre]) -> Option<&'a Genre> {
    if let Ok(id) = arg.parse::<u64>() {
        return genres.iter().find(|genre| genre.id == id);
    }
    genres
        .iter()
        .find(|genre| genre.name.eq_ignore_ascii_case(arg.trim()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn genres() -> Vec<Genre> {
        vec![
            Genre {
                id: 28,
                name: "Action".to_string(),
            },
            Genre {
                id: 878,
                name: "Science Fiction".to_string(),
            },
        ]
    }

    #[test]
    fn resolves_by_numeric_id() {
        let genres = genres();
        assert_eq!(resolve_genre("878", &genres).map(|g| g.id), Some(878));
    }

    #[test]
    fn resolves_names_case_insensitively() {
        let genres = genres();
        assert_eq!(
            resolve_genre("science fiction", &genres).map(|g| g.id),
            Some(878)
        );
        assert_eq!(resolve_genre(" ACTION ", &genres).map(|g| g.id), Some(28));
    }

    #[test]
    fn unknown_genre_resolves_to_none() {
        let genres = genres();
        assert!(resolve_genre("Horror", &genres).is_none());
        assert!(resolve_genre("999", &genres).is_none());
    }
}
