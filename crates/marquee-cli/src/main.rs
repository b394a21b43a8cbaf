use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use commands::{browse, clear, config, details, discover, genres, listing, theme, watchlist};
use media_browse_models::{MediaKind, Theme};

mod commands;
mod logging;
mod output;
mod render;

#[derive(Parser)]
#[command(name = "marquee")]
#[command(about = "Marquee - browse movies and TV shows from your terminal")]
#[command(version)]
struct Cli {
    /// Enable verbose output (use multiple times for more verbosity: -v, -vv)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Output format
    #[arg(long, global = true, default_value = "human", value_enum)]
    output: output::OutputFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show popular titles
    #[command(long_about = "Show the most popular titles right now. Defaults to movies; use --tv for TV shows.")]
    Popular {
        /// Browse TV shows instead of movies
        #[arg(long, action = ArgAction::SetTrue)]
        tv: bool,

        /// Result page to fetch
        #[arg(long, default_value_t = 1)]
        page: u32,
    },

    /// Search titles by name
    #[command(long_about = "Search for titles matching a query. Defaults to movies; use --tv for TV shows or --all to search both at once.")]
    Search {
        /// The text to search for
        query: String,

        /// Search TV shows instead of movies
        #[arg(long, action = ArgAction::SetTrue)]
        tv: bool,

        /// Search movies and TV shows together
        #[arg(long, action = ArgAction::SetTrue, conflicts_with = "tv")]
        all: bool,

        /// Result page to fetch
        #[arg(long, default_value_t = 1)]
        page: u32,
    },

    /// List titles in a genre
    #[command(long_about = "List titles carrying a genre. Accepts a genre name as shown by 'marquee genres', or a numeric genre id.")]
    Discover {
        /// Genre name or numeric id
        genre: String,

        /// Discover TV shows instead of movies
        #[arg(long, action = ArgAction::SetTrue)]
        tv: bool,

        /// Result page to fetch
        #[arg(long, default_value_t = 1)]
        page: u32,
    },

    /// List the available genres
    Genres {
        /// List TV genres instead of movie genres
        #[arg(long, action = ArgAction::SetTrue)]
        tv: bool,
    },

    /// Show the full detail view for one title
    #[command(long_about = "Show the detail view for one title: overview, cast, trailer, similar titles, and external ratings when an OMDB key is configured.")]
    Details {
        /// The title's id as shown in listings
        id: u64,

        /// Look the id up as a TV show instead of a movie
        #[arg(long, action = ArgAction::SetTrue)]
        tv: bool,
    },

    /// Manage the watchlist
    #[command(long_about = "Show, add to, or remove from the saved watchlist. Running without a subcommand shows it.")]
    Watchlist {
        #[command(subcommand)]
        cmd: Option<WatchlistCommands>,
    },

    /// Show or change the color theme
    Theme {
        /// light, dark, or toggle; omit to show the current theme
        #[arg(value_enum)]
        change: Option<ThemeArg>,
    },

    /// Manage configuration
    #[command(long_about = "View or modify configuration. Running without a subcommand shows the current configuration with API keys masked.")]
    Config {
        #[command(subcommand)]
        cmd: Option<ConfigCommands>,
    },

    /// Clear saved state
    #[command(long_about = "Clear saved state. Use --watchlist to empty the watchlist, --theme to reset the theme, or --all to delete the whole state file.")]
    Clear {
        /// Delete the whole state file
        #[arg(long, action = ArgAction::SetTrue, conflicts_with_all = ["watchlist", "theme"])]
        all: bool,

        /// Empty the watchlist
        #[arg(long, action = ArgAction::SetTrue)]
        watchlist: bool,

        /// Reset the theme to the default
        #[arg(long, action = ArgAction::SetTrue)]
        theme: bool,
    },

    /// Browse interactively
    #[command(long_about = "An interactive session: type-ahead search, genre browsing, a movie/TV toggle, the watchlist, and a detail view that closes on Escape.")]
    Browse {
        /// Start in TV mode instead of movie mode
        #[arg(long, action = ArgAction::SetTrue)]
        tv: bool,
    },
}

#[derive(Subcommand)]
enum WatchlistCommands {
    /// Show the watchlist with live details
    Show,

    /// Add a title by id
    Add {
        /// The title's id as shown in listings
        id: u64,

        /// The id names a TV show instead of a movie
        #[arg(long, action = ArgAction::SetTrue)]
        tv: bool,
    },

    /// Remove a title by id
    Remove {
        /// The title's id as shown in listings
        id: u64,

        /// The id names a TV show instead of a movie
        #[arg(long, action = ArgAction::SetTrue)]
        tv: bool,
    },
}

#[derive(Subcommand)]
enum ConfigCommands {
    /// Show current configuration (masks API keys)
    Show,

    /// Set a configuration value
    #[command(long_about = "Set one configuration value. Keys: tmdb.api_key, tmdb.language, omdb.api_key, browse.debounce_ms, browse.page_size.")]
    Set {
        /// The configuration key, e.g. tmdb.api_key
        key: String,

        /// The new value
        value: String,
    },

    /// Create the config file interactively
    Init,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum ThemeArg {
    Light,
    Dark,
    Toggle,
}

impl ThemeArg {
    fn resolve(self, current: Theme) -> Theme {
        match self {
            ThemeArg::Light => Theme::Light,
            ThemeArg::Dark => Theme::Dark,
            ThemeArg::Toggle => current.toggled(),
        }
    }
}

fn kind_of(tv: bool) -> MediaKind {
    if tv {
        MediaKind::Tv
    } else {
        MediaKind::Movie
    }
}

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();

    logging::init_logging(cli.verbose, cli.quiet).map_err(|e| color_eyre::eyre::eyre!("{}", e))?;

    let output = output::Output::new(cli.output, cli.quiet);

    match cli.command {
        Commands::Popular { tv, page } => listing::run_popular(kind_of(tv), page, &output).await,
        Commands::Search {
            query,
            tv,
            all,
            page,
        } => listing::run_search(&query, kind_of(tv), all, page, &output).await,
        Commands::Discover { genre, tv, page } => {
            discover::run_discover(&genre, kind_of(tv), page, &output).await
        }
        Commands::Genres { tv } => genres::run_genres(kind_of(tv), &output).await,
        Commands::Details { id, tv } => details::run_details(kind_of(tv), id, &output).await,
        Commands::Watchlist { cmd } => {
            watchlist::run_watchlist(cmd.unwrap_or(WatchlistCommands::Show), &output).await
        }
        Commands::Theme { change } => theme::run_theme(change, &output),
        Commands::Config { cmd } => {
            config::run_config(cmd.unwrap_or(ConfigCommands::Show), &output)
        }
        Commands::Clear {
            all,
            watchlist,
            theme,
        } => clear::run_clear(all, watchlist, theme, &output),
        Commands::Browse { tv } => browse::run_browse(kind_of(tv), &output).await,
    }
}
