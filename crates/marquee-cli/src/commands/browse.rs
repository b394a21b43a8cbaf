use super::{build_aggregator, load_config, metadata_source, open_state};
use crate::output::{Output, OutputFormat};
use crate::render;
use color_eyre::eyre::eyre;
use color_eyre::Result;
use dialoguer::console::{Key, Term};
use futures::future::join_all;
use media_browse_config::{Config, StateStore};
use media_browse_core::{Carousel, Debouncer, DetailAggregator, DetailOutcome, Watchlist};
use media_browse_models::{Genre, MediaDetail, MediaKind, MediaSummary, Theme, WatchlistEntry};
use media_browse_sources::{MetadataSource, PrimaryDetail, SourceError, TmdbClient};
use owo_colors::OwoColorize;
use std::time::Duration;
use tokio::sync::mpsc::{self, UnboundedSender};
use tracing::{debug, warn};

/// Titles visible at once in the similar-titles strip.
const SIMILAR_STRIP: usize = 3;

/// Everything the session reacts to: keystrokes from the reader thread,
/// plus the results of spawned search and detail tasks.
enum Event {
    Key(Key),
    SearchSettled {
        query: String,
        result: Result<Vec<MediaSummary>, SourceError>,
    },
    DetailReady(Result<DetailOutcome, SourceError>),
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Screen {
    Listing,
    Search,
    Genres,
    Watchlist,
    Detail,
}

/// What the main grid is currently showing, so paging and refresh know
/// what to re-fetch.
#[derive(Clone)]
enum ListingKind {
    Popular,
    Genre(Genre),
    Search(String),
}

pub async fn run_browse(kind: MediaKind, output: &Output) -> Result<()> {
    if output.format() != OutputFormat::Human {
        return Err(eyre!("Interactive browse only supports --output human"));
    }
    let term = Term::stdout();
    if !term.is_term() {
        return Err(eyre!("Interactive browse requires a terminal"));
    }

    let config = load_config()?;
    config.validate().map_err(|e| eyre!("{}", e))?;

    let client = metadata_source(&config)?;
    let aggregator = build_aggregator(&config)?;
    let store = open_state()?;

    let (events_tx, mut events_rx) = mpsc::unbounded_channel();
    spawn_key_reader(events_tx.clone());

    let mut session = Session::new(client, aggregator, store, kind, &config, events_tx);
    session.reload_listing().await;
    session.draw()?;

    while let Some(event) = events_rx.recv().await {
        let quit = match event {
            Event::Key(key) => session.handle_key(key).await?,
            Event::SearchSettled { query, result } => {
                session.handle_search_results(query, result);
                false
            }
            Event::DetailReady(outcome) => {
                session.handle_detail(outcome);
                false
            }
        };
        if quit {
            break;
        }
        session.draw()?;
    }

    session.term.clear_screen().ok();
    Ok(())
}

/// One thread reads keys for the whole session and forwards them into
/// the event loop. It ends when the receiver goes away (or the process
/// does).
fn spawn_key_reader(events: UnboundedSender<Event>) {
    std::thread::spawn(move || {
        let term = Term::stdout();
        loop {
            match term.read_key() {
                Ok(key) => {
                    if events.send(Event::Key(key)).is_err() {
                        break;
                    }
                }
                Err(e) => {
                    warn!("Key reader stopped: {}", e);
                    break;
                }
            }
        }
    });
}

struct Session {
    term: Term,
    client: TmdbClient,
    aggregator: DetailAggregator,
    watchlist: Watchlist,
    debouncer: Debouncer,
    events: UnboundedSender<Event>,
    kind: MediaKind,
    theme: Theme,
    page_size: usize,

    screen: Screen,
    return_to: Screen,
    listing: ListingKind,
    page: u32,
    heading: String,
    titles: Vec<MediaSummary>,
    selected: usize,

    query: String,
    genres: Vec<Genre>,
    genre_selected: usize,
    watchlist_rows: Vec<(WatchlistEntry, Option<PrimaryDetail>)>,
    wl_selected: usize,

    detail: Option<MediaDetail>,
    detail_loading: bool,
    similar: Carousel<MediaSummary>,

    status: String,
}

impl Session {
    fn new(
        client: TmdbClient,
        aggregator: DetailAggregator,
        store: StateStore,
        kind: MediaKind,
        config: &Config,
        events: UnboundedSender<Event>,
    ) -> Self {
        let theme = store.theme();
        Self {
            term: Term::stdout(),
            client,
            aggregator,
            watchlist: Watchlist::load(store),
            debouncer: Debouncer::new(Duration::from_millis(config.browse.debounce_ms)),
            events,
            kind,
            theme,
            page_size: config.browse.page_size,
            screen: Screen::Listing,
            return_to: Screen::Listing,
            listing: ListingKind::Popular,
            page: 1,
            heading: String::new(),
            titles: Vec::new(),
            selected: 0,
            query: String::new(),
            genres: Vec::new(),
            genre_selected: 0,
            watchlist_rows: Vec::new(),
            wl_selected: 0,
            detail: None,
            detail_loading: false,
            similar: Carousel::new(Vec::new()),
            status: String::new(),
        }
    }

    async fn handle_key(&mut self, key: Key) -> Result<bool> {
        match self.screen {
            Screen::Listing => self.handle_listing_key(key).await,
            Screen::Search => self.handle_search_key(key).await,
            Screen::Genres => self.handle_genres_key(key).await,
            Screen::Watchlist => self.handle_watchlist_key(key),
            Screen::Detail => Ok(self.handle_detail_key(key)),
        }
    }

    async fn handle_listing_key(&mut self, key: Key) -> Result<bool> {
        match key {
            Key::Char('q') => return Ok(true),
            Key::ArrowUp => {
                self.selected = self.selected.saturating_sub(1);
            }
            Key::ArrowDown => {
                if self.selected + 1 < self.visible().len() {
                    self.selected += 1;
                }
            }
            Key::Enter => {
                if let Some(title) = self.visible().get(self.selected).cloned() {
                    self.open_detail(title.kind, title.id);
                }
            }
            Key::Char('/') => {
                self.query.clear();
                self.screen = Screen::Search;
            }
            Key::Char('g') => self.enter_genres().await,
            Key::Char('w') => self.enter_watchlist().await,
            Key::Char('b') => {
                if let Some(title) = self.visible().get(self.selected).cloned() {
                    self.toggle_bookmark(title.id, title.kind, &title.title);
                }
            }
            Key::Char('m') => {
                self.kind = self.kind.toggled();
                // Genre ids differ between movies and TV, so the cached
                // list and any genre filter are void now.
                self.genres.clear();
                self.listing = ListingKind::Popular;
                self.page = 1;
                self.reload_listing().await;
            }
            Key::Char('t') => self.toggle_theme(),
            Key::Char('n') => {
                self.page += 1;
                self.reload_listing().await;
            }
            Key::Char('p') => {
                if self.page > 1 {
                    self.page -= 1;
                    self.reload_listing().await;
                }
            }
            Key::Char('r') => self.reload_listing().await,
            _ => {}
        }
        Ok(false)
    }

    async fn handle_search_key(&mut self, key: Key) -> Result<bool> {
        match key {
            Key::Escape => {
                self.debouncer.cancel();
                self.screen = Screen::Listing;
            }
            Key::Enter => {
                // Search now: retire whatever is still waiting out its
                // quiet window, then fetch inline.
                self.debouncer.cancel();
                let query = self.query.trim().to_string();
                self.page = 1;
                self.listing = if query.is_empty() {
                    ListingKind::Popular
                } else {
                    ListingKind::Search(query)
                };
                self.reload_listing().await;
            }
            Key::Backspace => {
                self.query.pop();
                if self.query.trim().is_empty() {
                    // A cleared search box goes straight back to the
                    // default listing.
                    self.debouncer.cancel();
                    self.page = 1;
                    self.listing = ListingKind::Popular;
                    self.reload_listing().await;
                } else {
                    self.schedule_search();
                }
            }
            Key::Char(c) => {
                self.query.push(c);
                self.schedule_search();
            }
            _ => {}
        }
        Ok(false)
    }

    async fn handle_genres_key(&mut self, key: Key) -> Result<bool> {
        match key {
            Key::Escape | Key::Char('q') => self.screen = Screen::Listing,
            Key::ArrowUp => {
                self.genre_selected = self.genre_selected.saturating_sub(1);
            }
            Key::ArrowDown => {
                if self.genre_selected + 1 < self.genres.len() {
                    self.genre_selected += 1;
                }
            }
            Key::Enter => {
                if let Some(genre) = self.genres.get(self.genre_selected).cloned() {
                    self.listing = ListingKind::Genre(genre);
                    self.page = 1;
                    self.reload_listing().await;
                    self.screen = Screen::Listing;
                }
            }
            _ => {}
        }
        Ok(false)
    }

    fn handle_watchlist_key(&mut self, key: Key) -> Result<bool> {
        match key {
            Key::Escape | Key::Char('q') => self.screen = Screen::Listing,
            Key::ArrowUp => {
                self.wl_selected = self.wl_selected.saturating_sub(1);
            }
            Key::ArrowDown => {
                if self.wl_selected + 1 < self.watchlist_rows.len() {
                    self.wl_selected += 1;
                }
            }
            Key::Enter => {
                if let Some(entry) = self.watchlist_rows.get(self.wl_selected).map(|(e, _)| *e) {
                    self.open_detail(entry.kind, entry.id);
                }
            }
            Key::Char('d') => {
                if let Some(entry) = self.watchlist_rows.get(self.wl_selected).map(|(e, _)| *e) {
                    match self.watchlist.remove(entry.id, entry.kind) {
                        Ok(_) => {
                            self.watchlist_rows.remove(self.wl_selected);
                            if self.wl_selected > 0 && self.wl_selected >= self.watchlist_rows.len()
                            {
                                self.wl_selected -= 1;
                            }
                        }
                        Err(e) => self.status = format!("Failed to save the watchlist: {}", e),
                    }
                }
            }
            _ => {}
        }
        Ok(false)
    }

    fn handle_detail_key(&mut self, key: Key) -> bool {
        match key {
            Key::Escape | Key::Char('q') => self.close_detail(),
            Key::Char('s') => self.similar.advance(1),
            Key::Char('a') => self.similar.retreat(1),
            Key::Enter => {
                // Open the highlighted similar title; the aggregator
                // retires the previous view's leftovers on its own.
                if let Some(next) = self.similar.current().cloned() {
                    self.open_detail(next.kind, next.id);
                }
            }
            Key::Char('b') => {
                let shown = self
                    .detail
                    .as_ref()
                    .map(|detail| (detail.id, detail.kind, detail.title.clone()));
                if let Some((id, kind, title)) = shown {
                    self.toggle_bookmark(id, kind, &title);
                }
            }
            _ => {}
        }
        false
    }

    /// Kick off a debounced search for the current query. Only the call
    /// still newest after the quiet window reaches the network, and its
    /// results only apply if the query box still matches.
    fn schedule_search(&self) {
        let query = self.query.trim().to_string();
        if query.is_empty() {
            return;
        }
        let debouncer = self.debouncer.clone();
        let client = self.client.clone();
        let kind = self.kind;
        let events = self.events.clone();
        tokio::spawn(async move {
            if let Some(settled) = debouncer.settle(query).await {
                let result = client.search(kind, &settled, 1).await;
                let _ = events.send(Event::SearchSettled {
                    query: settled,
                    result,
                });
            }
        });
    }

    fn handle_search_results(
        &mut self,
        query: String,
        result: Result<Vec<MediaSummary>, SourceError>,
    ) {
        if self.screen != Screen::Search || query != self.query.trim() {
            debug!("Dropping results for superseded query \"{}\"", query);
            return;
        }
        match result {
            Ok(titles) => {
                self.heading = format!("Results for \"{}\"", query);
                self.titles = titles;
                self.selected = 0;
                self.page = 1;
                self.listing = ListingKind::Search(query);
                self.status.clear();
            }
            Err(e) => self.status = e.to_string(),
        }
    }

    fn open_detail(&mut self, kind: MediaKind, id: u64) {
        if self.screen != Screen::Detail {
            self.return_to = self.screen;
        }
        self.screen = Screen::Detail;
        self.detail = None;
        self.detail_loading = true;
        self.similar = Carousel::new(Vec::new());
        self.status.clear();

        let aggregator = self.aggregator.clone();
        let events = self.events.clone();
        tokio::spawn(async move {
            let outcome = aggregator.open(kind, id).await;
            let _ = events.send(Event::DetailReady(outcome));
        });
    }

    fn handle_detail(&mut self, outcome: Result<DetailOutcome, SourceError>) {
        if self.screen != Screen::Detail {
            // Closed before it landed; the aggregator already retired it.
            return;
        }
        match outcome {
            Ok(DetailOutcome::Ready(detail)) => {
                self.detail_loading = false;
                self.similar = Carousel::new(detail.similar.clone());
                self.detail = Some(detail);
                self.status.clear();
            }
            Ok(DetailOutcome::Superseded) => {
                debug!("Stale detail response dropped");
            }
            Err(e) => {
                self.detail_loading = false;
                self.status = e.to_string();
            }
        }
    }

    fn close_detail(&mut self) {
        self.aggregator.close();
        self.detail = None;
        self.detail_loading = false;
        self.similar = Carousel::new(Vec::new());
        self.status.clear();
        self.screen = self.return_to;
    }

    async fn reload_listing(&mut self) {
        let (result, heading) = match self.listing.clone() {
            ListingKind::Popular => (
                self.client.popular(self.kind, self.page).await,
                match self.kind {
                    MediaKind::Movie => "Popular movies".to_string(),
                    MediaKind::Tv => "Popular TV shows".to_string(),
                },
            ),
            ListingKind::Genre(genre) => (
                self.client.discover(self.kind, genre.id, self.page).await,
                match self.kind {
                    MediaKind::Movie => format!("{} movies", genre.name),
                    MediaKind::Tv => format!("{} TV shows", genre.name),
                },
            ),
            ListingKind::Search(query) => (
                self.client.search(self.kind, &query, self.page).await,
                format!("Results for \"{}\"", query),
            ),
        };
        match result {
            Ok(titles) => {
                self.titles = titles;
                self.heading = heading;
                self.selected = 0;
                self.status.clear();
            }
            Err(e) => self.status = e.to_string(),
        }
    }

    async fn enter_genres(&mut self) {
        if self.genres.is_empty() {
            match self.client.genres(self.kind).await {
                Ok(genres) => {
                    self.genres = genres;
                    self.status.clear();
                }
                Err(e) => {
                    self.status = e.to_string();
                    return;
                }
            }
        }
        self.genre_selected = 0;
        self.screen = Screen::Genres;
    }

    async fn enter_watchlist(&mut self) {
        let entries: Vec<WatchlistEntry> = self.watchlist.entries().to_vec();
        let lookups = entries.into_iter().map(|entry| {
            let client = self.client.clone();
            async move { (entry, client.detail(entry.kind, entry.id).await) }
        });
        let results = join_all(lookups).await;
        self.watchlist_rows = results
            .into_iter()
            .map(|(entry, result)| match result {
                Ok(detail) => (entry, Some(detail)),
                Err(e) => {
                    warn!("Watchlist lookup for {} {} failed: {}", entry.kind, entry.id, e);
                    (entry, None)
                }
            })
            .collect();
        self.wl_selected = 0;
        self.screen = Screen::Watchlist;
    }

    fn toggle_bookmark(&mut self, id: u64, kind: MediaKind, title: &str) {
        match self.watchlist.toggle(id, kind) {
            Ok(true) => self.status = format!("Added \"{}\" to the watchlist", title),
            Ok(false) => self.status = format!("Removed \"{}\" from the watchlist", title),
            Err(e) => self.status = format!("Failed to save the watchlist: {}", e),
        }
    }

    fn toggle_theme(&mut self) {
        self.theme = self.theme.toggled();
        self.watchlist.store_mut().set_theme(self.theme);
        if let Err(e) = self.watchlist.store_mut().save() {
            self.status = format!("Failed to save the theme: {}", e);
        }
    }

    fn visible(&self) -> &[MediaSummary] {
        let shown = self.titles.len().min(self.page_size);
        &self.titles[..shown]
    }

    fn accent_text(&self, text: &str) -> String {
        match self.theme {
            Theme::Dark => text.cyan().bold().to_string(),
            Theme::Light => text.blue().bold().to_string(),
        }
    }

    fn draw(&self) -> Result<()> {
        self.term.clear_screen()?;
        let accent = render::accent(self.theme);

        let mut lines: Vec<String> = Vec::new();
        let kind_label = match self.kind {
            MediaKind::Movie => "Movies",
            MediaKind::Tv => "TV shows",
        };
        lines.push(format!(
            "{}  {}  {}",
            self.accent_text("Marquee"),
            kind_label,
            format!("[{} theme]", self.theme.as_str()).dimmed()
        ));
        lines.push(String::new());

        match self.screen {
            Screen::Listing => {
                lines.push(self.heading.bold().to_string());
                if self.titles.is_empty() {
                    lines.push("No titles found.".dimmed().to_string());
                } else {
                    lines.push(
                        render::summary_table(self.visible(), Some(self.selected), accent)
                            .to_string(),
                    );
                    lines.push(format!("Page {}", self.page).dimmed().to_string());
                }
                lines.push(String::new());
                lines.push(help(
                    "↑/↓ select · Enter details · / search · g genres · b save · w watchlist · m movies/TV · t theme · n/p page · r refresh · q quit",
                ));
            }
            Screen::Search => {
                lines.push(format!("{} {}_", "Search:".bold(), self.query));
                lines.push(String::new());
                lines.push(self.heading.bold().to_string());
                if self.titles.is_empty() {
                    lines.push("No titles found.".dimmed().to_string());
                } else {
                    lines.push(
                        render::summary_table(self.visible(), Some(self.selected), accent)
                            .to_string(),
                    );
                }
                lines.push(String::new());
                lines.push(help(
                    "type to search · Enter search now · Esc done (keeps the results)",
                ));
            }
            Screen::Genres => {
                let heading = match self.kind {
                    MediaKind::Movie => "Movie genres",
                    MediaKind::Tv => "TV genres",
                };
                lines.push(heading.bold().to_string());
                for (index, genre) in self.genres.iter().enumerate() {
                    if index == self.genre_selected {
                        lines.push(self.accent_text(&format!("> {}", genre.name)));
                    } else {
                        lines.push(format!("  {}", genre.name));
                    }
                }
                lines.push(String::new());
                lines.push(help("↑/↓ select · Enter browse genre · Esc back"));
            }
            Screen::Watchlist => {
                lines.push("Watchlist".bold().to_string());
                if self.watchlist_rows.is_empty() {
                    lines.push("The watchlist is empty.".dimmed().to_string());
                } else {
                    lines.push(
                        render::watchlist_table(&self.watchlist_rows, Some(self.wl_selected), accent)
                            .to_string(),
                    );
                }
                lines.push(String::new());
                lines.push(help("↑/↓ select · Enter details · d remove · Esc back"));
            }
            Screen::Detail => match &self.detail {
                Some(detail) => {
                    lines.push(render::detail_card(
                        detail,
                        self.watchlist.contains(detail.id, detail.kind),
                    ));
                    if !self.similar.is_empty() {
                        lines.push(String::new());
                        lines.push(format!(
                            "{} {}",
                            "Similar titles".bold(),
                            format!("({}/{})", self.similar.cursor() + 1, self.similar.len())
                                .dimmed()
                        ));
                        let window: Vec<MediaSummary> = self
                            .similar
                            .window(SIMILAR_STRIP)
                            .into_iter()
                            .cloned()
                            .collect();
                        lines.push(render::summary_table(&window, Some(0), accent).to_string());
                    }
                    lines.push(String::new());
                    lines.push(help(
                        "s/a similar strip · Enter open highlighted · b watchlist · Esc close",
                    ));
                }
                None if self.detail_loading => {
                    lines.push("Loading details...".dimmed().to_string());
                    lines.push(String::new());
                    lines.push(help("Esc cancel"));
                }
                None => {
                    lines.push("Nothing to show.".dimmed().to_string());
                    lines.push(String::new());
                    lines.push(help("Esc back"));
                }
            },
        }

        if !self.status.is_empty() {
            lines.push(String::new());
            lines.push(self.status.red().to_string());
        }

        self.term.write_line(&lines.join("\n"))?;
        Ok(())
    }
}

fn help(text: &str) -> String {
    text.dimmed().to_string()
}
