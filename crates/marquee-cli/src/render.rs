use crate::output::{Output, OutputFormat};
use comfy_table::{Cell, Table};
use indicatif::{ProgressBar, ProgressStyle};
use media_browse_models::{Genre, MediaDetail, MediaSummary, Theme, WatchlistEntry};
use media_browse_sources::PrimaryDetail;
use owo_colors::OwoColorize;
use serde_json::json;
use std::time::Duration;

// Poster images at the 500px grid width
const IMAGE_BASE: &str = "https://image.tmdb.org/t/p/w500";

/// How many similar titles the detail card lists.
const SIMILAR_SHOWN: usize = 6;

pub fn poster_url(poster_path: Option<&str>) -> String {
    match poster_path {
        Some(path) => format!("{}{}", IMAGE_BASE, path),
        None => "(no poster)".to_string(),
    }
}

/// A loading spinner on stderr; indicatif hides it automatically when
/// stderr is not a terminal.
pub fn spinner(msg: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .unwrap()
            .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏"),
    );
    pb.set_message(msg.to_string());
    pb.enable_steady_tick(Duration::from_millis(80));
    pb
}

/// Accent color for table headers and selection, from the saved theme.
pub fn accent(theme: Theme) -> comfy_table::Color {
    match theme {
        Theme::Light => comfy_table::Color::Blue,
        Theme::Dark => comfy_table::Color::Cyan,
    }
}

/// Vote averages get traffic-light colors: green from 7.0, yellow from
/// 5.0, red below. A missing value renders dim, never as an error.
pub fn rating_cell(vote_average: Option<f64>) -> Cell {
    match vote_average {
        Some(v) if v >= 7.0 => Cell::new(format!("{:.1}", v)).fg(comfy_table::Color::Green),
        Some(v) if v >= 5.0 => Cell::new(format!("{:.1}", v)).fg(comfy_table::Color::Yellow),
        Some(v) => Cell::new(format!("{:.1}", v)).fg(comfy_table::Color::Red),
        None => Cell::new("N/A").fg(comfy_table::Color::DarkGrey),
    }
}

fn year_text(year: Option<u32>) -> String {
    year.map(|y| y.to_string()).unwrap_or_else(|| "N/A".to_string())
}

fn base_table() -> Table {
    let mut table = Table::new();
    table.load_preset(comfy_table::presets::UTF8_FULL);
    table.apply_modifier(comfy_table::modifiers::UTF8_ROUND_CORNERS);
    table
}

/// One row per title; the terminal's stand-in for a poster grid.
/// `selected` highlights a row for the interactive session.
pub fn summary_table(
    titles: &[MediaSummary],
    selected: Option<usize>,
    accent: comfy_table::Color,
) -> Table {
    let mut table = base_table();
    table.set_header(vec![
        Cell::new("").fg(accent),
        Cell::new("ID").fg(accent).add_attribute(comfy_table::Attribute::Bold),
        Cell::new("Title").fg(accent).add_attribute(comfy_table::Attribute::Bold),
        Cell::new("Kind").fg(accent),
        Cell::new("Year").fg(accent),
        Cell::new("Rating").fg(accent),
    ]);
    for (index, title) in titles.iter().enumerate() {
        let is_selected = selected == Some(index);
        let marker = if is_selected { ">" } else { "" };
        let mut title_cell = Cell::new(&title.title);
        if is_selected {
            title_cell = title_cell
                .fg(accent)
                .add_attribute(comfy_table::Attribute::Bold);
        }
        table.add_row(vec![
            Cell::new(marker).fg(accent),
            Cell::new(title.id),
            title_cell,
            Cell::new(title.kind.label()),
            Cell::new(year_text(title.year)),
            rating_cell(title.vote_average),
        ]);
    }
    table
}

pub fn print_summaries(titles: &[MediaSummary], heading: &str, output: &Output) {
    match output.format() {
        OutputFormat::Human => {
            if titles.is_empty() {
                output.info("No titles found.");
                return;
            }
            output.println(heading.bold().to_string());
            output.println(summary_table(titles, None, comfy_table::Color::Cyan).to_string());
        }
        _ => {
            output.json(&json!({
                "type": "titles",
                "heading": heading,
                "count": titles.len(),
                "titles": titles,
            }));
        }
    }
}

pub fn print_genres(genres: &[Genre], heading: &str, output: &Output) {
    match output.format() {
        OutputFormat::Human => {
            if genres.is_empty() {
                output.info("No genres found.");
                return;
            }
            let mut table = base_table();
            table.set_header(vec![
                Cell::new("ID").add_attribute(comfy_table::Attribute::Bold),
                Cell::new("Genre").add_attribute(comfy_table::Attribute::Bold),
            ]);
            for genre in genres {
                table.add_row(vec![Cell::new(genre.id), Cell::new(&genre.name)]);
            }
            output.println(heading.bold().to_string());
            output.println(table.to_string());
        }
        _ => {
            output.json(&json!({
                "type": "genres",
                "heading": heading,
                "genres": genres,
            }));
        }
    }
}

/// Print the full detail view for one title.
pub fn print_detail(detail: &MediaDetail, on_watchlist: bool, output: &Output) {
    match output.format() {
        OutputFormat::Human => {
            output.println(detail_card(detail, on_watchlist));
            if !detail.similar.is_empty() {
                output.println("");
                output.println("Similar titles".bold().to_string());
                let shown: Vec<MediaSummary> = detail
                    .similar
                    .iter()
                    .take(SIMILAR_SHOWN)
                    .cloned()
                    .collect();
                output.println(summary_table(&shown, None, comfy_table::Color::Cyan).to_string());
            }
        }
        _ => {
            output.json(&json!({
                "type": "detail",
                "on_watchlist": on_watchlist,
                "poster_url": detail.poster_path.as_deref().map(|p| format!("{}{}", IMAGE_BASE, p)),
                "detail": detail,
            }));
        }
    }
}

pub fn detail_card(detail: &MediaDetail, on_watchlist: bool) -> String {
    let mut lines: Vec<String> = Vec::new();

    let title_line = match detail.year() {
        Some(year) => format!("{} ({})", detail.title, year),
        None => detail.title.clone(),
    };
    if on_watchlist {
        lines.push(format!(
            "{}  {}",
            title_line.bold(),
            "★ on watchlist".yellow()
        ));
    } else {
        lines.push(title_line.bold().to_string());
    }

    let mut meta: Vec<String> = vec![detail.kind.label().to_string()];
    if let Some(minutes) = detail.runtime_minutes {
        meta.push(format!("{} min", minutes));
    }
    if !detail.genres.is_empty() {
        meta.push(detail.genres.join(", "));
    }
    meta.push(match detail.vote_average {
        Some(v) => format!("{:.1}/10", v),
        None => "N/A".to_string(),
    });
    lines.push(meta.join(" · "));
    lines.push(String::new());

    if detail.overview.is_empty() {
        lines.push("No overview available.".dimmed().to_string());
    } else {
        lines.push(detail.overview.clone());
    }
    lines.push(String::new());

    if detail.cast.is_empty() {
        lines.push("Cast: N/A".to_string());
    } else {
        let cast: Vec<String> = detail
            .cast
            .iter()
            .map(|member| match &member.character {
                Some(character) => format!("{} ({})", member.name, character),
                None => member.name.clone(),
            })
            .collect();
        lines.push(format!("Cast: {}", cast.join(", ")));
    }

    if let Some(external) = &detail.external {
        if let Some(director) = &external.director {
            lines.push(format!("Director: {}", director));
        }
        if let Some(awards) = &external.awards {
            lines.push(format!("Awards: {}", awards));
        }
        if !external.ratings.is_empty() {
            let mut table = base_table();
            table.set_header(vec![
                Cell::new("Source").add_attribute(comfy_table::Attribute::Bold),
                Cell::new("Rating").add_attribute(comfy_table::Attribute::Bold),
            ]);
            for rating in &external.ratings {
                table.add_row(vec![Cell::new(&rating.source), Cell::new(&rating.value)]);
            }
            lines.push(String::new());
            lines.push(table.to_string());
        }
    }

    lines.push(String::new());
    match &detail.trailer {
        Some(trailer) => {
            lines.push(format!("Trailer: {}", trailer.name));
            lines.push(format!("         {}", trailer.watch_url().underline()));
        }
        None => lines.push("No trailer available.".dimmed().to_string()),
    }

    lines.push(format!("Poster:  {}", poster_url(detail.poster_path.as_deref())));

    lines.join("\n")
}

/// The watchlist view: saved entries with whatever details hydrated.
pub fn print_watchlist(
    rows: &[(WatchlistEntry, Option<PrimaryDetail>)],
    output: &Output,
) {
    match output.format() {
        OutputFormat::Human => {
            if rows.is_empty() {
                output.info("The watchlist is empty.");
                return;
            }
            output.println("Watchlist".bold().to_string());
            output.println(watchlist_table(rows, None, comfy_table::Color::Cyan).to_string());
        }
        _ => {
            let entries: Vec<serde_json::Value> = rows
                .iter()
                .map(|(entry, detail)| match detail {
                    Some(detail) => json!({
                        "id": entry.id,
                        "kind": entry.kind,
                        "title": detail.title,
                        "year": detail.release_date.map(|d| d.format("%Y").to_string()),
                        "vote_average": detail.vote_average,
                    }),
                    None => json!({
                        "id": entry.id,
                        "kind": entry.kind,
                    }),
                })
                .collect();
            output.json(&json!({
                "type": "watchlist",
                "count": rows.len(),
                "entries": entries,
            }));
        }
    }
}

pub fn watchlist_table(
    rows: &[(WatchlistEntry, Option<PrimaryDetail>)],
    selected: Option<usize>,
    accent: comfy_table::Color,
) -> Table {
    let mut table = base_table();
    table.set_header(vec![
        Cell::new("").fg(accent),
        Cell::new("ID").fg(accent).add_attribute(comfy_table::Attribute::Bold),
        Cell::new("Title").fg(accent).add_attribute(comfy_table::Attribute::Bold),
        Cell::new("Kind").fg(accent),
        Cell::new("Rating").fg(accent),
    ]);
    for (index, (entry, detail)) in rows.iter().enumerate() {
        let is_selected = selected == Some(index);
        let marker = if is_selected { ">" } else { "" };
        let (title_text, rating) = match detail {
            Some(detail) => (detail.title.clone(), detail.vote_average),
            None => ("(details unavailable)".to_string(), None),
        };
        let mut title_cell = Cell::new(title_text);
        if is_selected {
            title_cell = title_cell
                .fg(accent)
                .add_attribute(comfy_table::Attribute::Bold);
        } else if detail.is_none() {
            title_cell = title_cell.fg(comfy_table::Color::DarkGrey);
        }
        table.add_row(vec![
            Cell::new(marker).fg(accent),
            Cell::new(entry.id),
            title_cell,
            Cell::new(entry.kind.label()),
            rating_cell(rating),
        ]);
    }
    table
}
