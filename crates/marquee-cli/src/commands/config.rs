use super::prompts;
use crate::output::{Output, OutputFormat};
use color_eyre::eyre::eyre;
use color_eyre::Result;
use comfy_table::{Cell, Table};
use media_browse_config::{
    Config, OmdbConfig, PathManager, OMDB_KEY_PLACEHOLDER, TMDB_KEY_PLACEHOLDER,
};
use owo_colors::OwoColorize;
use serde_json::json;

pub fn run_config(cmd: crate::ConfigCommands, output: &Output) -> Result<()> {
    match cmd {
        crate::ConfigCommands::Show => show_config(output),
        crate::ConfigCommands::Set { key, value } => set_value(&key, &value, output),
        crate::ConfigCommands::Init => init_config(output),
    }
}

fn show_config(output: &Output) -> Result<()> {
    let path_manager = PathManager::default();
    let config_file = path_manager.config_file();

    if !config_file.exists() {
        output.warn(format!(
            "Configuration file not found at: {}",
            config_file.display()
        ));
        output.info("Run 'marquee config init' to create one.");
        return Ok(());
    }

    let config = Config::load_from_file(&config_file).map_err(|e| {
        eyre!(
            "Failed to load config from {}: {}",
            config_file.display(),
            e
        )
    })?;

    match output.format() {
        OutputFormat::Human => {
            if output.is_quiet() {
                return Ok(());
            }

            let mut info_table = Table::new();
            info_table.set_header(vec![
                Cell::new("Config File").add_attribute(comfy_table::Attribute::Bold),
                Cell::new(config_file.display().to_string()),
            ]);
            info_table.load_preset(comfy_table::presets::UTF8_FULL);
            info_table.apply_modifier(comfy_table::modifiers::UTF8_ROUND_CORNERS);
            println!("{}", info_table);
            println!();

            let mut tmdb_table = Table::new();
            tmdb_table.set_header(vec![Cell::new("TMDB Configuration")
                .fg(comfy_table::Color::Cyan)
                .add_attribute(comfy_table::Attribute::Bold)]);
            tmdb_table.add_row(vec![
                Cell::new("Configured"),
                Cell::new(check_mark(config.is_tmdb_configured())),
            ]);
            tmdb_table.add_row(vec![
                Cell::new("API Key"),
                Cell::new(mask_string(&config.tmdb.api_key)),
            ]);
            tmdb_table.add_row(vec![Cell::new("Language"), Cell::new(&config.tmdb.language)]);
            tmdb_table.load_preset(comfy_table::presets::UTF8_FULL);
            tmdb_table.apply_modifier(comfy_table::modifiers::UTF8_ROUND_CORNERS);
            println!("{}", tmdb_table);
            println!();

            if let Some(omdb) = &config.omdb {
                let mut omdb_table = Table::new();
                omdb_table.set_header(vec![Cell::new("OMDB Configuration")
                    .fg(comfy_table::Color::Cyan)
                    .add_attribute(comfy_table::Attribute::Bold)]);
                omdb_table.add_row(vec![
                    Cell::new("Configured"),
                    Cell::new(check_mark(config.is_omdb_configured())),
                ]);
                omdb_table.add_row(vec![
                    Cell::new("API Key"),
                    Cell::new(mask_string(&omdb.api_key)),
                ]);
                omdb_table.load_preset(comfy_table::presets::UTF8_FULL);
                omdb_table.apply_modifier(comfy_table::modifiers::UTF8_ROUND_CORNERS);
                println!("{}", omdb_table);
                println!();
            } else {
                println!("{}", "OMDB: Not configured (external ratings disabled)".bright_black());
                println!();
            }

            let mut browse_table = Table::new();
            browse_table.set_header(vec![Cell::new("Browse Options")
                .fg(comfy_table::Color::Cyan)
                .add_attribute(comfy_table::Attribute::Bold)]);
            browse_table.add_row(vec![
                Cell::new("Search Debounce"),
                Cell::new(format!("{} ms", config.browse.debounce_ms)),
            ]);
            browse_table.add_row(vec![
                Cell::new("Page Size"),
                Cell::new(config.browse.page_size),
            ]);
            browse_table.load_preset(comfy_table::presets::UTF8_FULL);
            browse_table.apply_modifier(comfy_table::modifiers::UTF8_ROUND_CORNERS);
            println!("{}", browse_table);
        }
        OutputFormat::Json | OutputFormat::JsonPretty => {
            let json_config = json!({
                "config_file": config_file.display().to_string(),
                "tmdb": {
                    "configured": config.is_tmdb_configured(),
                    "api_key": mask_string(&config.tmdb.api_key),
                    "language": config.tmdb.language,
                },
                "omdb": if let Some(omdb) = &config.omdb {
                    json!({
                        "configured": config.is_omdb_configured(),
                        "api_key": mask_string(&omdb.api_key),
                    })
                } else {
                    json!(null)
                },
                "browse": {
                    "debounce_ms": config.browse.debounce_ms,
                    "page_size": config.browse.page_size,
                },
            });
            output.json(&json_config);
        }
    }

    Ok(())
}

fn set_value(key: &str, value: &str, output: &Output) -> Result<()> {
    let path_manager = PathManager::default();
    path_manager
        .ensure_directories()
        .map_err(|e| eyre!("Failed to create configuration directories: {}", e))?;
    let config_file = path_manager.config_file();

    let mut config = if config_file.exists() {
        Config::load_from_file(&config_file).map_err(|e| {
            eyre!(
                "Failed to load config from {}: {}",
                config_file.display(),
                e
            )
        })?
    } else {
        Config::sample()
    };

    match key {
        "tmdb.api_key" => config.tmdb.api_key = value.to_string(),
        "tmdb.language" => config.tmdb.language = value.to_string(),
        "omdb.api_key" => {
            config.omdb = Some(OmdbConfig {
                api_key: value.to_string(),
            });
        }
        "browse.debounce_ms" => {
            config.browse.debounce_ms = value
                .parse()
                .map_err(|_| eyre!("browse.debounce_ms must be a number, got '{}'", value))?;
        }
        "browse.page_size" => {
            config.browse.page_size = value
                .parse()
                .map_err(|_| eyre!("browse.page_size must be a number, got '{}'", value))?;
        }
        other => {
            return Err(eyre!(
                "Unknown key '{}'. Valid keys: tmdb.api_key, tmdb.language, omdb.api_key, browse.debounce_ms, browse.page_size",
                other
            ));
        }
    }

    config.save_to_file(&config_file).map_err(|e| {
        eyre!(
            "Failed to save config to {}: {}",
            config_file.display(),
            e
        )
    })?;
    // Values are not echoed back; keys may be secrets.
    output.success(format!("Set {}", key));
    Ok(())
}

fn init_config(output: &Output) -> Result<()> {
    let path_manager = PathManager::default();
    path_manager
        .ensure_directories()
        .map_err(|e| eyre!("Failed to create configuration directories: {}", e))?;
    let config_file = path_manager.config_file();

    let existing = if config_file.exists() {
        output.warn(format!(
            "A configuration file already exists at: {}",
            config_file.display()
        ));
        if !prompts::prompt_yes_no("Overwrite it?", Some(false))? {
            output.info("Keeping the existing configuration.");
            return Ok(());
        }
        Config::load_from_file(&config_file).ok()
    } else {
        None
    };

    print_section_header("Marquee Setup", output);
    output.println("");
    output.println("A TMDB API key is required for all listings and details.");
    output.println("Create one at: https://www.themoviedb.org/settings/api");
    output.println("");

    let tmdb_default = existing
        .as_ref()
        .map(|config| config.tmdb.api_key.as_str())
        .filter(|key| !key.is_empty() && *key != TMDB_KEY_PLACEHOLDER);
    let api_key = prompts::prompt_string("TMDB API key", tmdb_default)?;

    let language_default = existing
        .as_ref()
        .map(|config| config.tmdb.language.clone())
        .unwrap_or_else(|| "en-US".to_string());
    let language = prompts::prompt_string("Language", Some(&language_default))?;

    output.println("");
    output.println("An OMDB API key adds IMDb and Rotten Tomatoes ratings to detail views.");
    output.println("This is optional. Get one at: https://www.omdbapi.com/apikey.aspx");
    let omdb = if prompts::prompt_yes_no("Configure an OMDB API key?", Some(false))? {
        let omdb_default = existing
            .as_ref()
            .and_then(|config| config.omdb.as_ref())
            .map(|omdb| omdb.api_key.as_str())
            .filter(|key| !key.is_empty() && *key != OMDB_KEY_PLACEHOLDER);
        let key = prompts::prompt_string("OMDB API key", omdb_default)?;
        if key.trim().is_empty() {
            None
        } else {
            Some(OmdbConfig {
                api_key: key.trim().to_string(),
            })
        }
    } else {
        None
    };

    output.println("");
    let debounce_default = existing
        .as_ref()
        .map(|config| config.browse.debounce_ms as u32)
        .unwrap_or(500);
    let debounce_ms =
        u64::from(prompts::prompt_number("Search debounce window (ms)", Some(debounce_default))?);
    let page_default = existing
        .as_ref()
        .map(|config| config.browse.page_size as u32)
        .unwrap_or(20);
    let page_size = prompts::prompt_number("Listing page size", Some(page_default))? as usize;

    let mut config = Config::sample();
    config.tmdb.api_key = api_key.trim().to_string();
    config.tmdb.language = language.trim().to_string();
    config.omdb = omdb;
    config.browse.debounce_ms = debounce_ms;
    config.browse.page_size = page_size;

    config.save_to_file(&config_file).map_err(|e| {
        eyre!(
            "Failed to save config to {}: {}",
            config_file.display(),
            e
        )
    })?;

    output.println("");
    output.success(format!("Configuration written to {}", config_file.display()));
    if !config.is_tmdb_configured() {
        output.warn("No TMDB API key was entered; commands will fail until one is set.");
    }
    Ok(())
}

fn check_mark(ok: bool) -> String {
    if ok {
        "✓".green().to_string()
    } else {
        "✗".red().to_string()
    }
}

fn mask_string(s: &str) -> String {
    if s.is_empty() || s == TMDB_KEY_PLACEHOLDER || s == OMDB_KEY_PLACEHOLDER {
        return "<not set>".to_string();
    }
    if s.len() <= 4 {
        return "*".repeat(s.len());
    }
    format!("{}***{}", &s[..2], &s[s.len() - 2..])
}

fn print_section_header(title: &str, output: &Output) {
    output.println("");
    output.println(format!("{}", title.bold().bright_cyan()));
    output.println(format!("{}", "─".repeat(title.len()).bright_cyan()));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn masking_keeps_only_the_edges() {
        assert_eq!(mask_string("abcdefgh"), "ab***gh");
        assert_eq!(mask_string("abc"), "***");
        assert_eq!(mask_string(""), "<not set>");
        assert_eq!(mask_string(TMDB_KEY_PLACEHOLDER), "<not set>");
        assert_eq!(mask_string(OMDB_KEY_PLACEHOLDER), "<not set>");
    }
}
