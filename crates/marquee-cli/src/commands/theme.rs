use super::open_state;
use crate::output::{Output, OutputFormat};
use color_eyre::eyre::eyre;
use color_eyre::Result;
use serde_json::json;

pub fn run_theme(change: Option<crate::ThemeArg>, output: &Output) -> Result<()> {
    let mut store = open_state()?;
    let current = store.theme();

    let Some(change) = change else {
        match output.format() {
            OutputFormat::Human => {
                output.println(format!("Current theme: {}", current.as_str()));
            }
            _ => output.json(&json!({ "type": "theme", "theme": current.as_str() })),
        }
        return Ok(());
    };

    let next = change.resolve(current);
    if next == current {
        output.info(format!("Theme already {}", next.as_str()));
        return Ok(());
    }
    store.set_theme(next);
    store
        .save()
        .map_err(|e| eyre!("Failed to save state: {}", e))?;
    output.success(format!("Theme set to {}", next.as_str()));
    Ok(())
}
