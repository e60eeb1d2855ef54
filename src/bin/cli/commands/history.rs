use anyhow::{bail, Context, Result};
use chrono::{Local, TimeZone};

use crate::app::App;
use crate::OutputFormat;

fn format_timestamp(millis: i64) -> String {
    Local
        .timestamp_millis_opt(millis)
        .single()
        .map(|dt| dt.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|| "unknown".to_string())
}

pub fn run_list(
    app: &App,
    limit: Option<usize>,
    search: Option<&str>,
    format: &OutputFormat,
) -> Result<()> {
    let mut history = match search {
        Some(query) => app
            .vocabulary
            .search_history(query)
            .context("Failed to search translation history")?,
        None => app.list_history()?,
    };
    if let Some(limit) = limit {
        history.truncate(limit);
    }

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&history)?);
        }
        OutputFormat::Plain => {
            if history.is_empty() {
                match search {
                    Some(query) => println!("(no translations matching \"{}\")", query),
                    None => println!("(no translations yet)"),
                }
                return Ok(());
            }
            for t in &history {
                if t.part_of_speech.is_empty() {
                    println!("{} → {}", t.word, t.translation);
                } else {
                    println!("{} → {} ({})", t.word, t.translation, t.part_of_speech);
                }
                if !t.example.is_empty() {
                    println!("    {}", t.example);
                }
                if !t.example_translation.is_empty() {
                    println!("    {}", t.example_translation);
                }
                println!("    {}  {}", format_timestamp(t.timestamp), t.id);
            }
        }
    }

    Ok(())
}

pub fn run_delete(app: &App, target: &str, format: &OutputFormat) -> Result<()> {
    let record = app.find_translation(target)?;

    let deleted = app
        .vocabulary
        .delete_translation(&record.id)
        .context("Failed to delete translation")?;
    if !deleted {
        bail!("Translation history is corrupted. Nothing was deleted.");
    }

    match format {
        OutputFormat::Json => {
            let output = serde_json::json!({
                "deleted": record.id,
                "word": record.word,
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Plain => {
            println!("Deleted \"{}\" ({})", record.word, record.id);
        }
    }

    Ok(())
}

pub fn run_clear(app: &App, format: &OutputFormat) -> Result<()> {
    app.vocabulary
        .clear_history()
        .context("Failed to clear history")?;

    match format {
        OutputFormat::Json => println!("{}", serde_json::json!({ "cleared": true })),
        OutputFormat::Plain => println!("History cleared"),
    }

    Ok(())
}
