use anyhow::{bail, Context, Result};

use vocabuilder_lib::flashcards::algorithm::format_interval;
use vocabuilder_lib::flashcards::Rating;

use crate::app::App;
use crate::OutputFormat;

pub fn run_session(app: &App, format: &OutputFormat) -> Result<()> {
    let session = app
        .vocabulary
        .build_session(vocabuilder_lib::now_millis())
        .context("Failed to build review session")?;

    match format {
        OutputFormat::Json => {
            let cards: Vec<serde_json::Value> = session
                .cards
                .iter()
                .map(|card| {
                    let progress = session.progress.get(&card.word);
                    serde_json::json!({
                        "card": card,
                        "progress": progress,
                        "isNew": progress.map_or(true, |p| p.is_new()),
                    })
                })
                .collect();
            println!("{}", serde_json::to_string_pretty(&cards)?);
        }
        OutputFormat::Plain => {
            if session.cards.is_empty() {
                println!("Nothing to review. Translate some words first to build your deck.");
                return Ok(());
            }
            println!(
                "{} card(s) (session size {})",
                session.cards.len(),
                app.config.session_size
            );
            for (i, card) in session.cards.iter().enumerate() {
                let progress = session.progress.get(&card.word);
                let badge = if progress.map_or(true, |p| p.is_new()) { "  [New]" } else { "" };
                println!("{:>3}. {}{}", i + 1, card.word, badge);
            }
        }
    }

    Ok(())
}

pub fn run_rate(app: &App, word: &str, rating: Rating, format: &OutputFormat) -> Result<()> {
    let record = app.find_translation(word)?;

    let updated = app
        .vocabulary
        .rate_word(&record.word, rating, vocabuilder_lib::now_millis())
        .context("Failed to save review progress")?;
    let Some(progress) = updated else {
        bail!("Flashcard storage is corrupted. Progress was not saved to avoid overwriting existing data.");
    };

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&progress)?);
        }
        OutputFormat::Plain => {
            println!(
                "{}: {} → next review in {} (ease {:.2}, {} in a row)",
                progress.word,
                rating,
                format_interval(progress.interval),
                progress.ease_factor,
                progress.repetitions
            );
        }
    }

    Ok(())
}
