use anyhow::{bail, Context, Result};

use vocabuilder_lib::history::TranslationRecord;
use vocabuilder_lib::translate::{TranslateError, TranslationFields};
use vocabuilder_lib::validation::normalize_word_input;

use crate::app::App;
use crate::OutputFormat;

pub fn run(
    app: &App,
    word: &str,
    translation: String,
    part_of_speech: String,
    example: String,
    example_translation: String,
    format: &OutputFormat,
) -> Result<()> {
    let Some(word) = normalize_word_input(word) else {
        bail!("{}", TranslateError::InvalidWordInput.user_message());
    };

    let record = TranslationRecord::new(
        word,
        TranslationFields {
            translation,
            part_of_speech,
            example,
            example_translation,
        },
        vocabuilder_lib::now_millis(),
    );

    let saved = app
        .vocabulary
        .save_translation(&record)
        .context("Failed to save translation")?;
    if !saved {
        bail!("Translation history is corrupted. Not saved to avoid overwriting existing data.");
    }

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&record)?);
        }
        OutputFormat::Plain => {
            println!("Saved \"{}\" → {}", record.word, record.translation);
            println!("  ID: {}", record.id);
        }
    }

    Ok(())
}
