use std::path::PathBuf;

use anyhow::{bail, Context, Result};

use vocabuilder_lib::history::TranslationRecord;
use vocabuilder_lib::{Config, Vocabulary};

/// Shared application state for CLI commands
pub struct App {
    pub config: Config,
    pub vocabulary: Vocabulary,
}

impl App {
    /// Load config.toml and open the data directory
    pub fn new(data_dir: Option<PathBuf>) -> Result<Self> {
        let mut config = Config::load().context("Failed to load configuration")?;
        if let Some(dir) = data_dir {
            config.data_dir = Some(dir);
        }

        let vocabulary = Vocabulary::open(&config).context("Failed to open data directory")?;

        Ok(Self { config, vocabulary })
    }

    pub fn list_history(&self) -> Result<Vec<TranslationRecord>> {
        self.vocabulary
            .list_history()
            .context("Failed to read translation history")
    }

    /// Find a translation by id, falling back to the word (case-insensitive)
    pub fn find_translation(&self, target: &str) -> Result<TranslationRecord> {
        let Some(history) = self
            .vocabulary
            .history()
            .load()
            .context("Failed to read translation history")?
            .into_readable()
        else {
            bail!("Translation history is corrupted. A backup was kept next to it.");
        };

        if let Some(t) = history.iter().find(|t| t.id == target) {
            return Ok(t.clone());
        }

        let target_lower = target.to_lowercase();
        match history.iter().find(|t| t.word.to_lowercase() == target_lower) {
            Some(t) => Ok(t.clone()),
            None => bail!("No translation with id or word '{}'", target),
        }
    }
}
