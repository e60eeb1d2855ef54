mod app;
mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use vocabuilder_lib::flashcards::Rating;

#[derive(Parser)]
#[command(name = "vocabuilder-cli", about = "Vocabulary history and flashcard review", version)]
struct Cli {
    /// Use a specific data directory (default: from config.toml, then the platform data dir)
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Output format
    #[arg(long, global = true, default_value = "plain")]
    format: OutputFormat,

    #[command(subcommand)]
    command: Command,
}

#[derive(Clone, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    Plain,
    Json,
}

#[derive(Subcommand)]
enum Command {
    /// Save a translation entered by hand
    Add {
        /// English word
        word: String,
        /// Translation of the word
        #[arg(long)]
        translation: String,
        /// Part of speech (noun, verb, ...)
        #[arg(long = "pos", default_value = "")]
        part_of_speech: String,
        /// Example sentence
        #[arg(long, default_value = "")]
        example: String,
        /// Translation of the example sentence
        #[arg(long, default_value = "")]
        example_translation: String,
    },

    /// List saved translations, newest first
    History {
        /// Maximum entries to show
        #[arg(long)]
        limit: Option<usize>,
        /// Only show entries whose word or translation contains this text
        #[arg(long)]
        search: Option<String>,
    },

    /// Delete a translation by id or word
    Delete {
        /// Translation id, or the word itself
        target: String,
    },

    /// Clear the whole translation history
    Clear,

    /// Show the cards of a new review session
    Session,

    /// Rate a word and schedule its next review
    Rate {
        word: String,
        /// again, good, easy (or 1, 2, 3)
        rating: Rating,
    },

    /// Show review statistics
    Stats,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    let app = app::App::new(cli.data_dir)?;

    match cli.command {
        Command::Add {
            word,
            translation,
            part_of_speech,
            example,
            example_translation,
        } => {
            commands::add::run(
                &app,
                &word,
                translation,
                part_of_speech,
                example,
                example_translation,
                &cli.format,
            )?;
        }
        Command::History { limit, search } => {
            commands::history::run_list(&app, limit, search.as_deref(), &cli.format)?;
        }
        Command::Delete { target } => {
            commands::history::run_delete(&app, &target, &cli.format)?;
        }
        Command::Clear => {
            commands::history::run_clear(&app, &cli.format)?;
        }
        Command::Session => {
            commands::review::run_session(&app, &cli.format)?;
        }
        Command::Rate { word, rating } => {
            commands::review::run_rate(&app, &word, rating, &cli.format)?;
        }
        Command::Stats => {
            commands::stats::run(&app, &cli.format)?;
        }
    }

    Ok(())
}
