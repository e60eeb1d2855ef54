use anyhow::{Context, Result};

use crate::app::App;
use crate::OutputFormat;

pub fn run(app: &App, format: &OutputFormat) -> Result<()> {
    let stats = app
        .vocabulary
        .review_stats(vocabuilder_lib::now_millis())
        .context("Failed to compute review statistics")?;

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&stats)?);
        }
        OutputFormat::Plain => {
            println!("Words:     {}", stats.total_words);
            println!("  New:       {}", stats.unseen);
            println!("  Due:       {}", stats.due);
            println!("  Scheduled: {}", stats.scheduled);
            if stats.orphaned_progress > 0 {
                println!("Progress for deleted words: {}", stats.orphaned_progress);
            }
        }
    }

    Ok(())
}
