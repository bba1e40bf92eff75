//! Memory game scores client binary.
//!
//! Records finished games and inspects the high-score and recent-score
//! collections kept in the local score store.
//!
//! # Examples
//!
//! ```bash
//! scores record --flips 18 --seconds 42.5
//! scores list high
//! scores delete recent 3
//! scores clear all
//! ```

mod logging;

use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use chrono::TimeDelta;
use clap::{Parser, Subcommand, ValueEnum};
use client_bootstrap::{ScoresConfig, Statistics, StatisticsBuilder, format_elapsed};
use score_runtime::{CollectionHandle, Statistic, StatisticKey};

#[derive(Parser, Debug)]
#[command(name = "scores", about = "Record and inspect memory game scores")]
struct Cli {
    /// Directory holding the score store (overrides SCORES_DATA_DIR)
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Record a finished game in both lists
    Record {
        /// Number of card flips the game took
        #[arg(long)]
        flips: u32,
        /// Game duration in seconds
        #[arg(long)]
        seconds: f64,
    },
    /// Print one list
    List {
        #[arg(value_enum, default_value_t = ListKind::High)]
        list: ListKind,
    },
    /// Delete the stored game with the given key from one list
    Delete {
        #[arg(value_enum)]
        list: ListKind,
        key: u64,
    },
    /// Remove every game from one or both lists
    Clear {
        #[arg(value_enum, default_value_t = ClearTarget::All)]
        target: ClearTarget,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum ListKind {
    High,
    Recent,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum ClearTarget {
    High,
    Recent,
    All,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    // 1. Load configuration from environment
    let mut config = ScoresConfig::from_env();
    if let Some(dir) = cli.data_dir {
        config.data_dir = dir;
    }

    // 2. Setup logging
    let _guard = logging::setup_logging(&config.log_dir())?;
    tracing::info!("Starting scores client: data_dir={}", config.data_dir.display());

    // 3. Open the store and load both lists
    let statistics = StatisticsBuilder::new(config).build().await?;
    statistics.wait_loaded().await?;

    // 4. Run the command, then stop the workers either way
    let outcome = run(&statistics, cli.command).await;
    statistics.shutdown().await?;
    outcome
}

async fn run(statistics: &Statistics, command: Command) -> Result<()> {
    match command {
        Command::Record { flips, seconds } => {
            if !seconds.is_finite() || seconds < 0.0 {
                bail!("--seconds must be a non-negative number, got {}", seconds);
            }
            let Some(game) = TimeDelta::try_milliseconds((seconds * 1000.0).round() as i64)
                .and_then(|elapsed| Statistic::finished_now(flips, elapsed))
            else {
                bail!("--seconds is out of range: {}", seconds);
            };
            let (high_key, recent_key) = statistics.record(game.clone()).await?;
            println!(
                "Recorded {} flips in {} (high score #{}, recent #{})",
                flips,
                format_elapsed(&game),
                high_key,
                recent_key
            );
        }
        Command::List { list } => print_list(&handle(statistics, list), list),
        Command::Delete { list, key } => {
            let scores = handle(statistics, list);
            let key = StatisticKey(key);
            scores
                .delete(key)
                .await
                .with_context(|| format!("Failed to delete {} from {}", key, scores.name()))?;
            if let Some(index) = scores.scores().iter().position(|s| s.key == Some(key)) {
                scores.remove_range(index..index + 1);
            }
            println!("Deleted {} from {}", key, scores.name());
        }
        Command::Clear { target } => {
            let targets = match target {
                ClearTarget::High => vec![statistics.high_scores()],
                ClearTarget::Recent => vec![statistics.recent_scores()],
                ClearTarget::All => vec![statistics.high_scores(), statistics.recent_scores()],
            };
            for scores in targets {
                scores
                    .clear()
                    .await
                    .with_context(|| format!("Failed to clear {}", scores.name()))?;
                println!("Cleared {}", scores.name());
            }
        }
    }
    Ok(())
}

fn handle(statistics: &Statistics, list: ListKind) -> CollectionHandle {
    match list {
        ListKind::High => statistics.high_scores(),
        ListKind::Recent => statistics.recent_scores(),
    }
}

fn print_list(scores: &CollectionHandle, list: ListKind) {
    let (title, column) = match list {
        ListKind::High => ("High Scores", "Rank"),
        ListKind::Recent => ("Recent Scores", "Recent"),
    };

    let entries = scores.scores();
    println!("{}", title);
    if entries.is_empty() {
        println!("  (no games yet)");
        return;
    }

    println!("{:>6}  {:>5}  {:>10}  {:>5}", column, "Flips", "Time", "Key");
    for (position, entry) in entries.iter().enumerate() {
        let key = entry
            .key
            .map(|k| k.to_string())
            .unwrap_or_else(|| "-".to_string());
        println!(
            "{:>6}  {:>5}  {:>10}  {:>5}",
            position + 1,
            entry.flips,
            format_elapsed(entry),
            key
        );
    }
}
