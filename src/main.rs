//! srs - SM-2 spaced repetition review from the terminal.

use std::fs::OpenOptions;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::{Context, Result};
use chrono::Local;
use clap::{Parser, Subcommand};
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::prelude::*;
use tracing::info;
use tracing_subscriber::EnvFilter;

use srs_review::config::Config;
use srs_review::models::DEFAULT_EASE_FACTOR;
use srs_review::sm2::{compute_next_interval, format_interval};
use srs_review::storage;
use srs_review::ui::App;

// ══════════════════════════════════════════════════════════════════════════
// CLI Arguments
// ══════════════════════════════════════════════════════════════════════════

#[derive(Parser, Debug)]
#[command(name = "srs")]
#[command(author, version, about = "SM-2 spaced repetition review", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Review the cards that are due in a deck
    Review {
        /// Deck file (JSON)
        deck: PathBuf,

        /// Review at most this many due cards
        #[arg(short, long)]
        limit: Option<usize>,

        /// Write the session result (JSON) here when finished
        #[arg(short, long)]
        result: Option<PathBuf>,

        /// Write the rescheduled cards back into the deck file
        #[arg(long)]
        apply: bool,

        /// Log file for this session
        #[arg(long)]
        log_file: Option<PathBuf>,
    },

    /// List the cards that are due in a deck
    Due {
        /// Deck file (JSON)
        deck: PathBuf,
    },

    /// Print the next interval and ease factor for a grade
    Next {
        /// Recall quality, 0 (blackout) to 5 (perfect)
        #[arg(short, long)]
        grade: u8,

        /// Previous interval in days
        #[arg(short, long, default_value_t = 0)]
        interval: u32,

        /// Current ease factor
        #[arg(short, long, default_value_t = DEFAULT_EASE_FACTOR)]
        ease: f64,
    },

    /// Build a deck file from a CSV of front,back[,tags]
    Import {
        /// CSV file to read
        csv: PathBuf,

        /// Deck title
        #[arg(long, default_value = "Imported Deck")]
        title: String,

        /// Deck file to write
        #[arg(short, long)]
        output: PathBuf,
    },
}

// ══════════════════════════════════════════════════════════════════════════
// Main Entry Point
// ══════════════════════════════════════════════════════════════════════════

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = Config::load().unwrap_or_default();

    match cli.command {
        Commands::Review {
            deck,
            limit,
            result,
            apply,
            log_file,
        } => {
            // The TUI owns the terminal, so only log when there is a file to log to
            if let Some(path) = log_file.as_ref().or(config.log_file.as_ref()) {
                init_file_logging(path)?;
            }
            run_review(&deck, limit, result, apply, config)
        }
        Commands::Due { deck } => {
            init_stderr_logging();
            run_due(&deck)
        }
        Commands::Next {
            grade,
            interval,
            ease,
        } => {
            init_stderr_logging();
            let schedule = compute_next_interval(grade, interval, ease)?;
            println!(
                "interval: {} ({})\nease factor: {:.2}",
                schedule.interval,
                format_interval(schedule.interval),
                schedule.ease_factor
            );
            Ok(())
        }
        Commands::Import { csv, title, output } => {
            init_stderr_logging();
            let deck = storage::import_csv(&csv, &title)?;
            storage::save_deck(&output, &deck)?;
            println!("✓ Imported {} cards into '{}'", deck.cards.len(), deck.title);
            Ok(())
        }
    }
}

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
}

fn init_stderr_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

fn init_file_logging(path: &Path) -> Result<()> {
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("Failed to open log file: {:?}", path))?;

    tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

fn run_due(deck_path: &Path) -> Result<()> {
    let deck = storage::load_deck(deck_path)?;
    let due = deck.due_cards(Local::now());

    println!("{} of {} cards due in '{}'", due.len(), deck.cards.len(), deck.title);
    for card in due {
        println!(
            "  {:<10} {:>4}d  ease {:.2}  {}",
            card.id,
            card.prev_interval(),
            card.current_ease(),
            card.front.lines().next().unwrap_or("")
        );
    }
    Ok(())
}

fn run_review(
    deck_path: &Path,
    limit: Option<usize>,
    result_path: Option<PathBuf>,
    apply: bool,
    config: Config,
) -> Result<()> {
    let deck = storage::load_deck(deck_path)?;
    let started = Local::now();
    let review = deck.review_data(started, limit.or(config.session_limit));
    info!(due = review.due_cards.len(), "starting review");

    let mut app = App::new(review, config);
    run_tui(&mut app)?;

    // Abandoned sessions leave nothing behind
    let Some(result) = app.result() else {
        info!("review abandoned");
        return Ok(());
    };

    if let Some(path) = result_path {
        storage::save_result(&path, result)?;
    }
    if apply {
        let updated = deck.apply_result(result, Local::now())?;
        storage::save_deck(deck_path, &updated)?;
    }

    println!(
        "✓ Reviewed {} cards, {} to re-study",
        result.sessions.len(),
        result.hard_card_ids.len()
    );
    Ok(())
}

fn run_tui(app: &mut App) -> Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_app(&mut terminal, app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    result
}

fn run_app<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> Result<()> {
    while app.running {
        terminal.draw(|frame| app.render(frame))?;
        app.handle_events()?;
    }
    Ok(())
}
