//! Loading and saving deck files and session results.

use anyhow::{Context, Result};
use std::fs;
use std::path::Path;
use tracing::{info, warn};

use crate::models::{Deck, ReviewCard, SpacedRepetitionResult};

/// Load a deck from a JSON file.
pub fn load_deck(path: &Path) -> Result<Deck> {
    let json = fs::read_to_string(path)
        .with_context(|| format!("Failed to read deck file: {:?}", path))?;
    let deck: Deck = serde_json::from_str(&json)
        .with_context(|| format!("Failed to parse deck file: {:?}", path))?;

    info!(title = %deck.title, cards = deck.cards.len(), "deck loaded");
    Ok(deck)
}

/// Save a deck to disk, creating parent directories as needed.
pub fn save_deck(path: &Path, deck: &Deck) -> Result<()> {
    write_json(path, deck)?;
    info!(title = %deck.title, path = %path.display(), "deck saved");
    Ok(())
}

/// Write a finished session's result as JSON.
pub fn save_result(path: &Path, result: &SpacedRepetitionResult) -> Result<()> {
    write_json(path, result)?;
    info!(sessions = result.sessions.len(), path = %path.display(), "result saved");
    Ok(())
}

fn write_json<T: serde::Serialize>(path: &Path, value: &T) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {:?}", parent))?;
    }

    let json = serde_json::to_string_pretty(value)?;
    fs::write(path, json).with_context(|| format!("Failed to write file: {:?}", path))?;
    Ok(())
}

/// Import cards from a CSV file.
///
/// Each row is `front,back[,tags]` where tags are separated by `;`.
pub fn import_csv(csv_path: &Path, title: &str) -> Result<Deck> {
    let content = fs::read_to_string(csv_path)
        .with_context(|| format!("Failed to read CSV file: {:?}", csv_path))?;
    Ok(parse_csv(&content, title))
}

fn parse_csv(content: &str, title: &str) -> Deck {
    let mut deck = Deck::new(title);

    for (i, line) in content.lines().enumerate() {
        // Skip header
        if i == 0 && line.to_lowercase().contains("front") {
            continue;
        }
        if line.trim().is_empty() {
            continue;
        }

        let parts: Vec<&str> = line.split(',').collect();
        if parts.len() < 2 {
            warn!(line = i + 1, "skipping row without a back side");
            continue;
        }

        let front = parts[0].trim();
        let back = parts[1].trim();
        if front.is_empty() || back.is_empty() {
            warn!(line = i + 1, "skipping row with an empty side");
            continue;
        }

        let mut card = ReviewCard::new(front, back);
        if let Some(tags) = parts.get(2) {
            card.tags = tags
                .split(';')
                .map(str::trim)
                .filter(|t| !t.is_empty())
                .map(String::from)
                .collect();
        }
        deck.cards.push(card);
    }

    deck
}
