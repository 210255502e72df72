//! JSON snapshot persistence for the deck.
//!
//! The deck itself is a purely in-memory model; this module is the external
//! collaborator that serializes the full card state at save time and
//! reconstructs it (ids, tag memberships, scores) at load time. Tag
//! memberships are not stored separately — they are re-derived from each
//! card's tag list, which `Deck::from_cards` re-registers in the tag index.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::collection::Deck;
use crate::models::Flashcard;

const SNAPSHOT_VERSION: u32 = 1;

/// On-disk representation of a full deck.
#[derive(Debug, Serialize, Deserialize)]
struct Snapshot {
    version: u32,
    cards: Vec<Flashcard>,
}

/// Gets the cross-platform default snapshot path.
///
/// Returns the path as `{data_dir}/deck/deck.json` where `data_dir` is:
/// - Linux: `~/.local/share`
/// - macOS: `~/Library/Application Support`
/// - Windows: `C:\Users\<user>\AppData\Roaming`
///
/// # Errors
///
/// Returns an error if the data directory cannot be determined.
pub fn default_store_path() -> Result<PathBuf> {
    let data_dir =
        dirs::data_dir().ok_or_else(|| anyhow::anyhow!("Failed to determine data directory"))?;

    Ok(data_dir.join("deck").join("deck.json"))
}

/// Ensures the parent directory of the snapshot file exists.
pub fn ensure_store_directory(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create data directory: {}", parent.display()))?;
    }
    Ok(())
}

/// Writes the deck as a JSON snapshot at `path`, creating parent
/// directories as needed.
pub fn save(deck: &Deck, path: &Path) -> Result<()> {
    ensure_store_directory(path)?;
    let snapshot = Snapshot {
        version: SNAPSHOT_VERSION,
        cards: deck.cards().cloned().collect(),
    };
    let json =
        serde_json::to_string_pretty(&snapshot).context("Failed to serialize deck snapshot")?;
    fs::write(path, json)
        .with_context(|| format!("Failed to write snapshot: {}", path.display()))?;
    Ok(())
}

/// Loads a deck from the snapshot at `path`. A missing file yields an
/// empty deck; a present but unreadable or inconsistent snapshot is an
/// error.
pub fn load(path: &Path) -> Result<Deck> {
    if !path.exists() {
        return Ok(Deck::new());
    }
    let json = fs::read_to_string(path)
        .with_context(|| format!("Failed to read snapshot: {}", path.display()))?;
    let snapshot: Snapshot = serde_json::from_str(&json)
        .with_context(|| format!("Failed to parse snapshot: {}", path.display()))?;
    if snapshot.version != SNAPSHOT_VERSION {
        anyhow::bail!(
            "Unsupported snapshot version {} in {}",
            snapshot.version,
            path.display()
        );
    }
    restore(snapshot.cards)
}

fn restore(cards: Vec<Flashcard>) -> Result<Deck> {
    Deck::from_cards(cards).context("Snapshot is internally inconsistent")
}
