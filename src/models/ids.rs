use serde::{Deserialize, Serialize};
use std::fmt;

/// Unique identifier for a flashcard.
///
/// Wraps the deck-assigned ID to provide type safety and prevent accidental
/// mixing with other integer values. IDs are assigned monotonically by the
/// deck and are never reused within a process lifetime, even after the card
/// is deleted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CardId(i64);

impl CardId {
    /// Creates a new card ID.
    pub fn new(id: i64) -> Self {
        Self(id)
    }

    /// Returns the underlying ID value.
    pub fn get(self) -> i64 {
        self.0
    }
}

impl fmt::Display for CardId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
