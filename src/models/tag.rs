use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::CardId;

/// A named label grouping flashcards.
///
/// The member set is the authoritative record of which cards carry this tag;
/// each card also keeps a cached copy of its tag names for display, and the
/// tag index keeps the two views consistent. Tag names are stored in
/// normalized form (see [`Tag::normalize`]).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    name: String,
    members: BTreeSet<CardId>,
}

impl Tag {
    /// Creates a new tag with no members. The name is expected to already be
    /// normalized by the caller.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            members: BTreeSet::new(),
        }
    }

    /// Normalizes a tag name: trimmed and lowercased. One rule, applied at
    /// every entry point, so "Geo", " geo " and "GEO" name the same tag.
    pub fn normalize(name: &str) -> String {
        name.trim().to_lowercase()
    }

    /// Returns the normalized tag name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the ids of all cards currently carrying this tag.
    pub fn members(&self) -> &BTreeSet<CardId> {
        &self.members
    }

    /// Returns true if the given card carries this tag.
    pub fn has_member(&self, id: CardId) -> bool {
        self.members.contains(&id)
    }

    /// Returns true if no card currently carries this tag.
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub(crate) fn add_member(&mut self, id: CardId) -> bool {
        self.members.insert(id)
    }

    pub(crate) fn remove_member(&mut self, id: CardId) -> bool {
        self.members.remove(&id)
    }
}
