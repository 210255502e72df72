use std::collections::{BTreeMap, BTreeSet, HashMap};

use serde::{Deserialize, Serialize};

use crate::error::{DeckError, Result};
use crate::models::{CardId, Tag};

/// Registry of tags and their card memberships.
///
/// Keeps two views that are updated together inside every mutating call:
/// tag name -> member ids (authoritative, on each [`Tag`]) and card id ->
/// tag names (reverse lookup). A tag never lists a card that does not list
/// that tag, and vice versa.
///
/// Tag names are normalized (trim + lowercase) at every entry point. A tag
/// whose last member is removed persists with an empty member set; tags are
/// never garbage-collected.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagIndex {
    tags: BTreeMap<String, Tag>,
    by_card: HashMap<CardId, BTreeSet<String>>,
}

impl TagIndex {
    /// Creates an empty index.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true if a tag with this name exists (after normalization).
    pub fn has_tag(&self, name: &str) -> bool {
        self.tags.contains_key(&Tag::normalize(name))
    }

    /// Returns the tag with this name, creating it with no members if it
    /// does not exist yet.
    ///
    /// # Errors
    ///
    /// Returns [`DeckError::EmptyField`] for a blank name.
    pub fn get_or_create(&mut self, name: &str) -> Result<&Tag> {
        let normalized = Tag::normalize(name);
        if normalized.is_empty() {
            return Err(DeckError::EmptyField { field: "tag name" });
        }
        Ok(self
            .tags
            .entry(normalized.clone())
            .or_insert_with(|| Tag::new(normalized)))
    }

    /// Returns the tag with this name, or [`DeckError::UnknownTag`].
    pub fn get(&self, name: &str) -> Result<&Tag> {
        let normalized = Tag::normalize(name);
        self.tags
            .get(&normalized)
            .ok_or(DeckError::UnknownTag { name: normalized })
    }

    /// Returns the member ids of the named tag.
    ///
    /// # Errors
    ///
    /// Returns [`DeckError::UnknownTag`] if no such tag exists.
    pub fn members_of(&self, name: &str) -> Result<&BTreeSet<CardId>> {
        self.get(name).map(Tag::members)
    }

    /// Returns the tag names carried by the given card, in sorted order.
    /// Unknown or untagged cards yield an empty set.
    pub fn tags_of(&self, id: CardId) -> BTreeSet<String> {
        self.by_card.get(&id).cloned().unwrap_or_default()
    }

    /// Returns true if the given card carries the named tag.
    pub fn has_membership(&self, name: &str, id: CardId) -> bool {
        self.tags
            .get(&Tag::normalize(name))
            .is_some_and(|tag| tag.has_member(id))
    }

    /// Records that `id` carries the named tag, updating both views. The
    /// tag must already exist (created via [`TagIndex::get_or_create`]).
    ///
    /// # Errors
    ///
    /// Returns [`DeckError::UnknownTag`] if the tag does not exist, or
    /// [`DeckError::DuplicateTag`] if the pairing is already present.
    pub fn add_membership(&mut self, name: &str, id: CardId) -> Result<()> {
        let normalized = Tag::normalize(name);
        let tag = self.tags.get_mut(&normalized).ok_or_else(|| {
            DeckError::UnknownTag {
                name: normalized.clone(),
            }
        })?;
        if !tag.add_member(id) {
            return Err(DeckError::DuplicateTag {
                id,
                name: normalized,
            });
        }
        self.by_card.entry(id).or_default().insert(normalized);
        Ok(())
    }

    /// Removes the pairing between `id` and the named tag from both views.
    /// The tag itself persists even if this was its last member.
    ///
    /// # Errors
    ///
    /// Returns [`DeckError::UnknownTag`] if the tag does not exist or the
    /// card does not carry it.
    pub fn remove_membership(&mut self, name: &str, id: CardId) -> Result<()> {
        let normalized = Tag::normalize(name);
        let tag = self.tags.get_mut(&normalized).ok_or_else(|| {
            DeckError::UnknownTag {
                name: normalized.clone(),
            }
        })?;
        if !tag.remove_member(id) {
            return Err(DeckError::UnknownTag { name: normalized });
        }
        if let Some(names) = self.by_card.get_mut(&id) {
            names.remove(&normalized);
            if names.is_empty() {
                self.by_card.remove(&id);
            }
        }
        Ok(())
    }

    /// Removes the card from every tag it carries. Used by deck deletion
    /// so no tag retains a reference to a deleted id.
    pub fn remove_card(&mut self, id: CardId) {
        if let Some(names) = self.by_card.remove(&id) {
            for name in names {
                if let Some(tag) = self.tags.get_mut(&name) {
                    tag.remove_member(id);
                }
            }
        }
    }

    /// Returns all tag names in sorted order, including empty tags.
    pub fn tag_names(&self) -> Vec<&str> {
        self.tags.keys().map(String::as_str).collect()
    }

    /// Iterates over all tags in name order.
    pub fn tags(&self) -> impl Iterator<Item = &Tag> {
        self.tags.values()
    }

    /// Number of tags, including empty ones.
    pub fn len(&self) -> usize {
        self.tags.len()
    }

    /// Returns true if no tags exist.
    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }
}
