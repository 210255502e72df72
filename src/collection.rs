use std::collections::BTreeMap;

use time::OffsetDateTime;

use crate::error::{DeckError, Result};
use crate::models::{CardBuilder, CardId, Flashcard};
use crate::tag_index::TagIndex;

/// Option lists are letter-addressable ('A'..='Z'), so one slot per letter.
const MAX_OPTIONS: usize = 26;

/// The authoritative flashcard collection.
///
/// Owns every card (keyed by id), the tag index, and the id counter. All
/// mutation goes through deck methods so the invariants hold: normalized
/// questions are unique, ids are monotonic and never reused, and the card
/// tag caches always agree with the tag index. Every operation validates
/// fully before committing any state change, so a returned error means
/// nothing was mutated.
///
/// # Examples
///
/// ```
/// use deck::Deck;
///
/// # fn main() -> deck::Result<()> {
/// let mut deck = Deck::new();
/// let id = deck.add_short_answer("Capital of France?", "Paris")?;
///
/// deck.tag(id, "geo")?;
/// assert!(deck.get(id)?.tags().contains("geo"));
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct Deck {
    cards: BTreeMap<CardId, Flashcard>,
    tag_index: TagIndex,
    next_id: i64,
}

impl Default for Deck {
    fn default() -> Self {
        Self::new()
    }
}

impl Deck {
    /// Creates an empty deck. The first assigned id is 1.
    pub fn new() -> Self {
        Self {
            cards: BTreeMap::new(),
            tag_index: TagIndex::new(),
            next_id: 1,
        }
    }

    fn validate_text(value: &str, field: &'static str) -> Result<()> {
        if value.trim().is_empty() {
            return Err(DeckError::EmptyField { field });
        }
        Ok(())
    }

    /// Options must have at least two pairwise-distinct (case-sensitive)
    /// non-blank entries, and the answer must resolve to one of them.
    fn validate_options(options: &[String], answer: &str) -> Result<()> {
        if options.len() < 2 {
            return Err(DeckError::InvalidOptions {
                reason: format!("need at least 2 options, got {}", options.len()),
            });
        }
        if options.len() > MAX_OPTIONS {
            return Err(DeckError::InvalidOptions {
                reason: format!("need at most {MAX_OPTIONS} options, got {}", options.len()),
            });
        }
        for (index, option) in options.iter().enumerate() {
            if option.trim().is_empty() {
                return Err(DeckError::InvalidOptions {
                    reason: format!("option {} is blank", index + 1),
                });
            }
            if options[..index].contains(option) {
                return Err(DeckError::InvalidOptions {
                    reason: format!("duplicate option \"{option}\""),
                });
            }
        }
        if Flashcard::resolve_option(answer, options).is_none() {
            return Err(DeckError::InvalidOptions {
                reason: format!("answer \"{answer}\" does not resolve to any option"),
            });
        }
        Ok(())
    }

    /// Rejects a question whose normalized form collides with an existing
    /// card other than `except`.
    fn check_duplicate_question(&self, question: &str, except: Option<CardId>) -> Result<()> {
        let normalized = Flashcard::normalize_question(question);
        let collision = self
            .cards
            .values()
            .any(|card| Some(card.id()) != except && card.normalized_question() == normalized);
        if collision {
            return Err(DeckError::DuplicateQuestion {
                question: normalized,
            });
        }
        Ok(())
    }

    fn insert(&mut self, question: &str, answer: &str, options: Option<Vec<String>>) -> CardId {
        let id = CardId::new(self.next_id);
        self.next_id += 1;

        let mut builder = CardBuilder::new()
            .id(id)
            .question(question)
            .answer(answer)
            .created_at(OffsetDateTime::now_utc());
        if let Some(options) = options {
            builder = builder.options(options);
        }
        self.cards.insert(id, builder.build());
        id
    }

    /// Adds a short-answer card and returns its id.
    ///
    /// # Errors
    ///
    /// [`DeckError::EmptyField`] for a blank question or answer,
    /// [`DeckError::DuplicateQuestion`] when another card already asks the
    /// same (normalized) question.
    pub fn add_short_answer(&mut self, question: &str, answer: &str) -> Result<CardId> {
        Self::validate_text(question, "question")?;
        Self::validate_text(answer, "answer")?;
        self.check_duplicate_question(question, None)?;
        Ok(self.insert(question, answer, None))
    }

    /// Adds a multiple-choice card and returns its id. The answer must be
    /// one of the options verbatim or a letter addressing an option slot
    /// ('A' is the first option).
    ///
    /// # Errors
    ///
    /// As [`Deck::add_short_answer`], plus [`DeckError::InvalidOptions`]
    /// for fewer than two options, duplicate or blank options, or an
    /// answer that resolves to no option.
    pub fn add_multiple_choice(
        &mut self,
        question: &str,
        options: Vec<String>,
        answer: &str,
    ) -> Result<CardId> {
        Self::validate_text(question, "question")?;
        Self::validate_text(answer, "answer")?;
        self.check_duplicate_question(question, None)?;
        Self::validate_options(&options, answer)?;
        Ok(self.insert(question, answer, Some(options)))
    }

    /// Returns the card with this id.
    ///
    /// # Errors
    ///
    /// [`DeckError::CardNotFound`] if the id was never assigned or the
    /// card has been deleted.
    pub fn get(&self, id: CardId) -> Result<&Flashcard> {
        self.cards.get(&id).ok_or(DeckError::CardNotFound { id })
    }

    fn get_mut(&mut self, id: CardId) -> Result<&mut Flashcard> {
        self.cards
            .get_mut(&id)
            .ok_or(DeckError::CardNotFound { id })
    }

    /// Replaces the question on a card. The new question must be non-blank
    /// and must not collide with any other card's normalized question.
    pub fn edit_question(&mut self, id: CardId, new_question: &str) -> Result<()> {
        Self::validate_text(new_question, "question")?;
        self.get(id)?;
        self.check_duplicate_question(new_question, Some(id))?;
        self.get_mut(id)?.set_question(new_question.to_string());
        Ok(())
    }

    /// Replaces the answer on a card. For a multiple-choice card the new
    /// answer must resolve to one of the current options.
    pub fn edit_answer(&mut self, id: CardId, new_answer: &str) -> Result<()> {
        Self::validate_text(new_answer, "answer")?;
        let card = self.get(id)?;
        if let Some(options) = card.kind().options()
            && Flashcard::resolve_option(new_answer, options).is_none()
        {
            return Err(DeckError::InvalidOptions {
                reason: format!("answer \"{new_answer}\" does not resolve to any option"),
            });
        }
        self.get_mut(id)?.set_answer(new_answer.to_string());
        Ok(())
    }

    /// Replaces the options on a multiple-choice card. The card's current
    /// answer must still resolve against the new options; a mismatch is
    /// rejected here, at edit time, never discovered lazily.
    ///
    /// # Errors
    ///
    /// [`DeckError::WrongVariant`] when the card is short-answer,
    /// [`DeckError::InvalidOptions`] when the new options are malformed or
    /// orphan the stored answer.
    pub fn edit_options(&mut self, id: CardId, new_options: Vec<String>) -> Result<()> {
        let card = self.get(id)?;
        if !card.is_multiple_choice() {
            return Err(DeckError::WrongVariant { id });
        }
        Self::validate_options(&new_options, card.answer())?;
        self.get_mut(id)?.set_options(new_options);
        Ok(())
    }

    /// Deletes a card, first removing it from every tag's membership so no
    /// tag retains a reference to the dead id. The id is never reused.
    pub fn delete(&mut self, id: CardId) -> Result<()> {
        self.get(id)?;
        self.tag_index.remove_card(id);
        self.cards.remove(&id);
        Ok(())
    }

    /// Case-insensitive substring search over stringified id, question,
    /// and answer, returning matches in collection (insertion) order.
    ///
    /// # Errors
    ///
    /// [`DeckError::NoMatches`] when nothing matches; an exhausted search
    /// is an error, not an empty list.
    pub fn find(&self, keyword: &str) -> Result<Vec<&Flashcard>> {
        let matches: Vec<&Flashcard> = self
            .cards
            .values()
            .filter(|card| card.matches_keyword(keyword))
            .collect();
        if matches.is_empty() {
            return Err(DeckError::NoMatches {
                keyword: keyword.to_string(),
            });
        }
        Ok(matches)
    }

    /// Tags a card, creating the tag on demand. The duplicate check runs
    /// before the tag entry is created, so a failed call on a fresh tag
    /// name leaves no state behind.
    ///
    /// # Errors
    ///
    /// [`DeckError::CardNotFound`], [`DeckError::EmptyField`] for a blank
    /// tag name, [`DeckError::DuplicateTag`] if the card already carries
    /// the tag.
    pub fn tag(&mut self, id: CardId, tag_name: &str) -> Result<()> {
        self.get(id)?;
        let normalized = crate::models::Tag::normalize(tag_name);
        if normalized.is_empty() {
            return Err(DeckError::EmptyField { field: "tag name" });
        }
        if self.tag_index.has_membership(&normalized, id) {
            return Err(DeckError::DuplicateTag {
                id,
                name: normalized,
            });
        }
        self.tag_index.get_or_create(&normalized)?;
        self.tag_index.add_membership(&normalized, id)?;
        self.get_mut(id)?.add_tag(normalized);
        Ok(())
    }

    /// Removes a tag from a card, updating the tag's membership and the
    /// card's cached set together.
    ///
    /// # Errors
    ///
    /// [`DeckError::CardNotFound`], or [`DeckError::UnknownTag`] when the
    /// tag does not exist or the card does not carry it.
    pub fn untag(&mut self, id: CardId, tag_name: &str) -> Result<()> {
        self.get(id)?;
        let normalized = crate::models::Tag::normalize(tag_name);
        self.tag_index.remove_membership(&normalized, id)?;
        self.get_mut(id)?.remove_tag(&normalized);
        Ok(())
    }

    /// Read-only view of all cards in insertion order. Ids are assigned
    /// monotonically, so id order and insertion order coincide.
    pub fn cards(&self) -> impl Iterator<Item = &Flashcard> {
        self.cards.values()
    }

    /// Returns the tag index for read-only queries.
    pub fn tag_index(&self) -> &TagIndex {
        &self.tag_index
    }

    /// Returns true if a card with this id currently exists.
    pub fn contains(&self, id: CardId) -> bool {
        self.cards.contains_key(&id)
    }

    /// Number of cards in the deck.
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    /// Returns true if the deck holds no cards.
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// The id the next added card will receive. Exposed for the snapshot
    /// store so reconstruction never reuses an id.
    pub fn next_id(&self) -> i64 {
        self.next_id
    }

    /// Records a graded quiz attempt on a card's score. Only quiz sessions
    /// call this; it is the sole mutation path into [`crate::Score`].
    pub(crate) fn record_attempt(&mut self, id: CardId, correct: bool) -> Result<()> {
        self.get_mut(id)?.score_mut().record(correct);
        Ok(())
    }

    /// Rebuilds a deck from restored cards, used by the snapshot store.
    /// Every card is validated as if it were being added fresh, so a
    /// hand-edited or corrupt snapshot cannot reconstitute a card the add
    /// paths would have rejected. Tag memberships are re-derived from each
    /// card's cached tag set and the id counter resumes past the highest
    /// restored id.
    pub fn from_cards(cards: Vec<Flashcard>) -> Result<Self> {
        let mut deck = Deck::new();
        for card in cards {
            Self::validate_text(card.question(), "question")?;
            Self::validate_text(card.answer(), "answer")?;
            if let Some(options) = card.kind().options() {
                Self::validate_options(options, card.answer())?;
            }
            deck.check_duplicate_question(card.question(), None)?;
            let id = card.id();
            deck.next_id = deck.next_id.max(id.get() + 1);
            for name in card.tags() {
                deck.tag_index.get_or_create(name)?;
                deck.tag_index.add_membership(name, id)?;
            }
            deck.cards.insert(id, card);
        }
        Ok(deck)
    }
}

#[cfg(test)]
#[path = "collection/tests.rs"]
mod tests;
