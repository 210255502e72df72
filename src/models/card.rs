use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use super::{CardId, Score};

/// Letter used to label the option at `index` in rendered output ('A' for
/// the first option). The deck caps option lists at 26 entries, so every
/// index stays within 'A'..='Z'.
fn option_letter(index: usize) -> char {
    debug_assert!(index < 26, "option index {index} has no letter label");
    (b'A' + index as u8) as char
}

/// Variant-specific payload of a flashcard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "type")]
pub enum CardKind {
    /// Free-text answer, no options.
    ShortAnswer,
    /// The answer must resolve to one of the listed options.
    MultipleChoice { options: Vec<String> },
}

impl CardKind {
    /// Returns the options for a multiple-choice card, or `None` for a
    /// short-answer card.
    pub fn options(&self) -> Option<&[String]> {
        match self {
            CardKind::ShortAnswer => None,
            CardKind::MultipleChoice { options } => Some(options),
        }
    }
}

/// A question/answer unit, optionally multiple-choice, optionally tagged.
///
/// Flashcards are owned by the deck, which assigns their id and enforces
/// question uniqueness. The `tags` set is a display cache; the authoritative
/// tag membership lives in the deck's tag index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Flashcard {
    id: CardId,
    question: String,
    answer: String,
    kind: CardKind,
    tags: BTreeSet<String>,
    score: Score,
    #[serde(with = "time::serde::rfc3339")]
    created_at: OffsetDateTime,
}

impl Flashcard {
    /// Returns the deck-assigned id.
    pub fn id(&self) -> CardId {
        self.id
    }

    /// Returns the question text.
    pub fn question(&self) -> &str {
        &self.question
    }

    /// Returns the stored answer. For multiple-choice cards this is either
    /// an option verbatim or a single letter addressing an option slot.
    pub fn answer(&self) -> &str {
        &self.answer
    }

    /// Returns the variant payload.
    pub fn kind(&self) -> &CardKind {
        &self.kind
    }

    /// Returns true for multiple-choice cards.
    pub fn is_multiple_choice(&self) -> bool {
        matches!(self.kind, CardKind::MultipleChoice { .. })
    }

    /// Returns the cached tag names, in sorted order.
    pub fn tags(&self) -> &BTreeSet<String> {
        &self.tags
    }

    /// Returns the quiz tally for this card.
    pub fn score(&self) -> Score {
        self.score
    }

    /// Returns when this card was added to the deck.
    pub fn created_at(&self) -> OffsetDateTime {
        self.created_at
    }

    /// Normalizes question text for duplicate detection: trimmed,
    /// lowercased, with internal whitespace runs collapsed to single
    /// spaces.
    ///
    /// # Examples
    ///
    /// ```
    /// use deck::Flashcard;
    ///
    /// assert_eq!(
    ///     Flashcard::normalize_question("  What is   Rust? "),
    ///     "what is rust?"
    /// );
    /// ```
    pub fn normalize_question(question: &str) -> String {
        question
            .split_whitespace()
            .collect::<Vec<_>>()
            .join(" ")
            .to_lowercase()
    }

    /// Returns this card's question in normalized form.
    pub fn normalized_question(&self) -> String {
        Self::normalize_question(&self.question)
    }

    /// Returns true if both cards have the same normalized question. This
    /// is the identity used for duplicate rejection on insert.
    pub fn is_same_card(&self, other: &Flashcard) -> bool {
        self.normalized_question() == other.normalized_question()
    }

    /// Stronger than [`Flashcard::is_same_card`]: question, answer, and tag
    /// set must all match. Ids and scores are deliberately excluded.
    pub fn is_identical(&self, other: &Flashcard) -> bool {
        self.is_same_card(other) && self.answer == other.answer && self.tags == other.tags
    }

    /// Resolves an answer against an option list. Returns the index of the
    /// matched option: a verbatim (case-sensitive) match wins, otherwise a
    /// single ASCII letter addresses an option slot ('A' or 'a' is the
    /// first option).
    pub fn resolve_option(answer: &str, options: &[String]) -> Option<usize> {
        if let Some(index) = options.iter().position(|opt| opt == answer) {
            return Some(index);
        }
        let mut chars = answer.chars();
        if let (Some(letter), None) = (chars.next(), chars.next())
            && letter.is_ascii_alphabetic()
        {
            let index = (letter.to_ascii_uppercase() as u8 - b'A') as usize;
            if index < options.len() {
                return Some(index);
            }
        }
        None
    }

    /// Returns the index of the option this card's answer resolves to, or
    /// `None` for short-answer cards. The deck validates at construction
    /// and on every edit that multiple-choice answers always resolve.
    pub fn answer_option_index(&self) -> Option<usize> {
        self.kind
            .options()
            .and_then(|options| Self::resolve_option(&self.answer, options))
    }

    /// Case-insensitive substring match against the stringified id, the
    /// question, and the answer. Used by deck search.
    pub fn matches_keyword(&self, keyword: &str) -> bool {
        let needle = keyword.to_lowercase();
        self.id.to_string().contains(&needle)
            || self.question.to_lowercase().contains(&needle)
            || self.answer.to_lowercase().contains(&needle)
    }

    /// Renders the card without its answer, for quiz presentation. Options
    /// are still listed for multiple-choice cards; nothing marks which one
    /// is correct.
    pub fn display_without_answer(&self) -> String {
        let mut out = format!("[{}] {}", self.id, self.question);
        if let CardKind::MultipleChoice { options } = &self.kind {
            for (index, option) in options.iter().enumerate() {
                out.push_str(&format!("\n  {}. {}", option_letter(index), option));
            }
        }
        out
    }

    /// Renders the card including its answer.
    pub fn display_full(&self) -> String {
        let mut out = self.display_without_answer();
        out.push_str(&format!("\nAnswer: {}", self.answer));
        if !self.tags.is_empty() {
            let names: Vec<&str> = self.tags.iter().map(String::as_str).collect();
            out.push_str(&format!("\nTags: {}", names.join(", ")));
        }
        out
    }

    pub(crate) fn set_question(&mut self, question: String) {
        self.question = question;
    }

    pub(crate) fn set_answer(&mut self, answer: String) {
        self.answer = answer;
    }

    pub(crate) fn set_options(&mut self, new_options: Vec<String>) {
        if let CardKind::MultipleChoice { options } = &mut self.kind {
            *options = new_options;
        }
    }

    pub(crate) fn add_tag(&mut self, name: String) -> bool {
        self.tags.insert(name)
    }

    pub(crate) fn remove_tag(&mut self, name: &str) -> bool {
        self.tags.remove(name)
    }

    pub(crate) fn score_mut(&mut self) -> &mut Score {
        &mut self.score
    }
}

impl fmt::Display for Flashcard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_full())
    }
}

/// Builder for constructing `Flashcard` instances with optional fields.
///
/// Used by the snapshot store when reconstructing a deck and by tests. The
/// deck's add operations are the only place new ids are assigned.
///
/// # Examples
///
/// ```
/// use deck::{CardBuilder, CardId};
///
/// let card = CardBuilder::new()
///     .id(CardId::new(1))
///     .question("Capital of France?")
///     .answer("Paris")
///     .build();
///
/// assert_eq!(card.question(), "Capital of France?");
/// assert!(card.tags().is_empty());
/// ```
#[derive(Debug, Default)]
pub struct CardBuilder {
    id: Option<CardId>,
    question: Option<String>,
    answer: Option<String>,
    options: Option<Vec<String>>,
    tags: Option<BTreeSet<String>>,
    score: Option<Score>,
    created_at: Option<OffsetDateTime>,
}

impl CardBuilder {
    /// Creates a new `CardBuilder`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the card id.
    pub fn id(mut self, id: CardId) -> Self {
        self.id = Some(id);
        self
    }

    /// Sets the question text.
    pub fn question(mut self, question: impl Into<String>) -> Self {
        self.question = Some(question.into());
        self
    }

    /// Sets the answer text.
    pub fn answer(mut self, answer: impl Into<String>) -> Self {
        self.answer = Some(answer.into());
        self
    }

    /// Sets multiple-choice options. When absent, the built card is a
    /// short-answer card.
    pub fn options(mut self, options: Vec<String>) -> Self {
        self.options = Some(options);
        self
    }

    /// Sets the cached tag names.
    pub fn tags(mut self, tags: BTreeSet<String>) -> Self {
        self.tags = Some(tags);
        self
    }

    /// Sets the quiz tally.
    pub fn score(mut self, score: Score) -> Self {
        self.score = Some(score);
        self
    }

    /// Sets the creation timestamp.
    pub fn created_at(mut self, created_at: OffsetDateTime) -> Self {
        self.created_at = Some(created_at);
        self
    }

    /// Builds the `Flashcard`, using defaults for optional fields.
    ///
    /// # Panics
    ///
    /// Panics if `id`, `question`, or `answer` have not been set.
    pub fn build(self) -> Flashcard {
        let kind = match self.options {
            Some(options) => CardKind::MultipleChoice { options },
            None => CardKind::ShortAnswer,
        };
        Flashcard {
            id: self.id.expect("id is required"),
            question: self.question.expect("question is required"),
            answer: self.answer.expect("answer is required"),
            kind,
            tags: self.tags.unwrap_or_default(),
            score: self.score.unwrap_or_default(),
            created_at: self.created_at.unwrap_or_else(OffsetDateTime::now_utc),
        }
    }
}
