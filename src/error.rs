use thiserror::Error;

use crate::models::CardId;

/// Errors produced by deck, tag, and quiz operations.
///
/// Every variant is recoverable at the call site and carries the offending
/// id or name so callers can build a useful message. No operation that
/// returns one of these leaves partial state behind.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DeckError {
    /// No card exists with the given id (never created, or deleted).
    #[error("No flashcard with id {id}")]
    CardNotFound { id: CardId },

    /// A search produced no matching cards.
    #[error("No flashcard matches \"{keyword}\"")]
    NoMatches { keyword: String },

    /// The tag name is unknown to the tag index, or the card does not
    /// carry it.
    #[error("Unknown tag \"{name}\"")]
    UnknownTag { name: String },

    /// Another card already has the same question (after normalization).
    #[error("A flashcard with the question \"{question}\" already exists")]
    DuplicateQuestion { question: String },

    /// The card already carries this tag.
    #[error("Flashcard {id} is already tagged \"{name}\"")]
    DuplicateTag { id: CardId, name: String },

    /// A multiple-choice operation was applied to a short-answer card.
    #[error("Flashcard {id} is not a multiple-choice card")]
    WrongVariant { id: CardId },

    /// Malformed options, or an answer that does not resolve to an option.
    #[error("Invalid options: {reason}")]
    InvalidOptions { reason: String },

    /// An illegal quiz state transition.
    #[error("Cannot {action} card {id}: {state}")]
    InvalidTransition {
        id: CardId,
        action: &'static str,
        state: String,
    },

    /// A required text field was empty or whitespace-only.
    #[error("{field} cannot be empty")]
    EmptyField { field: &'static str },
}

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, DeckError>;
