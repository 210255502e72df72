pub mod collection;
pub mod error;
pub mod models;
pub mod quiz;
pub mod store;
pub mod tag_index;

pub use collection::Deck;
pub use error::{DeckError, Result};
pub use models::{CardBuilder, CardId, CardKind, Flashcard, Score, Tag};
pub use quiz::{CardState, QuizCard, QuizSession, QuizSummary};
pub use tag_index::TagIndex;
