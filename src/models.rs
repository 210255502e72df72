mod card;
mod ids;
mod score;
mod tag;

pub use card::{CardBuilder, CardKind, Flashcard};
pub use ids::CardId;
pub use score::Score;
pub use tag::Tag;
