use std::collections::HashMap;

use crate::collection::Deck;
use crate::error::{DeckError, Result};
use crate::models::{CardId, CardKind};

/// Per-card state within a quiz session.
///
/// Each card moves `Hidden -> Revealed -> Graded`; grading is terminal for
/// that card within the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CardState {
    /// The answer has not been shown yet.
    Hidden,
    /// The answer has been shown; the card awaits grading.
    Revealed,
    /// The card has been graded; the outcome was recorded on its score.
    Graded { correct: bool },
}

impl CardState {
    fn describe(self) -> String {
        match self {
            CardState::Hidden => "the answer is still hidden".to_string(),
            CardState::Revealed => "the answer is already revealed".to_string(),
            CardState::Graded { correct } => format!(
                "it was already graded {}",
                if correct { "correct" } else { "incorrect" }
            ),
        }
    }
}

/// Presentation state of one card inside a session, with the answer
/// suppressed until revealed. Options are always shown for multiple-choice
/// cards; without the marked-correct one they do not leak the answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizCard {
    /// The card's id.
    pub id: CardId,
    /// The question text.
    pub question: String,
    /// Options, in order, for multiple-choice cards.
    pub options: Vec<String>,
    /// The answer, present only once the card has been revealed.
    pub answer: Option<String>,
    /// Where this card is in the session state machine.
    pub state: CardState,
}

/// Outcome tallies for a session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct QuizSummary {
    /// Cards not yet revealed.
    pub hidden: usize,
    /// Cards revealed but not yet graded.
    pub revealed: usize,
    /// Cards graded correct.
    pub correct: usize,
    /// Cards graded incorrect.
    pub incorrect: usize,
}

/// A transient, answer-hiding pass over a chosen subset of the deck.
///
/// The session snapshots an ordered list of card ids at construction; it
/// does not track later deck mutations. It holds ids only — every touch of
/// the underlying entity goes through the deck, so a card deleted
/// mid-session surfaces as [`DeckError::CardNotFound`] on the next grade or
/// render. Sessions mutate nothing but card scores.
///
/// # Examples
///
/// ```
/// use deck::{Deck, QuizSession};
///
/// # fn main() -> deck::Result<()> {
/// let mut deck = Deck::new();
/// let id = deck.add_short_answer("Capital of France?", "Paris")?;
///
/// let mut session = QuizSession::new(&deck, vec![id])?;
/// assert!(session.render(&deck, id)?.answer.is_none());
///
/// session.reveal(id)?;
/// session.grade(&mut deck, id, true)?;
/// assert_eq!(deck.get(id)?.score().times_correct, 1);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct QuizSession {
    order: Vec<CardId>,
    states: HashMap<CardId, CardState>,
}

impl QuizSession {
    /// Starts a session over the given ids, preserving their order and
    /// dropping duplicate ids after their first occurrence.
    ///
    /// # Errors
    ///
    /// [`DeckError::CardNotFound`] if any id is absent from the deck at
    /// construction time.
    pub fn new(deck: &Deck, ids: Vec<CardId>) -> Result<Self> {
        let mut order = Vec::with_capacity(ids.len());
        let mut states = HashMap::with_capacity(ids.len());
        for id in ids {
            deck.get(id)?;
            if states.insert(id, CardState::Hidden).is_none() {
                order.push(id);
            }
        }
        Ok(Self { order, states })
    }

    /// The session's card ids in presentation order.
    pub fn card_ids(&self) -> &[CardId] {
        &self.order
    }

    /// Returns the session state of one card.
    ///
    /// # Errors
    ///
    /// [`DeckError::InvalidTransition`] if the id is not part of this
    /// session.
    pub fn state_of(&self, id: CardId) -> Result<CardState> {
        self.states
            .get(&id)
            .copied()
            .ok_or(DeckError::InvalidTransition {
                id,
                action: "query",
                state: "it is not part of this quiz session".to_string(),
            })
    }

    /// Shows a card's answer: `Hidden -> Revealed`.
    ///
    /// # Errors
    ///
    /// [`DeckError::InvalidTransition`] if the card is not part of the
    /// session or is not currently hidden.
    pub fn reveal(&mut self, id: CardId) -> Result<()> {
        match self.states.get_mut(&id) {
            None => Err(DeckError::InvalidTransition {
                id,
                action: "reveal",
                state: "it is not part of this quiz session".to_string(),
            }),
            Some(state) => {
                if *state != CardState::Hidden {
                    return Err(DeckError::InvalidTransition {
                        id,
                        action: "reveal",
                        state: state.describe(),
                    });
                }
                *state = CardState::Revealed;
                Ok(())
            }
        }
    }

    /// Grades a revealed card: `Revealed -> Graded`, incrementing exactly
    /// one score counter on the underlying card.
    ///
    /// # Errors
    ///
    /// [`DeckError::InvalidTransition`] before a reveal or on a second
    /// grade, [`DeckError::CardNotFound`] if the card was deleted from the
    /// deck after the session started.
    pub fn grade(&mut self, deck: &mut Deck, id: CardId, correct: bool) -> Result<()> {
        match self.states.get(&id) {
            None => Err(DeckError::InvalidTransition {
                id,
                action: "grade",
                state: "it is not part of this quiz session".to_string(),
            }),
            Some(CardState::Revealed) => {
                // Touch the entity first: a mid-session deletion must fail
                // without consuming the card's Revealed state.
                deck.record_attempt(id, correct)?;
                self.states.insert(id, CardState::Graded { correct });
                Ok(())
            }
            Some(state) => Err(DeckError::InvalidTransition {
                id,
                action: "grade",
                state: state.describe(),
            }),
        }
    }

    /// Renders one card for presentation. The answer field is populated
    /// only once the card has been revealed.
    ///
    /// # Errors
    ///
    /// [`DeckError::InvalidTransition`] for an id outside the session,
    /// [`DeckError::CardNotFound`] if the card was deleted mid-session.
    pub fn render(&self, deck: &Deck, id: CardId) -> Result<QuizCard> {
        let state = self.state_of(id)?;
        let card = deck.get(id)?;
        let options = match card.kind() {
            CardKind::ShortAnswer => Vec::new(),
            CardKind::MultipleChoice { options } => options.clone(),
        };
        let answer = match state {
            CardState::Hidden => None,
            CardState::Revealed | CardState::Graded { .. } => Some(card.answer().to_string()),
        };
        Ok(QuizCard {
            id,
            question: card.question().to_string(),
            options,
            answer,
            state,
        })
    }

    /// Current outcome tallies across all cards in the session.
    pub fn summary(&self) -> QuizSummary {
        let mut summary = QuizSummary::default();
        for state in self.states.values() {
            match state {
                CardState::Hidden => summary.hidden += 1,
                CardState::Revealed => summary.revealed += 1,
                CardState::Graded { correct: true } => summary.correct += 1,
                CardState::Graded { correct: false } => summary.incorrect += 1,
            }
        }
        summary
    }

    /// Returns true once every card in the session has been graded.
    pub fn is_complete(&self) -> bool {
        self.states
            .values()
            .all(|state| matches!(state, CardState::Graded { .. }))
    }
}
