use serde::{Deserialize, Serialize};

/// Per-card quiz tally.
///
/// Both counters start at zero and are only ever incremented by quiz-session
/// grading; editing or tagging a card never touches its score.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Score {
    /// Times this card was graded correct.
    pub times_correct: u32,
    /// Times this card was graded incorrect.
    pub times_incorrect: u32,
}

impl Score {
    /// Creates a zeroed score.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records one graded attempt, incrementing exactly one counter.
    pub fn record(&mut self, correct: bool) {
        if correct {
            self.times_correct += 1;
        } else {
            self.times_incorrect += 1;
        }
    }

    /// Total graded attempts.
    pub fn total(&self) -> u32 {
        self.times_correct + self.times_incorrect
    }

    /// Fraction of graded attempts answered correctly, as a percentage.
    /// Returns 0.0 for a card that has never been graded.
    pub fn success_rate(&self) -> f64 {
        if self.total() == 0 {
            0.0
        } else {
            (f64::from(self.times_correct) / f64::from(self.total())) * 100.0
        }
    }
}
