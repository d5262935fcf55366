//! Question roster and cursor.

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};

/// How demanding a question is.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, AsRefStr, EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

/// A single interview question produced by the opening exchange.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionItem {
    pub id: String,
    pub text: String,
    pub topic: String,
    pub difficulty: Difficulty,
}

/// Current/total counters reported to callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct QuestionProgress {
    pub current: usize,
    pub total: usize,
}

/// Ordered question list plus a 1-based cursor.
///
/// `cursor == 0` means no question has been asked yet. The roster is filled
/// once and never reordered afterwards; only the cursor moves.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct QuestionRoster {
    items: Vec<QuestionItem>,
    cursor: usize,
    populated: bool,
}

impl QuestionRoster {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores the questions verbatim. Returns `false` if already populated.
    pub fn populate(&mut self, items: Vec<QuestionItem>) -> bool {
        if self.populated {
            return false;
        }
        self.items = items;
        self.cursor = 0;
        self.populated = true;
        true
    }

    pub fn is_populated(&self) -> bool {
        self.populated
    }

    pub fn total(&self) -> usize {
        self.items.len()
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn items(&self) -> &[QuestionItem] {
        &self.items
    }

    /// The question under the cursor, if any.
    pub fn current(&self) -> Option<&QuestionItem> {
        if self.cursor == 0 {
            return None;
        }
        self.items.get(self.cursor - 1)
    }

    pub fn current_text(&self) -> Option<&str> {
        self.current().map(|q| q.text.as_str())
    }

    /// Moves the cursor forward by one and returns the new value.
    ///
    /// The caller checks `is_exhausted()` afterwards; the cursor never moves
    /// past `total + 1`.
    pub fn advance(&mut self) -> usize {
        if self.cursor <= self.total() {
            self.cursor += 1;
        }
        self.cursor
    }

    /// Sets the cursor to an explicit position, clamped to `total + 1`.
    pub fn seek(&mut self, cursor: usize) -> usize {
        self.cursor = cursor.min(self.total() + 1);
        self.cursor
    }

    /// Whether the cursor has run past the last question.
    pub fn is_exhausted(&self) -> bool {
        self.cursor > self.total()
    }

    pub fn progress(&self) -> QuestionProgress {
        QuestionProgress {
            current: self.cursor.min(self.total()),
            total: self.total(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_items(count: usize) -> Vec<QuestionItem> {
        (1..=count)
            .map(|i| QuestionItem {
                id: format!("q{i}"),
                text: format!("Question {i}?"),
                topic: "rust".to_string(),
                difficulty: Difficulty::Medium,
            })
            .collect()
    }

    #[test]
    fn test_empty_roster_has_no_current() {
        let roster = QuestionRoster::new();
        assert_eq!(roster.total(), 0);
        assert_eq!(roster.cursor(), 0);
        assert!(roster.current().is_none());
        assert!(!roster.is_populated());
    }

    #[test]
    fn test_populate_only_once() {
        let mut roster = QuestionRoster::new();
        assert!(roster.populate(sample_items(2)));
        assert!(!roster.populate(sample_items(5)));
        assert_eq!(roster.total(), 2);
    }

    #[test]
    fn test_advance_walks_questions_in_order() {
        let mut roster = QuestionRoster::new();
        roster.populate(sample_items(2));

        assert_eq!(roster.advance(), 1);
        assert_eq!(roster.current_text(), Some("Question 1?"));
        assert_eq!(roster.advance(), 2);
        assert_eq!(roster.current_text(), Some("Question 2?"));
        assert!(!roster.is_exhausted());

        assert_eq!(roster.advance(), 3);
        assert!(roster.is_exhausted());
        assert!(roster.current().is_none());
    }

    #[test]
    fn test_cursor_never_runs_past_sentinel() {
        let mut roster = QuestionRoster::new();
        roster.populate(sample_items(1));
        for _ in 0..10 {
            roster.advance();
        }
        assert_eq!(roster.cursor(), 2);
        assert_eq!(roster.progress(), QuestionProgress { current: 1, total: 1 });
    }

    #[test]
    fn test_difficulty_parses_lowercase() {
        assert_eq!("hard".parse::<Difficulty>().unwrap(), Difficulty::Hard);
        assert!("impossible".parse::<Difficulty>().is_err());
    }
}
