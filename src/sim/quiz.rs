//! Quiz milestones and question selection
//!
//! Every `milestone` points the game pauses for a quiz. A correct answer gives
//! a life back. Questions are not repeated until the whole bank has been used.

use std::collections::BTreeSet;

use rand::Rng;
use serde::{Deserialize, Serialize};

/// One multiple-choice question
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Quiz {
    pub id: u32,
    pub question: String,
    pub options: Vec<String>,
    pub correct_answer_index: usize,
}

impl Quiz {
    pub fn is_correct(&self, choice: usize) -> bool {
        choice == self.correct_answer_index
    }
}

/// Tracks which milestone was last quizzed and which questions were used
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct QuizTracker {
    milestone: u64,
    last_milestone: u64,
    bank: Vec<Quiz>,
    used: BTreeSet<u32>,
    current: Option<usize>,
    answered: bool,
}

impl QuizTracker {
    pub fn new(milestone: u64) -> Self {
        Self {
            milestone: milestone.max(1),
            ..Default::default()
        }
    }

    pub fn set_bank(&mut self, bank: Vec<Quiz>) {
        self.bank = bank;
        self.used.clear();
        self.current = None;
        self.answered = false;
    }

    pub fn set_milestone(&mut self, milestone: u64) {
        self.milestone = milestone.max(1);
    }

    pub fn bank(&self) -> &[Quiz] {
        &self.bank
    }

    /// Forget progress for a new run (the bank stays)
    pub fn reset(&mut self) {
        self.last_milestone = 0;
        self.used.clear();
        self.current = None;
        self.answered = false;
    }

    /// Highest milestone reached by this score
    pub fn milestone_for(&self, score: u64) -> u64 {
        (score / self.milestone) * self.milestone
    }

    /// True when the score crossed a milestone not yet quizzed
    pub fn is_due(&self, score: u64) -> bool {
        let reached = self.milestone_for(score);
        self.current.is_none() && reached >= self.milestone && reached > self.last_milestone
    }

    /// Record the milestone and pick a question
    ///
    /// Returns `None` if the bank is empty; the milestone is still consumed so
    /// play goes on.
    pub fn open<R: Rng + ?Sized>(&mut self, score: u64, rng: &mut R) -> Option<&Quiz> {
        self.last_milestone = self.milestone_for(score);
        if self.bank.is_empty() {
            log::warn!("Quiz milestone {} reached with an empty bank", self.last_milestone);
            return None;
        }

        let unused: Vec<usize> = self
            .bank
            .iter()
            .enumerate()
            .filter(|(_, quiz)| !self.used.contains(&quiz.id))
            .map(|(i, _)| i)
            .collect();

        let index = if unused.is_empty() {
            // Everything has been asked; start over
            self.used.clear();
            rng.random_range(0..self.bank.len())
        } else {
            unused[rng.random_range(0..unused.len())]
        };

        self.current = Some(index);
        self.answered = false;
        self.bank.get(index)
    }

    pub fn current(&self) -> Option<&Quiz> {
        self.current.and_then(|i| self.bank.get(i))
    }

    /// Answer the open quiz. Only the first answer counts.
    ///
    /// Returns `Some(correct)` for the first answer, `None` otherwise.
    pub fn answer(&mut self, choice: usize) -> Option<bool> {
        if self.answered {
            return None;
        }
        let quiz = self.current()?;
        let correct = quiz.is_correct(choice);
        let id = quiz.id;
        self.used.insert(id);
        self.answered = true;
        Some(correct)
    }

    /// Dismiss the open quiz; true if one was open
    pub fn close(&mut self) -> bool {
        let Some(id) = self.current().map(|quiz| quiz.id) else {
            return false;
        };
        self.used.insert(id);
        self.current = None;
        self.answered = false;
        true
    }

    pub fn is_used(&self, id: u32) -> bool {
        self.used.contains(&id)
    }
}

#[cfg(test)]
pub(crate) fn sample_bank(count: u32) -> Vec<Quiz> {
    (1..=count)
        .map(|id| Quiz {
            id,
            question: format!("Question {}", id),
            options: vec!["Ants".into(), "Fish".into(), "Grass".into()],
            correct_answer_index: 0,
        })
        .collect()
}
