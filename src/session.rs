//! Review session state machine.
//!
//! A session walks an ordered list of due cards exactly once. Each card must be
//! revealed before it can be graded; grading the last card finishes the session
//! and yields the aggregated [`SpacedRepetitionResult`]. A finished session
//! accepts no further transitions; build a new one to review again.

use tracing::{debug, info};

use crate::error::ReviewError;
use crate::models::{ReviewCard, ReviewGrade, ReviewSession, SpacedRepetitionResult};
use crate::sm2::Scheduler;

/// Where the session currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Reviewing { index: usize, revealed: bool },
    Finished,
}

impl SessionState {
    fn name(&self) -> &'static str {
        match self {
            Self::Reviewing { revealed: false, .. } => "awaiting reveal",
            Self::Reviewing { revealed: true, .. } => "awaiting grade",
            Self::Finished => "finished",
        }
    }
}

/// Drives one pass over a list of due cards.
#[derive(Debug)]
pub struct ReviewController {
    cards: Vec<ReviewCard>,
    state: SessionState,
    sessions: Vec<ReviewSession>,
    result: Option<SpacedRepetitionResult>,
    scheduler: Scheduler,
}

/// Start a session over cards that are already filtered and ordered for review.
pub fn create_session(due_cards: Vec<ReviewCard>) -> ReviewController {
    ReviewController::new(due_cards)
}

impl ReviewController {
    pub fn new(due_cards: Vec<ReviewCard>) -> Self {
        let (state, result) = if due_cards.is_empty() {
            (SessionState::Finished, Some(SpacedRepetitionResult::default()))
        } else {
            (
                SessionState::Reviewing {
                    index: 0,
                    revealed: false,
                },
                None,
            )
        };

        debug!(cards = due_cards.len(), "review session created");

        Self {
            sessions: Vec::with_capacity(due_cards.len()),
            cards: due_cards,
            state,
            result,
            scheduler: Scheduler::new(),
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn is_finished(&self) -> bool {
        self.state == SessionState::Finished
    }

    pub fn is_revealed(&self) -> bool {
        matches!(self.state, SessionState::Reviewing { revealed: true, .. })
    }

    /// The card under review, or `None` once finished.
    pub fn current_card(&self) -> Option<&ReviewCard> {
        match self.state {
            SessionState::Reviewing { index, .. } => self.cards.get(index),
            SessionState::Finished => None,
        }
    }

    /// Outcomes recorded so far, in review order.
    pub fn sessions(&self) -> &[ReviewSession] {
        &self.sessions
    }

    /// The final result; available only once finished.
    pub fn result(&self) -> Option<&SpacedRepetitionResult> {
        self.result.as_ref()
    }

    /// Cards not yet graded, including the current one.
    pub fn remaining(&self) -> usize {
        self.cards.len() - self.sessions.len()
    }

    /// Share of cards graded, 0 to 100.
    pub fn progress_percent(&self) -> f64 {
        if self.cards.is_empty() {
            return 100.0;
        }
        self.sessions.len() as f64 / self.cards.len() as f64 * 100.0
    }

    /// Show the back of the current card. Revealing twice is a no-op.
    pub fn reveal(&mut self) -> Result<(), ReviewError> {
        match self.state {
            SessionState::Reviewing { index, revealed } => {
                if !revealed {
                    debug!(index, "card revealed");
                    self.state = SessionState::Reviewing {
                        index,
                        revealed: true,
                    };
                }
                Ok(())
            }
            SessionState::Finished => Err(self.invalid("reveal")),
        }
    }

    /// Grade the revealed card and move on.
    ///
    /// Returns the aggregated result when this was the last card, `None` otherwise.
    pub fn grade(
        &mut self,
        grade: ReviewGrade,
    ) -> Result<Option<SpacedRepetitionResult>, ReviewError> {
        let index = match self.state {
            SessionState::Reviewing {
                index,
                revealed: true,
            } => index,
            _ => return Err(self.invalid("grade")),
        };

        let card = &self.cards[index];
        let schedule = self.scheduler.schedule(card, grade);
        debug!(
            card = %card.id,
            grade = grade.value(),
            interval = schedule.interval,
            ease = schedule.ease_factor,
            "card graded"
        );

        self.sessions.push(ReviewSession {
            card_id: card.id.clone(),
            grade,
            next_interval: schedule.interval,
            next_ease_factor: schedule.ease_factor,
        });

        if index + 1 < self.cards.len() {
            self.state = SessionState::Reviewing {
                index: index + 1,
                revealed: false,
            };
            return Ok(None);
        }

        let result = SpacedRepetitionResult::from_sessions(self.sessions.clone());
        info!(
            reviewed = result.sessions.len(),
            hard = result.hard_card_ids.len(),
            "review session finished"
        );
        self.state = SessionState::Finished;
        self.result = Some(result.clone());
        Ok(Some(result))
    }

    fn invalid(&self, action: &'static str) -> ReviewError {
        ReviewError::InvalidTransition {
            action,
            state: self.state.name(),
        }
    }
}
