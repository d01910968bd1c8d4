//! Data models for review cards, grades and session outcomes.

use std::collections::{HashMap, HashSet};

use chrono::{DateTime, Duration, Local};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ReviewError;

/// Ease factor assumed for cards that have never been scheduled.
pub const DEFAULT_EASE_FACTOR: f64 = 2.5;

/// SM-2 floor for the ease factor.
pub const MIN_EASE_FACTOR: f64 = 1.3;

/// SM-2 response quality, 0 (complete blackout) to 5 (perfect response).
///
/// Grades below 3 count as failed recall.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct ReviewGrade(u8);

impl ReviewGrade {
    pub const MAX: u8 = 5;

    pub fn new(value: u8) -> Result<Self, ReviewError> {
        if value > Self::MAX {
            return Err(ReviewError::InvalidGrade(value));
        }
        Ok(Self(value))
    }

    pub fn value(self) -> u8 {
        self.0
    }

    pub fn is_failed(self) -> bool {
        self.0 < 3
    }
}

impl TryFrom<u8> for ReviewGrade {
    type Error = ReviewError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<ReviewGrade> for u8 {
    fn from(grade: ReviewGrade) -> Self {
        grade.0
    }
}

/// The four grades offered on screen after a card is revealed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GradeButton {
    Again,
    Hard,
    Good,
    Easy,
}

impl GradeButton {
    pub const ALL: [GradeButton; 4] = [Self::Again, Self::Hard, Self::Good, Self::Easy];

    pub fn from_key(c: char) -> Option<Self> {
        match c {
            '1' => Some(Self::Again),
            '2' => Some(Self::Hard),
            '3' => Some(Self::Good),
            '4' => Some(Self::Easy),
            _ => None,
        }
    }

    pub fn grade(&self) -> ReviewGrade {
        match self {
            Self::Again => ReviewGrade(1),
            Self::Hard => ReviewGrade(2),
            Self::Good => ReviewGrade(3),
            Self::Easy => ReviewGrade(4),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Again => "Again",
            Self::Hard => "Hard",
            Self::Good => "Good",
            Self::Easy => "Easy",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Self::Again => "Complete blackout",
            Self::Hard => "Difficult recall",
            Self::Good => "Correct with effort",
            Self::Easy => "Recalled easily",
        }
    }

    pub fn color_for_theme(&self, theme: &crate::ui::theme::Theme) -> ratatui::style::Color {
        match self {
            Self::Again => theme.colors.rating_again,
            Self::Hard => theme.colors.rating_hard,
            Self::Good => theme.colors.rating_good,
            Self::Easy => theme.colors.rating_easy,
        }
    }
}

/// A unit of study material. Read-only while a session is running.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewCard {
    pub id: String,
    pub front: String,
    pub back: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,

    // SM-2 fields; absent means never scheduled
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interval: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ease_factor: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_review_date: Option<DateTime<Local>>,
}

impl ReviewCard {
    pub fn new(front: impl Into<String>, back: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string()[..8].to_string(),
            front: front.into(),
            back: back.into(),
            tags: Vec::new(),
            interval: None,
            ease_factor: None,
            next_review_date: None,
        }
    }

    pub fn prev_interval(&self) -> u32 {
        self.interval.unwrap_or(0)
    }

    pub fn current_ease(&self) -> f64 {
        self.ease_factor.unwrap_or(DEFAULT_EASE_FACTOR)
    }

    pub fn is_due(&self, now: DateTime<Local>) -> bool {
        match self.next_review_date {
            None => true,
            Some(due) => due <= now,
        }
    }
}

/// A collection of cards as stored in a deck file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Deck {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub cards: Vec<ReviewCard>,
}

impl Deck {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: None,
            cards: Vec::new(),
        }
    }

    /// Cards due at `now`, in deck order.
    pub fn due_cards(&self, now: DateTime<Local>) -> Vec<&ReviewCard> {
        self.cards.iter().filter(|c| c.is_due(now)).collect()
    }

    /// Build the input for a review session, keeping at most `limit` due cards.
    pub fn review_data(&self, now: DateTime<Local>, limit: Option<usize>) -> ReviewDeck {
        let mut due_cards: Vec<ReviewCard> = self.due_cards(now).into_iter().cloned().collect();
        if let Some(limit) = limit {
            due_cards.truncate(limit);
        }

        ReviewDeck {
            title: self.title.clone(),
            description: self.description.clone(),
            due_cards,
            total_cards: Some(self.cards.len()),
        }
    }

    /// Copy of the deck with every reviewed card rescheduled from `now`.
    ///
    /// Fails without touching anything if a next review date falls outside the
    /// representable calendar range.
    pub fn apply_result(
        &self,
        result: &SpacedRepetitionResult,
        now: DateTime<Local>,
    ) -> Result<Deck, ReviewError> {
        let outcomes: HashMap<&str, &ReviewSession> = result
            .sessions
            .iter()
            .map(|s| (s.card_id.as_str(), s))
            .collect();

        let cards = self
            .cards
            .iter()
            .map(|card| match outcomes.get(card.id.as_str()) {
                Some(outcome) => {
                    let due = now
                        .checked_add_signed(Duration::days(i64::from(outcome.next_interval)))
                        .ok_or_else(|| ReviewError::DateOutOfRange {
                            card_id: card.id.clone(),
                            interval: outcome.next_interval,
                        })?;

                    Ok(ReviewCard {
                        interval: Some(outcome.next_interval),
                        ease_factor: Some(outcome.next_ease_factor),
                        next_review_date: Some(due),
                        ..card.clone()
                    })
                }
                None => Ok(card.clone()),
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Deck {
            cards,
            ..self.clone()
        })
    }
}

/// Session input: the cards due for review, already filtered and ordered.
#[derive(Debug, Clone, PartialEq)]
pub struct ReviewDeck {
    pub title: String,
    pub description: Option<String>,
    pub due_cards: Vec<ReviewCard>,
    /// Size of the whole deck, for display.
    pub total_cards: Option<usize>,
}

impl ReviewDeck {
    pub fn not_due_count(&self) -> Option<usize> {
        self.total_cards
            .map(|total| total.saturating_sub(self.due_cards.len()))
    }
}

/// Outcome of grading one card. Never mutated after creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewSession {
    pub card_id: String,
    pub grade: ReviewGrade,
    pub next_interval: u32,
    pub next_ease_factor: f64,
}

/// Aggregate produced once the last due card has been graded.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpacedRepetitionResult {
    pub sessions: Vec<ReviewSession>,
    /// Cards graded below 3, in review order.
    pub hard_card_ids: Vec<String>,
}

impl SpacedRepetitionResult {
    pub fn from_sessions(sessions: Vec<ReviewSession>) -> Self {
        let mut seen = HashSet::new();
        let hard_card_ids = sessions
            .iter()
            .filter(|s| s.grade.is_failed())
            .filter(|s| seen.insert(s.card_id.as_str()))
            .map(|s| s.card_id.clone())
            .collect();

        Self {
            sessions,
            hard_card_ids,
        }
    }

    pub fn summary(&self) -> ResultSummary {
        let mut summary = ResultSummary::default();
        for session in &self.sessions {
            match session.grade.value() {
                0..=2 => summary.hard += 1,
                3 => summary.good += 1,
                _ => summary.easy += 1,
            }
        }
        summary
    }
}

/// Grade breakdown shown when a session completes.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ResultSummary {
    /// Again or Hard (grade below 3).
    pub hard: usize,
    pub good: usize,
    /// Grade 4 or above.
    pub easy: usize,
}

impl ResultSummary {
    pub fn total(&self) -> usize {
        self.hard + self.good + self.easy
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(day: u32) -> DateTime<Local> {
        Local.with_ymd_and_hms(2025, 3, day, 9, 0, 0).unwrap()
    }

    fn card(id: &str) -> ReviewCard {
        ReviewCard {
            id: id.to_string(),
            ..ReviewCard::new("front", "back")
        }
    }

    fn outcome(id: &str, grade: u8, interval: u32, ease: f64) -> ReviewSession {
        ReviewSession {
            card_id: id.to_string(),
            grade: ReviewGrade::new(grade).unwrap(),
            next_interval: interval,
            next_ease_factor: ease,
        }
    }

    #[test]
    fn test_grade_domain() {
        assert!(ReviewGrade::new(0).is_ok());
        assert!(ReviewGrade::new(5).is_ok());
        assert_eq!(ReviewGrade::new(6), Err(ReviewError::InvalidGrade(6)));
        assert!(ReviewGrade::new(2).unwrap().is_failed());
        assert!(!ReviewGrade::new(3).unwrap().is_failed());
    }

    #[test]
    fn test_grade_rejected_when_deserializing() {
        assert!(serde_json::from_str::<ReviewGrade>("4").is_ok());
        assert!(serde_json::from_str::<ReviewGrade>("9").is_err());
    }

    #[test]
    fn test_buttons_map_to_grades_one_through_four() {
        let grades: Vec<u8> = GradeButton::ALL.iter().map(|b| b.grade().value()).collect();
        assert_eq!(grades, vec![1, 2, 3, 4]);
        assert_eq!(GradeButton::from_key('3'), Some(GradeButton::Good));
        assert_eq!(GradeButton::from_key('5'), None);
    }

    #[test]
    fn test_card_defaults() {
        let c = ReviewCard::new("Q", "A");
        assert_eq!(c.id.len(), 8);
        assert_eq!(c.prev_interval(), 0);
        assert_eq!(c.current_ease(), DEFAULT_EASE_FACTOR);
    }

    #[test]
    fn test_card_json_uses_camel_case() {
        let json = r#"{"id":"a","front":"Q","back":"A","interval":6,"easeFactor":2.0}"#;
        let c: ReviewCard = serde_json::from_str(json).unwrap();
        assert_eq!(c.interval, Some(6));
        assert_eq!(c.ease_factor, Some(2.0));
        assert!(c.tags.is_empty());
        assert!(c.next_review_date.is_none());
    }

    #[test]
    fn test_due_cards_filters_by_date() {
        let mut deck = Deck::new("Deck");
        deck.cards.push(card("never"));
        deck.cards.push(ReviewCard {
            next_review_date: Some(at(1)),
            ..card("past")
        });
        deck.cards.push(ReviewCard {
            next_review_date: Some(at(20)),
            ..card("future")
        });

        let ids: Vec<&str> = deck.due_cards(at(10)).iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["never", "past"]);
    }

    #[test]
    fn test_review_data_respects_limit() {
        let mut deck = Deck::new("Deck");
        for id in ["a", "b", "c"] {
            deck.cards.push(card(id));
        }

        let data = deck.review_data(at(1), Some(2));
        assert_eq!(data.due_cards.len(), 2);
        assert_eq!(data.total_cards, Some(3));
        assert_eq!(data.not_due_count(), Some(1));
    }

    #[test]
    fn test_apply_result_reschedules_reviewed_cards_only() {
        let mut deck = Deck::new("Deck");
        deck.cards.push(card("a"));
        deck.cards.push(card("b"));

        let result = SpacedRepetitionResult::from_sessions(vec![outcome("a", 4, 6, 2.5)]);
        let updated = deck.apply_result(&result, at(1)).unwrap();

        assert_eq!(updated.cards[0].interval, Some(6));
        assert_eq!(updated.cards[0].ease_factor, Some(2.5));
        assert_eq!(updated.cards[0].next_review_date, Some(at(7)));
        assert_eq!(updated.cards[1], deck.cards[1]);
        // source deck untouched
        assert_eq!(deck.cards[0].interval, None);
    }

    #[test]
    fn test_apply_result_rejects_dates_past_calendar_range() {
        let mut deck = Deck::new("Deck");
        deck.cards.push(ReviewCard {
            interval: Some(200_000_000),
            ease_factor: Some(2.5),
            ..card("far")
        });

        let schedule = crate::sm2::Scheduler::new()
            .schedule(&deck.cards[0], ReviewGrade::new(4).unwrap());
        assert_eq!(schedule.interval, 500_000_000);

        let result = SpacedRepetitionResult::from_sessions(vec![outcome(
            "far",
            4,
            schedule.interval,
            schedule.ease_factor,
        )]);
        assert_eq!(
            deck.apply_result(&result, at(1)),
            Err(ReviewError::DateOutOfRange {
                card_id: "far".to_string(),
                interval: 500_000_000,
            })
        );
    }

    #[test]
    fn test_hard_card_ids_and_summary() {
        let result = SpacedRepetitionResult::from_sessions(vec![
            outcome("a", 1, 1, 2.3),
            outcome("b", 3, 1, 2.36),
            outcome("c", 4, 6, 2.5),
            outcome("d", 2, 1, 1.8),
        ]);

        assert_eq!(result.hard_card_ids, vec!["a", "d"]);
        assert_eq!(
            result.summary(),
            ResultSummary {
                hard: 2,
                good: 1,
                easy: 1
            }
        );
        assert_eq!(result.summary().total(), 4);
    }

    #[test]
    fn test_result_json_shape() {
        let result = SpacedRepetitionResult::from_sessions(vec![outcome("b", 2, 1, 1.8)]);
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["hardCardIds"][0], "b");
        assert_eq!(json["sessions"][0]["cardId"], "b");
        assert_eq!(json["sessions"][0]["grade"], 2);
        assert_eq!(json["sessions"][0]["nextInterval"], 1);
    }
}
