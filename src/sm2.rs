//! SM-2 (SuperMemo 2) interval scheduling.
//!
//! - Grades 0-2: interval resets to one day and the ease factor drops by 0.2
//! - Grades 3-5: 1 day, then 6 days, then the previous interval times the ease factor
//! - The ease factor never falls below 1.3

use crate::error::ReviewError;
use crate::models::{GradeButton, ReviewCard, ReviewGrade, MIN_EASE_FACTOR};

/// Next interval (days) and ease factor for a card.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Schedule {
    pub interval: u32,
    pub ease_factor: f64,
}

/// Compute the next schedule from a raw grade.
///
/// Grades outside 0..=5 are rejected rather than clamped.
pub fn compute_next_interval(
    grade: u8,
    prev_interval: u32,
    ease_factor: f64,
) -> Result<Schedule, ReviewError> {
    let grade = ReviewGrade::new(grade)?;
    Ok(next_schedule(grade, prev_interval, ease_factor))
}

/// SM-2 step for an already validated grade.
///
/// An incoming ease below the floor (or NaN) is treated as the floor, so the
/// interval is always at least one day.
pub fn next_schedule(grade: ReviewGrade, prev_interval: u32, ease_factor: f64) -> Schedule {
    let ease_factor = ease_factor.max(MIN_EASE_FACTOR);

    if grade.is_failed() {
        return Schedule {
            interval: 1,
            ease_factor: (ease_factor - 0.2).max(MIN_EASE_FACTOR),
        };
    }

    let interval = match prev_interval {
        0 => 1,
        1 => 6,
        // Uses the incoming ease factor, not the updated one
        n => ((f64::from(n) * ease_factor).round() as u32).max(1),
    };

    let q = 5.0 - f64::from(grade.value());
    let ease_factor = (ease_factor + 0.1 - q * (0.08 + q * 0.02)).max(MIN_EASE_FACTOR);

    Schedule {
        interval,
        ease_factor,
    }
}

/// Applies SM-2 to cards and formats interval previews for the grade buttons.
#[derive(Debug, Default, Clone, Copy)]
pub struct Scheduler;

impl Scheduler {
    pub fn new() -> Self {
        Self
    }

    pub fn schedule(&self, card: &ReviewCard, grade: ReviewGrade) -> Schedule {
        next_schedule(grade, card.prev_interval(), card.current_ease())
    }

    /// What each on-screen grade would schedule for `card`.
    pub fn preview_intervals(&self, card: &ReviewCard) -> [(GradeButton, String); 4] {
        GradeButton::ALL.map(|button| {
            let schedule = self.schedule(card, button.grade());
            (button, format_interval(schedule.interval))
        })
    }
}

/// Human-readable interval, e.g. "6d", "1.5mo", "2.1y".
pub fn format_interval(days: u32) -> String {
    if days < 30 {
        format!("{}d", days)
    } else if days < 365 {
        format!("{:.1}mo", f64::from(days) / 30.0)
    } else {
        format!("{:.1}y", f64::from(days) / 365.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    #[test]
    fn test_first_success() {
        let s = compute_next_interval(3, 0, 2.5).unwrap();
        assert_eq!(s.interval, 1);
        assert!((s.ease_factor - 2.36).abs() < EPS);
    }

    #[test]
    fn test_second_success() {
        let s = compute_next_interval(4, 1, 2.5).unwrap();
        assert_eq!(s.interval, 6);
        assert!((s.ease_factor - 2.5).abs() < EPS);
    }

    #[test]
    fn test_later_success_uses_previous_ease() {
        let s = compute_next_interval(5, 6, 2.5).unwrap();
        // 6 * 2.5, ease rises afterwards
        assert_eq!(s.interval, 15);
        assert!((s.ease_factor - 2.6).abs() < EPS);
    }

    #[test]
    fn test_interval_rounds_to_nearest_day() {
        // 10 * 1.35 = 13.5
        assert_eq!(compute_next_interval(4, 10, 1.35).unwrap().interval, 14);
        // 7 * 1.3 = 9.1
        assert_eq!(compute_next_interval(4, 7, 1.3).unwrap().interval, 9);
    }

    #[test]
    fn test_failure_resets_interval() {
        for grade in 0..3 {
            for prev in [0, 1, 6, 120] {
                let s = compute_next_interval(grade, prev, 2.5).unwrap();
                assert_eq!(s.interval, 1);
                assert!((s.ease_factor - 2.3).abs() < EPS);
            }
        }
    }

    #[test]
    fn test_ease_floor() {
        for grade in 0..=5 {
            for ease in [1.0, 1.3, 1.35, 1.5, 2.5] {
                for prev in [0, 1, 2, 30] {
                    let s = compute_next_interval(grade, prev, ease).unwrap();
                    assert!(s.ease_factor >= MIN_EASE_FACTOR, "grade {grade} ease {ease}");
                    assert!(s.interval >= 1);
                }
            }
        }
    }

    #[test]
    fn test_failure_branch_is_flat_penalty() {
        // Grade 0 under the success formula would subtract 0.8; failure takes 0.2
        let s = compute_next_interval(0, 10, 2.0).unwrap();
        assert!((s.ease_factor - 1.8).abs() < EPS);
    }

    #[test]
    fn test_out_of_range_ease_still_schedules_a_day() {
        for ease in [0.1, 0.0, -3.0, f64::NAN] {
            let s = compute_next_interval(4, 2, ease).unwrap();
            assert!(s.interval >= 1, "ease {ease}");
            assert!(s.ease_factor >= MIN_EASE_FACTOR, "ease {ease}");
        }

        // treated as the floor: 5 * 1.3 = 6.5
        assert_eq!(compute_next_interval(3, 5, f64::NAN).unwrap().interval, 7);
        assert_eq!(compute_next_interval(3, 5, 0.1).unwrap().interval, 7);
    }

    #[test]
    fn test_low_ease_card_from_deck_json() {
        let card: ReviewCard = serde_json::from_str(
            r#"{"id":"x","front":"Q","back":"A","interval":2,"easeFactor":0.1}"#,
        )
        .unwrap();

        let s = Scheduler::new().schedule(&card, ReviewGrade::new(4).unwrap());
        assert_eq!(s.interval, 3);
        assert!(s.ease_factor >= MIN_EASE_FACTOR);
    }

    #[test]
    fn test_invalid_grade_rejected() {
        assert_eq!(
            compute_next_interval(6, 0, 2.5),
            Err(ReviewError::InvalidGrade(6))
        );
        assert!(compute_next_interval(255, 3, 2.5).is_err());
    }

    #[test]
    fn test_deterministic() {
        let a = compute_next_interval(4, 15, 2.18).unwrap();
        let b = compute_next_interval(4, 15, 2.18).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_preview_intervals() {
        let card = ReviewCard {
            interval: Some(6),
            ease_factor: Some(2.5),
            ..ReviewCard::new("Q", "A")
        };

        let preview = Scheduler::new().preview_intervals(&card);
        let labels: Vec<&str> = preview.iter().map(|(_, s)| s.as_str()).collect();
        assert_eq!(labels, vec!["1d", "1d", "15d", "15d"]);
        assert_eq!(preview[0].0, GradeButton::Again);
    }

    #[test]
    fn test_format_interval() {
        assert_eq!(format_interval(1), "1d");
        assert_eq!(format_interval(45), "1.5mo");
        assert_eq!(format_interval(730), "2.0y");
    }
}
