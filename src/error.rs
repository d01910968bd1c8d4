//! Error types for the scheduling core.

use thiserror::Error;

/// Contract violations raised by the scheduler and the review controller.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReviewError {
    /// Grade outside the SM-2 quality range 0..=5.
    #[error("invalid grade {0}: expected a value between 0 and 5")]
    InvalidGrade(u8),

    /// A transition was requested from a state that does not accept it.
    #[error("cannot {action} while session is {state}")]
    InvalidTransition {
        action: &'static str,
        state: &'static str,
    },

    /// A rescheduled review date does not fit in the calendar.
    #[error("next review for card {card_id} is out of date range ({interval} days)")]
    DateOutOfRange { card_id: String, interval: u32 },
}
