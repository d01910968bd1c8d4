//! SM-2 spaced repetition review engine.
//!
//! The core is pure and synchronous: [`sm2::compute_next_interval`] maps a grade
//! and a card's previous schedule to its next one, and [`session::create_session`]
//! walks a list of due cards through reveal and grade steps. Deck files, config
//! and the terminal front-end sit on top of it.

pub mod config;
pub mod error;
pub mod models;
pub mod session;
pub mod sm2;
pub mod storage;
pub mod ui;

pub use error::ReviewError;
pub use models::{
    Deck, GradeButton, ReviewCard, ReviewDeck, ReviewGrade, ReviewSession,
    SpacedRepetitionResult,
};
pub use session::{create_session, ReviewController, SessionState};
pub use sm2::{compute_next_interval, Schedule};
