//! Terminal front-end for review sessions.

mod app;
pub mod theme;
mod widgets;

pub use app::{App, Screen};
pub use theme::Theme;
