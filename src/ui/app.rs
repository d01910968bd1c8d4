//! Main application state and logic.

use std::time::{Duration, Instant};

use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use ratatui::{
    layout::{Alignment, Constraint, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Gauge, Paragraph},
    Frame,
};
use tracing::{debug, warn};

use super::theme::Theme;
use super::widgets::{CompletionScreen, FlashcardWidget, Header, KeyHints, RatingButtons};
use crate::config::Config;
use crate::models::{GradeButton, ReviewDeck, SpacedRepetitionResult};
use crate::session::{create_session, ReviewController};
use crate::sm2::Scheduler;

/// How long a status message stays on screen.
const STATUS_TTL: Duration = Duration::from_secs(3);

// ══════════════════════════════════════════════════════════════════════════
// Application State
// ══════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, PartialEq)]
pub enum Screen {
    Review,
    Complete,
}

pub struct App {
    pub screen: Screen,
    pub running: bool,

    pub config: Config,
    pub theme: Theme,

    // Deck shown in the header
    pub title: String,
    pub description: Option<String>,
    pub total_cards: Option<usize>,
    pub not_due: Option<usize>,

    pub session: ReviewController,
    pub scheduler: Scheduler,
    pub interval_preview: Vec<(GradeButton, String)>,

    pub status_message: Option<(String, Instant)>,
}

impl App {
    pub fn new(review: ReviewDeck, config: Config) -> Self {
        let theme = Theme::from_name(&config.theme);
        let not_due = review.not_due_count();
        let session = create_session(review.due_cards);

        let mut app = Self {
            screen: Screen::Review,
            running: true,
            config,
            theme,
            title: review.title,
            description: review.description,
            total_cards: review.total_cards,
            not_due,
            session,
            scheduler: Scheduler::new(),
            interval_preview: Vec::new(),
            status_message: None,
        };
        app.sync_screen();
        app
    }

    /// The finished session's result, if the learner got to the end.
    pub fn result(&self) -> Option<&SpacedRepetitionResult> {
        self.session.result()
    }

    pub fn cycle_theme(&mut self) {
        let new_theme_name = self.theme.name.next();
        self.theme = Theme::new(new_theme_name);
        self.config.theme = new_theme_name.as_str().to_string();
        if let Err(e) = self.config.save() {
            warn!("failed to save config: {:#}", e);
        }
    }

    pub fn set_status(&mut self, message: String) {
        self.status_message = Some((message, Instant::now()));
    }

    pub fn show_answer(&mut self) {
        if let Err(e) = self.session.reveal() {
            self.set_status(e.to_string());
        }
    }

    pub fn rate_card(&mut self, button: GradeButton) {
        match self.session.grade(button.grade()) {
            Ok(Some(result)) => {
                debug!(hard = result.hard_card_ids.len(), "session complete");
            }
            Ok(None) => {}
            Err(e) => self.set_status(e.to_string()),
        }
        self.sync_screen();
    }

    /// Refresh the screen and interval previews from the session state.
    fn sync_screen(&mut self) {
        if self.session.is_finished() {
            self.screen = Screen::Complete;
            self.interval_preview.clear();
            return;
        }

        if let Some(card) = self.session.current_card() {
            self.interval_preview = self.scheduler.preview_intervals(card).to_vec();
        }
    }

    pub fn handle_events(&mut self) -> anyhow::Result<()> {
        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    return Ok(());
                }
                self.handle_key(key.code);
            }
        }
        Ok(())
    }

    pub fn handle_key(&mut self, key: KeyCode) {
        match self.screen {
            Screen::Review => self.handle_review_keys(key),
            Screen::Complete => self.handle_complete_keys(key),
        }
    }

    fn handle_review_keys(&mut self, key: KeyCode) {
        match key {
            KeyCode::Esc | KeyCode::Char('q') => self.running = false,
            KeyCode::Char('t') => self.cycle_theme(),
            KeyCode::Char(' ') | KeyCode::Enter => {
                if !self.session.is_revealed() {
                    self.show_answer();
                }
            }
            KeyCode::Char(c) => {
                if let Some(button) = GradeButton::from_key(c) {
                    self.rate_card(button);
                }
            }
            _ => {}
        }
    }

    fn handle_complete_keys(&mut self, key: KeyCode) {
        match key {
            KeyCode::Esc | KeyCode::Char('q') | KeyCode::Enter => self.running = false,
            KeyCode::Char('t') => self.cycle_theme(),
            _ => {}
        }
    }

    // ══════════════════════════════════════════════════════════════════════
    // Rendering
    // ══════════════════════════════════════════════════════════════════════

    pub fn render(&mut self, frame: &mut Frame) {
        let area = frame.area();

        if self
            .status_message
            .as_ref()
            .is_some_and(|(_, at)| at.elapsed() > STATUS_TTL)
        {
            self.status_message = None;
        }

        match self.screen {
            Screen::Review => self.render_review(frame, area),
            Screen::Complete => self.render_complete(frame, area),
        }
    }

    fn render_review(&self, frame: &mut Frame, area: Rect) {
        let chunks = Layout::vertical([
            Constraint::Length(4), // Header
            Constraint::Length(1), // Progress
            Constraint::Length(1), // Spacing
            Constraint::Min(8),    // Card
            Constraint::Length(1), // Status
            Constraint::Length(5), // Buttons
            Constraint::Length(2), // Hints
        ])
        .split(area);

        frame.render_widget(
            Header::new(
                &self.title,
                self.description.as_deref(),
                self.session.remaining(),
                self.total_cards,
                &self.theme,
            ),
            chunks[0],
        );

        let progress = Gauge::default()
            .gauge_style(Style::default().fg(self.theme.colors.primary))
            .ratio(self.session.progress_percent() / 100.0)
            .label("");
        frame.render_widget(progress, centered_rect(80, 100, chunks[1]));

        if let Some(card) = self.session.current_card() {
            frame.render_widget(
                FlashcardWidget::new(card, self.session.is_revealed(), &self.theme),
                centered_rect(80, 100, chunks[3]),
            );
        }

        if let Some((message, _)) = &self.status_message {
            let status = Paragraph::new(Line::from(Span::styled(
                message.as_str(),
                self.theme.status(),
            )))
            .alignment(Alignment::Center);
            frame.render_widget(status, chunks[4]);
        }

        frame.render_widget(
            RatingButtons::new(&self.interval_preview, self.session.is_revealed(), &self.theme),
            centered_rect(90, 100, chunks[5]),
        );

        frame.render_widget(KeyHints::new(self.key_hints(), &self.theme), chunks[6]);
    }

    fn key_hints(&self) -> &'static [(&'static str, &'static str)] {
        if self.session.is_revealed() {
            &[
                ("1", "Again"),
                ("2", "Hard"),
                ("3", "Good"),
                ("4", "Easy"),
                ("t", "theme"),
                ("q", "quit"),
            ]
        } else {
            &[("Space", "show answer"), ("t", "theme"), ("q", "quit")]
        }
    }

    fn render_complete(&self, frame: &mut Frame, area: Rect) {
        let summary = self
            .session
            .result()
            .map(|r| r.summary())
            .unwrap_or_default();

        frame.render_widget(
            CompletionScreen::new(summary, self.not_due, &self.theme),
            centered_rect(60, 50, area),
        );
    }
}

// ══════════════════════════════════════════════════════════════════════════
// Helper Functions
// ══════════════════════════════════════════════════════════════════════════

/// Create a centered rectangle.
fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::vertical([
        Constraint::Percentage((100 - percent_y) / 2),
        Constraint::Percentage(percent_y),
        Constraint::Percentage((100 - percent_y) / 2),
    ])
    .split(r);

    Layout::horizontal([
        Constraint::Percentage((100 - percent_x) / 2),
        Constraint::Percentage(percent_x),
        Constraint::Percentage((100 - percent_x) / 2),
    ])
    .split(popup_layout[1])[1]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ReviewCard;
    use ratatui::{backend::TestBackend, Terminal};

    fn review_deck(cards: &[(&str, u32, f64)]) -> ReviewDeck {
        ReviewDeck {
            title: "Capitals".to_string(),
            description: Some("Europe".to_string()),
            due_cards: cards
                .iter()
                .map(|(id, interval, ease)| ReviewCard {
                    id: id.to_string(),
                    interval: Some(*interval),
                    ease_factor: Some(*ease),
                    ..ReviewCard::new(format!("Q {id}"), format!("A {id}"))
                })
                .collect(),
            total_cards: Some(cards.len() + 3),
        }
    }

    fn draw(app: &mut App) {
        let mut terminal = Terminal::new(TestBackend::new(100, 40)).unwrap();
        terminal.draw(|frame| app.render(frame)).unwrap();
    }

    #[test]
    fn test_keys_drive_the_session() {
        let deck = review_deck(&[("a", 0, 2.5), ("b", 6, 2.0)]);
        let mut app = App::new(deck, Config::default());
        assert_eq!(app.screen, Screen::Review);

        // grading before reveal is refused
        app.handle_key(KeyCode::Char('4'));
        assert!(app.status_message.is_some());
        assert!(app.session.sessions().is_empty());

        app.handle_key(KeyCode::Char(' '));
        app.handle_key(KeyCode::Char('4'));
        app.handle_key(KeyCode::Enter);
        app.handle_key(KeyCode::Char('2'));

        assert_eq!(app.screen, Screen::Complete);
        let result = app.result().unwrap();
        assert_eq!(result.sessions.len(), 2);
        assert_eq!(result.hard_card_ids, vec!["b".to_string()]);
        assert!(app.running);

        app.handle_key(KeyCode::Char('q'));
        assert!(!app.running);
    }

    #[test]
    fn test_previews_follow_current_card() {
        let deck = review_deck(&[("a", 6, 2.5), ("b", 0, 2.5)]);
        let mut app = App::new(deck, Config::default());
        assert_eq!(app.interval_preview[2].1, "15d");

        app.handle_key(KeyCode::Char(' '));
        app.handle_key(KeyCode::Char('3'));
        assert_eq!(app.interval_preview[2].1, "1d");
    }

    #[test]
    fn test_empty_deck_opens_on_completion() {
        let app = App::new(review_deck(&[]), Config::default());
        assert_eq!(app.screen, Screen::Complete);
        assert_eq!(app.result().map(|r| r.sessions.len()), Some(0));
        assert_eq!(app.not_due, Some(3));
    }

    #[test]
    fn test_theme_hint_shown_before_and_after_reveal() {
        let mut app = App::new(review_deck(&[("a", 0, 2.5)]), Config::default());
        assert!(app.key_hints().contains(&("t", "theme")));

        app.handle_key(KeyCode::Char(' '));
        assert!(app.key_hints().contains(&("t", "theme")));
        assert!(app.key_hints().contains(&("4", "Easy")));
    }

    #[test]
    fn test_renders_each_screen() {
        let mut app = App::new(review_deck(&[("a", 0, 2.5)]), Config::default());
        draw(&mut app);
        app.handle_key(KeyCode::Char(' '));
        draw(&mut app);
        app.handle_key(KeyCode::Char('1'));
        assert_eq!(app.screen, Screen::Complete);
        draw(&mut app);
    }
}
