//! Custom widgets for the review TUI.

use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{block::BorderType, Block, Borders, Paragraph, Widget, Wrap},
};

use super::theme::Theme;
use crate::models::{GradeButton, ResultSummary, ReviewCard};

// ══════════════════════════════════════════════════════════════════════════
// Header Widget
// ══════════════════════════════════════════════════════════════════════════

/// Deck title and description with remaining/total badges.
pub struct Header<'a> {
    title: &'a str,
    description: Option<&'a str>,
    remaining: usize,
    total_cards: Option<usize>,
    theme: &'a Theme,
}

impl<'a> Header<'a> {
    pub fn new(
        title: &'a str,
        description: Option<&'a str>,
        remaining: usize,
        total_cards: Option<usize>,
        theme: &'a Theme,
    ) -> Self {
        Self {
            title,
            description,
            remaining,
            total_cards,
            theme,
        }
    }
}

impl Widget for Header<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let mut badges = vec![Span::styled(
            format!("[{} remaining]", self.remaining),
            self.theme.badge(),
        )];
        if let Some(total) = self.total_cards {
            badges.insert(
                0,
                Span::styled(format!("[{} total] ", total), self.theme.key_hint()),
            );
        }

        let mut lines = vec![Line::from(Span::styled(self.title, self.theme.title()))];
        if let Some(description) = self.description {
            lines.push(Line::from(Span::styled(description, self.theme.subtitle())));
        }
        lines.push(Line::from(badges));

        Paragraph::new(lines)
            .alignment(Alignment::Center)
            .render(area, buf);
    }
}

// ══════════════════════════════════════════════════════════════════════════
// Flashcard Widget
// ══════════════════════════════════════════════════════════════════════════

pub struct FlashcardWidget<'a> {
    card: &'a ReviewCard,
    revealed: bool,
    theme: &'a Theme,
}

impl<'a> FlashcardWidget<'a> {
    pub fn new(card: &'a ReviewCard, revealed: bool, theme: &'a Theme) -> Self {
        Self {
            card,
            revealed,
            theme,
        }
    }
}

impl Widget for FlashcardWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let (label, label_style, border_style) = if self.revealed {
            (
                "ANSWER",
                self.theme.card_back(),
                Style::default().fg(self.theme.colors.success),
            )
        } else {
            (
                "QUESTION",
                self.theme.card_front(),
                Style::default().fg(self.theme.colors.accent),
            )
        };

        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(border_style)
            .title(Line::from(vec![
                Span::raw(" "),
                Span::styled(label, label_style),
                Span::raw(" "),
            ]))
            .title_alignment(Alignment::Center);

        let inner = block.inner(area);
        block.render(area, buf);

        let mut lines: Vec<Line> = Vec::new();
        if self.revealed {
            lines.extend(self.card.back.lines().map(|l| Line::from(l.to_string())));
            if let Some(interval) = self.card.interval {
                lines.push(Line::from(""));
                lines.push(Line::from(Span::styled(
                    format!("Previous interval: {}d", interval),
                    self.theme.key_hint(),
                )));
            }
        } else {
            if !self.card.tags.is_empty() {
                let tags = self
                    .card
                    .tags
                    .iter()
                    .map(|t| format!("#{}", t))
                    .collect::<Vec<_>>()
                    .join(" ");
                lines.push(Line::from(Span::styled(tags, self.theme.badge())));
                lines.push(Line::from(""));
            }
            lines.extend(self.card.front.lines().map(|l| Line::from(l.to_string())));
            lines.push(Line::from(""));
            lines.push(Line::from(Span::styled(
                "Press Space to reveal",
                self.theme.key_hint(),
            )));
        }

        // Center vertically
        let content_height = lines.len() as u16;
        let vertical_padding = inner.height.saturating_sub(content_height) / 2;

        let content_area = Rect {
            x: inner.x + 2,
            y: inner.y + vertical_padding,
            width: inner.width.saturating_sub(4),
            height: inner.height.saturating_sub(vertical_padding),
        };

        Paragraph::new(lines)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true })
            .style(Style::default().fg(self.theme.colors.text))
            .render(content_area, buf);
    }
}

// ══════════════════════════════════════════════════════════════════════════
// Rating Buttons Widget
// ══════════════════════════════════════════════════════════════════════════

pub struct RatingButtons<'a> {
    previews: &'a [(GradeButton, String)],
    enabled: bool,
    theme: &'a Theme,
}

impl<'a> RatingButtons<'a> {
    pub fn new(previews: &'a [(GradeButton, String)], enabled: bool, theme: &'a Theme) -> Self {
        Self {
            previews,
            enabled,
            theme,
        }
    }
}

impl Widget for RatingButtons<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let count = self.previews.len();
        let constraints = vec![Constraint::Ratio(1, count.max(1) as u32); count];
        let chunks = Layout::horizontal(constraints).split(area);

        for (i, (button, interval)) in self.previews.iter().enumerate() {
            let color = if self.enabled {
                button.color_for_theme(self.theme)
            } else {
                self.theme.colors.text_dim
            };

            let frame = Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(Style::default().fg(color));

            let inner = frame.inner(chunks[i]);
            frame.render(chunks[i], buf);

            let mut lines = vec![
                Line::from(Span::styled(
                    format!("{} {}", i + 1, button.name()),
                    Style::default().fg(color).add_modifier(Modifier::BOLD),
                )),
                Line::from(Span::styled(button.description(), self.theme.key_hint())),
            ];
            if self.enabled {
                lines.push(Line::from(Span::styled(
                    interval.as_str(),
                    Style::default().fg(self.theme.colors.text_muted),
                )));
            }

            Paragraph::new(lines)
                .alignment(Alignment::Center)
                .render(inner, buf);
        }
    }
}

// ══════════════════════════════════════════════════════════════════════════
// Key Hints Widget
// ══════════════════════════════════════════════════════════════════════════

pub struct KeyHints<'a> {
    hints: &'a [(&'a str, &'a str)],
    theme: &'a Theme,
}

impl<'a> KeyHints<'a> {
    pub fn new(hints: &'a [(&'a str, &'a str)], theme: &'a Theme) -> Self {
        Self { hints, theme }
    }
}

impl Widget for KeyHints<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let spans: Vec<Span> = self
            .hints
            .iter()
            .flat_map(|(key, desc)| {
                vec![
                    Span::styled(*key, self.theme.key_highlight()),
                    Span::styled(format!(" {} ", desc), self.theme.key_hint()),
                    Span::styled("│ ", Style::default().fg(self.theme.colors.text_dim)),
                ]
            })
            .collect();

        Paragraph::new(Line::from(spans))
            .alignment(Alignment::Center)
            .render(area, buf);
    }
}

// ══════════════════════════════════════════════════════════════════════════
// Completion Screen Widget
// ══════════════════════════════════════════════════════════════════════════

pub struct CompletionScreen<'a> {
    summary: ResultSummary,
    not_due: Option<usize>,
    theme: &'a Theme,
}

impl<'a> CompletionScreen<'a> {
    pub fn new(summary: ResultSummary, not_due: Option<usize>, theme: &'a Theme) -> Self {
        Self {
            summary,
            not_due,
            theme,
        }
    }
}

impl Widget for CompletionScreen<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(self.theme.colors.success))
            .title(Line::from(vec![
                Span::raw(" "),
                Span::styled("REVIEW COMPLETE", self.theme.card_back()),
                Span::raw(" "),
            ]))
            .title_alignment(Alignment::Center);

        let inner = block.inner(area);
        block.render(area, buf);

        let total = self.summary.total();
        let count = |n: usize, color: Color| {
            Span::styled(
                n.to_string(),
                Style::default().fg(color).add_modifier(Modifier::BOLD),
            )
        };
        let muted = Style::default().fg(self.theme.colors.text_muted);

        let mut text = vec![
            Line::from(""),
            Line::from(Span::styled(
                format!("{} card{} reviewed.", total, if total == 1 { "" } else { "s" }),
                self.theme.title(),
            )),
            Line::from(""),
            Line::from(vec![
                Span::styled("Again / Hard: ", muted),
                count(self.summary.hard, self.theme.colors.rating_again),
                Span::styled("   Good: ", muted),
                count(self.summary.good, self.theme.colors.rating_good),
                Span::styled("   Easy: ", muted),
                count(self.summary.easy, self.theme.colors.rating_easy),
            ]),
        ];

        if let Some(not_due) = self.not_due {
            text.push(Line::from(""));
            text.push(Line::from(Span::styled(
                format!("{} more cards not due today.", not_due),
                self.theme.key_hint(),
            )));
        }

        text.push(Line::from(""));
        text.push(Line::from(vec![
            Span::styled("Press ", self.theme.key_hint()),
            Span::styled("q", self.theme.key_highlight()),
            Span::styled(" to exit", self.theme.key_hint()),
        ]));

        Paragraph::new(text)
            .alignment(Alignment::Center)
            .render(inner, buf);
    }
}
