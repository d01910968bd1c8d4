//! Theme and styling for the TUI.

use std::str::FromStr;

use ratatui::style::{Color, Modifier, Style};

/// Color palette for a theme.
#[derive(Debug, Clone)]
pub struct ThemeColors {
    pub primary: Color,
    pub accent: Color,
    pub success: Color,
    pub error: Color,

    pub text: Color,
    pub text_muted: Color,
    pub text_dim: Color,

    // Grade buttons
    pub rating_again: Color,
    pub rating_hard: Color,
    pub rating_good: Color,
    pub rating_easy: Color,
}

/// Available theme names.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThemeName {
    Default,
    KanagawaWave,
}

impl ThemeName {
    pub fn as_str(&self) -> &'static str {
        match self {
            ThemeName::Default => "default",
            ThemeName::KanagawaWave => "kanagawa-wave",
        }
    }

    pub fn next(&self) -> Self {
        match self {
            ThemeName::Default => ThemeName::KanagawaWave,
            ThemeName::KanagawaWave => ThemeName::Default,
        }
    }
}

impl FromStr for ThemeName {
    type Err = std::convert::Infallible;

    /// Unknown names fall back to the default theme.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.to_lowercase().as_str() {
            "kanagawa-wave" | "kanagawa_wave" | "kanagawa" => ThemeName::KanagawaWave,
            _ => ThemeName::Default,
        })
    }
}

#[derive(Debug, Clone)]
pub struct Theme {
    pub name: ThemeName,
    pub colors: ThemeColors,
}

impl Theme {
    pub fn new(name: ThemeName) -> Self {
        let colors = match name {
            ThemeName::Default => Self::default_colors(),
            ThemeName::KanagawaWave => Self::kanagawa_wave_colors(),
        };
        Self { name, colors }
    }

    pub fn from_name(name: &str) -> Self {
        let name = name.parse().unwrap_or(ThemeName::Default);
        Self::new(name)
    }

    fn default_colors() -> ThemeColors {
        ThemeColors {
            primary: Color::Rgb(99, 102, 241),     // Indigo
            accent: Color::Rgb(236, 72, 153),      // Pink
            success: Color::Rgb(34, 197, 94),      // Green
            error: Color::Rgb(239, 68, 68),        // Red

            text: Color::Rgb(248, 250, 252),       // Slate 50
            text_muted: Color::Rgb(148, 163, 184), // Slate 400
            text_dim: Color::Rgb(100, 116, 139),   // Slate 500

            rating_again: Color::Rgb(239, 68, 68), // Red
            rating_hard: Color::Rgb(251, 191, 36), // Amber
            rating_good: Color::Rgb(59, 130, 246), // Blue
            rating_easy: Color::Rgb(34, 197, 94),  // Green
        }
    }

    fn kanagawa_wave_colors() -> ThemeColors {
        ThemeColors {
            primary: Color::Rgb(0x7E, 0x9C, 0xD8), // crystalBlue
            accent: Color::Rgb(0xD2, 0x7E, 0x99),  // sakuraPink
            success: Color::Rgb(0x98, 0xBB, 0x6C), // springGreen
            error: Color::Rgb(0xE8, 0x24, 0x24),   // samuraiRed

            text: Color::Rgb(0xDC, 0xD7, 0xBA),       // fujiWhite
            text_muted: Color::Rgb(0xC8, 0xC0, 0x93), // oldWhite
            text_dim: Color::Rgb(0x54, 0x54, 0x6D),   // sumiInk4

            rating_again: Color::Rgb(0xE8, 0x24, 0x24),
            rating_hard: Color::Rgb(0xFF, 0x9E, 0x3B),
            rating_good: Color::Rgb(0x7E, 0x9C, 0xD8),
            rating_easy: Color::Rgb(0x98, 0xBB, 0x6C),
        }
    }

    pub fn title(&self) -> Style {
        Style::default()
            .fg(self.colors.text)
            .add_modifier(Modifier::BOLD)
    }

    pub fn subtitle(&self) -> Style {
        Style::default().fg(self.colors.text_muted)
    }

    pub fn card_front(&self) -> Style {
        Style::default()
            .fg(self.colors.accent)
            .add_modifier(Modifier::BOLD)
    }

    pub fn card_back(&self) -> Style {
        Style::default()
            .fg(self.colors.success)
            .add_modifier(Modifier::BOLD)
    }

    pub fn badge(&self) -> Style {
        Style::default().fg(self.colors.primary)
    }

    pub fn key_hint(&self) -> Style {
        Style::default().fg(self.colors.text_dim)
    }

    pub fn key_highlight(&self) -> Style {
        Style::default()
            .fg(self.colors.accent)
            .add_modifier(Modifier::BOLD)
    }

    pub fn status(&self) -> Style {
        Style::default().fg(self.colors.error)
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::new(ThemeName::Default)
    }
}
