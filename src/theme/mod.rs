//! Colour themes

mod tokyo_night;

pub use tokyo_night::{TOKYO_NIGHT, TOKYO_NIGHT_STORM};

use ratatui::style::Color;

/// A color theme for the application
#[derive(Debug, Clone, PartialEq)]
pub struct Theme {
    pub name: &'static str,

    // Background colors
    pub bg_primary: Color,
    pub bg_secondary: Color,
    pub bg_tertiary: Color,

    // Foreground colors
    pub fg_primary: Color,
    pub fg_secondary: Color,
    pub fg_muted: Color,

    // Accent colors
    pub accent_primary: Color,
    pub accent_secondary: Color,

    // Semantic colors
    pub success: Color,
    pub warning: Color,
    pub error: Color,
    pub info: Color,

    // UI elements
    pub border: Color,
    pub border_focused: Color,
    pub selection: Color,
    pub cursor: Color,
}

impl Theme {
    /// Every built-in theme
    pub fn builtin() -> [Theme; 2] {
        [TOKYO_NIGHT, TOKYO_NIGHT_STORM]
    }

    /// Look a theme up by name, case-insensitively
    pub fn named(name: &str) -> Option<Theme> {
        Self::builtin().into_iter().find(|theme| theme.name.eq_ignore_ascii_case(name.trim()))
    }

    /// Colour for a card's last score: untested, failed or passed
    pub fn score_color(&self, last_score: Option<f64>) -> Color {
        match last_score {
            None => self.fg_muted,
            Some(score) if score >= 0.5 => self.success,
            Some(_) => self.error,
        }
    }
}

impl Default for Theme {
    fn default() -> Self {
        TOKYO_NIGHT
    }
}
