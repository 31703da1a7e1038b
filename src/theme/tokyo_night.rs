//! Tokyo Night palettes

use ratatui::style::Color;

use super::Theme;

/// Tokyo Night (night variant)
pub const TOKYO_NIGHT: Theme = Theme {
    name: "Tokyo Night",

    bg_primary: Color::Rgb(26, 27, 38),   // #1a1b26
    bg_secondary: Color::Rgb(36, 40, 59), // #24283b
    bg_tertiary: Color::Rgb(65, 72, 104), // #414868

    fg_primary: Color::Rgb(169, 177, 214),   // #a9b1d6
    fg_secondary: Color::Rgb(192, 202, 245), // #c0caf5
    fg_muted: Color::Rgb(86, 95, 137),       // #565f89

    accent_primary: Color::Rgb(122, 162, 247),   // #7aa2f7
    accent_secondary: Color::Rgb(187, 154, 247), // #bb9af7

    success: Color::Rgb(158, 206, 106), // #9ece6a
    warning: Color::Rgb(224, 175, 104), // #e0af68
    error: Color::Rgb(247, 118, 142),   // #f7768e
    info: Color::Rgb(125, 207, 255),    // #7dcfff

    border: Color::Rgb(65, 72, 104),           // #414868
    border_focused: Color::Rgb(122, 162, 247), // #7aa2f7
    selection: Color::Rgb(40, 52, 87),         // #283457
    cursor: Color::Rgb(192, 202, 245),         // #c0caf5
};

/// Tokyo Night Storm: same accents on a lighter slate background
pub const TOKYO_NIGHT_STORM: Theme = Theme {
    name: "Tokyo Night Storm",

    bg_primary: Color::Rgb(36, 40, 59),   // #24283b
    bg_secondary: Color::Rgb(31, 35, 53), // #1f2335
    bg_tertiary: Color::Rgb(65, 72, 104), // #414868

    fg_primary: Color::Rgb(192, 202, 245), // #c0caf5
    fg_secondary: Color::Rgb(169, 177, 214),
    fg_muted: Color::Rgb(86, 95, 137),

    selection: Color::Rgb(46, 60, 100), // #2e3c64
    ..TOKYO_NIGHT
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn palettes_use_rgb_colors() {
        for theme in Theme::builtin() {
            assert!(matches!(theme.bg_primary, Color::Rgb(_, _, _)));
            assert!(matches!(theme.accent_primary, Color::Rgb(_, _, _)));
        }
    }

    #[test]
    fn storm_shares_night_accents() {
        assert_eq!(TOKYO_NIGHT_STORM.accent_primary, TOKYO_NIGHT.accent_primary);
        assert_ne!(TOKYO_NIGHT_STORM.bg_primary, TOKYO_NIGHT.bg_primary);
    }
}
