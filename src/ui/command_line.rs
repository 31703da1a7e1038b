//! Command line UI component

use ratatui::{
    Frame,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
};

use crate::app::state::{CommandLineState, CommandMode};
use crate::theme::Theme;

/// Draw the command line at the bottom of the screen
///
/// Multi-line messages (such as the history listing) show their first line
/// here; the full text goes to the output overlay.
pub fn draw(frame: &mut Frame, area: Rect, state: &CommandLineState, hint: &str, theme: &Theme) {
    let (text, style) = match state.mode {
        CommandMode::Normal => match &state.message {
            Some(msg) => {
                let style = if state.is_error {
                    Style::default().fg(theme.error)
                } else {
                    Style::default().fg(theme.fg_secondary)
                };
                (first_line(msg), style)
            }
            None => (hint.to_string(), Style::default().fg(theme.fg_muted)),
        },
        CommandMode::Command => {
            let text = format!(":{}", state.input);
            (text, Style::default().fg(theme.accent_primary))
        }
        CommandMode::Search => {
            let text = format!("/{}", state.input);
            (text, Style::default().fg(theme.info))
        }
    };

    // Build the line with cursor if in input mode
    let line = if state.is_input_mode() {
        build_line_with_cursor(&text, state.cursor + 1, style, theme) // +1 for prefix
    } else {
        Line::from(Span::styled(text, style))
    };

    let paragraph = Paragraph::new(line);
    frame.render_widget(paragraph, area);
}

fn first_line(message: &str) -> String {
    let mut lines = message.lines();
    let first = lines.next().unwrap_or_default().to_string();
    match lines.count() {
        0 => first,
        rest => format!("{} (+{} more lines)", first, rest),
    }
}

/// Build a line with a visible cursor
fn build_line_with_cursor(
    text: &str,
    cursor_pos: usize,
    base_style: Style,
    theme: &Theme,
) -> Line<'static> {
    let chars: Vec<char> = text.chars().collect();
    let mut spans = Vec::new();

    // Text before cursor
    if cursor_pos > 0 {
        let before: String = chars.iter().take(cursor_pos).collect();
        spans.push(Span::styled(before, base_style));
    }

    // Cursor character (or space if at end)
    let cursor_char = chars.get(cursor_pos).copied().unwrap_or(' ');
    let cursor_style =
        Style::default().fg(theme.bg_primary).bg(theme.fg_primary).add_modifier(Modifier::BOLD);
    spans.push(Span::styled(cursor_char.to_string(), cursor_style));

    // Text after cursor
    if cursor_pos + 1 < chars.len() {
        let after: String = chars.iter().skip(cursor_pos + 1).collect();
        spans.push(Span::styled(after, base_style));
    }

    Line::from(spans)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn build_cursor_at_start() {
        let theme = Theme::default();
        let line = build_line_with_cursor(":test", 0, Style::default(), &theme);
        assert_eq!(line.spans.len(), 2); // cursor + rest
    }

    #[test]
    fn build_cursor_at_end() {
        let theme = Theme::default();
        let line = build_line_with_cursor(":test", 5, Style::default(), &theme);
        assert_eq!(line.spans.len(), 2); // before + cursor (space)
    }

    #[test]
    fn single_line_message_is_unchanged() {
        assert_eq!(first_line("Deleted Card: x"), "Deleted Card: x");
    }

    #[test]
    fn multi_line_message_is_summarised() {
        assert_eq!(first_line("Entered commands:\nlist\ncd 1"), "Entered commands: (+2 more lines)");
    }

    #[test]
    fn build_cursor_in_middle() {
        let theme = Theme::default();
        let line = build_line_with_cursor(":test", 2, Style::default(), &theme);
        assert_eq!(line.spans.len(), 3); // before + cursor + after
    }
}
