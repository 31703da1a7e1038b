//! Layout utilities and common components

use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
};
use textwrap::{Options, wrap};

use crate::theme::Theme;

/// Create a centered rectangle with the given percentage of width and height
pub fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
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

/// Draw the one-line header: app name, breadcrumb and mode
pub fn draw_header(frame: &mut Frame, area: Rect, crumbs: &[&str], mode: &str, theme: &Theme) {
    let mut spans = vec![Span::styled(
        " knowitall ",
        Style::default().fg(theme.bg_primary).bg(theme.accent_primary).add_modifier(Modifier::BOLD),
    )];
    for crumb in crumbs {
        spans.push(Span::styled(" › ", Style::default().fg(theme.fg_muted)));
        spans.push(Span::styled(crumb.to_string(), Style::default().fg(theme.fg_secondary)));
    }
    spans.push(Span::styled(format!("  [{}]", mode), Style::default().fg(theme.fg_muted)));

    let header = Paragraph::new(Line::from(spans)).style(Style::default().bg(theme.bg_secondary));
    frame.render_widget(header, area);
}

/// Wrap text to a width, indenting every line
pub fn wrapped_lines(text: &str, width: usize, indent: &str) -> Vec<String> {
    let usable = width.saturating_sub(indent.len());
    if usable < 2 {
        return vec![format!("{}{}", indent, text)];
    }
    wrap(text, Options::new(usable))
        .into_iter()
        .map(|line| format!("{}{}", indent, line))
        .collect()
}

/// Slice of rows that fits the viewport starting at `offset`
pub fn visible_window<T>(rows: Vec<T>, offset: usize, height: usize) -> Vec<T> {
    rows.into_iter().skip(offset).take(height).collect()
}
