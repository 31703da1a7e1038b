//! Help overlay

use ratatui::{
    Frame,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
};

use super::layout::centered_rect;
use crate::theme::Theme;

const SECTIONS: &[(&str, &[(&str, &str)])] = &[
    (
        "Home",
        &[
            ("cd INDEX", "open a folder"),
            ("addfolder NAME", "create a folder"),
            ("editfolder INDEX NAME", "rename a folder"),
            ("deletefolder INDEX", "delete a folder"),
        ],
    ),
    (
        "Inside a folder",
        &[
            ("add q/Q a/A [c/C]...", "add a card"),
            ("edit INDEX [q/] [a/] [c/]", "edit a card"),
            ("delete INDEX", "delete a card"),
            ("search KEYWORD... or /", "filter cards by question"),
            ("list", "show all cards"),
            ("test [shuffle|weakest]", "start a test session"),
            ("cd ..", "back to home"),
        ],
    ),
    (
        "Test session",
        &[
            ("ans ANSWER", "answer the card (or choice number)"),
            ("reveal  [r]", "show the answer"),
            ("next  [n]", "next card"),
            ("end  [Esc]", "end the session / close the report"),
        ],
    ),
    (
        "Anywhere",
        &[("history", "list entered commands"), ("help  [?]", "this window"), ("exit", "quit")],
    ),
];

/// Draw the help overlay
pub fn draw(frame: &mut Frame, area: Rect, theme: &Theme) {
    let overlay_area = centered_rect(70, 80, area);
    frame.render_widget(Clear, overlay_area);

    let block = Block::default()
        .title(" Help (any key to close) ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.border_focused))
        .style(Style::default().bg(theme.bg_secondary));

    let inner = block.inner(overlay_area);
    frame.render_widget(block, overlay_area);

    let mut lines = Vec::new();
    for (title, entries) in SECTIONS {
        lines.push(Line::from(Span::styled(
            *title,
            Style::default().fg(theme.accent_secondary).add_modifier(Modifier::BOLD),
        )));
        for (usage, meaning) in entries.iter() {
            lines.push(Line::from(vec![
                Span::styled(format!("  :{:<28}", usage), Style::default().fg(theme.accent_primary)),
                Span::styled(*meaning, Style::default().fg(theme.fg_secondary)),
            ]));
        }
        lines.push(Line::from(""));
    }
    lines.push(Line::from(Span::styled(
        "Keys: j/k move, Enter open, Esc back, t test, : command, / search",
        Style::default().fg(theme.fg_muted),
    )));

    frame.render_widget(Paragraph::new(lines), inner);
}
