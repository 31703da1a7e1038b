//! Score report shown after a test session

use ratatui::{
    Frame,
    layout::{Alignment, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
};

use super::layout::centered_rect;
use crate::session::ScoreSummary;
use crate::theme::Theme;

/// Draw the report as a centered overlay
pub fn draw(frame: &mut Frame, area: Rect, summary: &ScoreSummary, theme: &Theme) {
    let overlay_area = centered_rect(70, 70, area);
    frame.render_widget(Clear, overlay_area);

    let block = Block::default()
        .title(" Report ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.border_focused))
        .style(Style::default().bg(theme.bg_secondary));

    let inner = block.inner(overlay_area);
    frame.render_widget(block, overlay_area);

    let all_correct = summary.attempted > 0 && summary.correct == summary.attempted;
    let header_color = if all_correct { theme.success } else { theme.warning };

    let mut lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            format!("Score: {} ({}%)", summary.display(), summary.percentage()),
            Style::default().fg(header_color).add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            format!("Time: {}s", summary.elapsed.as_secs()),
            Style::default().fg(theme.fg_muted),
        )),
        Line::from(""),
    ];

    if summary.per_card.is_empty() {
        lines.push(Line::from(Span::styled(
            "No cards were attempted",
            Style::default().fg(theme.fg_muted),
        )));
    }

    for (i, entry) in summary.per_card.iter().enumerate() {
        let (marker, color) =
            if entry.correct { ("✓", theme.success) } else { ("✗", theme.error) };
        lines.push(Line::from(vec![
            Span::styled(format!("{} ", marker), Style::default().fg(color)),
            Span::styled(format!("{}. ", i + 1), Style::default().fg(theme.fg_muted)),
            Span::styled(entry.card.question().to_string(), Style::default().fg(theme.fg_primary)),
        ]));
    }

    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        "[Esc] Back to folder    :cd .. Home",
        Style::default().fg(theme.fg_muted),
    )));

    let para = Paragraph::new(lines).alignment(Alignment::Center).wrap(Wrap { trim: true });
    frame.render_widget(para, inner);
}
