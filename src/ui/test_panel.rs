//! Test session panel overlay

use ratatui::{
    Frame,
    layout::{Alignment, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
};

use super::layout::centered_rect;
use crate::app::state::AppState;
use crate::command::ResultKind;
use crate::session::TestSession;
use crate::theme::Theme;

/// Draw the current card of a running session as a centered overlay
pub fn draw(frame: &mut Frame, area: Rect, state: &AppState, session: &TestSession, theme: &Theme) {
    let overlay_area = centered_rect(70, 70, area);
    frame.render_widget(Clear, overlay_area);

    let block = Block::default()
        .title(" Test Session ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.border_focused))
        .style(Style::default().bg(theme.bg_secondary));

    let inner = block.inner(overlay_area);
    frame.render_widget(block, overlay_area);

    let Some(card) = state.test_card.as_ref().or(session.current_card().ok()) else {
        return;
    };

    let mut lines = vec![
        Line::from(Span::styled(
            format!("Card {} of {}", session.position() + 1, session.len()),
            Style::default().fg(theme.fg_muted),
        )),
        Line::from(""),
        Line::from(Span::styled(
            card.question().to_string(),
            Style::default().fg(theme.fg_primary).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
    ];

    for (i, choice) in card.choices().iter().enumerate() {
        lines.push(Line::from(Span::styled(
            format!("  {}) {}", i + 1, choice),
            Style::default().fg(theme.fg_secondary),
        )));
    }
    if card.is_multiple_choice() {
        lines.push(Line::from(""));
    }

    match &state.feedback {
        Some(feedback) => {
            let color = match feedback.kind {
                ResultKind::AnswerCorrect => theme.success,
                ResultKind::AnswerWrong => theme.error,
                _ => theme.warning,
            };
            lines.push(Line::from(Span::styled(
                feedback.message.clone(),
                Style::default().fg(color).add_modifier(Modifier::BOLD),
            )));
            lines.push(Line::from(""));
            lines.push(Line::from(Span::styled(
                "[n] Next card    [Esc] End session",
                Style::default().fg(theme.fg_muted),
            )));
        }
        None => {
            lines.push(Line::from(Span::styled(
                "Type :ans <answer>    [r] Reveal    [Esc] End session",
                Style::default().fg(theme.fg_muted),
            )));
        }
    }

    let correct = session.score_log().iter().filter(|entry| entry.correct).count();
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        format!("Score so far: {}/{}", correct, session.score_log().len()),
        Style::default().fg(theme.info),
    )));

    let para = Paragraph::new(lines).alignment(Alignment::Left).wrap(Wrap { trim: true });
    frame.render_widget(para, inner);
}
